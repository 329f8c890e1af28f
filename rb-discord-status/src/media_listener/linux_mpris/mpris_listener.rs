use std::{collections::HashMap, time::Duration};

use futures_util::stream::StreamExt;
use tokio::time::{MissedTickBehavior, interval};
use zbus::{Connection, zvariant};

use crate::{
    error::ListenerError,
    media_events::{PlayerEvent, PlayingEntry},
    media_listener::linux_mpris::{
        metadata::Metadata,
        mpris_player::{MprisPlayer, TrackMetadata},
        player::PlayerProxy,
    },
    player::PlayerSignals,
};

const MPRIS2_PREFIX: &str = "org.mpris.MediaPlayer2.";

// the position property has no change notifications, so it is polled
const ELAPSED_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Watches `org.mpris.MediaPlayer2.<player_name>` and emits its events
/// into `signals` until Ctrl-C.
pub fn listener<C>(
    player_name: &str,
    context: &mut C,
    signals: &mut PlayerSignals<C>,
) -> Result<(), ListenerError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(listen(player_name, context, signals))
}

fn dispatch<C>(
    context: &mut C,
    signals: &mut PlayerSignals<C>,
    player: &MprisPlayer,
    events: impl IntoIterator<Item = PlayerEvent>,
) {
    for event in events {
        signals.emit(context, player, &event);
    }
}

async fn listen<C>(
    player_name: &str,
    context: &mut C,
    signals: &mut PlayerSignals<C>,
) -> Result<(), ListenerError> {
    let connection = Connection::session().await?;
    let dbus_name = format!("{MPRIS2_PREFIX}{player_name}");

    let player_proxy = PlayerProxy::builder(&connection)
        .uncached_properties(&["Position"])
        .destination(dbus_name.clone())?
        .build()
        .await?;

    tracing::info!("Watching {dbus_name}");

    let mut player = MprisPlayer::new();

    // listener just started, poll existing values

    let metadata = player_proxy.metadata().await.unwrap_or_default();
    let events = player.apply_metadata(parse_metadata(metadata));
    dispatch(context, signals, &player, events);

    let playback_status = player_proxy.playback_status().await.unwrap_or_default();
    let events = player.apply_playback_status(&playback_status);
    dispatch(context, signals, &player, events);

    let mut metadata_changed = player_proxy.receive_metadata_changed().await;
    let mut playback_status_changed = player_proxy.receive_playback_status_changed().await;

    let mut elapsed_ticker = interval(ELAPSED_POLL_INTERVAL);
    elapsed_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(changed) = metadata_changed.next() => {
                let metadata = changed.get().await.unwrap_or_default();
                let events = player.apply_metadata(parse_metadata(metadata));
                dispatch(context, signals, &player, events);
            }

            Some(changed) = playback_status_changed.next() => {
                let playback_status = changed.get().await.unwrap_or_default();
                let events = player.apply_playback_status(&playback_status);
                dispatch(context, signals, &player, events);
            }

            _ = elapsed_ticker.tick() => {
                // the player may have left the bus, keep waiting for it
                if let Ok(position) = player_proxy.position().await {
                    let event = player.apply_position(position);
                    dispatch(context, signals, &player, event);
                }
            }

            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::warn!("Failed to listen for Ctrl-C: {e}");
                }
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn parse_metadata(metadata: HashMap<String, zvariant::OwnedValue>) -> TrackMetadata {
    let metadata = Metadata::from(metadata);

    let track_id = metadata.track_id().map(str::to_string);
    let uri = metadata
        .url()
        .or(track_id.as_deref())
        .unwrap_or_default()
        .to_string();

    TrackMetadata {
        entry: PlayingEntry {
            uri,
            title: metadata.title().map(str::to_string),
            artist: metadata.artists().unwrap_or_default().first().cloned(),
            album: metadata.album_name().map(str::to_string),
            genre: metadata.genres().unwrap_or_default().first().cloned(),
            year: metadata.year(),
            duration: metadata.length().map(|length| length.as_secs()),
        },
        track_id,
        stream_title: metadata.stream_title().map(str::to_string),
    }
}
