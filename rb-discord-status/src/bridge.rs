//! Turns player events into rich presence updates.

use crate::{
    clock::Clock,
    error::PresenceError,
    media_events::{PlayerEvent, PlayerSignal, STREAM_SONG_TITLE},
    notifications::{NOTIFICATION_TITLE, Notifier},
    player::{PlayerSignals, ShellPlayer, SignalHandlerId},
    presence::{PresenceClient, PresenceUpdate},
    settings::{Settings, TimeStyle},
    track_info::{TrackInfo, truncate},
};

pub const LARGE_IMAGE: &str = "rhythmbox";
pub const STREAM_STATE: &str = "Radio stream";

/// Bookkeeping for one activation. Times are unix seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub connected: bool,
    pub playing: bool,
    pub streaming: bool,
    /// Set by a stream title, kept across song changes while the
    /// entries have no duration.
    pub stream_flag: bool,
    pub song_started_at: i64,
    pub playing_date: i64,
    pub elapsed_time: u64,
}

pub struct PresenceBridge<P> {
    settings: Settings,
    client: P,
    notifier: Option<Box<dyn Notifier>>,
    clock: Box<dyn Clock>,
    session: Session,
    handler_ids: Vec<SignalHandlerId>,
}

impl<P: PresenceClient + 'static> PresenceBridge<P> {
    /// `notifier` is `None` when the desktop has no notification service.
    pub fn new(
        settings: Settings,
        client: P,
        notifier: Option<Box<dyn Notifier>>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            client,
            notifier,
            clock,
            session: Session::default(),
            handler_ids: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn client(&self) -> &P {
        &self.client
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn send_notification(&self, message: &str) {
        if !self.settings.show_notifs {
            return;
        }

        if let Some(notifier) = &self.notifier {
            notifier.notify(NOTIFICATION_TITLE, message);
        }
    }

    /// Connects the presence client and subscribes to the player.
    ///
    /// A refused connection is final for this activation: nothing gets
    /// subscribed and the user has to deactivate and activate again.
    pub fn activate(&mut self, signals: &mut PlayerSignals<Self>) -> Result<(), PresenceError> {
        if !self.handler_ids.is_empty() {
            tracing::warn!("Already active, ignoring activate");
            return Ok(());
        }

        if let Err(e) = self.client.connect() {
            tracing::error!("Failed to connect to discord: {e}");
            self.send_notification(&format!(
                "Failed to connect to discord: {e}\nRe-enable the plugin to retry"
            ));
            return Err(e);
        }

        self.session.connected = true;
        tracing::info!("Connected to Discord");
        self.send_notification("Connected to Discord");

        self.handler_ids = vec![
            signals.connect(PlayerSignal::PlayingSongChanged, |bridge: &mut Self, player, event| {
                if let PlayerEvent::PlayingSongChanged(uri) = event {
                    bridge.on_song_changed(player, uri.as_deref())?;
                }
                Ok(())
            }),
            signals.connect(PlayerSignal::PlayingChanged, |bridge: &mut Self, player, event| {
                if let PlayerEvent::PlayingChanged(playing) = event {
                    bridge.on_play_state_changed(player, *playing)?;
                }
                Ok(())
            }),
            signals.connect(PlayerSignal::ElapsedChanged, |bridge: &mut Self, player, event| {
                if let PlayerEvent::ElapsedChanged(elapsed) = event {
                    bridge.on_elapsed_changed(player, *elapsed)?;
                }
                Ok(())
            }),
            signals.connect(
                PlayerSignal::PlayingSongPropertyChanged,
                |bridge: &mut Self, player, event| {
                    if let PlayerEvent::PlayingSongPropertyChanged {
                        uri,
                        property,
                        old,
                        new,
                    } = event
                    {
                        bridge.on_song_property_changed(
                            player,
                            uri,
                            property,
                            old.as_deref(),
                            new.as_deref(),
                        )?;
                    }
                    Ok(())
                },
            ),
        ];

        Ok(())
    }

    pub fn deactivate(&mut self, signals: &mut PlayerSignals<Self>) {
        for id in self.handler_ids.drain(..) {
            signals.disconnect(id);
        }

        if self.session.connected {
            if let Err(e) = self.client.close() {
                tracing::warn!("Failed to close the Discord connection: {e}");
            }
            tracing::info!("Disconnected from Discord");
        }

        self.session = Session::default();
    }

    pub fn update_rpc(
        &mut self,
        player: &dyn ShellPlayer,
        playing: bool,
    ) -> Result<(), PresenceError> {
        if !self.session.connected {
            return Ok(());
        }

        let entry = player.playing_entry();

        if !playing && entry.is_none() {
            self.session.playing = false;
            return self.client.clear();
        }

        let info = TrackInfo::from_entry(entry);
        let now = self.clock.now();

        if self.session.streaming || self.session.stream_flag {
            return self.client.update(&PresenceUpdate {
                state: STREAM_STATE.to_string(),
                details: truncate(&info.title),
                large_image: LARGE_IMAGE.to_string(),
                large_text: self.settings.large_text.clone(),
                small_image: "play".to_string(),
                small_text: "Streaming".to_string(),
                start: Some(now),
                end: None,
            });
        }

        self.session.playing = playing;

        let position = player.playing_time() as i64;
        let (start, end) = match self.settings.time_style {
            TimeStyle::Remaining => (now, Some(now + info.duration as i64 - position)),
            TimeStyle::Elapsed => (now - position, None),
        };

        let (small_image, small_text) = if playing {
            ("play", "Playing")
        } else {
            ("pause", "Paused")
        };

        self.client.update(&PresenceUpdate {
            state: info.state(),
            details: info.details(),
            large_image: LARGE_IMAGE.to_string(),
            large_text: self.settings.large_text.clone(),
            small_image: small_image.to_string(),
            small_text: small_text.to_string(),
            start: playing.then_some(start),
            end: end.filter(|_| playing),
        })
    }

    pub fn on_song_changed(
        &mut self,
        player: &dyn ShellPlayer,
        uri: Option<&str>,
    ) -> Result<(), PresenceError> {
        tracing::debug!("playing song changed entry={uri:?}");

        let Some(entry) = player.playing_entry() else {
            return Ok(());
        };
        let duration = entry.duration.unwrap_or_default();

        let now = self.clock.now();
        self.session.song_started_at = now;
        self.session.playing_date = now;
        self.session.elapsed_time = 0;

        self.session.streaming = duration == 0 && self.session.streaming;
        if duration > 0 {
            self.session.stream_flag = false;
        }

        self.update_rpc(player, true)
    }

    pub fn on_play_state_changed(
        &mut self,
        player: &dyn ShellPlayer,
        playing: bool,
    ) -> Result<(), PresenceError> {
        tracing::debug!("playing state changed playing={playing}");
        self.update_rpc(player, playing)
    }

    /// Called once a second while playing and after seeks.
    pub fn on_elapsed_changed(
        &mut self,
        player: &dyn ShellPlayer,
        elapsed: u64,
    ) -> Result<(), PresenceError> {
        tracing::trace!("elapsed changed elapsed={elapsed}");

        if self.session.playing {
            self.session.playing_date += 1;
        }
        self.session.elapsed_time = elapsed;

        let elapsed = elapsed as i64;
        if self.session.playing_date - elapsed != self.session.song_started_at && elapsed != 0 {
            self.session.playing_date = self.session.song_started_at + elapsed;
            tracing::debug!("elapsed changed too much");
            return self.update_rpc(player, true);
        }

        Ok(())
    }

    pub fn on_song_property_changed(
        &mut self,
        player: &dyn ShellPlayer,
        uri: &str,
        property: &str,
        old: Option<&str>,
        new: Option<&str>,
    ) -> Result<(), PresenceError> {
        tracing::debug!(
            "playing song property changed uri={uri} property={property} old={old:?} new={new:?}"
        );

        if property == STREAM_SONG_TITLE {
            self.session.streaming = true;
            self.session.stream_flag = true;
            return self.update_rpc(player, true);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::media_events::PlayingEntry;

    #[derive(Default)]
    struct CountingClient {
        connects: u32,
        updates: Vec<PresenceUpdate>,
        clears: u32,
    }

    impl PresenceClient for CountingClient {
        fn connect(&mut self) -> Result<(), PresenceError> {
            self.connects += 1;
            Ok(())
        }

        fn update(&mut self, presence: &PresenceUpdate) -> Result<(), PresenceError> {
            self.updates.push(presence.clone());
            Ok(())
        }

        fn clear(&mut self) -> Result<(), PresenceError> {
            self.clears += 1;
            Ok(())
        }

        fn close(&mut self) -> Result<(), PresenceError> {
            Ok(())
        }
    }

    struct TestClock(Rc<Cell<i64>>);

    impl Clock for TestClock {
        fn now(&self) -> i64 {
            self.0.get()
        }
    }

    struct Player {
        entry: Option<PlayingEntry>,
        time: u64,
    }

    impl ShellPlayer for Player {
        fn playing_entry(&self) -> Option<&PlayingEntry> {
            self.entry.as_ref()
        }

        fn playing_time(&self) -> u64 {
            self.time
        }
    }

    fn song(duration: u64) -> Player {
        Player {
            entry: Some(PlayingEntry {
                uri: "file:///a.flac".to_string(),
                title: Some("Song".to_string()),
                artist: Some("Artist".to_string()),
                duration: Some(duration),
                ..PlayingEntry::default()
            }),
            time: 0,
        }
    }

    fn connected_bridge(now: Rc<Cell<i64>>) -> PresenceBridge<CountingClient> {
        let mut bridge = PresenceBridge::new(
            Settings::default(),
            CountingClient::default(),
            None,
            Box::new(TestClock(now)),
        );
        let mut signals = PlayerSignals::new();
        bridge.activate(&mut signals).unwrap();
        bridge
    }

    #[test]
    fn test_song_change_resets_timing() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = connected_bridge(now.clone());

        bridge.on_song_changed(&song(200), Some("file:///a.flac")).unwrap();

        let session = bridge.session();
        assert_eq!(session.song_started_at, 1_000);
        assert_eq!(session.playing_date, 1_000);
        assert_eq!(session.elapsed_time, 0);
        assert!(session.playing);
        assert_eq!(bridge.client().updates.len(), 1);
    }

    #[test]
    fn test_song_change_without_entry_is_ignored() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = connected_bridge(now);

        let nothing = Player {
            entry: None,
            time: 0,
        };
        bridge.on_song_changed(&nothing, None).unwrap();

        assert_eq!(bridge.session().song_started_at, 0);
        assert!(bridge.client().updates.is_empty());
    }

    #[test]
    fn test_regular_ticks_do_not_update() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = connected_bridge(now);
        let mut player = song(200);

        bridge.on_song_changed(&player, None).unwrap();
        for elapsed in 1..=5 {
            player.time = elapsed;
            bridge.on_elapsed_changed(&player, elapsed).unwrap();
        }

        assert_eq!(bridge.session().playing_date, 1_005);
        assert_eq!(bridge.client().updates.len(), 1);
    }

    #[test]
    fn test_seek_resynchronizes() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = connected_bridge(now.clone());
        let mut player = song(200);

        bridge.on_song_changed(&player, None).unwrap();
        now.set(1_001);
        player.time = 90;
        bridge.on_elapsed_changed(&player, 90).unwrap();

        assert_eq!(bridge.session().playing_date, 1_090);
        assert_eq!(bridge.session().elapsed_time, 90);
        let updates = &bridge.client().updates;
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].start, Some(1_001 - 90));
    }

    #[test]
    fn test_elapsed_zero_never_updates() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = connected_bridge(now);
        let player = song(200);

        bridge.on_song_changed(&player, None).unwrap();
        bridge.on_elapsed_changed(&player, 0).unwrap();

        assert_eq!(bridge.client().updates.len(), 1);
    }

    #[test]
    fn test_stream_flag_survives_song_change_without_duration() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = connected_bridge(now);
        let radio = song(0);

        bridge
            .on_song_property_changed(&radio, "http://radio", STREAM_SONG_TITLE, None, Some("Now"))
            .unwrap();
        bridge.on_song_changed(&radio, None).unwrap();

        assert!(bridge.session().stream_flag);
        assert_eq!(bridge.client().updates.last().unwrap().state, STREAM_STATE);

        bridge.on_song_changed(&song(180), None).unwrap();

        assert!(!bridge.session().streaming);
        assert!(!bridge.session().stream_flag);
        assert_ne!(bridge.client().updates.last().unwrap().state, STREAM_STATE);
    }

    #[test]
    fn test_other_properties_are_ignored() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = connected_bridge(now);

        bridge
            .on_song_property_changed(&song(0), "http://radio", "title", None, Some("x"))
            .unwrap();

        assert!(!bridge.session().streaming);
        assert!(bridge.client().updates.is_empty());
    }

    #[test]
    fn test_deactivate_resets_session() {
        let now = Rc::new(Cell::new(1_000));
        let mut bridge = PresenceBridge::new(
            Settings::default(),
            CountingClient::default(),
            None,
            Box::new(TestClock(now)),
        );
        let mut signals = PlayerSignals::new();

        bridge.activate(&mut signals).unwrap();
        bridge.activate(&mut signals).unwrap();
        assert_eq!(bridge.client().connects, 1);
        assert_eq!(signals.handler_count(), 4);

        bridge.deactivate(&mut signals);
        assert_eq!(signals.handler_count(), 0);
        assert_eq!(bridge.session(), &Session::default());

        bridge.update_rpc(&song(10), true).unwrap();
        assert!(bridge.client().updates.is_empty());
    }
}
