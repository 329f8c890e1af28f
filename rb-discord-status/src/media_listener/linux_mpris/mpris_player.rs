use std::str::FromStr;

use crate::{
    media_events::{PlaybackState, PlayerEvent, PlayingEntry, STREAM_SONG_TITLE},
    player::ShellPlayer,
};

const NO_TRACK: &str = "/org/mpris/MediaPlayer2/TrackList/NoTrack";

/// What one MPRIS metadata map says about the playing track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub track_id: Option<String>,
    pub entry: PlayingEntry,
    pub stream_title: Option<String>,
}

impl TrackMetadata {
    fn has_track(&self) -> bool {
        self.track_id
            .as_deref()
            .is_some_and(|id| !id.is_empty() && id != NO_TRACK)
    }
}

/// Snapshot of an MPRIS player, turned into player events as D-Bus
/// property changes come in.
///
/// A stopped player has no playing entry. Metadata received while stopped
/// is held back until playback starts.
#[derive(Debug, Default)]
pub struct MprisPlayer {
    track_id: Option<String>,
    entry: Option<PlayingEntry>,
    stream_title: Option<String>,
    pending: Option<TrackMetadata>,
    playback_state: PlaybackState,
    position: u64,
}

impl ShellPlayer for MprisPlayer {
    fn playing_entry(&self) -> Option<&PlayingEntry> {
        self.entry.as_ref()
    }

    fn playing_time(&self) -> u64 {
        self.position
    }
}

impl MprisPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playback_state == PlaybackState::Playing
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback_state
    }

    fn clear_track(&mut self) -> bool {
        self.track_id = None;
        self.stream_title = None;
        self.position = 0;
        self.entry.take().is_some()
    }

    pub fn apply_metadata(&mut self, metadata: TrackMetadata) -> Vec<PlayerEvent> {
        let mut events = Vec::new();

        if self.playback_state == PlaybackState::Stopped {
            self.pending = metadata.has_track().then_some(metadata);
            return events;
        }

        if !metadata.has_track() {
            if self.clear_track() {
                events.push(PlayerEvent::PlayingSongChanged(None));
            }
            return events;
        }

        let uri = metadata.entry.uri.clone();

        if self.track_id != metadata.track_id {
            self.track_id = metadata.track_id;
            self.stream_title = None;
            self.position = 0;
            self.entry = Some(metadata.entry);
            events.push(PlayerEvent::PlayingSongChanged(Some(uri.clone())));
        } else {
            self.entry = Some(metadata.entry);
        }

        if metadata.stream_title.is_some() && metadata.stream_title != self.stream_title {
            let old = std::mem::replace(&mut self.stream_title, metadata.stream_title.clone());
            events.push(PlayerEvent::PlayingSongPropertyChanged {
                uri,
                property: STREAM_SONG_TITLE.to_string(),
                old,
                new: metadata.stream_title,
            });
        }

        events
    }

    /// `status` is the MPRIS `PlaybackStatus` string.
    pub fn apply_playback_status(&mut self, status: &str) -> Vec<PlayerEvent> {
        let state = PlaybackState::from_str(status).unwrap_or(PlaybackState::Other);
        let previous = self.playback_state;
        let was_stopped = previous == PlaybackState::Stopped;
        let mut events = Vec::new();

        self.playback_state = state;

        if state == PlaybackState::Stopped {
            if !was_stopped {
                if self.clear_track() {
                    events.push(PlayerEvent::PlayingSongChanged(None));
                }
                events.push(PlayerEvent::PlayingChanged(false));
            }
            return events;
        }

        if was_stopped {
            if let Some(pending) = self.pending.take() {
                events.extend(self.apply_metadata(pending));
            }
        }

        if state != previous {
            events.push(PlayerEvent::PlayingChanged(self.is_playing()));
        }

        events
    }

    /// `position` is in microseconds. Only whole-second changes count.
    pub fn apply_position(&mut self, position: i64) -> Option<PlayerEvent> {
        if self.entry.is_none() {
            return None;
        }

        let seconds = u64::try_from(position / 1_000_000).unwrap_or_default();
        if seconds == self.position {
            return None;
        }

        self.position = seconds;
        Some(PlayerEvent::ElapsedChanged(seconds))
    }
}
