use strum::EnumString;

/// Property name the player uses for the now-playing text of a radio stream.
pub const STREAM_SONG_TITLE: &str = "rb:stream-song-title";

/// The host's record of the playing track. Durations are in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayingEntry {
    pub uri: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u64>,
    pub duration: Option<u64>,
}

#[derive(EnumString, strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "kebab-case")]
pub enum PlayerSignal {
    PlayingSongChanged,
    PlayingChanged,
    ElapsedChanged,
    PlayingSongPropertyChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Uri of the new entry, `None` when nothing is playing anymore.
    PlayingSongChanged(Option<String>),
    PlayingChanged(bool),
    /// Elapsed seconds into the playing entry.
    ElapsedChanged(u64),
    PlayingSongPropertyChanged {
        uri: String,
        property: String,
        old: Option<String>,
        new: Option<String>,
    },
}

impl PlayerEvent {
    pub fn signal(&self) -> PlayerSignal {
        match self {
            PlayerEvent::PlayingSongChanged(_) => PlayerSignal::PlayingSongChanged,
            PlayerEvent::PlayingChanged(_) => PlayerSignal::PlayingChanged,
            PlayerEvent::ElapsedChanged(_) => PlayerSignal::ElapsedChanged,
            PlayerEvent::PlayingSongPropertyChanged { .. } => {
                PlayerSignal::PlayingSongPropertyChanged
            }
        }
    }
}

#[derive(EnumString, strum::Display, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Paused,
    Playing,
    Other,
}
