use crate::media_events::PlayingEntry;

pub const UNKNOWN: &str = "Unknown";

/// Longest state or details string Discord accepts.
pub const MAX_FIELD_CHARS: usize = 127;

// Discord drops the whole presence if any string is a single character.
const ZERO_WIDTH_SPACE: char = '\u{200B}';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInfo {
    pub album: String,
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub year: u64,
    /// Seconds, 0 for streams.
    pub duration: u64,
}

impl Default for TrackInfo {
    fn default() -> Self {
        Self {
            album: UNKNOWN.to_string(),
            title: UNKNOWN.to_string(),
            artist: UNKNOWN.to_string(),
            genre: UNKNOWN.to_string(),
            year: 0,
            duration: 0,
        }
    }
}

impl TrackInfo {
    pub fn from_entry(entry: Option<&PlayingEntry>) -> Self {
        let Some(entry) = entry else {
            return TrackInfo::default();
        };

        let info = TrackInfo {
            album: text_field(entry.album.as_deref()),
            title: text_field(entry.title.as_deref()),
            artist: text_field(entry.artist.as_deref()),
            genre: text_field(entry.genre.as_deref()),
            year: entry.year.unwrap_or_default(),
            duration: entry.duration.unwrap_or_default(),
        };

        tracing::debug!(
            "album={} artist={} title={} genre={} year={}",
            info.album,
            info.artist,
            info.title,
            info.genre,
            info.year
        );

        info
    }

    pub fn has_album(&self) -> bool {
        self.album != UNKNOWN
    }

    /// `"{artist} - {title}"`
    pub fn details(&self) -> String {
        truncate(&format!("{} - {}", self.artist, self.title))
    }

    pub fn state(&self) -> String {
        let state = if self.has_album() {
            format!("From \"{}\" ({}) | {}", self.album, self.year, self.genre)
        } else {
            format!("{} | {}", self.year, self.genre)
        };

        truncate(&state)
    }
}

fn text_field(value: Option<&str>) -> String {
    match value {
        Some(value) if !value.is_empty() => pad_short(value),
        _ => UNKNOWN.to_string(),
    }
}

pub fn pad_short(value: &str) -> String {
    if value.chars().count() < 2 {
        format!("{value}{ZERO_WIDTH_SPACE}")
    } else {
        value.to_string()
    }
}

/// Keeps at most [`MAX_FIELD_CHARS`] characters.
pub fn truncate(value: &str) -> String {
    value.chars().take(MAX_FIELD_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> PlayingEntry {
        PlayingEntry {
            uri: "file:///music/sia/chandelier.ogg".to_string(),
            title: Some("Chandelier".to_string()),
            artist: Some("Sia".to_string()),
            album: Some("1000 Forms of Fear".to_string()),
            genre: Some("Pop".to_string()),
            year: Some(2014),
            duration: Some(216),
        }
    }

    #[test]
    fn test_no_entry_is_unknown() {
        let info = TrackInfo::from_entry(None);
        assert_eq!(info.title, UNKNOWN);
        assert_eq!(info.year, 0);
        assert_eq!(info.duration, 0);
        assert!(!info.has_album());
    }

    #[test]
    fn test_formatting() {
        let info = TrackInfo::from_entry(Some(&entry()));
        assert_eq!(info.details(), "Sia - Chandelier");
        assert_eq!(info.state(), "From \"1000 Forms of Fear\" (2014) | Pop");
    }

    #[test]
    fn test_state_without_album() {
        let info = TrackInfo::from_entry(Some(&PlayingEntry {
            album: Some(String::new()),
            ..entry()
        }));
        assert_eq!(info.album, UNKNOWN);
        assert_eq!(info.state(), "2014 | Pop");
    }

    #[test]
    fn test_short_fields_are_padded() {
        let info = TrackInfo::from_entry(Some(&PlayingEntry {
            title: Some("X".to_string()),
            artist: Some("é".to_string()),
            genre: Some("Ab".to_string()),
            ..entry()
        }));

        for (original, padded) in [("X", &info.title), ("é", &info.artist)] {
            assert!(padded.chars().count() >= 2);
            assert!(padded.starts_with(original));
        }
        assert_eq!(info.genre, "Ab");
    }

    #[test]
    fn test_missing_fields() {
        let info = TrackInfo::from_entry(Some(&PlayingEntry {
            uri: "http://radio.example/stream".to_string(),
            ..PlayingEntry::default()
        }));
        assert_eq!(info, TrackInfo::default());
    }

    #[test]
    fn test_long_strings_are_truncated() {
        let long = "ü".repeat(300);
        let info = TrackInfo::from_entry(Some(&PlayingEntry {
            artist: Some(long.clone()),
            album: Some(long),
            ..entry()
        }));

        assert_eq!(info.details().chars().count(), MAX_FIELD_CHARS);
        assert_eq!(info.state().chars().count(), MAX_FIELD_CHARS);
        assert!(info.state().starts_with("From \"ü"));
    }
}
