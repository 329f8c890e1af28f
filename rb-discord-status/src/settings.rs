use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

pub const DEFAULT_APP_ID: &str = "589905203533185064";

const SETTINGS_FILE: &str = "settings.json";
const SETTINGS_DIR: &str = "rb-discord-status";
const SETTINGS_PATH_VAR: &str = "RB_DISCORD_STATUS_SETTINGS";

/// How the presence timestamps are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TimeStyle {
    /// Start is backdated by the playback position, no end time.
    #[default]
    Elapsed,
    /// Start is now and the end is when the track finishes.
    Remaining,
}

impl TryFrom<u8> for TimeStyle {
    type Error = SettingsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TimeStyle::Elapsed),
            1 => Ok(TimeStyle::Remaining),
            other => Err(SettingsError::InvalidTimeStyle(other)),
        }
    }
}

impl From<TimeStyle> for u8 {
    fn from(style: TimeStyle) -> Self {
        match style {
            TimeStyle::Elapsed => 0,
            TimeStyle::Remaining => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "appid")]
    pub app_id: String,
    pub show_notifs: bool,
    pub time_style: TimeStyle,
    /// MPRIS bus name suffix of the watched player.
    pub player: String,
    /// Tooltip of the large presence image.
    pub large_text: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            show_notifs: true,
            time_style: TimeStyle::Elapsed,
            player: "rhythmbox".to_string(),
            large_text: "Rhythmbox".to_string(),
        }
    }
}

impl Settings {
    pub fn from_json(contents: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Missing files give the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        tracing::debug!("Loading settings from {}", path.display());

        if !path.exists() {
            tracing::info!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents)
    }

    pub fn load_default() -> Result<Self, SettingsError> {
        Self::load(&settings_path())
    }
}

pub fn settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_PATH_VAR) {
        return PathBuf::from(path);
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_settings_file() {
        let settings =
            Settings::from_json(r#"{"appid": "1234", "show_notifs": false, "time_style": 1}"#)
                .unwrap();

        assert_eq!(settings.app_id, "1234");
        assert!(!settings.show_notifs);
        assert_eq!(settings.time_style, TimeStyle::Remaining);
        assert_eq!(settings.player, "rhythmbox");
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.app_id, DEFAULT_APP_ID);
    }

    #[test]
    fn test_time_style_out_of_range() {
        let err = Settings::from_json(r#"{"time_style": 2}"#).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.to_string().contains("time_style"));
    }

    #[test]
    fn test_missing_file() {
        let path = env::temp_dir().join("rb-discord-status-no-such-dir/settings.json");
        assert_eq!(Settings::load(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join(format!(
            "rb-discord-status-settings-{}.json",
            std::process::id()
        ));
        fs::write(&path, r#"{"player": "vlc", "large_text": "VLC"}"#).unwrap();

        let settings = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(settings.player, "vlc");
        assert_eq!(settings.large_text, "VLC");
        assert_eq!(settings.time_style, TimeStyle::Elapsed);
    }
}
