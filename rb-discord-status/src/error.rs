use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresenceError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),
    #[error("presence client is not connected")]
    NotConnected,
    #[error("presence IPC error: {0}")]
    Ipc(String),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid time_style {0}, expected 0 or 1")]
    InvalidTimeStyle(u8),
}

#[cfg(target_os = "linux")]
#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("D-Bus error: {0}")]
    DBus(#[from] zbus::Error),
    #[error("failed to start the event loop: {0}")]
    Runtime(#[from] std::io::Error),
}
