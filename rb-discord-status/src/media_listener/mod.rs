#[cfg(target_os = "linux")]
mod linux_mpris;

#[cfg(target_os = "linux")]
pub use linux_mpris::{MprisPlayer, TrackMetadata, listener};
