//! Mirrors the track playing in Rhythmbox to Discord rich presence.
//!
//! [`PresenceBridge`] subscribes to the player's [`PlayerSignals`] and turns
//! them into [`PresenceClient`] calls. On Linux, [`media_listener`] feeds
//! those signals from the player's MPRIS interface.

pub mod bridge;
pub mod clock;
pub mod discord_rpc;
pub mod error;
pub mod logging;
pub mod media_events;
pub mod media_listener;
pub mod notifications;
pub mod player;
pub mod presence;
pub mod settings;
pub mod track_info;

pub use bridge::{PresenceBridge, Session};
pub use error::{PresenceError, SettingsError};
pub use media_events::{PlayerEvent, PlayerSignal, PlayingEntry};
pub use player::{PlayerSignals, ShellPlayer, SignalHandlerId};
pub use presence::{PresenceClient, PresenceUpdate};
pub use settings::{Settings, TimeStyle};
