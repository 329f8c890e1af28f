mod metadata;
mod mpris_listener;
mod mpris_player;
mod player;

pub use mpris_listener::listener;
pub use mpris_player::{MprisPlayer, TrackMetadata};
