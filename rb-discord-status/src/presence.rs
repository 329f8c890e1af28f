use crate::error::PresenceError;

/// One rich presence card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceUpdate {
    pub state: String,
    pub details: String,
    pub large_image: String,
    pub large_text: String,
    pub small_image: String,
    pub small_text: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

pub trait PresenceClient {
    fn connect(&mut self) -> Result<(), PresenceError>;

    fn update(&mut self, presence: &PresenceUpdate) -> Result<(), PresenceError>;

    fn clear(&mut self) -> Result<(), PresenceError>;

    fn close(&mut self) -> Result<(), PresenceError>;
}
