//! The player side: an accessor for what is playing and a signal bus
//! carrying the player's events to subscribed handlers.

use crate::media_events::{PlayerEvent, PlayerSignal, PlayingEntry};

pub trait ShellPlayer {
    fn playing_entry(&self) -> Option<&PlayingEntry>;

    /// Seconds into the playing entry.
    fn playing_time(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalHandlerId(u64);

pub type HandlerResult = Result<(), Box<dyn std::error::Error>>;

type Callback<C> = Box<dyn FnMut(&mut C, &dyn ShellPlayer, &PlayerEvent) -> HandlerResult>;

struct Handler<C> {
    id: SignalHandlerId,
    signal: PlayerSignal,
    callback: Callback<C>,
}

/// Handlers receive the context `C` mutably, the player and the event.
/// They run synchronously in the order they were connected.
pub struct PlayerSignals<C> {
    next_id: u64,
    handlers: Vec<Handler<C>>,
}

impl<C> PlayerSignals<C> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    pub fn connect<F>(&mut self, signal: PlayerSignal, callback: F) -> SignalHandlerId
    where
        F: FnMut(&mut C, &dyn ShellPlayer, &PlayerEvent) -> HandlerResult + 'static,
    {
        self.next_id += 1;
        let id = SignalHandlerId(self.next_id);

        self.handlers.push(Handler {
            id,
            signal,
            callback: Box::new(callback),
        });

        id
    }

    /// Returns false if the id was not connected.
    pub fn disconnect(&mut self, id: SignalHandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|handler| handler.id != id);
        self.handlers.len() != before
    }

    /// Returns the number of handlers that ran. Handler errors are logged
    /// and do not stop the remaining handlers.
    pub fn emit(&mut self, context: &mut C, player: &dyn ShellPlayer, event: &PlayerEvent) -> usize {
        let signal = event.signal();
        let mut invoked = 0;

        for handler in self.handlers.iter_mut().filter(|h| h.signal == signal) {
            invoked += 1;
            if let Err(e) = (handler.callback)(&mut *context, player, event) {
                tracing::error!("Handler for {signal} failed: {e}");
            }
        }

        invoked
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl<C> Default for PlayerSignals<C> {
    fn default() -> Self {
        Self::new()
    }
}
