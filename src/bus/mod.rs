//! Event bus for session signals
//!
//! Uses tokio::sync::broadcast for pub/sub. Publishers (reader surfaces,
//! platform lifecycle shims) never block; slow subscribers lag and drop.

mod events;

pub use events::{AppState, SessionEvent};

use std::sync::Arc;
use tokio::sync::broadcast;

/// Bus handle for publishing and subscribing to session events
#[derive(Clone)]
pub struct SessionBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionBus {
    /// Create a new bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: SessionEvent) {
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Get the number of current subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Shared bus wrapped in Arc for thread-safe sharing
pub type SharedBus = Arc<SessionBus>;

/// Create a new shared session bus
pub fn create_bus() -> SharedBus {
    Arc::new(SessionBus::default())
}
