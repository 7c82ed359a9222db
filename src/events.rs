//! In-process event bus.
//!
//! Listener and connections publish three kinds of events; external
//! collaborators (command handlers, session tracking) subscribe here.
//!
//! Delivery is synchronous: `publish_*` calls every subscriber in
//! subscription order on the publishing task and returns when the last one
//! does. Nothing is queued, coalesced or persisted.
//!
//! Subscription happens while the bus is still exclusively owned. Once it is
//! wrapped in an `Arc` and handed to the gateway the subscriber list is
//! read-only, so publishing takes no lock.

use crate::network::ConnectionHandle;
use ircgate_proto::Command;
use std::sync::Arc;

/// Receiver of connection events.
///
/// Every method defaults to a no-op so a subscriber only implements what it
/// cares about. Callbacks run on the connection's task: keep them short and
/// never block.
pub trait EventSubscriber: Send + Sync {
    /// A connection was accepted. Always the first event for `conn`.
    fn on_client_connected(&self, _conn: &ConnectionHandle) {}

    /// The connection's transport closed. Always the last event for `conn`.
    fn on_client_disconnected(&self, _conn: &ConnectionHandle) {}

    /// A complete line from `conn` was parsed into `command`.
    fn on_command_received(&self, _conn: &ConnectionHandle, _command: &Command) {}
}

/// Ordered list of subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber. It will be called after every earlier one.
    pub fn subscribe(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// `true` when nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn publish_connected(&self, conn: &ConnectionHandle) {
        for subscriber in &self.subscribers {
            subscriber.on_client_connected(conn);
        }
    }

    pub fn publish_disconnected(&self, conn: &ConnectionHandle) {
        for subscriber in &self.subscribers {
            subscriber.on_client_disconnected(conn);
        }
    }

    pub fn publish_command(&self, conn: &ConnectionHandle, command: &Command) {
        for subscriber in &self.subscribers {
            subscriber.on_command_received(conn, command);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
