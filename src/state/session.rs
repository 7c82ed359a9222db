//! Per-connection user sessions.
//!
//! A session only tracks whether the connection has completed registration.
//! The state machine is `unregistered -> registered`, with the transition
//! driven by whichever command handler implements registration; nothing in
//! the front end itself ever calls [`SessionRegistry::mark_registered`].

use crate::events::EventSubscriber;
use crate::network::ConnectionHandle;
use crate::state::ConnectionId;
use dashmap::DashMap;
use tracing::debug;

/// Registration state of one connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserSession {
    registered: bool,
}

impl UserSession {
    pub fn is_registered(&self) -> bool {
        self.registered
    }
}

/// Sessions keyed by connection identity.
///
/// Subscribe it to the [`EventBus`](crate::events::EventBus) and it keeps
/// itself in step with connection lifecycles: a session appears on connect
/// and is discarded on disconnect.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<ConnectionId, UserSession>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` for unknown connections and for ones not yet registered.
    pub fn is_registered(&self, id: ConnectionId) -> bool {
        self.sessions.get(&id).is_some_and(|s| s.is_registered())
    }

    /// Move a live connection to the registered state.
    ///
    /// Returns `false` if no session exists for `id` (never connected, or
    /// already gone).
    pub fn mark_registered(&self, id: ConnectionId) -> bool {
        match self.sessions.get_mut(&id) {
            Some(mut session) => {
                session.registered = true;
                true
            }
            None => false,
        }
    }

    /// Snapshot of the session for `id`.
    pub fn get(&self, id: ConnectionId) -> Option<UserSession> {
        self.sessions.get(&id).map(|s| *s)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl EventSubscriber for SessionRegistry {
    fn on_client_connected(&self, conn: &ConnectionHandle) {
        self.sessions.insert(conn.id(), UserSession::default());
    }

    fn on_client_disconnected(&self, conn: &ConnectionHandle) {
        if let Some((id, session)) = self.sessions.remove(&conn.id()) {
            debug!(%id, registered = session.is_registered(), "Session discarded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(raw: u64) -> ConnectionHandle {
        ConnectionHandle::detached(ConnectionId::new(raw), "127.0.0.1:5000".parse().unwrap())
    }

    #[test]
    fn fresh_connection_is_unregistered() {
        let registry = SessionRegistry::new();
        let c = conn(1);
        registry.on_client_connected(&c);

        assert!(!registry.is_registered(c.id()));
        assert_eq!(registry.get(c.id()), Some(UserSession::default()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_connection_is_unregistered() {
        let registry = SessionRegistry::new();
        assert!(!registry.is_registered(ConnectionId::new(42)));
        assert!(registry.get(ConnectionId::new(42)).is_none());
    }

    #[test]
    fn mark_registered_transitions_live_session() {
        let registry = SessionRegistry::new();
        let c = conn(1);
        registry.on_client_connected(&c);

        assert!(registry.mark_registered(c.id()));
        assert!(registry.is_registered(c.id()));
        // Idempotent; there is no way back.
        assert!(registry.mark_registered(c.id()));
        assert!(registry.is_registered(c.id()));
    }

    #[test]
    fn mark_registered_ignores_unknown_connection() {
        let registry = SessionRegistry::new();
        assert!(!registry.mark_registered(ConnectionId::new(5)));
        assert!(registry.is_empty());
    }

    #[test]
    fn disconnect_discards_session() {
        let registry = SessionRegistry::new();
        let a = conn(1);
        let b = conn(2);
        registry.on_client_connected(&a);
        registry.on_client_connected(&b);
        registry.mark_registered(a.id());

        registry.on_client_disconnected(&a);

        assert!(registry.get(a.id()).is_none());
        assert!(!registry.is_registered(a.id()));
        assert!(!registry.mark_registered(a.id()));
        assert_eq!(registry.len(), 1);
    }
}
