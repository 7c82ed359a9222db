//! Shared view of a connection handed to subscribers.

use crate::error::SendError;
use crate::state::ConnectionId;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Notify, mpsc};

/// Cheap, cloneable reference to one accepted connection.
///
/// The connection task owns the transport. A handle only carries the
/// identity, the remote address, the open/closed flag and a way to ask the
/// task to write or to close.
#[derive(Clone)]
pub struct ConnectionHandle {
    inner: Arc<Shared>,
}

struct Shared {
    id: ConnectionId,
    remote_addr: SocketAddr,
    open: AtomicBool,
    outbound: mpsc::Sender<String>,
    close: Notify,
}

impl ConnectionHandle {
    pub(crate) fn new(
        id: ConnectionId,
        remote_addr: SocketAddr,
        outbound: mpsc::Sender<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Shared {
                id,
                remote_addr,
                open: AtomicBool::new(true),
                outbound,
                close: Notify::new(),
            }),
        }
    }

    /// A handle with no connection task behind it.
    ///
    /// Sends fail with [`SendError::Closed`]. Meant for exercising
    /// subscribers outside a running gateway.
    pub fn detached(id: ConnectionId, remote_addr: SocketAddr) -> Self {
        let (tx, _rx) = mpsc::channel(1);
        Self::new(id, remote_addr, tx)
    }

    pub fn id(&self) -> ConnectionId {
        self.inner.id
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.inner.remote_addr
    }

    /// `false` once the connection task has observed the close.
    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::Acquire)
    }

    /// Queue a line for the peer. The CRLF terminator is added on write.
    ///
    /// Never waits: a full queue is reported instead.
    pub fn send_line(&self, line: impl Into<String>) -> Result<(), SendError> {
        if !self.is_open() {
            return Err(SendError::Closed);
        }
        self.inner.outbound.try_send(line.into()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }

    /// Ask the connection task to close the transport.
    ///
    /// Lines already buffered but not yet dispatched are dropped. The
    /// disconnect event follows from the connection task as usual.
    pub fn close(&self) {
        self.inner.close.notify_one();
    }

    pub(crate) async fn close_requested(&self) {
        self.inner.close.notified().await;
    }

    /// Flip to closed. Returns `true` only for the call that did the flip.
    pub(crate) fn mark_closed(&self) -> bool {
        self.inner.open.swap(false, Ordering::AcqRel)
    }
}

impl std::fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.inner.id)
            .field("remote_addr", &self.inner.remote_addr)
            .field("open", &self.is_open())
            .finish()
    }
}
