//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds sockets and spawns a Connection task for each incoming
//! client. Every listener gets its own accept loop; a failed accept is
//! logged and the loop carries on.

use crate::error::GatewayError;
use crate::events::EventBus;
use crate::network::{Connection, ConnectionOptions};
use crate::state::ConnectionIdGenerator;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument};

/// Pending-connection queue length for every listening socket.
pub const LISTEN_BACKLOG: u32 = 511;

/// Pause after a failed accept.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// The Gateway accepts incoming TCP connections and spawns handlers.
///
/// Dropping the gateway stops its accept loops; connections already
/// accepted keep running until their transports close.
pub struct Gateway {
    bus: Arc<EventBus>,
    options: ConnectionOptions,
    ids: Arc<ConnectionIdGenerator>,
    listeners: JoinSet<()>,
    bound: Vec<SocketAddr>,
}

impl Gateway {
    /// Create a gateway publishing to `bus`. No sockets are bound yet.
    pub fn new(bus: Arc<EventBus>, options: ConnectionOptions) -> Self {
        Self {
            bus,
            options,
            ids: Arc::new(ConnectionIdGenerator::new()),
            listeners: JoinSet::new(),
            bound: Vec::new(),
        }
    }

    /// Bind `address:port` and start accepting on it.
    ///
    /// Returns the bound address, which differs from the request when port 0
    /// was asked for. Must be called from within a Tokio runtime.
    pub fn add_listener(&mut self, address: IpAddr, port: u16) -> Result<SocketAddr, GatewayError> {
        let requested = SocketAddr::new(address, port);
        let bind_err = |source| GatewayError::Bind {
            address: requested,
            source,
        };

        let listener = bind(requested).map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        info!(address = %local_addr, backlog = LISTEN_BACKLOG, "Listening for new connections");

        self.listeners.spawn(accept_loop(
            listener,
            local_addr,
            Arc::clone(&self.bus),
            Arc::clone(&self.ids),
            self.options,
        ));
        self.bound.push(local_addr);
        Ok(local_addr)
    }

    /// Addresses bound so far, in `add_listener` order.
    pub fn local_addrs(&self) -> &[SocketAddr] {
        &self.bound
    }

    /// Run the gateway until every accept loop has stopped.
    pub async fn run(mut self) {
        while let Some(result) = self.listeners.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Accept loop terminated");
            }
        }
    }
}

fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4()?,
        SocketAddr::V6(_) => TcpSocket::new_v6()?,
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(LISTEN_BACKLOG)
}

#[instrument(skip_all, fields(listener = %local_addr), name = "gateway")]
async fn accept_loop(
    listener: TcpListener,
    local_addr: SocketAddr,
    bus: Arc<EventBus>,
    ids: Arc<ConnectionIdGenerator>,
    options: ConnectionOptions,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let id = ids.next();
                debug!(%id, %addr, "Connection accepted");

                let connection = Connection::new(id, stream, addr, Arc::clone(&bus), &options);
                tokio::spawn(connection.run());
            }
            Err(e) => accept_failed(&e).await,
        }
    }
}

/// Log a failed accept and pause, so a persistent error such as running out
/// of file descriptors does not spin the loop.
async fn accept_failed(e: &std::io::Error) {
    error!(error = %e, "Failed to accept connection");
    tokio::time::sleep(ACCEPT_BACKOFF).await;
}
