//! Network listener configuration.

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};

/// One `[[listen]]` block: an address/port pair to accept clients on.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0" or "::1").
    pub address: IpAddr,
    /// Port to bind to. Port 0 picks an ephemeral port.
    pub port: u16,
}

impl ListenConfig {
    /// The bind target as a socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}
