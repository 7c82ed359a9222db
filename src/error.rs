//! Error types for the gateway.
//!
//! Parsing never fails and framing errors live in `ircgate_proto`; what is
//! left here are listener setup failures and outbound queue failures.

use std::net::SocketAddr;
use thiserror::Error;

/// Listener setup errors. Fatal for the listener that raised them.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl GatewayError {
    /// Address the failing listener was meant to serve.
    pub fn address(&self) -> SocketAddr {
        match self {
            Self::Bind { address, .. } => *address,
        }
    }
}

/// Errors from [`ConnectionHandle::send_line`](crate::network::ConnectionHandle::send_line).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SendError {
    #[error("outbound queue is full")]
    QueueFull,
    #[error("connection is closed")]
    Closed,
}
