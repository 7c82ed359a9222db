//! ircgate - connection front end for an IRC-style chat server.
//!
//! Accepts TCP connections, frames each byte stream into protocol lines,
//! parses every line into a [`Command`](ircgate_proto::Command) and publishes
//! connection and command events on an [`EventBus`](events::EventBus).
//! What a command *means* is left to whoever subscribes.
//!
//! ```no_run
//! use ircgate::events::EventBus;
//! use ircgate::network::{ConnectionOptions, Gateway};
//! use ircgate::state::SessionRegistry;
//! use std::sync::Arc;
//!
//! # async fn start() -> Result<(), ircgate::error::GatewayError> {
//! let sessions = Arc::new(SessionRegistry::new());
//! let mut bus = EventBus::new();
//! bus.subscribe(sessions.clone());
//!
//! let mut gateway = Gateway::new(Arc::new(bus), ConnectionOptions::default());
//! gateway.add_listener("0.0.0.0".parse().unwrap(), 6667)?;
//! gateway.run().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod network;
pub mod state;

pub use ircgate_proto as proto;
