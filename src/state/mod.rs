//! State management module.
//!
//! Connection identity allocation and the per-connection user sessions.

mod session;
mod uid;

pub use session::{SessionRegistry, UserSession};
pub use uid::{ConnectionId, ConnectionIdGenerator};
