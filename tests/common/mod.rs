//! Integration test common infrastructure.
//!
//! Provides an in-process gateway with an event recorder attached, plus a
//! raw-line test client.

pub mod client;
pub mod server;

#[allow(unused_imports)]
pub use client::TestClient;
#[allow(unused_imports)]
pub use server::{HandlerFactory, Recorded, Recorder, TestServer};
