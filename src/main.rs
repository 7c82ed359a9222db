//! ircgated - ircgate front-end daemon.
//!
//! Loads the config, binds every configured listener and publishes
//! connection events until interrupted.

use ircgate::config::Config;
use ircgate::events::EventBus;
use ircgate::network::{ConnectionOptions, Gateway};
use ircgate::state::SessionRegistry;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        listeners = config.listen.len(),
        "Starting ircgate"
    );

    // Subscribers must be in place before the bus is shared.
    let mut bus = EventBus::new();
    bus.subscribe(Arc::new(SessionRegistry::new()));
    let bus = Arc::new(bus);

    let mut gateway = Gateway::new(bus, ConnectionOptions::from(&config));
    for listen in &config.listen {
        debug!(address = %listen.socket_addr(), "Binding listener");
        gateway
            .add_listener(listen.address, listen.port)
            .map_err(|e| {
                error!(address = %e.address(), error = %e, "Failed to start listener");
                e
            })?;
    }

    tokio::select! {
        _ = gateway.run() => {
            info!("All listeners stopped");
        }
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutting down");
        }
    }

    Ok(())
}
