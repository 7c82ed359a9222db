//! Test server management.
//!
//! Runs an ircgate Gateway inside the test's runtime on an ephemeral port,
//! with a [`Recorder`] and a [`SessionRegistry`] subscribed.

use ircgate::events::{EventBus, EventSubscriber};
use ircgate::network::{ConnectionHandle, ConnectionOptions, Gateway};
use ircgate::proto::Command;
use ircgate::state::{ConnectionId, SessionRegistry};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// One observed event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Connected(ConnectionId),
    Command(ConnectionId, Command),
    Disconnected(ConnectionId),
}

impl Recorded {
    pub fn id(&self) -> ConnectionId {
        match self {
            Self::Connected(id) | Self::Command(id, _) | Self::Disconnected(id) => *id,
        }
    }
}

/// Collects every event in publication order.
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Recorded>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Recorded> {
        self.events.lock().unwrap().clone()
    }

    /// Events for one connection, in order.
    #[allow(dead_code)]
    pub fn events_for(&self, id: ConnectionId) -> Vec<Recorded> {
        self.events().into_iter().filter(|e| e.id() == id).collect()
    }

    /// Poll until `predicate` holds over the recorded events.
    pub async fn wait_until<F>(&self, mut predicate: F) -> anyhow::Result<Vec<Recorded>>
    where
        F: FnMut(&[Recorded]) -> bool,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let events = self.events();
            if predicate(&events) {
                return Ok(events);
            }
            if tokio::time::Instant::now() >= deadline {
                anyhow::bail!("timed out waiting for events, have {events:?}");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Wait for `count` disconnect events.
    #[allow(dead_code)]
    pub async fn wait_for_disconnects(&self, count: usize) -> anyhow::Result<Vec<Recorded>> {
        self.wait_until(|events| {
            events
                .iter()
                .filter(|e| matches!(e, Recorded::Disconnected(_)))
                .count()
                >= count
        })
        .await
    }

    fn push(&self, event: Recorded) {
        self.events.lock().unwrap().push(event);
    }
}

impl EventSubscriber for Recorder {
    fn on_client_connected(&self, conn: &ConnectionHandle) {
        self.push(Recorded::Connected(conn.id()));
    }

    fn on_client_disconnected(&self, conn: &ConnectionHandle) {
        self.push(Recorded::Disconnected(conn.id()));
    }

    fn on_command_received(&self, conn: &ConnectionHandle, command: &Command) {
        self.push(Recorded::Command(conn.id(), command.clone()));
    }
}

/// Builds a command handler once the session registry exists.
pub type HandlerFactory = Box<dyn FnOnce(Arc<SessionRegistry>) -> Arc<dyn EventSubscriber>>;

/// A test server instance.
pub struct TestServer {
    task: JoinHandle<()>,
    addr: SocketAddr,
    pub recorder: Arc<Recorder>,
    pub sessions: Arc<SessionRegistry>,
}

impl TestServer {
    /// Spawn a gateway with default options and no command handlers.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with(ConnectionOptions::default(), Vec::new()).await
    }

    /// Spawn a gateway with `handlers` subscribed after the recorder.
    ///
    /// Each handler factory receives the session registry so it can act as
    /// the registration logic would.
    pub async fn spawn_with(
        options: ConnectionOptions,
        handlers: Vec<HandlerFactory>,
    ) -> anyhow::Result<Self> {
        let recorder = Arc::new(Recorder::default());
        let sessions = Arc::new(SessionRegistry::new());

        let mut bus = EventBus::new();
        bus.subscribe(sessions.clone());
        bus.subscribe(recorder.clone());
        for handler in handlers {
            bus.subscribe(handler(Arc::clone(&sessions)));
        }

        let mut gateway = Gateway::new(Arc::new(bus), options);
        let addr = gateway.add_listener(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)?;
        let task = tokio::spawn(gateway.run());

        Ok(Self {
            task,
            addr,
            recorder,
            sessions,
        })
    }

    /// Address clients connect to.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
