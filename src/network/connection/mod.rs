//! Connection - Handles an individual client connection.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//!    ┌───────────────────────────────────────────────────┐
//!    │                 Connection Task                   │
//!    │                                                   │
//!    │  ┌──────────────────────┐  ┌──────────────────┐   │
//!    │  │ FramedRead<LineCodec>│  │ FramedWrite      │   │
//!    │  └─────────┬────────────┘  └────────▲─────────┘   │
//!    │            │ line                   │ line        │
//!    │            ▼                        │             │
//!    │    tokio::select! (close > outbound > inbound)    │
//!    │            │                        │             │
//!    │            ▼                        │             │
//!    │   parse ─▶ EventBus ─▶ subscribers ─┘ send_line   │
//!    └───────────────────────────────────────────────────┘
//! ```
//!
//! Events for one connection are strictly ordered: `client_connected`, then
//! one `command_received` per complete line in arrival order, then exactly
//! one `client_disconnected`.

mod handle;

pub use handle::ConnectionHandle;

use crate::events::EventBus;
use crate::state::ConnectionId;
use futures_util::{SinkExt, StreamExt};
use ircgate_proto::{LineCodec, ParserConfig, ProtocolError, parse_with};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, instrument, warn};

/// Per-connection settings, shared by every connection a gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Parser policy applied to every line.
    pub parser: ParserConfig,
    /// Longest accepted line, terminator included.
    pub max_line_len: usize,
    /// Outbound queue capacity.
    pub outbound_queue: usize,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        let limits = crate::config::LimitsConfig::default();
        Self {
            parser: ParserConfig::default(),
            max_line_len: limits.max_line_len,
            outbound_queue: limits.outbound_queue,
        }
    }
}

impl From<&crate::config::Config> for ConnectionOptions {
    fn from(config: &crate::config::Config) -> Self {
        Self {
            parser: config.parser,
            max_line_len: config.limits.max_line_len,
            outbound_queue: config.limits.outbound_queue,
        }
    }
}

/// A client connection handler.
pub struct Connection<S> {
    handle: ConnectionHandle,
    stream: S,
    bus: Arc<EventBus>,
    parser: ParserConfig,
    codec: LineCodec,
    outbound_rx: mpsc::Receiver<String>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    /// Create a connection handler for an accepted transport.
    pub fn new(
        id: ConnectionId,
        stream: S,
        addr: SocketAddr,
        bus: Arc<EventBus>,
        options: &ConnectionOptions,
    ) -> Self {
        let (outbound_tx, outbound_rx) = mpsc::channel(options.outbound_queue.max(1));
        Self {
            handle: ConnectionHandle::new(id, addr, outbound_tx),
            stream,
            bus,
            parser: options.parser,
            codec: LineCodec::with_max_len(options.max_line_len),
            outbound_rx,
        }
    }

    /// Run the connection until the transport closes or a close is requested.
    ///
    /// Read errors and oversized lines end this connection only.
    #[instrument(
        skip(self),
        fields(id = %self.handle.id(), addr = %self.handle.remote_addr()),
        name = "connection"
    )]
    pub async fn run(self) {
        let Self {
            handle,
            stream,
            bus,
            parser,
            codec,
            mut outbound_rx,
        } = self;

        debug!("Client connected");
        let _lifecycle = Lifecycle::open(&bus, &handle);

        let (read_half, write_half) = tokio::io::split(stream);
        let mut reader = FramedRead::new(read_half, codec.clone());
        let mut writer = FramedWrite::new(write_half, codec);

        loop {
            tokio::select! {
                biased;

                _ = handle.close_requested() => {
                    debug!("Close requested");
                    flush_pending(&mut outbound_rx, &mut writer).await;
                    break;
                }

                Some(line) = outbound_rx.recv() => {
                    match writer.send(line).await {
                        Ok(()) => {}
                        Err(ProtocolError::EmbeddedLineBreak) => {
                            warn!("Dropped outbound line containing a line break");
                        }
                        Err(e) => {
                            debug!(error = %e, "Write failed");
                            break;
                        }
                    }
                }

                frame = reader.next() => match frame {
                    Some(Ok(line)) => {
                        debug!(%line, "Received line");
                        let command = parse_with(&line, &parser);
                        bus.publish_command(&handle, &command);
                    }
                    Some(Err(e)) => {
                        debug!(error = %e, "Read failed");
                        break;
                    }
                    None => {
                        debug!("Peer closed connection");
                        break;
                    }
                },
            }
        }
    }
}

/// Write out lines queued before a close request. Inbound lines still in
/// the read buffer are not dispatched.
async fn flush_pending<W>(
    outbound_rx: &mut mpsc::Receiver<String>,
    writer: &mut FramedWrite<W, LineCodec>,
) where
    W: AsyncWrite + Unpin,
{
    while let Ok(line) = outbound_rx.try_recv() {
        match writer.feed(line).await {
            Ok(()) => {}
            Err(ProtocolError::EmbeddedLineBreak) => {
                warn!("Dropped outbound line containing a line break");
            }
            Err(e) => {
                debug!(error = %e, "Write failed while closing");
                return;
            }
        }
    }
    if let Err(e) = writer.flush().await {
        debug!(error = %e, "Flush failed while closing");
    }
}

/// Publishes `client_connected` when created and `client_disconnected` when
/// dropped, so the disconnect fires on every exit path, task abort included.
struct Lifecycle<'a> {
    bus: &'a EventBus,
    handle: &'a ConnectionHandle,
}

impl<'a> Lifecycle<'a> {
    fn open(bus: &'a EventBus, handle: &'a ConnectionHandle) -> Self {
        bus.publish_connected(handle);
        Self { bus, handle }
    }
}

impl Drop for Lifecycle<'_> {
    fn drop(&mut self) {
        if self.handle.mark_closed() {
            debug!("Client disconnected");
            self.bus.publish_disconnected(self.handle);
        }
    }
}
