//! Test client.
//!
//! Writes raw bytes and reads CRLF-terminated lines, with timeouts so a
//! misbehaving gateway fails the test instead of hanging it.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        stream.set_nodelay(true)?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Write bytes exactly as given, no terminator added.
    pub async fn send_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        self.writer.write_all(bytes).await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Send one line, adding CRLF.
    #[allow(dead_code)]
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_bytes(format!("{line}\r\n").as_bytes()).await
    }

    /// Receive a single line from the server.
    #[allow(dead_code)]
    pub async fn recv_line(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed by server");
        }
        Ok(line.trim_end().to_string())
    }

    /// Wait for the server to close the connection.
    #[allow(dead_code)]
    pub async fn expect_eof(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut line)).await??;
        if n != 0 {
            anyhow::bail!("expected EOF, got {line:?}");
        }
        Ok(())
    }

    /// Close both directions.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.writer.shutdown().await?;
        Ok(())
    }
}
