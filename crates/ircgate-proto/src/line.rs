//! Line-based codec for tokio.
//!
//! Reframes a byte stream into newline-terminated protocol lines. Partial
//! lines stay in the read buffer until their terminator arrives, so a line
//! split across any number of reads comes out exactly once and intact.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};

/// Default maximum line length in bytes, terminator included.
pub const MAX_LINE_LEN: usize = 8191;

/// Codec yielding trimmed text lines and writing CRLF-terminated ones.
///
/// A line ends at `\r\n`, `\n` or a lone `\r`. Decoded lines have leading
/// and trailing whitespace removed. Bytes that are not valid UTF-8 are
/// replaced rather than rejected.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for a terminator
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with the default [`MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    /// Configured maximum line length.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // Look for a terminator starting from where we left off
        let start = self.next_index;
        let found = src[start..]
            .iter()
            .position(|b| *b == b'\n' || *b == b'\r')
            .map(|offset| start + offset);

        let end = match found {
            Some(idx) if src[idx] == b'\n' => Some(idx + 1),
            Some(idx) => match src.get(idx + 1) {
                Some(b'\n') => Some(idx + 2),
                Some(_) => Some(idx + 1),
                // CR is the last byte so far; its LF may be in the next read.
                None => {
                    self.next_index = idx;
                    None
                }
            },
            None => {
                self.next_index = src.len();
                None
            }
        };

        match end {
            Some(end) => {
                let line = src.split_to(end);
                self.next_index = 0;

                if line.len() > self.max_len {
                    return Err(ProtocolError::LineTooLong {
                        actual: line.len(),
                        limit: self.max_len,
                    });
                }

                Ok(Some(text(&line)))
            }
            None => {
                if src.len() > self.max_len {
                    return Err(ProtocolError::LineTooLong {
                        actual: src.len(),
                        limit: self.max_len,
                    });
                }

                Ok(None)
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None => {
                // A tail ending in CR is complete; any other unterminated
                // tail at close is dropped, not delivered.
                let line = (src.last() == Some(&b'\r')).then(|| text(src));
                src.clear();
                self.next_index = 0;
                Ok(line)
            }
        }
    }
}

fn text(line: &[u8]) -> String {
    String::from_utf8_lossy(line).trim().to_owned()
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<()> {
        if line.contains(['\r', '\n']) {
            return Err(ProtocolError::EmbeddedLineBreak);
        }
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
