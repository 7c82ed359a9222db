//! Error types for the wire layer.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors raised while framing a byte stream.
///
/// Parsing itself never fails; only the transport and the framer can.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line (or an unterminated partial line) exceeded the configured limit.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Bytes seen so far for the offending line.
        actual: usize,
        /// Maximum allowed length, terminator included.
        limit: usize,
    },

    /// An outgoing line carried its own CR or LF.
    #[error("outgoing line contains a line break")]
    EmbeddedLineBreak,
}
