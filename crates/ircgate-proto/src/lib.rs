//! # ircgate-proto
//!
//! Wire-level pieces of the ircgate front end: turning a byte stream into
//! protocol lines and turning a protocol line into a [`Command`].
//!
//! ## Parsing
//!
//! ```rust
//! use ircgate_proto::parse;
//!
//! let cmd = parse("privmsg #room :hello there");
//! assert_eq!(cmd.verb, "PRIVMSG");
//! assert_eq!(cmd.params, vec!["#room", "hello there"]);
//! ```
//!
//! ## Framing
//!
//! With the default `tokio` feature, [`LineCodec`] plugs into
//! `tokio_util::codec::FramedRead` / `FramedWrite`.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
#[cfg(feature = "tokio")]
pub mod line;

pub use self::command::{parse, parse_with, Command, DelimiterBoundary, EmptyParams, ParserConfig};
pub use self::error::ProtocolError;
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, MAX_LINE_LEN};
