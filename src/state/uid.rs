//! Connection identifier allocation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-unique identity of one accepted connection.
///
/// Displayed as a base36 token of at least six characters (`AAAAAA`,
/// `AAAAAB`, ...). The numeric value is the identity; the token is for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base36_encode(self.0))
    }
}

/// Hands out connection identifiers in accept order.
#[derive(Debug, Default)]
pub struct ConnectionIdGenerator {
    counter: AtomicU64,
}

impl ConnectionIdGenerator {
    /// Create a generator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next identifier.
    pub fn next(&self) -> ConnectionId {
        ConnectionId(self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

/// Encode a number as a base36 string, left-padded with `A` to six characters.
fn base36_encode(mut n: u64) -> String {
    const CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    const WIDTH: usize = 6;

    let mut digits = Vec::with_capacity(WIDTH);
    while n > 0 || digits.len() < WIDTH {
        digits.push(CHARS[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();

    String::from_utf8_lossy(&digits).into_owned()
}
