//! Per-connection resource limits.

use serde::Deserialize;

/// Per-connection resource limits.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct LimitsConfig {
    /// Longest accepted line in bytes, terminator included (default: 8191).
    /// A longer line closes the connection.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Outbound line queue capacity per connection (default: 64).
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

fn default_max_line_len() -> usize {
    ircgate_proto::MAX_LINE_LEN
}

fn default_outbound_queue() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_correct() {
        let config = LimitsConfig::default();
        assert_eq!(config.max_line_len, 8191);
        assert_eq!(config.outbound_queue, 64);
    }

    #[test]
    fn partial_table_fills_defaults() {
        let config: LimitsConfig = toml::from_str("max_line_len = 512").unwrap();
        assert_eq!(config.max_line_len, 512);
        assert_eq!(config.outbound_queue, 64);
    }
}
