//! Connection settings for [`crate::RconClient`].

use std::time::Duration;

/// Port vanilla servers listen on for RCON unless configured otherwise.
pub const DEFAULT_PORT: u16 = 25575;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// `host:port` of the console.
    pub address: String,
    pub password: String,
    /// Bounds connecting, authenticating and every command round trip.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: format!("127.0.0.1:{DEFAULT_PORT}"),
            password: String::new(),
            timeout: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.address, "127.0.0.1:25575");
        assert!(config.password.is_empty());
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_keeps_default_timeout() {
        let config = ClientConfig::new("mc.example:25575", "hunter2");
        assert_eq!(config.timeout, Duration::from_secs(5));
        let config = config.with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.password, "hunter2");
    }
}
