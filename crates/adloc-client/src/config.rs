//! Client configuration.

use std::time::Duration;

/// Configuration for the campaign service client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the campaign service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(300), // generation renders several variants
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ADLOC_API_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ADLOC_API_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            connect_timeout: Duration::from_secs(
                std::env::var("ADLOC_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        std::env::set_var("ADLOC_API_URL", "http://campaigns.internal:9000");
        std::env::set_var("ADLOC_API_TIMEOUT", "42");
        let config = ClientConfig::from_env();
        std::env::remove_var("ADLOC_API_URL");
        std::env::remove_var("ADLOC_API_TIMEOUT");

        assert_eq!(config.base_url, "http://campaigns.internal:9000");
        assert_eq!(config.timeout, Duration::from_secs(42));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_config_ignores_garbage_timeout() {
        std::env::set_var("ADLOC_API_TIMEOUT", "soon");
        let config = ClientConfig::from_env();
        std::env::remove_var("ADLOC_API_TIMEOUT");

        assert_eq!(config.timeout, Duration::from_secs(300));
    }
}
