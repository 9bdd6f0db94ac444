//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Session-start endpoint used when none is configured.
pub const DEFAULT_START_URL: &str = "https://slack.com/api/rtm.start";

/// Root configuration for the client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RtmConfig {
    /// Session bootstrap settings.
    pub session: SessionConfig,

    /// Close handshake settings.
    pub shutdown: ShutdownConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Session bootstrap configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session-start endpoint; the token is appended as a query parameter.
    pub start_url: String,

    /// API token. Overridden by `--token`.
    pub token: String,

    /// Honour `HTTP_PROXY` / `HTTPS_PROXY` for the start request.
    pub use_system_proxy: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            token: String::new(),
            use_system_proxy: true,
        }
    }
}

// Hand-written so the token never ends up in logs.
impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("start_url", &self.start_url)
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("use_system_proxy", &self.use_system_proxy)
            .finish()
    }
}

/// Close handshake configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long to wait for the server to acknowledge the close frame.
    pub close_timeout_ms: u64,
}

impl ShutdownConfig {
    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            close_timeout_ms: 1000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
