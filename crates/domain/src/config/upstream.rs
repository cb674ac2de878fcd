use super::errors::ConfigError;
use crate::upstream_endpoint::UpstreamEndpoint;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Tried in order; an empty list disables forwarding.
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound for a whole forwarded query across all attempts.
    /// Defaults to `timeout_ms` times the number of servers.
    #[serde(default)]
    pub total_timeout_ms: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            timeout_ms: default_timeout_ms(),
            total_timeout_ms: None,
        }
    }
}

impl UpstreamConfig {
    pub fn endpoints(&self) -> Result<Vec<UpstreamEndpoint>, ConfigError> {
        self.servers
            .iter()
            .map(|s| s.parse::<UpstreamEndpoint>().map_err(ConfigError::Validation))
            .collect()
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn total_timeout(&self) -> Duration {
        let total = self
            .total_timeout_ms
            .unwrap_or_else(|| self.timeout_ms.saturating_mul(self.servers.len().max(1) as u64));
        Duration::from_millis(total)
    }

    pub fn is_enabled(&self) -> bool {
        !self.servers.is_empty()
    }
}

fn default_servers() -> Vec<String> {
    vec!["1.1.1.1:53".to_string()]
}

fn default_timeout_ms() -> u64 {
    5000
}
