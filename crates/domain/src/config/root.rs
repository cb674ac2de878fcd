use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use super::zone::ZoneConfig;

const LOCAL_CONFIG_PATH: &str = "devdns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/devdns/config.toml";

/// Main configuration structure for devdns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address, protocols)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolvers used for names outside the zone
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Static zone source and answer defaults
    #[serde(default)]
    pub zone: ZoneConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. devdns.toml in current directory
    /// 3. /etc/devdns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(zone_file) = overrides.zone_file {
            self.zone.file = Some(zone_file);
        }
        if let Some(upstream) = overrides.upstream {
            self.upstream.servers = upstream
                .iter()
                .flat_map(|s| s.split(','))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if overrides.no_upstream {
            self.upstream.servers.clear();
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if !self.server.udp && !self.server.tcp {
            return Err(ConfigError::Validation(
                "At least one of UDP or TCP must be enabled".to_string(),
            ));
        }

        if self.upstream.is_enabled() && self.upstream.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout must be greater than 0".to_string(),
            ));
        }

        self.upstream.endpoints()?;

        if self.zone.max_cname_hops == 0 {
            return Err(ConfigError::Validation(
                "max_cname_hops must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub zone_file: Option<String>,
    pub upstream: Option<Vec<String>>,
    pub no_upstream: bool,
    pub log_level: Option<String>,
}
