use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::forwarding::ForwardingConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "ferrous-forward.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-forward/config.toml";

/// Main configuration structure for Ferrous Forward
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Client-facing listener (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream resolver
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Query splitting, timeouts and in-flight limits
    #[serde(default)]
    pub forwarding: ForwardingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-forward.toml in current directory
    /// 3. /etc/ferrous-forward/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(resolver) = overrides.resolver {
            self.upstream.resolver = Some(resolver);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    ///
    /// A missing resolver is fatal here, at startup, rather than a runtime
    /// protocol error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        match self.upstream.resolver_addr() {
            None => return Err(ConfigError::MissingResolver),
            Some(Err(e)) => return Err(ConfigError::Validation(e.to_string())),
            Some(Ok(_)) => {}
        }

        if self.forwarding.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "forwarding.query_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.forwarding.sweep_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "forwarding.sweep_interval_ms must be greater than 0".to_string(),
            ));
        }

        if self.forwarding.max_pending == 0 {
            return Err(ConfigError::Validation(
                "forwarding.max_pending must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub resolver: Option<String>,
    pub log_level: Option<String>,
}
