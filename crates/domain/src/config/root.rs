use super::{CacheConfig, ConfigError, LoggingConfig, NetworkConfig, ServerConfig, StorageConfig};
use crate::validators::{
    is_loopback_host, validate_http_url, validate_manifest_path, validate_store_name,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub app_origin: Option<String>,
    pub database_url: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load from `config_path` (or defaults when no file is given or found)
    /// and apply CLI overrides.
    pub fn load(config_path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if Path::new(path).exists() => Self::from_file(path)?,
            _ => Self::default(),
        };

        config.apply_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(origin) = overrides.app_origin {
            self.server.app_origin = origin;
        }
        if let Some(url) = overrides.database_url {
            self.storage.database_url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let app_origin =
            validate_http_url(&self.server.app_origin, "app_origin").map_err(ConfigError::Validation)?;
        let fetch_target = match &self.server.upstream {
            Some(upstream) => validate_http_url(upstream, "upstream").map_err(ConfigError::Validation)?,
            None => app_origin,
        };
        if self.targets_self(&fetch_target) {
            return Err(ConfigError::Validation(format!(
                "same-origin fetches would go to '{fetch_target}', which is this front \
                 ({}:{}); set server.upstream to the application's real server",
                self.server.bind_address, self.server.port
            )));
        }

        if self.cache.dynamic_max_entries == 0 {
            return Err(ConfigError::Validation(
                "dynamic_max_entries must be at least 1".to_string(),
            ));
        }

        for path in &self.cache.static_manifest {
            validate_manifest_path(path).map_err(ConfigError::Validation)?;
        }

        let names = &self.cache.stores;
        validate_store_name(&names.static_name, "static").map_err(ConfigError::Validation)?;
        validate_store_name(&names.dynamic_name, "dynamic").map_err(ConfigError::Validation)?;
        validate_store_name(&names.api_name, "api").map_err(ConfigError::Validation)?;
        let distinct: HashSet<&str> = names.allow_list().into_iter().collect();
        if distinct.len() != 3 {
            return Err(ConfigError::Validation(
                "static, dynamic and api store names must be distinct".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }

    /// Whether `target` resolves to the address this front listens on.
    fn targets_self(&self, target: &Url) -> bool {
        if target.port_or_known_default() != Some(self.server.port) {
            return false;
        }
        match target.host_str() {
            Some(host) => {
                is_loopback_host(host)
                    || host.eq_ignore_ascii_case(self.server.bind_address.trim())
            }
            None => false,
        }
    }

    /// Parsed application origin. Call after `validate`.
    pub fn app_origin(&self) -> Result<Url, ConfigError> {
        validate_http_url(&self.server.app_origin, "app_origin").map_err(ConfigError::Validation)
    }

    pub fn upstream(&self) -> Result<Option<Url>, ConfigError> {
        self.server
            .upstream
            .as_deref()
            .map(|raw| validate_http_url(raw, "upstream").map_err(ConfigError::Validation))
            .transpose()
    }
}
