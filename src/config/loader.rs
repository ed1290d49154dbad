//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values that take precedence over the config file.
///
/// Populated from command-line flags or their environment variables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub bind_address: Option<String>,
    pub log_path: Option<String>,
    pub admin_key: Option<String>,
}

impl ConfigOverrides {
    /// Apply every override that is set.
    pub fn apply(&self, config: &mut RelayConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.forwarder.endpoint = endpoint.clone();
        }
        if let Some(bind) = &self.bind_address {
            config.listener.bind_address = bind.clone();
        }
        if let Some(path) = &self.log_path {
            config.log_store.path = path.clone();
        }
        if let Some(key) = &self.admin_key {
            config.admin.api_key = key.clone();
        }
    }
}

/// Where a configuration comes from: an optional file plus overrides.
///
/// Kept around after startup so reloads resolve the same way.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    pub path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

impl ConfigSource {
    /// Resolve defaults, file and overrides into a validated configuration.
    pub fn load(&self) -> Result<RelayConfig, ConfigError> {
        let mut config = match &self.path {
            Some(path) => parse_file(path)?,
            None => RelayConfig::default(),
        };
        self.overrides.apply(&mut config);

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let config = parse_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}
