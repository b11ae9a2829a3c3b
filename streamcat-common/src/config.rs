//! Configuration loading
//!
//! Settings come from, in priority order:
//! 1. Command-line arguments / `STREAMCAT_*` environment variables (applied by the binary)
//! 2. TOML config file
//! 3. Built-in defaults
//!
//! A missing TOML file is not fatal: a warning is logged and the defaults are used.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::store::SongRefPolicy;

pub const DEFAULT_REST_PORT: u16 = 8000;
pub const DEFAULT_GRAPHQL_PORT: u16 = 8001;
pub const DEFAULT_SOAP_PORT: u16 = 8004;
pub const DEFAULT_GRPC_PORT: u16 = 50051;

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// Directory holding the seed JSON files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address every listener binds to
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default)]
    pub rest: ListenerConfig,

    #[serde(default)]
    pub graphql: ListenerConfig,

    #[serde(default)]
    pub soap: ListenerConfig,

    #[serde(default)]
    pub grpc: ListenerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One protocol listener
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListenerConfig {
    /// Port override; `None` selects the protocol's default port
    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            port: None,
            enabled: true,
        }
    }
}

impl ListenerConfig {
    pub fn port_or(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }
}

/// Store behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Write-time handling of playlist song ids
    #[serde(default)]
    pub song_refs: SongRefPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            host: default_host(),
            rest: ListenerConfig::default(),
            graphql: ListenerConfig::default(),
            soap: ListenerConfig::default(),
            grpc: ListenerConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Platform config file location: `<config dir>/streamcat/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("streamcat").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Load the config file if present, falling back to defaults when it is missing
///
/// An explicitly requested file that is missing, or any file that fails to parse, is an error.
pub fn load_or_default(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                warn!("No config file found, using built-in defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let config = load_toml_config(&path)?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Write a config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}
