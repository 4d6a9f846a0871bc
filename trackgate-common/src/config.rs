//! Bootstrap configuration loading
//!
//! The TOML file is optional, but a file that is named and cannot be read or
//! parsed is an error. Settings resolve in this order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment handling live in the service crates (clap
//! merges both); this module owns the file tier and the defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default database name, used to derive the SQLite file name
pub const DEFAULT_DB_NAME: &str = "music_db";

/// Default directory for downloaded audio
pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";

/// Bootstrap configuration loaded from TOML
///
/// Every field is optional so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Directory where audio blobs are stored
    #[serde(default)]
    pub downloads_dir: Option<PathBuf>,

    /// Database name (SQLite file stem when no store URI is given)
    #[serde(default)]
    pub db_name: Option<String>,

    /// Full store connection URI, overrides `db_name`
    #[serde(default)]
    pub store_uri: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level or filter directives (e.g. "info", "trackgate_gw=debug")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr only if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML bootstrap file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    parse_toml_config(&content)
}

/// Parse TOML bootstrap content
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Build the SQLite connection URL for a database name
pub fn sqlite_url_for(db_name: &str) -> String {
    format!("sqlite://{}.db?mode=rwc", db_name)
}
