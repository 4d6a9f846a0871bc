//! Configuration for trackgate-gw
//!
//! Sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (a `.env` file is loaded before parsing)
//! 3. TOML bootstrap file (`--config`)
//! 4. Compiled defaults

use clap::Parser;
use std::path::PathBuf;
use trackgate_common::config::{
    load_toml_config, sqlite_url_for, LoggingConfig, TomlConfig, DEFAULT_DB_NAME,
    DEFAULT_DOWNLOADS_DIR, DEFAULT_PORT,
};

use crate::services::YandexConfig;

/// Command-line arguments for trackgate-gw
#[derive(Parser, Debug, Default)]
#[command(name = "trackgate-gw")]
#[command(about = "Cache-aside HTTP gateway for Yandex Music tracks")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "TRACKGATE_PORT")]
    pub port: Option<u16>,

    /// Directory for downloaded audio
    #[arg(long, env = "TRACKGATE_DOWNLOADS")]
    pub downloads: Option<PathBuf>,

    /// Yandex Music OAuth token
    #[arg(long, env = "YANDEX_MUSIC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Yandex Music API root
    #[arg(long, env = "YANDEX_API_BASE")]
    pub api_base: Option<String>,

    /// Full store connection URI (overrides --db-name)
    #[arg(long, env = "STORE_URI")]
    pub store_uri: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// TOML bootstrap file
    #[arg(short, long, env = "TRACKGATE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Fully resolved gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub downloads_dir: PathBuf,
    pub store_url: String,
    pub catalog: YandexConfig,
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Read the `--config` file when one is named, then merge
    ///
    /// A named file that cannot be read or parsed is an error.
    pub fn load(args: Args) -> trackgate_common::Result<Self> {
        let toml = match args.config.as_deref() {
            Some(path) => load_toml_config(path)?,
            None => TomlConfig::default(),
        };
        Ok(Self::resolve(args, toml))
    }

    /// Merge arguments over the TOML file over defaults
    pub fn resolve(args: Args, toml: TomlConfig) -> Self {
        let port = args.port.or(toml.port).unwrap_or(DEFAULT_PORT);

        let downloads_dir = args
            .downloads
            .or(toml.downloads_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOADS_DIR));

        let store_url = match non_blank(args.store_uri).or_else(|| non_blank(toml.store_uri)) {
            Some(uri) => uri,
            None => {
                let db_name = non_blank(args.db_name)
                    .or_else(|| non_blank(toml.db_name))
                    .unwrap_or_else(|| DEFAULT_DB_NAME.to_string());
                sqlite_url_for(&db_name)
            }
        };

        let mut catalog = YandexConfig {
            token: non_blank(args.token),
            ..YandexConfig::default()
        };
        if let Some(api_base) = non_blank(args.api_base) {
            catalog.api_base = api_base;
        }

        Self {
            port,
            downloads_dir,
            store_url,
            catalog,
            logging: toml.logging,
        }
    }
}

/// Treat empty or whitespace-only values as unset
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
