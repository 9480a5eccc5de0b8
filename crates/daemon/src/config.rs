//! Daemon configuration
//!
//! Sources, lowest priority first: built-in defaults, `phresh.toml` (or the
//! file named by `PHRESH_CONFIG`), then `PHRESH_*` environment variables.

use ::config::{Config, ConfigError, Environment, File};
use phresh_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use phresh_api_rpc::RpcServerConfig;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "phresh.toml";
const DEFAULT_DB_PATH: &str = "~/.phresh/marketplace.db";
const DEFAULT_LOG_FILTER: &str = "phresh=info";
const DEFAULT_SERVICE_NAME: &str = "phresh-marketplace";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// SQLite file path or `:memory:`
    pub db_path: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub log_format: LogFormat,
    /// `EnvFilter` directives, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Also write daily-rotated log files here when set
    pub log_dir: Option<String>,
    /// OTLP collector endpoint; used only with the `telemetry` feature
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            rpc_host: DEFAULT_RPC_HOST.to_string(),
            rpc_port: DEFAULT_RPC_PORT,
            log_format: LogFormat::Pretty,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_dir: None,
            otlp_endpoint: None,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from file and environment
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var("PHRESH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

        Config::builder()
            .add_source(File::with_name(&shellexpand::tilde(&file)).required(false))
            .add_source(Environment::with_prefix("PHRESH").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Database location with `~` expanded
    pub fn database_url(&self) -> String {
        shellexpand::tilde(&self.db_path).into_owned()
    }

    pub fn is_in_memory(&self) -> bool {
        self.db_path.contains(":memory:")
    }

    pub fn log_dir(&self) -> Option<String> {
        self.log_dir
            .as_deref()
            .map(|dir| shellexpand::tilde(dir).into_owned())
    }

    pub fn rpc_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
        }
    }
}
