//! Application configuration.
//!
//! Aggregates peer, request and dispatch settings into a single Config
//! struct that can be loaded from YAML files or environment variables.

mod dispatch;
mod peers;
mod request;

pub use dispatch::DispatchConfig;
pub use peers::{PeersConfig, DEFAULT_BASE_PORT, DEFAULT_HOST, DEFAULT_SCHEME};
pub use request::{
    RequestConfig, DEFAULT_APP_NAME, DEFAULT_FUNC_NAME, DEFAULT_IN_FILE, DEFAULT_OUT_FILE,
};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "decexec.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "DECEXEC_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "DECEXEC";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "DECEXEC_LOG";

use serde::Deserialize;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the execution servers listen.
    pub peers: PeersConfig,
    /// Contents of the request sent to every server.
    pub request: RequestConfig,
    /// Dispatch behaviour.
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `decexec.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix,
    ///    e.g. `DECEXEC__PEERS__BASE_PORT=60000`
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("request.in_files")
                    .with_list_parse_key("request.out_files")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        Ok(config)
    }

    /// Reject settings that cannot produce a usable peer set or request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.peers.validate()?;
        self.request.validate()?;
        Ok(())
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self::default()
    }
}
