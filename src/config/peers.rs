//! Peer endpoint configuration.

use serde::Deserialize;

use super::ConfigError;

/// Default URI scheme for peer endpoints.
pub const DEFAULT_SCHEME: &str = "http";
/// Default host every peer listens on.
pub const DEFAULT_HOST: &str = "localhost";
/// Port of the first peer; peer `i` listens on `DEFAULT_BASE_PORT + i`.
pub const DEFAULT_BASE_PORT: u16 = 50050;

/// Location of the execution servers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PeersConfig {
    /// URI scheme (`http` or `https`).
    pub scheme: String,
    /// Host shared by all peers.
    pub host: String,
    /// Port of peer 0.
    pub base_port: u16,
}

impl Default for PeersConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            base_port: DEFAULT_BASE_PORT,
        }
    }
}

impl PeersConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.scheme.as_str(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "unsupported peer scheme '{}'",
                self.scheme
            )));
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("peer host is empty".to_string()));
        }
        Ok(())
    }
}
