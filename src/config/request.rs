//! Request descriptor defaults.

use serde::Deserialize;

use super::ConfigError;

/// Application executed by the servers.
pub const DEFAULT_APP_NAME: &str = "mpspdz";
/// Function name sent with the request; the default application ignores it.
pub const DEFAULT_FUNC_NAME: &str = "unused";
/// Default input file name.
pub const DEFAULT_IN_FILE: &str = "input";
/// Default output file name.
pub const DEFAULT_OUT_FILE: &str = "output";

/// Fields copied into every request descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    pub app_name: String,
    pub func_name: String,
    pub client_id: String,
    pub app_uid: u64,
    pub in_files: Vec<String>,
    pub out_files: Vec<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            func_name: DEFAULT_FUNC_NAME.to_string(),
            client_id: String::new(),
            app_uid: 0,
            in_files: vec![DEFAULT_IN_FILE.to_string()],
            out_files: vec![DEFAULT_OUT_FILE.to_string()],
        }
    }
}

impl RequestConfig {
    pub(super) fn validate(&self) -> Result<(), ConfigError> {
        if self.app_name.trim().is_empty() {
            return Err(ConfigError::Invalid("app_name is empty".to_string()));
        }
        Ok(())
    }
}
