//! Dispatch configuration.

use std::time::Duration;

use serde::Deserialize;

/// Dispatch settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Optional per-request deadline in milliseconds.
    ///
    /// Unset means wait for every peer indefinitely.
    pub deadline_ms: Option<u64>,
}

impl DispatchConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
