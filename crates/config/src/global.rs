//! Global configuration settings

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default upper bound on a fused payload, in bytes (64KB)
pub const DEFAULT_MAX_MSG_LENGTH: usize = 64 * 1024;

/// Settings that apply across all concatenators
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Upper bound on fused payload length in bytes
    ///
    /// A pending record whose fused text reaches this length is flushed
    /// immediately instead of waiting for a first-line match or timeout.
    /// Default: 65536
    pub max_msg_length: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            max_msg_length: DEFAULT_MAX_MSG_LENGTH,
        }
    }
}

impl GlobalConfig {
    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.max_msg_length == 0 {
            return Err(ConfigError::invalid_value(
                "max_msg_length",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
