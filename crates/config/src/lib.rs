//! Stitch Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! A minimal config only needs the tag table - everything else has a
//! working default.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use stitch_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str(
//!     "[tags.app]\nmsg_key = \"log\"\nidentifier_key = \"container_id\"\nfirst_line = '^\\d{4}-'",
//! )
//! .unwrap();
//! assert!(config.tags.get("app").is_some());
//! ```
//!
//! # Example Config
//!
//! ```toml
//! [global]
//! max_msg_length = 65536
//!
//! [log]
//! level = "info"
//!
//! [filter]
//! remove_empty_tag = true
//! remove_unsupported_tag = true
//!
//! [tags.app]
//! msg_key = "log"
//! identifier_key = "container_id"
//! first_line = '^\d{4}-\d{2}-\d{2}'
//! ```

mod error;
mod filter;
mod global;
mod logging;
mod tags;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use filter::TagFilterConfig;
pub use global::GlobalConfig;
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use tags::{TagConfig, TagsConfig};

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults; an engine with no
/// tag table accepts nothing, so real deployments always carry `[tags]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Global settings (payload length bound)
    pub global: GlobalConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Tag filter options
    pub filter: TagFilterConfig,

    /// Per-tag concatenation table
    pub tags: TagsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid
    /// TOML, or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Validate the configuration
    ///
    /// Checks that the length bound is positive and that every tag entry
    /// has usable keys and a compilable first-line pattern.
    fn validate(&self) -> Result<()> {
        self.global.validate()?;
        self.tags.validate()?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }
}
