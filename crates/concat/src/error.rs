//! Concatenation engine error types

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, ConcatError>;

/// Errors that can stop a worker or reject a spawn
#[derive(Debug, Error)]
pub enum ConcatError {
    /// The shared output channel's receiver was dropped
    #[error("output channel closed")]
    OutputClosed,

    /// The tag's configuration entry is unusable
    #[error(transparent)]
    Config(#[from] stitch_config::ConfigError),
}
