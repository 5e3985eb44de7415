//! Error types for the page layer

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but describes an impossible page
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type alias for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;
