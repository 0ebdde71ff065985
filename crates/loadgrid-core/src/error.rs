//! Configuration error types.

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("lower threshold ({lower}) must be below upper threshold ({upper})")]
    Thresholds { lower: usize, upper: usize },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
