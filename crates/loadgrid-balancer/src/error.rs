//! Balancer error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BalancerError {
    #[error("balancer {0} needs at least one work unit")]
    EmptyPool(String),

    #[error("invalid config: {0}")]
    Config(#[from] loadgrid_core::ConfigError),
}

pub type BalancerResult<T> = Result<T, BalancerError>;
