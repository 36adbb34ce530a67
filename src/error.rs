use thiserror::Error;

use crate::config::ConfigError;
use crate::oracle::OracleError;

/// Failures surfaced to the caller of an optimization.
///
/// Per-edge oracle failures never show up here; they are absorbed by the
/// haversine fallback.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Route computation aborted by caller")]
    ComputationAborted,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build distance oracle: {0}")]
    Oracle(#[from] OracleError),
}
