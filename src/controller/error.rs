//! Error types for the transformation engine.
//!
//! Every variant describes a malformed runtime spec or a wiring
//! defect, so none of them are retryable.

use thiserror::Error;

use crate::resources::quantity::QuantityError;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// Quantity could not be parsed or the sum overflowed
    #[error("Quantity error: {0}")]
    Quantity(#[from] QuantityError),

    /// The engine was asked to augment resources without runtime info
    #[error("Runtime info is not set for runtime {0}")]
    MissingRuntimeInfo(String),

    /// Validation error in resource spec
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error should be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Quantity(_) | Error::Validation(_) | Error::Serialization(_) => false,
            Error::MissingRuntimeInfo(_) => false,
        }
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;
