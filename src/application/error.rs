//! Application-level errors (wraps domain and router errors)

use thiserror::Error;

use crate::domain::{DomainError, PreparationError};
use crate::infrastructure::ConfigurationError;

/// Application errors wrap domain errors, documentation failures and router
/// failures unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Preparation(#[from] PreparationError),

    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("serialize documentation: {message}")]
    Serialization { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
