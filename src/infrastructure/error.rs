//! Router-level errors

use thiserror::Error;

/// Failures reported by a [`Configurator`](crate::infrastructure::traits::Configurator).
///
/// The compiler passes these through unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no route named '{0}' has been added")]
    UnknownRoute(String),

    #[error("a view with route '{route}' and predicates {predicates} has already been added")]
    DuplicateView { route: String, predicates: String },

    #[error("router rejected registration: {0}")]
    Rejected(String),
}

/// Result type for router operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
