//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural problems found while scanning an API tree.
///
/// Any of these means the route table is malformed; they are programming
/// errors and must surface before requests are served.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error(
        "API tree value was not traversable: must be a mapping or a sequence of \
         2-length pairs, got a {found}"
    )]
    NotTraversable { found: String },

    #[error(
        "invalid branch route: a sequence key must hold only path components \
         ('/something') or only request methods, got {found}"
    )]
    MixedBranchKey { found: String },

    #[error(
        "request-method branch routes (GET, POST, etc.) cannot have a sub-tree of \
         routes; invalid path: {path}"
    )]
    PredicateOwnsSubtree { path: String },

    #[error("API tree nesting exceeds {max_depth} levels at route '{route}'")]
    TooDeep { route: String, max_depth: usize },
}

impl DomainError {
    /// True for the shape mismatch that lets a sequence fall back to alternatives.
    pub fn is_not_traversable(&self) -> bool {
        matches!(self, DomainError::NotTraversable { .. })
    }
}

/// Result type for tree scanning.
pub type DomainResult<T> = Result<T, DomainError>;

/// A documentation value could not be reduced to text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("documentation value must reduce to a string; got a {type_name}")]
pub struct PreparationError {
    pub type_name: String,
}
