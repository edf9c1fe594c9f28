//! Domain layer: API tree model and the tree scanner
//!
//! This layer is independent of external concerns (no router, no config loading).

pub mod endpoint;
pub mod error;
pub mod handler;
pub mod iospec;
pub mod predicate;
pub mod scanner;
pub mod tree;

pub use endpoint::{EndpointDescriptor, FlattenedTree};
pub use error::{DomainError, DomainResult, PreparationError};
pub use handler::{
    CustomPredicate, Handler, HandlerBuilder, HandlerKind, PredicateRequest, ViewArgs, ViewKwargs,
};
pub use iospec::{IoDeclaration, IoSpec};
pub use predicate::{RequestMethod, ALL_REQUEST_METHODS};
pub use scanner::{get_endpoints, TreeScanner, DEFAULT_MAX_DEPTH};
pub use tree::{BranchKey, TreeNode};
