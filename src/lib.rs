//! Declarative API trees.
//!
//! An API tree is a nested mapping whose keys are path fragments or
//! request-method predicates and whose leaves are handlers. The
//! [`TreeScanner`] flattens it into routes and endpoint descriptors, the
//! [`RegistrationService`] feeds those into a [`Configurator`], and the
//! [`DocumentationMaker`] renders the handlers' declared inputs and outputs.
//!
//! # Layers
//!
//! - `domain`: tree model and scanner, no I/O
//! - `application`: registration and documentation services
//! - `infrastructure`: the router boundary and an in-memory route table
//! - `config`: layered settings

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod macros;
pub mod util;

pub use application::services::{
    CatchallOptions, Documentation, DocumentationMaker, RegistrationService, Rendering,
    ViewDocumentation,
};
pub use application::{ApplicationError, ApplicationResult};
pub use config::Settings;
pub use domain::{
    get_endpoints, BranchKey, CustomPredicate, DomainError, EndpointDescriptor, FlattenedTree,
    Handler, HandlerKind, IoSpec, PreparationError, RequestMethod, TreeNode, TreeScanner,
    ViewArgs, ViewKwargs,
};
pub use infrastructure::{Configurator, ConfigurationError, RouteTable};

/// Register every endpoint of `tree` below `root_path` using default settings.
pub fn scan_api_tree<C>(
    configurator: &mut C,
    tree: &TreeNode,
    root_path: &str,
) -> ApplicationResult<()>
where
    C: Configurator + ?Sized,
{
    RegistrationService::default().apply(configurator, tree, root_path)
}

/// Register `catchall` on the routes of `tree` using default settings.
pub fn add_catchall<C>(
    configurator: &mut C,
    tree: &TreeNode,
    catchall: &Handler,
    options: &CatchallOptions,
) -> ApplicationResult<()>
where
    C: Configurator + ?Sized,
{
    RegistrationService::default().add_catchall(configurator, tree, catchall, options)
}
