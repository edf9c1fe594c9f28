//! Application services
//!
//! Concrete services that drive the tree scanner. They depend on the
//! [`Configurator`](crate::infrastructure::Configurator) boundary trait but are
//! themselves concrete structs, not traits.

mod documentation;
mod registration;

pub use documentation::{
    Documentation, DocumentationMaker, Rendering, Transform, ViewDocumentation,
};
pub use registration::{CatchallOptions, RegistrationService, CATCHALL_PREDICATE};
