//! Infrastructure layer: router boundary and its in-memory implementation

pub mod error;
pub mod traits;

pub use error::{ConfigurationError, ConfigurationResult};
pub use traits::{Configurator, RegisteredRoute, RegisteredView, RouteTable};
