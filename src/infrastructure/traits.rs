//! Router boundary trait for testability
//!
//! The compiler never dispatches requests itself; it only tells a router which
//! routes exist and which views hang off them.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::trace;

use crate::domain::{Handler, ViewKwargs};
use crate::infrastructure::error::{ConfigurationError, ConfigurationResult};

/// Router abstraction consumed by the registration driver.
pub trait Configurator {
    /// Register a route pattern under `name`.
    fn add_route(&mut self, name: &str, pattern: &str) -> ConfigurationResult<()>;

    /// Register `view` for the route `route_name` with the given options.
    ///
    /// Implementations reject a second view with identical predicates.
    fn add_view(
        &mut self,
        route_name: &str,
        view: &Handler,
        view_kwargs: &ViewKwargs,
    ) -> ConfigurationResult<()>;
}

/// A view as registered on a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredView {
    pub view: Handler,
    pub view_kwargs: ViewKwargs,
}

/// A route as registered on a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredRoute {
    pub name: String,
    pub pattern: String,
    pub views: Vec<RegisteredView>,
}

/// In-memory router recording every registration in order.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<RegisteredRoute>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, name: &str) -> Option<&RegisteredRoute> {
        self.index.get(name).map(|&idx| &self.routes[idx])
    }

    pub fn routes(&self) -> &[RegisteredRoute] {
        &self.routes
    }

    /// Views of a route in registration order; empty for unknown routes.
    pub fn views(&self, name: &str) -> &[RegisteredView] {
        self.route(name)
            .map(|route| route.views.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Two registrations collide when every predicate matches.
///
/// Request methods compare as sets; the renderer is not a predicate.
fn same_predicates(a: &ViewKwargs, b: &ViewKwargs) -> bool {
    let methods_match = match (&a.request_method, &b.request_method) {
        (Some(x), Some(y)) => x.same_methods(y),
        (None, None) => true,
        _ => false,
    };
    methods_match
        && a.accept == b.accept
        && a.custom_predicates == b.custom_predicates
        && a.extra == b.extra
}

fn describe_predicates(view_kwargs: &ViewKwargs) -> String {
    let mut parts = Vec::new();
    if let Some(method) = &view_kwargs.request_method {
        parts.push(format!("request_method={}", method));
    }
    if let Some(accept) = &view_kwargs.accept {
        parts.push(format!("accept={}", accept));
    }
    if let Some(predicates) = &view_kwargs.custom_predicates {
        parts.push(format!(
            "custom_predicates=({})",
            predicates.iter().map(|p| p.name()).join(", ")
        ));
    }
    for (key, value) in &view_kwargs.extra {
        parts.push(format!("{}={}", key, value));
    }
    format!("{{{}}}", parts.join(", "))
}

impl Configurator for RouteTable {
    fn add_route(&mut self, name: &str, pattern: &str) -> ConfigurationResult<()> {
        trace!("add_route: name={}, pattern={}", name, pattern);
        match self.index.get(name) {
            Some(&idx) => self.routes[idx].pattern = pattern.to_string(),
            None => {
                self.routes.push(RegisteredRoute {
                    name: name.to_string(),
                    pattern: pattern.to_string(),
                    views: Vec::new(),
                });
                self.index.insert(name.to_string(), self.routes.len() - 1);
            }
        }
        Ok(())
    }

    fn add_view(
        &mut self,
        route_name: &str,
        view: &Handler,
        view_kwargs: &ViewKwargs,
    ) -> ConfigurationResult<()> {
        trace!("add_view: route={}, view={}", route_name, view.name());
        let idx = *self
            .index
            .get(route_name)
            .ok_or_else(|| ConfigurationError::UnknownRoute(route_name.to_string()))?;
        let route = &mut self.routes[idx];

        if route
            .views
            .iter()
            .any(|existing| same_predicates(&existing.view_kwargs, view_kwargs))
        {
            return Err(ConfigurationError::DuplicateView {
                route: route_name.to_string(),
                predicates: describe_predicates(view_kwargs),
            });
        }

        route.views.push(RegisteredView {
            view: view.clone(),
            view_kwargs: view_kwargs.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomPredicate, RequestMethod};

    fn view(name: &str) -> Handler {
        Handler::new(name, |_| String::new())
    }

    #[test]
    fn test_add_view_requires_route() {
        let mut table = RouteTable::new();
        let err = table
            .add_view("/missing", &view("v"), &ViewKwargs::default())
            .unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownRoute("/missing".to_string()));
    }

    #[test]
    fn test_duplicate_methods_in_any_order_collide() {
        let mut table = RouteTable::new();
        table.add_route("/r", "/r").unwrap();
        let first = ViewKwargs::new().with_request_method(RequestMethod::new(["GET", "POST"]));
        let second = ViewKwargs::new().with_request_method(RequestMethod::new(["POST", "GET"]));

        table.add_view("/r", &view("a"), &first).unwrap();
        let err = table.add_view("/r", &view("b"), &second).unwrap_err();

        assert!(matches!(err, ConfigurationError::DuplicateView { .. }));
        assert_eq!(table.views("/r").len(), 1);
    }

    #[test]
    fn test_distinct_predicates_coexist() {
        let mut table = RouteTable::new();
        table.add_route("/r", "/r").unwrap();
        table
            .add_view("/r", &view("a"), &ViewKwargs::default())
            .unwrap();
        table
            .add_view(
                "/r",
                &view("b"),
                &ViewKwargs::new().with_custom_predicates(vec![CustomPredicate::always("c")]),
            )
            .unwrap();
        table
            .add_view("/r", &view("c"), &ViewKwargs::new().with_extra("predicate", "value"))
            .unwrap();

        assert_eq!(table.views("/r").len(), 3);
    }

    #[test]
    fn test_add_route_twice_keeps_views() {
        let mut table = RouteTable::new();
        table.add_route("/r", "/r").unwrap();
        table
            .add_view("/r", &view("a"), &ViewKwargs::default())
            .unwrap();
        table.add_route("/r", "/r").unwrap();

        assert_eq!(table.routes().len(), 1);
        assert_eq!(table.views("/r").len(), 1);
    }
}
