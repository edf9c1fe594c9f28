//! API documentation compiler
//!
//! Walks the same flattened tree the registration service uses and turns the
//! declared input/output metadata of each handler into display strings.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use serde::Serialize;
use termtree::Tree;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    EndpointDescriptor, FlattenedTree, Handler, HandlerKind, IoSpec, PreparationError,
    RequestMethod, TreeNode, ViewKwargs,
};
use crate::infrastructure::Configurator;

/// A value-to-value rewrite applied before rendering.
pub type Transform = Arc<dyn Fn(&IoSpec) -> IoSpec + Send + Sync>;

/// Replacement used for one specific documentation value.
#[derive(Clone)]
pub enum Rendering {
    /// Render as this text.
    Text(String),
    /// Rewrite the value, then render the result.
    With(Transform),
}

impl fmt::Debug for Rendering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendering::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Rendering::With(_) => f.write_str("With(..)"),
        }
    }
}

/// Documentation of one view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewDocumentation {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlimited: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returns: Option<String>,
}

impl ViewDocumentation {
    fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("required", self.required.as_deref()),
            ("optional", self.optional.as_deref()),
            ("unlimited", self.unlimited.as_deref()),
            ("returns", self.returns.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// Documentation of a whole tree: route, then method label, then view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Documentation {
    routes: BTreeMap<String, BTreeMap<String, ViewDocumentation>>,
}

impl Documentation {
    pub fn route(&self, route: &str) -> Option<&BTreeMap<String, ViewDocumentation>> {
        self.routes.get(route)
    }

    /// Documentation of the view registered on `route` for the methods labelled `label`.
    pub fn view(&self, route: &str, label: &str) -> Option<&ViewDocumentation> {
        self.routes.get(route).and_then(|views| views.get(label))
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn to_json(&self) -> ApplicationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ApplicationError::Serialization {
            message: e.to_string(),
        })
    }

    /// Tree view: routes, method labels, then fields.
    pub fn to_tree(&self) -> Tree<String> {
        let mut root = Tree::new("API".to_string());
        for (route, views) in &self.routes {
            let route_label = if route.is_empty() {
                "/".to_string()
            } else {
                route.clone()
            };
            let mut route_node = Tree::new(route_label);
            for (label, doc) in views {
                let mut view_node = Tree::new(label.clone());
                if !doc.description.is_empty() {
                    view_node.push(Tree::new(doc.description.clone()));
                }
                for (name, value) in doc.fields() {
                    view_node.push(Tree::new(format!("{}: {}", name, value)));
                }
                route_node.push(view_node);
            }
            root.push(route_node);
        }
        root
    }
}

impl fmt::Display for Documentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree())
    }
}

/// Compiles handler metadata of an API tree into [`Documentation`].
#[derive(Clone)]
pub struct DocumentationMaker {
    settings: Arc<Settings>,
    transformations: HashMap<IoSpec, Rendering>,
    transform: Option<Transform>,
    display_names: HashMap<String, String>,
    types_to_skip: Vec<HandlerKind>,
    view_kind: HandlerKind,
}

impl Default for DocumentationMaker {
    fn default() -> Self {
        Self::new(Arc::new(Settings::default()))
    }
}

impl DocumentationMaker {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            transformations: HashMap::new(),
            transform: None,
            display_names: HashMap::new(),
            types_to_skip: Vec::new(),
            view_kind: HandlerKind::simple_view(),
        }
    }

    /// Render `value` with `rendering` instead of the default rules.
    pub fn with_transformation(mut self, value: IoSpec, rendering: Rendering) -> Self {
        self.transformations.insert(value, rendering);
        self
    }

    /// Rewrite applied to every value without a specific transformation.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&IoSpec) -> IoSpec + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }

    /// Show type `type_name` as `display_name`.
    pub fn with_display_name(
        mut self,
        type_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        self.display_names.insert(type_name.into(), display_name.into());
        self
    }

    /// Leave views of `kind` (or derived kinds) out of the documentation.
    pub fn skip_kind(mut self, kind: HandlerKind) -> Self {
        self.types_to_skip.push(kind);
        self
    }

    /// Kind of the views created by [`DocumentationMaker::add_documentation_views`].
    pub fn with_view_kind(mut self, kind: HandlerKind) -> Self {
        self.view_kind = kind;
        self
    }

    /// Reduce a documentation value to display text.
    ///
    /// # Errors
    ///
    /// [`PreparationError`] if some value has no textual form after transforms.
    pub fn prepare(&self, value: &IoSpec) -> Result<String, PreparationError> {
        let value = match self.transformations.get(value) {
            Some(Rendering::Text(text)) => return Ok(text.clone()),
            Some(Rendering::With(transform)) => transform(value),
            None => match &self.transform {
                Some(transform) => transform(value),
                None => value.clone(),
            },
        };

        match value {
            IoSpec::Type(name) => Ok(self.display_names.get(&name).cloned().unwrap_or(name)),
            IoSpec::Text(text) => Ok(text),
            IoSpec::Flag(flag) => Ok(flag.to_string()),
            IoSpec::List(items) => {
                let lines: Vec<String> = items
                    .iter()
                    .map(|item| self.prepare(item).map(|s| self.indent(&s)))
                    .collect::<Result<_, _>>()?;
                Ok(self.bracket("[", lines, "]"))
            }
            IoSpec::Map(entries) => {
                let lines: Vec<String> = entries
                    .iter()
                    .map(|(key, item)| {
                        self.prepare(item)
                            .map(|s| self.indent(&format!("{}: {}", key, s)))
                    })
                    .collect::<Result<_, _>>()?;
                Ok(self.bracket("{", lines, "}"))
            }
            IoSpec::ListOf(inner) => {
                let prepared = self.prepare(&inner)?;
                match *inner {
                    IoSpec::List(_) | IoSpec::Map(_) => {
                        Ok(format!("ListOf(\n{}\n)", self.indent(&prepared)))
                    }
                    _ => Ok(format!("ListOf({})", prepared)),
                }
            }
            IoSpec::Value { type_name } => Err(PreparationError { type_name }),
        }
    }

    fn indent(&self, text: &str) -> String {
        let indent = &self.settings.documentation.indent;
        text.lines().map(|line| format!("{}{}", indent, line)).join("\n")
    }

    fn bracket(&self, open: &str, lines: Vec<String>, close: &str) -> String {
        std::iter::once(open.to_string())
            .chain(lines)
            .chain(std::iter::once(close.to_string()))
            .join("\n")
    }

    /// Documentation for every documented view of `tree`.
    ///
    /// Routes whose views are all skipped are left out.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn create_documentation(&self, tree: &TreeNode) -> ApplicationResult<Documentation> {
        let flattened = self.settings.scanner().scan(tree, "")?;
        self.document_flattened(&flattened)
    }

    /// Documentation for an already flattened tree.
    pub fn document_flattened(
        &self,
        flattened: &FlattenedTree,
    ) -> ApplicationResult<Documentation> {
        let standard = self.settings.standard_methods();
        let mut documentation = Documentation::default();
        for (route, descriptors) in flattened.iter() {
            let views = self.document_route(descriptors, &standard)?;
            if !views.is_empty() {
                documentation.routes.insert(route.to_string(), views);
            }
        }
        debug!("create_documentation: {} routes documented", documentation.len());
        Ok(documentation)
    }

    fn document_route(
        &self,
        descriptors: &[EndpointDescriptor],
        standard: &RequestMethod,
    ) -> Result<BTreeMap<String, ViewDocumentation>, PreparationError> {
        let mut views = BTreeMap::new();
        for descriptor in descriptors {
            if self.skipped(&descriptor.view) {
                continue;
            }
            // an empty predicate set documents like an absent one
            let label = descriptor
                .request_method()
                .filter(|methods| !methods.is_empty())
                .unwrap_or(standard)
                .label();
            views.insert(label, self.document_view(&descriptor.view)?);
        }
        Ok(views)
    }

    fn skipped(&self, view: &Handler) -> bool {
        self.types_to_skip.iter().any(|kind| view.kind().is_a(kind))
    }

    fn document_view(&self, view: &Handler) -> Result<ViewDocumentation, PreparationError> {
        let io = view.io();
        let special = view.special_kwargs();
        Ok(ViewDocumentation {
            description: view.description().unwrap_or_default().to_string(),
            required: self.prepare_field(io.required.as_ref().map(|s| s.without_keys(special)))?,
            optional: self.prepare_field(io.optional.as_ref().map(|s| s.without_keys(special)))?,
            unlimited: self.prepare_field(io.unlimited.clone())?,
            returns: self.prepare_field(io.returns.clone())?,
        })
    }

    fn prepare_field(&self, value: Option<IoSpec>) -> Result<Option<String>, PreparationError> {
        match value {
            Some(value) if !value.is_empty() => self.prepare(&value).map(Some),
            _ => Ok(None),
        }
    }

    /// Serve the documentation of `tree` at `path`.
    ///
    /// Registers the route and two `GET` views: plain text for any client and
    /// JSON for clients accepting the configured media type.
    #[instrument(level = "debug", skip(self, configurator, tree))]
    pub fn add_documentation_views<C>(
        &self,
        configurator: &mut C,
        tree: &TreeNode,
        path: &str,
    ) -> ApplicationResult<()>
    where
        C: Configurator + ?Sized,
    {
        let documentation = self.create_documentation(tree)?;
        let text = documentation.to_string();
        let json = documentation.to_json()?;
        let settings = &self.settings.documentation;

        let text_view = Handler::builder("api_documentation", move |_| text.clone())
            .kind(self.view_kind.clone())
            .description("API documentation.")
            .build();
        let json_view = Handler::builder("api_documentation_json", move |_| json.clone())
            .kind(self.view_kind.clone())
            .description("API documentation as JSON.")
            .build();

        configurator.add_route(path, path)?;
        configurator.add_view(
            path,
            &text_view,
            &ViewKwargs::new().with_request_method(RequestMethod::get()),
        )?;
        configurator.add_view(
            path,
            &json_view,
            &ViewKwargs::new()
                .with_request_method(RequestMethod::get())
                .with_accept(settings.json_accept.clone())
                .with_renderer(settings.json_renderer.clone()),
        )?;
        debug!("add_documentation_views: serving at '{}'", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_list_indents_every_line() {
        let maker = DocumentationMaker::default();
        let value = IoSpec::list([IoSpec::list([IoSpec::type_of("int")])]);
        assert_eq!(maker.prepare(&value).unwrap(), "[\n    [\n        int\n    ]\n]");
    }

    #[test]
    fn test_indent_follows_settings() {
        let mut settings = Settings::default();
        settings.documentation.indent = "  ".to_string();
        let maker = DocumentationMaker::new(Arc::new(settings));
        let value = IoSpec::map([("a", IoSpec::type_of("int"))]);
        assert_eq!(maker.prepare(&value).unwrap(), "{\n  a: int\n}");
    }

    #[test]
    fn test_specific_transformation_wins_over_general_transform() {
        let maker = DocumentationMaker::default()
            .with_transform(|_| IoSpec::text("general"))
            .with_transformation(IoSpec::type_of("int"), Rendering::Text("integer".into()));
        assert_eq!(maker.prepare(&IoSpec::type_of("int")).unwrap(), "integer");
        assert_eq!(maker.prepare(&IoSpec::type_of("str")).unwrap(), "general");
    }
}
