//! Endpoint handlers and their registration options.
//!
//! A [`Handler`] is an opaque callable as far as the tree compiler is
//! concerned. It may carry a [`ViewKwargs`] side-channel that travels with it
//! wherever it appears in a tree.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::domain::iospec::{IoDeclaration, IoSpec};
use crate::domain::predicate::RequestMethod;

/// Keyword arguments handed to a handler when it is invoked.
pub type ViewArgs = BTreeMap<String, String>;

type ViewFn = dyn Fn(&ViewArgs) -> String + Send + Sync;
type PredicateFn = dyn Fn(&PredicateRequest<'_>) -> bool + Send + Sync;

/// The kind ("class") of a handler.
///
/// Kinds compare by identity and may extend a parent kind, which gives the
/// "any subtype" and "exact type" matching used by catchall registration and
/// documentation filtering.
#[derive(Clone)]
pub struct HandlerKind {
    inner: Arc<KindInner>,
}

struct KindInner {
    name: String,
    parent: Option<HandlerKind>,
}

impl HandlerKind {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(KindInner {
                name: name.into(),
                parent: None,
            }),
        }
    }

    /// A new kind derived from `parent`.
    pub fn extends(name: impl Into<String>, parent: &HandlerKind) -> Self {
        Self {
            inner: Arc::new(KindInner {
                name: name.into(),
                parent: Some(parent.clone()),
            }),
        }
    }

    pub fn base_view() -> Self {
        static KIND: OnceLock<HandlerKind> = OnceLock::new();
        KIND.get_or_init(|| HandlerKind::new("BaseView")).clone()
    }

    pub fn simple_view() -> Self {
        static KIND: OnceLock<HandlerKind> = OnceLock::new();
        KIND.get_or_init(|| HandlerKind::extends("SimpleView", &HandlerKind::base_view()))
            .clone()
    }

    pub fn function_view() -> Self {
        static KIND: OnceLock<HandlerKind> = OnceLock::new();
        KIND.get_or_init(|| HandlerKind::extends("FunctionView", &HandlerKind::base_view()))
            .clone()
    }

    pub fn api_view() -> Self {
        static KIND: OnceLock<HandlerKind> = OnceLock::new();
        KIND.get_or_init(|| HandlerKind::extends("ApiView", &HandlerKind::function_view()))
            .clone()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&HandlerKind> {
        self.inner.parent.as_ref()
    }

    /// True if `self` is exactly `other`.
    pub fn is_exactly(&self, other: &HandlerKind) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// True if `self` is `other` or derives from it.
    pub fn is_a(&self, other: &HandlerKind) -> bool {
        let mut current = Some(self);
        while let Some(kind) = current {
            if kind.is_exactly(other) {
                return true;
            }
            current = kind.parent();
        }
        false
    }
}

impl PartialEq for HandlerKind {
    fn eq(&self, other: &Self) -> bool {
        self.is_exactly(other)
    }
}

impl Eq for HandlerKind {}

impl fmt::Debug for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a custom predicate gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct PredicateRequest<'a> {
    pub route: &'a str,
    pub method: &'a str,
}

/// A named custom predicate. Predicates are identified by name.
#[derive(Clone)]
pub struct CustomPredicate {
    name: String,
    test: Arc<PredicateFn>,
}

impl CustomPredicate {
    pub fn new<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&PredicateRequest<'_>) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// A predicate that accepts every request.
    pub fn always(name: impl Into<String>) -> Self {
        Self::new(name, |_| true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, request: &PredicateRequest<'_>) -> bool {
        (self.test)(request)
    }
}

impl PartialEq for CustomPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CustomPredicate {}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomPredicate").field(&self.name).finish()
    }
}

/// Options passed along with a view registration.
///
/// `None` means "not specified"; [`ViewKwargs::update`] only overrides the
/// options the overlay specifies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewKwargs {
    pub request_method: Option<RequestMethod>,
    pub custom_predicates: Option<Vec<CustomPredicate>>,
    pub accept: Option<String>,
    pub renderer: Option<String>,
    /// Free-form options, updated key by key.
    pub extra: BTreeMap<String, String>,
}

impl ViewKwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_method(mut self, request_method: RequestMethod) -> Self {
        self.request_method = Some(request_method);
        self
    }

    pub fn with_custom_predicates(mut self, predicates: Vec<CustomPredicate>) -> Self {
        self.custom_predicates = Some(predicates);
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    pub fn with_renderer(mut self, renderer: impl Into<String>) -> Self {
        self.renderer = Some(renderer.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Overwrite every option specified in `overlay`.
    pub fn update(&mut self, overlay: &ViewKwargs) {
        if let Some(request_method) = &overlay.request_method {
            self.request_method = Some(request_method.clone());
        }
        if let Some(predicates) = &overlay.custom_predicates {
            self.custom_predicates = Some(predicates.clone());
        }
        if let Some(accept) = &overlay.accept {
            self.accept = Some(accept.clone());
        }
        if let Some(renderer) = &overlay.renderer {
            self.renderer = Some(renderer.clone());
        }
        for (key, value) in &overlay.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ViewKwargs::default()
    }
}

/// An endpoint handler. Clones share the same callable; equality is identity.
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerInner>,
}

struct HandlerInner {
    name: String,
    kind: HandlerKind,
    call: Box<ViewFn>,
    view_kwargs: Option<ViewKwargs>,
    catchall_predicate: Option<CustomPredicate>,
    description: Option<String>,
    io: IoDeclaration,
    special_kwargs: Vec<String>,
}

impl Handler {
    /// A simple view with no side-channel options.
    pub fn new<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&ViewArgs) -> String + Send + Sync + 'static,
    {
        Self::builder(name, call).build()
    }

    pub fn builder<F>(name: impl Into<String>, call: F) -> HandlerBuilder
    where
        F: Fn(&ViewArgs) -> String + Send + Sync + 'static,
    {
        HandlerBuilder {
            name: name.into(),
            kind: HandlerKind::simple_view(),
            call: Box::new(call),
            view_kwargs: None,
            catchall_predicate: None,
            description: None,
            io: IoDeclaration::default(),
            special_kwargs: Vec::new(),
        }
    }

    pub fn call(&self, args: &ViewArgs) -> String {
        (self.inner.call)(args)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn kind(&self) -> &HandlerKind {
        &self.inner.kind
    }

    pub fn view_kwargs(&self) -> Option<&ViewKwargs> {
        self.inner.view_kwargs.as_ref()
    }

    pub fn catchall_predicate(&self) -> Option<&CustomPredicate> {
        self.inner.catchall_predicate.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    pub fn io(&self) -> &IoDeclaration {
        &self.inner.io
    }

    /// Argument names supplied programmatically rather than by the client.
    pub fn special_kwargs(&self) -> &[String] {
        &self.inner.special_kwargs
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Handler {}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("name", &self.inner.name)
            .field("kind", &self.inner.kind)
            .field("view_kwargs", &self.inner.view_kwargs)
            .finish()
    }
}

pub struct HandlerBuilder {
    name: String,
    kind: HandlerKind,
    call: Box<ViewFn>,
    view_kwargs: Option<ViewKwargs>,
    catchall_predicate: Option<CustomPredicate>,
    description: Option<String>,
    io: IoDeclaration,
    special_kwargs: Vec<String>,
}

impl HandlerBuilder {
    pub fn kind(mut self, kind: HandlerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn view_kwargs(mut self, view_kwargs: ViewKwargs) -> Self {
        self.view_kwargs = Some(view_kwargs);
        self
    }

    pub fn catchall_predicate(mut self, predicate: CustomPredicate) -> Self {
        self.catchall_predicate = Some(predicate);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, spec: IoSpec) -> Self {
        self.io.required = Some(spec);
        self
    }

    pub fn optional(mut self, spec: IoSpec) -> Self {
        self.io.optional = Some(spec);
        self
    }

    pub fn unlimited(mut self, spec: IoSpec) -> Self {
        self.io.unlimited = Some(spec);
        self
    }

    pub fn returns(mut self, spec: IoSpec) -> Self {
        self.io.returns = Some(spec);
        self
    }

    pub fn special_kwargs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.special_kwargs = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Handler {
        Handler {
            inner: Arc::new(HandlerInner {
                name: self.name,
                kind: self.kind,
                call: self.call,
                view_kwargs: self.view_kwargs,
                catchall_predicate: self.catchall_predicate,
                description: self.description,
                io: self.io,
                special_kwargs: self.special_kwargs,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds_are_stable() {
        assert_eq!(HandlerKind::api_view(), HandlerKind::api_view());
        assert!(HandlerKind::api_view().is_a(&HandlerKind::function_view()));
        assert!(HandlerKind::api_view().is_a(&HandlerKind::base_view()));
        assert!(!HandlerKind::simple_view().is_a(&HandlerKind::function_view()));
    }

    #[test]
    fn test_kinds_with_same_name_are_distinct() {
        let a = HandlerKind::new("Custom");
        let b = HandlerKind::new("Custom");
        assert_ne!(a, b);
        assert!(!a.is_a(&b));
    }

    #[test]
    fn test_update_overrides_only_specified_options() {
        let mut base = ViewKwargs::new()
            .with_request_method(RequestMethod::post())
            .with_accept("text/html")
            .with_extra("a", "1");
        let overlay = ViewKwargs::new()
            .with_request_method(RequestMethod::get())
            .with_extra("b", "2");

        base.update(&overlay);

        assert_eq!(base.request_method, Some(RequestMethod::get()));
        assert_eq!(base.accept.as_deref(), Some("text/html"));
        assert_eq!(base.extra.get("a").map(String::as_str), Some("1"));
        assert_eq!(base.extra.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_handler_equality_is_identity() {
        let a = Handler::new("view", |_| "a".to_string());
        let b = Handler::new("view", |_| "a".to_string());
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.call(&ViewArgs::new()), "a");
    }

    #[test]
    fn test_always_predicate_accepts() {
        let predicate = CustomPredicate::always("catchall");
        let request = PredicateRequest {
            route: "/x",
            method: "PATCH",
        };
        assert!(predicate.evaluate(&request));
    }
}
