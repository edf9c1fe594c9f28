//! Route registration service
//!
//! Drives a [`Configurator`] from a scanned API tree: one route per distinct
//! path, one view per endpoint descriptor. Also registers catchall views.

use std::sync::Arc;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    CustomPredicate, EndpointDescriptor, FlattenedTree, Handler, HandlerKind, RequestMethod,
    TreeNode, ViewKwargs,
};
use crate::infrastructure::Configurator;

/// Name of the predicate attached to catchall views that bring none of their own.
pub const CATCHALL_PREDICATE: &str = "catchall";

/// Options for [`RegistrationService::add_catchall`].
#[derive(Debug, Clone, Default)]
pub struct CatchallOptions {
    /// Prefix the tree was registered under.
    pub root_path: String,
    /// Replaces the catchall handler's own options when set and not empty.
    pub view_kwargs: Option<ViewKwargs>,
    /// Applied last, over everything else.
    pub additional_view_kwargs: ViewKwargs,
    /// Only routes having at least one view of these kinds get a catchall.
    /// Empty means every route.
    pub target_kinds: Vec<HandlerKind>,
    /// Match kinds exactly instead of including derived kinds.
    pub strict: bool,
}

impl CatchallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = root_path.into();
        self
    }

    pub fn with_view_kwargs(mut self, view_kwargs: ViewKwargs) -> Self {
        self.view_kwargs = Some(view_kwargs);
        self
    }

    pub fn with_additional_view_kwargs(mut self, view_kwargs: ViewKwargs) -> Self {
        self.additional_view_kwargs = view_kwargs;
        self
    }

    pub fn with_target_kinds<I: IntoIterator<Item = HandlerKind>>(mut self, kinds: I) -> Self {
        self.target_kinds = kinds.into_iter().collect();
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn targets(&self, view: &Handler) -> bool {
        if self.target_kinds.is_empty() {
            return true;
        }
        self.target_kinds.iter().any(|target| {
            if self.strict {
                view.kind().is_exactly(target)
            } else {
                view.kind().is_a(target)
            }
        })
    }
}

/// Registers scanned endpoints with a router.
pub struct RegistrationService {
    settings: Arc<Settings>,
}

impl Default for RegistrationService {
    fn default() -> Self {
        Self::new(Arc::new(Settings::default()))
    }
}

impl RegistrationService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Scan `tree` below `root_path` and register every endpoint.
    ///
    /// Routes are named after their path. Router errors are returned as-is;
    /// registrations made before the failure stay in place.
    #[instrument(level = "debug", skip(self, configurator, tree))]
    pub fn apply<C>(
        &self,
        configurator: &mut C,
        tree: &TreeNode,
        root_path: &str,
    ) -> ApplicationResult<()>
    where
        C: Configurator + ?Sized,
    {
        let flattened = self.settings.scanner().scan(tree, root_path)?;
        self.apply_flattened(configurator, &flattened)
    }

    /// Register an already flattened tree.
    pub fn apply_flattened<C>(
        &self,
        configurator: &mut C,
        flattened: &FlattenedTree,
    ) -> ApplicationResult<()>
    where
        C: Configurator + ?Sized,
    {
        for (route, descriptors) in flattened.iter() {
            configurator.add_route(route, route)?;
            for descriptor in descriptors {
                debug!(
                    "apply_flattened: route={}, view={}",
                    route,
                    descriptor.view.name()
                );
                configurator.add_view(route, &descriptor.view, &descriptor.view_kwargs)?;
            }
        }
        debug!("apply_flattened: registered {} routes", flattened.len());
        Ok(())
    }

    /// Register `catchall` on every targeted route of `tree`.
    ///
    /// The catchall answers to the union of the route's request methods, so a
    /// request that reaches the route under a known method but matches no
    /// regular view falls through to it. Routes must already be registered.
    #[instrument(level = "debug", skip_all, fields(catchall = catchall.name()))]
    pub fn add_catchall<C>(
        &self,
        configurator: &mut C,
        tree: &TreeNode,
        catchall: &Handler,
        options: &CatchallOptions,
    ) -> ApplicationResult<()>
    where
        C: Configurator + ?Sized,
    {
        let flattened = self.settings.scanner().scan(tree, &options.root_path)?;
        let mut registered = 0;
        for (route, descriptors) in flattened.iter() {
            if !descriptors.iter().any(|d| options.targets(&d.view)) {
                continue;
            }
            let view_kwargs = self.catchall_kwargs(catchall, descriptors, options);
            configurator.add_view(route, catchall, &view_kwargs)?;
            registered += 1;
        }
        debug!("add_catchall: registered on {} routes", registered);
        Ok(())
    }

    fn catchall_kwargs(
        &self,
        catchall: &Handler,
        descriptors: &[EndpointDescriptor],
        options: &CatchallOptions,
    ) -> ViewKwargs {
        let predicate = catchall
            .catchall_predicate()
            .cloned()
            .unwrap_or_else(|| CustomPredicate::always(CATCHALL_PREDICATE));

        let mut view_kwargs = ViewKwargs::new().with_custom_predicates(vec![predicate]);
        let union = self.method_union(descriptors);
        if !union.is_empty() {
            view_kwargs.request_method = Some(union);
        }

        match &options.view_kwargs {
            Some(explicit) if !explicit.is_empty() => view_kwargs.update(explicit),
            _ => {
                if let Some(own) = catchall.view_kwargs() {
                    view_kwargs.update(own);
                }
            }
        }
        view_kwargs.update(&options.additional_view_kwargs);
        view_kwargs
    }

    /// Union of the route's methods in first-seen order.
    ///
    /// A view without a request-method predicate answers to every standard method.
    /// An empty union leaves the catchall without a method restriction.
    fn method_union(&self, descriptors: &[EndpointDescriptor]) -> RequestMethod {
        let standard = self.settings.standard_methods();
        RequestMethod::new(
            descriptors
                .iter()
                .flat_map(|d| d.request_method().unwrap_or(&standard).methods().to_vec())
                .unique(),
        )
    }
}
