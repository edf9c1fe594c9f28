//! Tree scanner: flattens an API tree into routes and endpoint descriptors.

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::domain::endpoint::{EndpointDescriptor, FlattenedTree};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::handler::Handler;
use crate::domain::predicate::RequestMethod;
use crate::domain::tree::{BranchKey, TreeNode};

/// Default limit for nested branches.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Flatten `tree` below `root_path` with default settings.
pub fn get_endpoints(tree: &TreeNode, root_path: &str) -> DomainResult<FlattenedTree> {
    TreeScanner::default().scan(tree, root_path)
}

/// What a branch key resolves to.
enum ResolvedKey<'a> {
    Route {
        fragment: &'a str,
        request_method: Option<RequestMethod>,
    },
    /// Each key is scanned independently with the same value.
    Fanout(&'a [BranchKey]),
}

/// Walks an API tree and produces a [`FlattenedTree`].
#[derive(Debug, Clone)]
pub struct TreeScanner {
    max_depth: usize,
}

impl Default for TreeScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeScanner {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Flatten `tree`, prefixing every route with `root_path`.
    ///
    /// # Errors
    ///
    /// * [`DomainError::NotTraversable`] if `tree` is not a mapping or a sequence of pairs.
    /// * [`DomainError::MixedBranchKey`] for a key sequence mixing paths and request methods.
    /// * [`DomainError::PredicateOwnsSubtree`] for a request-method branch holding a sub-tree.
    /// * [`DomainError::TooDeep`] if nesting exceeds the configured limit.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn scan(&self, tree: &TreeNode, root_path: &str) -> DomainResult<FlattenedTree> {
        let result = self.endpoints(tree, root_path, 0)?;
        debug!(
            "scan: {} routes, {} endpoints",
            result.len(),
            result.endpoint_count()
        );
        Ok(result)
    }

    fn endpoints(
        &self,
        tree: &TreeNode,
        root_path: &str,
        depth: usize,
    ) -> DomainResult<FlattenedTree> {
        let pairs = branch_pairs(tree)?;
        self.scan_pairs(&pairs, root_path, depth)
    }

    fn scan_pairs(
        &self,
        pairs: &[(&BranchKey, &TreeNode)],
        root_path: &str,
        depth: usize,
    ) -> DomainResult<FlattenedTree> {
        pairs
            .iter()
            .map(|(key, value)| self.parse_branch(key, value, root_path, depth + 1))
            .collect()
    }

    #[instrument(level = "trace", skip(self, value))]
    fn parse_branch(
        &self,
        key: &BranchKey,
        value: &TreeNode,
        root_path: &str,
        depth: usize,
    ) -> DomainResult<FlattenedTree> {
        if depth > self.max_depth {
            return Err(DomainError::TooDeep {
                route: root_path.to_string(),
                max_depth: self.max_depth,
            });
        }

        let (fragment, request_method) = match resolve_key(key)? {
            ResolvedKey::Route {
                fragment,
                request_method,
            } => (fragment, request_method),
            ResolvedKey::Fanout(keys) => {
                return keys
                    .iter()
                    .map(|k| self.parse_branch(k, value, root_path, depth))
                    .collect();
            }
        };
        let complete_route = format!("{}{}", root_path, fragment);

        match value {
            TreeNode::Sequence(_) | TreeNode::Pair(..) => match branch_pairs(value) {
                Ok(pairs) => {
                    if let Some(method) = &request_method {
                        if !pairs.is_empty() {
                            return Err(predicate_owns_subtree(&complete_route, method));
                        }
                    }
                    self.scan_pairs(&pairs, &complete_route, depth)
                }
                Err(e) if e.is_not_traversable() => {
                    trace!("parse_branch: '{}' holds parallel alternatives", complete_route);
                    let TreeNode::Sequence(items) = value else {
                        return Err(e);
                    };
                    items
                        .iter()
                        .map(|item| self.parse_branch(key, item, root_path, depth + 1))
                        .collect()
                }
                Err(e) => Err(e),
            },
            TreeNode::Mapping(_) => {
                if let Some(method) = &request_method {
                    return Err(predicate_owns_subtree(&complete_route, method));
                }
                self.endpoints(value, &complete_route, depth)
            }
            TreeNode::Handler(handler) => Ok(FlattenedTree::single(endpoint(
                complete_route,
                handler,
                request_method,
            ))),
        }
    }
}

/// Key/value pairs of a traversable node.
fn branch_pairs(tree: &TreeNode) -> DomainResult<Vec<(&BranchKey, &TreeNode)>> {
    match tree {
        TreeNode::Mapping(entries) => Ok(entries.iter().map(|(k, v)| (k, v)).collect()),
        TreeNode::Sequence(items) => items
            .iter()
            .map(|item| match item {
                TreeNode::Pair(k, v) => Ok((k, v.as_ref())),
                other => Err(DomainError::NotTraversable {
                    found: format!("sequence containing a {}", other.kind_name()),
                }),
            })
            .collect(),
        TreeNode::Pair(k, v) => Ok(vec![(k, v.as_ref())]),
        TreeNode::Handler(handler) => Err(DomainError::NotTraversable {
            found: format!("handler '{}'", handler.name()),
        }),
    }
}

fn resolve_key(key: &BranchKey) -> DomainResult<ResolvedKey<'_>> {
    match key {
        BranchKey::Path(fragment) => Ok(ResolvedKey::Route {
            fragment: fragment.as_str(),
            request_method: None,
        }),
        BranchKey::Predicate(method) => Ok(ResolvedKey::Route {
            fragment: "",
            request_method: Some(method.clone()),
        }),
        BranchKey::Any(keys) => {
            if keys.iter().all(|k| matches!(k, BranchKey::Predicate(_))) {
                let merged = keys
                    .iter()
                    .filter_map(|k| match k {
                        BranchKey::Predicate(method) => Some(method),
                        _ => None,
                    })
                    .sum();
                return Ok(ResolvedKey::Route {
                    fragment: "",
                    request_method: Some(merged),
                });
            }
            let all_paths = keys.iter().all(|k| matches!(k, BranchKey::Path(_)));
            let nested = keys.iter().any(|k| matches!(k, BranchKey::Any(_)));
            if all_paths || nested {
                Ok(ResolvedKey::Fanout(keys))
            } else {
                Err(DomainError::MixedBranchKey {
                    found: format!("({})", keys.iter().map(BranchKey::kind_name).join(", ")),
                })
            }
        }
    }
}

fn predicate_owns_subtree(route: &str, method: &RequestMethod) -> DomainError {
    DomainError::PredicateOwnsSubtree {
        path: format!("{}/{}", route, method.label()),
    }
}

/// Descriptor for a leaf; the tree predicate replaces the handler's own.
fn endpoint(
    route: String,
    handler: &Handler,
    request_method: Option<RequestMethod>,
) -> EndpointDescriptor {
    let mut view_kwargs = handler.view_kwargs().cloned().unwrap_or_default();
    if let Some(method) = request_method {
        view_kwargs.request_method = Some(method);
    }
    EndpointDescriptor {
        route,
        view: handler.clone(),
        view_kwargs,
    }
}
