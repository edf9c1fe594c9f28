//! API tree shapes.
//!
//! ```text
//! TreeNode::mapping([
//!     (GET,           root_get),
//!     ("/resource",   mapping([(GET, list), (POST, create)])),
//!     (["/a", "/b"],  aliased),
//!     ("/multi",      sequence([view_get, view_post])),
//! ])
//! ```

use crate::domain::handler::Handler;
use crate::domain::predicate::RequestMethod;

/// The key of one branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKey {
    /// Path fragment appended to the route; may be empty.
    Path(String),
    /// Request-method predicate; does not extend the route.
    Predicate(RequestMethod),
    /// Sequence of keys: merged when all predicates, element-wise otherwise.
    Any(Vec<BranchKey>),
}

impl BranchKey {
    pub fn path(fragment: impl Into<String>) -> Self {
        BranchKey::Path(fragment.into())
    }

    pub fn any<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<BranchKey>,
    {
        BranchKey::Any(keys.into_iter().map(Into::into).collect())
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            BranchKey::Path(_) => "path",
            BranchKey::Predicate(_) => "request method",
            BranchKey::Any(_) => "sequence",
        }
    }
}

impl From<&str> for BranchKey {
    fn from(fragment: &str) -> Self {
        BranchKey::Path(fragment.to_string())
    }
}

impl From<String> for BranchKey {
    fn from(fragment: String) -> Self {
        BranchKey::Path(fragment)
    }
}

impl From<RequestMethod> for BranchKey {
    fn from(method: RequestMethod) -> Self {
        BranchKey::Predicate(method)
    }
}

impl<K: Into<BranchKey>, const N: usize> From<[K; N]> for BranchKey {
    fn from(keys: [K; N]) -> Self {
        BranchKey::any(keys)
    }
}

impl<K: Into<BranchKey>> From<Vec<K>> for BranchKey {
    fn from(keys: Vec<K>) -> Self {
        BranchKey::any(keys)
    }
}

/// One node of an API tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Insertion-ordered sub-tree.
    Mapping(Vec<(BranchKey, TreeNode)>),
    /// Pair-sequence sub-tree when every element is a `Pair`, parallel
    /// alternatives otherwise.
    Sequence(Vec<TreeNode>),
    Pair(BranchKey, Box<TreeNode>),
    Handler(Handler),
}

impl TreeNode {
    pub fn mapping<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<BranchKey>,
        V: Into<TreeNode>,
    {
        TreeNode::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn sequence<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<TreeNode>,
    {
        TreeNode::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn pair(key: impl Into<BranchKey>, value: impl Into<TreeNode>) -> Self {
        TreeNode::Pair(key.into(), Box::new(value.into()))
    }

    /// Ordered alternative to [`TreeNode::mapping`].
    pub fn pairs<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<BranchKey>,
        V: Into<TreeNode>,
    {
        TreeNode::Sequence(
            entries
                .into_iter()
                .map(|(k, v)| TreeNode::pair(k, v))
                .collect(),
        )
    }

    pub fn empty() -> Self {
        TreeNode::Mapping(Vec::new())
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            TreeNode::Mapping(_) => "mapping",
            TreeNode::Sequence(_) => "sequence",
            TreeNode::Pair(..) => "pair",
            TreeNode::Handler(_) => "handler",
        }
    }
}

impl From<Handler> for TreeNode {
    fn from(handler: Handler) -> Self {
        TreeNode::Handler(handler)
    }
}

impl From<&Handler> for TreeNode {
    fn from(handler: &Handler) -> Self {
        TreeNode::Handler(handler.clone())
    }
}

impl From<Vec<TreeNode>> for TreeNode {
    fn from(items: Vec<TreeNode>) -> Self {
        TreeNode::Sequence(items)
    }
}
