//! Tree literal macro.

/// Build a [`TreeNode::Mapping`](crate::domain::TreeNode) from `key => value` entries.
///
/// Keys are anything convertible into a [`BranchKey`](crate::domain::BranchKey):
/// path fragments, request methods, or arrays of either. Values are handlers,
/// nested trees, or `Vec<TreeNode>` sequences.
///
/// ```
/// use apitree::{api_tree, Handler, RequestMethod};
///
/// let list = Handler::new("list", |_| "[]".to_string());
/// let create = Handler::new("create", |_| "{}".to_string());
/// let tree = api_tree! {
///     "/items" => api_tree! {
///         RequestMethod::get() => &list,
///         RequestMethod::post() => &create,
///     },
/// };
/// ```
#[macro_export]
macro_rules! api_tree {
    () => {
        $crate::domain::TreeNode::empty()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::domain::TreeNode::Mapping(vec![
            $((
                $crate::domain::BranchKey::from($key),
                $crate::domain::TreeNode::from($value),
            )),+
        ])
    };
}
