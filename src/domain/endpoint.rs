//! Flattened scan output: routes mapped to endpoint descriptors.

use std::collections::HashMap;

use crate::domain::handler::{Handler, ViewKwargs};
use crate::domain::predicate::RequestMethod;

/// One view registration produced by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub route: String,
    pub view: Handler,
    /// Registration options; `request_method` holds the effective predicate set.
    pub view_kwargs: ViewKwargs,
}

impl EndpointDescriptor {
    pub fn request_method(&self) -> Option<&RequestMethod> {
        self.view_kwargs.request_method.as_ref()
    }
}

/// Routes in first-seen order, each with its descriptors in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenedTree {
    entries: Vec<(String, Vec<EndpointDescriptor>)>,
    index: HashMap<String, usize>,
}

impl FlattenedTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree holding a single descriptor under its own route.
    pub fn single(descriptor: EndpointDescriptor) -> Self {
        let mut tree = Self::new();
        tree.push(descriptor);
        tree
    }

    pub fn push(&mut self, descriptor: EndpointDescriptor) {
        let route = descriptor.route.clone();
        self.slot(&route).push(descriptor);
    }

    /// Append every descriptor of `other`, concatenating lists for shared routes.
    pub fn merge(&mut self, other: FlattenedTree) {
        for (route, descriptors) in other.entries {
            self.slot(&route).extend(descriptors);
        }
    }

    fn slot(&mut self, route: &str) -> &mut Vec<EndpointDescriptor> {
        let idx = match self.index.get(route) {
            Some(&idx) => idx,
            None => {
                self.entries.push((route.to_string(), Vec::new()));
                let idx = self.entries.len() - 1;
                self.index.insert(route.to_string(), idx);
                idx
            }
        };
        &mut self.entries[idx].1
    }

    pub fn get(&self, route: &str) -> Option<&[EndpointDescriptor]> {
        self.index
            .get(route)
            .map(|&idx| self.entries[idx].1.as_slice())
    }

    pub fn contains_route(&self, route: &str) -> bool {
        self.index.contains_key(route)
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(route, _)| route.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[EndpointDescriptor])> {
        self.entries
            .iter()
            .map(|(route, descriptors)| (route.as_str(), descriptors.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of descriptors across all routes.
    pub fn endpoint_count(&self) -> usize {
        self.entries.iter().map(|(_, d)| d.len()).sum()
    }
}

impl FromIterator<FlattenedTree> for FlattenedTree {
    fn from_iter<I: IntoIterator<Item = FlattenedTree>>(iter: I) -> Self {
        let mut result = FlattenedTree::new();
        for tree in iter {
            result.merge(tree);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(route: &str, handler: &Handler) -> EndpointDescriptor {
        EndpointDescriptor {
            route: route.to_string(),
            view: handler.clone(),
            view_kwargs: ViewKwargs::default(),
        }
    }

    #[test]
    fn test_merge_concatenates_shared_routes() {
        let a = Handler::new("a", |_| String::new());
        let b = Handler::new("b", |_| String::new());

        let mut left = FlattenedTree::single(descriptor("/x", &a));
        left.push(descriptor("/y", &a));
        let right = FlattenedTree::single(descriptor("/x", &b));

        left.merge(right);

        assert_eq!(left.routes().collect::<Vec<_>>(), vec!["/x", "/y"]);
        let views: Vec<&Handler> = left.get("/x").unwrap().iter().map(|d| &d.view).collect();
        assert_eq!(views, vec![&a, &b]);
        assert_eq!(left.endpoint_count(), 3);
    }

    #[test]
    fn test_empty() {
        let tree: FlattenedTree = Vec::new().into_iter().collect();
        assert!(tree.is_empty());
        assert_eq!(tree.get("/"), None);
    }
}
