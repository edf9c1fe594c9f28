//! Request-method predicates used as branch keys in an API tree.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use itertools::Itertools;

/// Standard request methods, in display order.
pub const ALL_REQUEST_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "HEAD"];

/// One or more request-method tokens.
///
/// Tokens are kept in the order they were given. Equality is order-sensitive;
/// use [`RequestMethod::same_methods`] when the order must not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RequestMethod {
    methods: Vec<String>,
}

impl RequestMethod {
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get() -> Self {
        Self::new(["GET"])
    }

    pub fn post() -> Self {
        Self::new(["POST"])
    }

    pub fn put() -> Self {
        Self::new(["PUT"])
    }

    pub fn delete() -> Self {
        Self::new(["DELETE"])
    }

    pub fn head() -> Self {
        Self::new(["HEAD"])
    }

    /// Every standard request method.
    pub fn all() -> Self {
        Self::new(ALL_REQUEST_METHODS)
    }

    /// Concatenate the tokens of `self` and `other` into a new value.
    pub fn combine(&self, other: &RequestMethod) -> RequestMethod {
        let methods = self
            .methods
            .iter()
            .chain(other.methods.iter())
            .cloned()
            .collect();
        RequestMethod { methods }
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m == method)
    }

    /// Compare as sets, ignoring order and repetition.
    pub fn same_methods(&self, other: &RequestMethod) -> bool {
        let mine: Vec<&String> = self.methods.iter().sorted().dedup().collect();
        let theirs: Vec<&String> = other.methods.iter().sorted().dedup().collect();
        mine == theirs
    }

    /// Comma-joined tokens, e.g. `GET, POST`.
    pub fn label(&self) -> String {
        self.methods.iter().join(", ")
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.label())
    }
}

impl Add for RequestMethod {
    type Output = RequestMethod;

    fn add(self, other: RequestMethod) -> RequestMethod {
        self.combine(&other)
    }
}

impl<'a> Sum<&'a RequestMethod> for RequestMethod {
    fn sum<I: Iterator<Item = &'a RequestMethod>>(iter: I) -> Self {
        iter.fold(RequestMethod::empty(), |acc, m| acc.combine(m))
    }
}

impl Sum for RequestMethod {
    fn sum<I: Iterator<Item = RequestMethod>>(iter: I) -> Self {
        iter.fold(RequestMethod::empty(), |acc, m| acc.combine(&m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_tokens_is_empty() {
        let empty: [&str; 0] = [];
        assert!(RequestMethod::new(empty).is_empty());
        assert_eq!(RequestMethod::empty(), RequestMethod::default());
    }

    #[test]
    fn test_combine_preserves_order() {
        let combined = RequestMethod::get() + RequestMethod::post();
        assert_eq!(combined.methods(), &["GET".to_string(), "POST".to_string()]);
        assert_eq!(combined.label(), "GET, POST");
    }

    #[test]
    fn test_sum_folds_from_empty() {
        let parts = vec![RequestMethod::put(), RequestMethod::delete(), RequestMethod::head()];
        let summed: RequestMethod = parts.iter().sum();
        assert_eq!(summed, RequestMethod::new(["PUT", "DELETE", "HEAD"]));
    }

    #[test]
    fn test_same_methods_ignores_order() {
        let a = RequestMethod::new(["GET", "POST"]);
        let b = RequestMethod::new(["POST", "GET"]);
        assert_ne!(a, b);
        assert!(a.same_methods(&b));
        assert!(!a.same_methods(&RequestMethod::get()));
    }

    #[test]
    fn test_all_covers_standard_methods() {
        let all = RequestMethod::all();
        for method in ALL_REQUEST_METHODS {
            assert!(all.contains(method));
        }
        assert_eq!(all.label(), "GET, POST, PUT, DELETE, HEAD");
    }
}
