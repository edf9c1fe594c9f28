//! Declared input/output metadata attached to handlers.
//!
//! Values are opaque to routing; they only feed the documentation compiler.

/// A documentation value describing handler parameters or results.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IoSpec {
    /// A class-like value, rendered by name.
    Type(String),
    /// Literal text.
    Text(String),
    Flag(bool),
    List(Vec<IoSpec>),
    /// Ordered key/value pairs.
    Map(Vec<(String, IoSpec)>),
    /// Repeated/validated list wrapper.
    ListOf(Box<IoSpec>),
    /// A runtime value with no textual form; needs a transform to be rendered.
    Value { type_name: String },
}

impl IoSpec {
    pub fn type_of(name: impl Into<String>) -> Self {
        IoSpec::Type(name.into())
    }

    pub fn text(value: impl Into<String>) -> Self {
        IoSpec::Text(value.into())
    }

    pub fn list<I: IntoIterator<Item = IoSpec>>(items: I) -> Self {
        IoSpec::List(items.into_iter().collect())
    }

    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, IoSpec)>,
        K: Into<String>,
    {
        IoSpec::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn list_of(inner: IoSpec) -> Self {
        IoSpec::ListOf(Box::new(inner))
    }

    pub fn value(type_name: impl Into<String>) -> Self {
        IoSpec::Value {
            type_name: type_name.into(),
        }
    }

    /// Empty containers, empty text and `false` carry nothing worth documenting.
    pub fn is_empty(&self) -> bool {
        match self {
            IoSpec::Text(s) => s.is_empty(),
            IoSpec::Flag(b) => !b,
            IoSpec::List(items) => items.is_empty(),
            IoSpec::Map(entries) => entries.is_empty(),
            IoSpec::Type(_) | IoSpec::ListOf(_) | IoSpec::Value { .. } => false,
        }
    }

    /// Copy of a map without the given keys; other values are returned unchanged.
    pub fn without_keys(&self, keys: &[String]) -> IoSpec {
        match self {
            IoSpec::Map(entries) => IoSpec::Map(
                entries
                    .iter()
                    .filter(|(k, _)| !keys.contains(k))
                    .cloned()
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Declared input/output metadata of a handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IoDeclaration {
    pub required: Option<IoSpec>,
    pub optional: Option<IoSpec>,
    pub unlimited: Option<IoSpec>,
    pub returns: Option<IoSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(IoSpec::text("").is_empty());
        assert!(IoSpec::Flag(false).is_empty());
        assert!(IoSpec::list([]).is_empty());
        assert!(IoSpec::map(Vec::<(String, IoSpec)>::new()).is_empty());
        assert!(!IoSpec::type_of("int").is_empty());
        assert!(!IoSpec::Flag(true).is_empty());
        assert!(!IoSpec::list_of(IoSpec::list([])).is_empty());
    }

    #[test]
    fn test_without_keys_leaves_original_untouched() {
        let spec = IoSpec::map([("x", IoSpec::type_of("object")), ("y", IoSpec::type_of("int"))]);
        let filtered = spec.without_keys(&["x".to_string()]);
        assert_eq!(filtered, IoSpec::map([("y", IoSpec::type_of("int"))]));
        assert_eq!(
            spec,
            IoSpec::map([("x", IoSpec::type_of("object")), ("y", IoSpec::type_of("int"))])
        );
    }
}
