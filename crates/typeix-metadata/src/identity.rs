//! Decorator Identity
//!
//! A [`Decorator`] is the annotation factory handle: a name plus the
//! placement category it was declared with. Its metadata key is
//! `<namespace>:<category>[:<name>][:<paramIndex>]`.
//!
//! Identity is derived from name and category only. Two distinct handles
//! with the same name and category resolve to the same key and overwrite
//! each other's records. Anonymous handles fall back to the category alone,
//! so every anonymous factory of one category shares a key.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "@typeix";

/// Placement category of a decorator factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    /// Class declarations
    Constructor,
    /// Instance properties
    Property,
    /// Instance or static methods
    Method,
    /// Constructor or method parameters
    Parameter,
    /// Properties or parameters
    Mixed,
}

impl DecoratorKind {
    /// Category segment used in metadata keys
    pub fn as_str(self) -> &'static str {
        match self {
            DecoratorKind::Constructor => "constructor",
            DecoratorKind::Property => "property",
            DecoratorKind::Method => "method",
            DecoratorKind::Parameter => "parameter",
            DecoratorKind::Mixed => "mixed",
        }
    }
}

impl fmt::Display for DecoratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct DecoratorDef {
    name: Option<String>,
    kind: DecoratorKind,
}

/// Annotation factory handle
///
/// Cloning is cheap and clones compare equal; independently created
/// handles never do, even when their names match.
#[derive(Clone)]
pub struct Decorator(Arc<DecoratorDef>);

impl Decorator {
    /// Create a named factory of the given category
    ///
    /// Names containing `:` are refused when the factory is used to create
    /// an annotation.
    pub fn new(name: impl Into<String>, kind: DecoratorKind) -> Self {
        let name = name.into();
        let name = if name.is_empty() { None } else { Some(name) };
        Self(Arc::new(DecoratorDef { name, kind }))
    }

    /// Create a factory without a stable name
    pub fn anonymous(kind: DecoratorKind) -> Self {
        Self(Arc::new(DecoratorDef { name: None, kind }))
    }

    /// Class decorator factory
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, DecoratorKind::Constructor)
    }

    /// Property decorator factory
    pub fn property(name: impl Into<String>) -> Self {
        Self::new(name, DecoratorKind::Property)
    }

    /// Method decorator factory
    pub fn method(name: impl Into<String>) -> Self {
        Self::new(name, DecoratorKind::Method)
    }

    /// Parameter decorator factory
    pub fn parameter(name: impl Into<String>) -> Self {
        Self::new(name, DecoratorKind::Parameter)
    }

    /// Parameter-and-property decorator factory
    pub fn mixed(name: impl Into<String>) -> Self {
        Self::new(name, DecoratorKind::Mixed)
    }

    /// Declared name, if any
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// Placement category
    pub fn kind(&self) -> DecoratorKind {
        self.0.kind
    }

    /// Name for diagnostics
    pub fn label(&self) -> &str {
        self.name().unwrap_or("<anonymous>")
    }
}

impl PartialEq for Decorator {
    fn eq(&self, other: &Decorator) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Decorator {}

impl Hash for Decorator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for Decorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorator")
            .field("name", &self.0.name)
            .field("kind", &self.0.kind)
            .finish()
    }
}

/// Derive the metadata key for a factory
///
/// Parameter placements pass their index so that several annotations of the
/// same factory on one signature get distinct keys.
pub fn decorator_id(namespace: &str, decorator: &Decorator, param_index: Option<usize>) -> String {
    let mut id = format!("{}:{}", namespace, decorator.kind());
    if let Some(name) = decorator.name() {
        id.push(':');
        id.push_str(name);
    }
    if let Some(index) = param_index {
        id.push(':');
        id.push_str(&index.to_string());
    }
    id
}

/// Check whether `key` was derived from `base_id`, with or without an index
pub fn matches_decorator_id(key: &str, base_id: &str) -> bool {
    match key.strip_prefix(base_id) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_id() {
        let injectable = Decorator::class("Injectable");
        assert_eq!(
            decorator_id(DEFAULT_NAMESPACE, &injectable, None),
            "@typeix:constructor:Injectable"
        );
    }

    #[test]
    fn test_param_index_id() {
        let inject = Decorator::mixed("Inject");
        let first = decorator_id(DEFAULT_NAMESPACE, &inject, Some(0));
        let second = decorator_id(DEFAULT_NAMESPACE, &inject, Some(1));

        assert_eq!(first, "@typeix:mixed:Inject:0");
        assert_eq!(second, "@typeix:mixed:Inject:1");
        assert_ne!(first, second);
    }

    #[test]
    fn test_id_is_deterministic() {
        let produces = Decorator::method("Produces");
        assert_eq!(
            decorator_id("@app", &produces, None),
            decorator_id("@app", &produces, None)
        );
    }

    #[test]
    fn test_anonymous_falls_back_to_category() {
        let first = Decorator::anonymous(DecoratorKind::Property);
        let second = Decorator::property("");

        assert_eq!(decorator_id(DEFAULT_NAMESPACE, &first, None), "@typeix:property");
        assert_eq!(
            decorator_id(DEFAULT_NAMESPACE, &first, None),
            decorator_id(DEFAULT_NAMESPACE, &second, None)
        );
        assert_eq!(
            decorator_id(DEFAULT_NAMESPACE, &first, Some(2)),
            "@typeix:property:2"
        );
    }

    #[test]
    fn test_handle_identity() {
        let a = Decorator::class("Injectable");
        let b = Decorator::class("Injectable");

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.label(), "Injectable");
        assert_eq!(Decorator::anonymous(DecoratorKind::Method).label(), "<anonymous>");
    }

    #[test]
    fn test_matches_decorator_id() {
        let base = "@typeix:mixed:Inject";

        assert!(matches_decorator_id("@typeix:mixed:Inject", base));
        assert!(matches_decorator_id("@typeix:mixed:Inject:12", base));
        assert!(!matches_decorator_id("@typeix:mixed:Injector", base));
        assert!(!matches_decorator_id("@typeix:mixed:Inject:", base));
        assert!(!matches_decorator_id("@typeix:mixed", base));
        assert!(!matches_decorator_id("@typeix:mixed:Inject", "@typeix:mixed"));
    }
}
