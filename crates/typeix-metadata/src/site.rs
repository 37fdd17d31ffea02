//! Declaration sites and query slots
//!
//! A [`Site`] names the declaration an annotation is applied to; a [`Slot`]
//! names the place a query reads from. Both resolve to the same
//! `(Target, slot name)` pair, which is how records are found again.
//!
//! Static-ness is structural: a named member whose target is the class
//! object (`Target::Constructor`) is static, one on the prototype is not.

use std::fmt;

use crate::class_table::{ClassId, Target};

/// Slot name used for the class itself
pub const CONSTRUCTOR_SLOT: &str = "constructor";

/// A declaration an annotation is applied to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Site {
    /// Class declaration
    Class(ClassId),
    /// Property declaration
    Property {
        /// Prototype for instance properties, constructor for static ones
        target: Target,
        /// Property name
        name: String,
    },
    /// Method declaration
    Method {
        /// Prototype for instance methods, constructor for static ones
        target: Target,
        /// Method name
        name: String,
    },
    /// Parameter of a constructor (`method: None`) or method
    Parameter {
        /// Target the owning function lives on
        target: Target,
        /// Owning method name, `None` for the constructor
        method: Option<String>,
        /// Parameter position
        index: usize,
    },
}

impl Site {
    /// The class declaration
    pub fn class(class: ClassId) -> Self {
        Site::Class(class)
    }

    /// An instance property
    pub fn property(class: ClassId, name: &str) -> Self {
        Site::Property {
            target: Target::Prototype(class),
            name: name.to_string(),
        }
    }

    /// A static property
    pub fn static_property(class: ClassId, name: &str) -> Self {
        Site::Property {
            target: Target::Constructor(class),
            name: name.to_string(),
        }
    }

    /// An instance method
    pub fn method(class: ClassId, name: &str) -> Self {
        Site::Method {
            target: Target::Prototype(class),
            name: name.to_string(),
        }
    }

    /// A static method
    pub fn static_method(class: ClassId, name: &str) -> Self {
        Site::Method {
            target: Target::Constructor(class),
            name: name.to_string(),
        }
    }

    /// A constructor parameter
    pub fn constructor_parameter(class: ClassId, index: usize) -> Self {
        Site::Parameter {
            target: Target::Constructor(class),
            method: None,
            index,
        }
    }

    /// A parameter of an instance method
    pub fn parameter(class: ClassId, method: &str, index: usize) -> Self {
        Site::Parameter {
            target: Target::Prototype(class),
            method: Some(method.to_string()),
            index,
        }
    }

    /// A parameter of a static method
    pub fn static_parameter(class: ClassId, method: &str, index: usize) -> Self {
        Site::Parameter {
            target: Target::Constructor(class),
            method: Some(method.to_string()),
            index,
        }
    }

    /// Object the record for this site is stored on
    pub fn target(&self) -> Target {
        match self {
            Site::Class(class) => Target::Constructor(*class),
            Site::Property { target, .. }
            | Site::Method { target, .. }
            | Site::Parameter { target, .. } => *target,
        }
    }

    /// Class owning the site
    pub fn class_id(&self) -> ClassId {
        self.target().class_id()
    }

    /// Storage slot (`None` for the class-level slot)
    pub fn slot_name(&self) -> Option<&str> {
        match self {
            Site::Class(_) => None,
            Site::Property { name, .. } | Site::Method { name, .. } => Some(name.as_str()),
            Site::Parameter { method, .. } => method.as_deref(),
        }
    }

    /// Slot name as reported on records
    pub fn property_key(&self) -> &str {
        self.slot_name().unwrap_or(CONSTRUCTOR_SLOT)
    }

    /// Parameter position, for parameter sites
    pub fn param_index(&self) -> Option<usize> {
        match self {
            Site::Parameter { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Whether the site is a static member
    pub fn is_static(&self) -> bool {
        self.target().is_constructor() && self.slot_name().is_some()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = if self.is_static() { "static " } else { "" };
        match self {
            Site::Class(class) => write!(f, "class {}", class),
            Site::Property { name, .. } => write!(f, "{}property {}", scope, name),
            Site::Method { name, .. } => write!(f, "{}method {}", scope, name),
            Site::Parameter { index, .. } => write!(
                f,
                "parameter {} of {}{}",
                index,
                scope,
                self.property_key()
            ),
        }
    }
}

/// A slot addressed by a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The class-level slot (class and constructor parameter metadata)
    Constructor,
    /// A member on the prototype
    Instance(String),
    /// A member on the class object
    Static(String),
}

impl Slot {
    /// Resolve to storage target and slot name
    pub fn locate(&self, class: ClassId) -> (Target, Option<&str>) {
        match self {
            Slot::Constructor => (Target::Constructor(class), None),
            Slot::Instance(name) => (Target::Prototype(class), Some(name.as_str())),
            Slot::Static(name) => (Target::Constructor(class), Some(name.as_str())),
        }
    }

    /// Member slot, static or not
    pub fn member(name: &str, is_static: bool) -> Self {
        if is_static {
            Slot::Static(name.to_string())
        } else {
            Slot::from(name)
        }
    }
}

/// `"constructor"` addresses the class-level slot, any other name an
/// instance member.
impl From<&str> for Slot {
    fn from(name: &str) -> Self {
        if name == CONSTRUCTOR_SLOT {
            Slot::Constructor
        } else {
            Slot::Instance(name.to_string())
        }
    }
}

impl From<Option<&str>> for Slot {
    fn from(name: Option<&str>) -> Self {
        name.map_or(Slot::Constructor, Slot::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_detection_is_structural() {
        let class = ClassId(0);

        assert!(!Site::class(class).is_static());
        assert!(!Site::constructor_parameter(class, 0).is_static());
        assert!(!Site::property(class, "x").is_static());
        assert!(Site::static_property(class, "x").is_static());
        assert!(Site::static_method(class, "run").is_static());
        assert!(Site::static_parameter(class, "run", 1).is_static());
    }

    #[test]
    fn test_site_storage_location() {
        let class = ClassId(3);

        let site = Site::parameter(class, "handle", 1);
        assert_eq!(site.target(), Target::Prototype(class));
        assert_eq!(site.slot_name(), Some("handle"));
        assert_eq!(site.param_index(), Some(1));

        let site = Site::constructor_parameter(class, 0);
        assert_eq!(site.target(), Target::Constructor(class));
        assert_eq!(site.slot_name(), None);
        assert_eq!(site.property_key(), "constructor");
    }

    #[test]
    fn test_slot_locates_like_site() {
        let class = ClassId(1);

        assert_eq!(
            Slot::from("run").locate(class),
            (Site::method(class, "run").target(), Some("run"))
        );
        assert_eq!(
            Slot::Static("run".into()).locate(class),
            (Target::Constructor(class), Some("run"))
        );
        assert_eq!(Slot::from("constructor"), Slot::Constructor);
        assert_eq!(Slot::from(None), Slot::Constructor);
        assert_eq!(Slot::member("x", true), Slot::Static("x".into()));
    }

    #[test]
    fn test_site_display() {
        let class = ClassId(2);
        assert_eq!(
            Site::static_parameter(class, "run", 0).to_string(),
            "parameter 0 of static run"
        );
        assert_eq!(Site::property(class, "x").to_string(), "property x");
    }
}
