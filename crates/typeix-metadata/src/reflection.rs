//! Static Type Reflection
//!
//! Compiler-emitted type descriptors are supplied by a separate reflection
//! layer through the [`TypeReflector`] trait. The registry reads them when
//! recording annotations and serves them under the well-known `design:*`
//! keys, but never writes them.
//!
//! [`DesignTypeTable`] is an in-memory reflector that setup code fills in
//! before annotations are applied:
//!
//! ```rust,ignore
//! let types = Arc::new(DesignTypeTable::new());
//! types.declare_property(Target::Prototype(service), "repo", TypeDescriptor::Class(repo));
//! types.declare_constructor(service, vec![TypeDescriptor::Class(repo)]);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::class_table::{ClassId, Target};
use crate::value::Value;

/// Key under which a slot's declared type is served
pub const DESIGN_TYPE: &str = "design:type";

/// Key under which a slot's parameter type list is served
pub const DESIGN_PARAM_TYPES: &str = "design:paramtypes";

/// Key under which a method's return type is served
pub const DESIGN_RETURN_TYPE: &str = "design:returntype";

/// A static type as emitted by the compiler
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    /// No type (e.g. a `void` return)
    Void,
    /// Marker emitted as the declared type of methods
    Function,
    /// String primitive
    String,
    /// Number primitive
    Number,
    /// Boolean primitive
    Boolean,
    /// Plain object or erased type
    Object,
    /// Array of any element type
    Array,
    /// A class registered with the metadata registry
    Class(ClassId),
    /// A type known only by name
    Named(Arc<str>),
}

impl TypeDescriptor {
    /// Create a named type
    pub fn named(name: &str) -> Self {
        TypeDescriptor::Named(Arc::from(name))
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Void => f.write_str("void"),
            TypeDescriptor::Function => f.write_str("Function"),
            TypeDescriptor::String => f.write_str("String"),
            TypeDescriptor::Number => f.write_str("Number"),
            TypeDescriptor::Boolean => f.write_str("Boolean"),
            TypeDescriptor::Object => f.write_str("Object"),
            TypeDescriptor::Array => f.write_str("Array"),
            TypeDescriptor::Class(id) => write!(f, "{}", id),
            TypeDescriptor::Named(name) => f.write_str(name),
        }
    }
}

/// Descriptors emitted for one (target, slot) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticType {
    /// Declared type (`design:type`)
    pub design_type: Option<TypeDescriptor>,
    /// Parameter types (`design:paramtypes`)
    pub param_types: Option<Vec<TypeDescriptor>>,
    /// Return type (`design:returntype`)
    pub return_type: Option<TypeDescriptor>,
}

impl StaticType {
    /// Descriptors for a property
    pub fn property(ty: TypeDescriptor) -> Self {
        Self {
            design_type: Some(ty),
            ..Self::default()
        }
    }

    /// Descriptors for a method
    pub fn method(params: Vec<TypeDescriptor>, returns: TypeDescriptor) -> Self {
        Self {
            design_type: Some(TypeDescriptor::Function),
            param_types: Some(params),
            return_type: Some(returns),
        }
    }

    /// Descriptors for a constructor
    pub fn constructor(params: Vec<TypeDescriptor>) -> Self {
        Self {
            param_types: Some(params),
            ..Self::default()
        }
    }

    /// Present descriptors as `(key, value)` pairs
    ///
    /// Order is fixed: declared type, parameter types, return type.
    pub fn entries(&self) -> Vec<(&'static str, Value)> {
        let mut entries = Vec::with_capacity(3);
        if let Some(ty) = &self.design_type {
            entries.push((DESIGN_TYPE, Value::Type(ty.clone())));
        }
        if let Some(params) = &self.param_types {
            let list = params.iter().cloned().map(Value::Type).collect();
            entries.push((DESIGN_PARAM_TYPES, Value::List(list)));
        }
        if let Some(ty) = &self.return_type {
            entries.push((DESIGN_RETURN_TYPE, Value::Type(ty.clone())));
        }
        entries
    }

    /// Keys of the present descriptors, in [`StaticType::entries`] order
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries().into_iter().map(|(key, _)| key).collect()
    }

    /// Descriptor served under `key`
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, value)| value)
    }
}

/// Source of compiler-emitted type descriptors
pub trait TypeReflector: Send + Sync {
    /// Descriptors for `slot` on `target` (`None` addresses the class itself)
    fn lookup_static_type(&self, target: Target, slot: Option<&str>) -> Option<StaticType>;
}

/// Reflector for hosts without type emission
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReflection;

impl TypeReflector for NoReflection {
    fn lookup_static_type(&self, _target: Target, _slot: Option<&str>) -> Option<StaticType> {
        None
    }
}

#[derive(Debug, Default)]
struct TargetTypes {
    /// Descriptors on the target itself
    own: Option<StaticType>,
    /// Descriptors per member
    members: FxHashMap<String, StaticType>,
}

/// In-memory table of declared static types
#[derive(Debug, Default)]
pub struct DesignTypeTable {
    targets: RwLock<FxHashMap<Target, TargetTypes>>,
}

impl DesignTypeTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare descriptors for a slot, replacing earlier ones
    pub fn declare(&self, target: Target, slot: Option<&str>, types: StaticType) {
        let mut targets = self.targets.write();
        let entry = targets.entry(target).or_default();
        match slot {
            Some(name) => {
                entry.members.insert(name.to_string(), types);
            }
            None => entry.own = Some(types),
        }
    }

    /// Declare the type of a property
    pub fn declare_property(&self, target: Target, name: &str, ty: TypeDescriptor) {
        self.declare(target, Some(name), StaticType::property(ty));
    }

    /// Declare a method's parameter and return types
    pub fn declare_method(
        &self,
        target: Target,
        name: &str,
        params: Vec<TypeDescriptor>,
        returns: TypeDescriptor,
    ) {
        self.declare(target, Some(name), StaticType::method(params, returns));
    }

    /// Declare a class constructor's parameter types
    pub fn declare_constructor(&self, class: ClassId, params: Vec<TypeDescriptor>) {
        self.declare(
            Target::Constructor(class),
            None,
            StaticType::constructor(params),
        );
    }
}

impl TypeReflector for DesignTypeTable {
    fn lookup_static_type(&self, target: Target, slot: Option<&str>) -> Option<StaticType> {
        let targets = self.targets.read();
        let entry = targets.get(&target)?;
        let found = match slot {
            Some(name) => entry.members.get(name).cloned(),
            None => entry.own.clone(),
        };
        trace!(%target, ?slot, found = found.is_some(), "static type lookup");
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_order() {
        let ty = StaticType::method(vec![TypeDescriptor::String], TypeDescriptor::Void);

        assert_eq!(
            ty.keys(),
            vec![DESIGN_TYPE, DESIGN_PARAM_TYPES, DESIGN_RETURN_TYPE]
        );
        assert_eq!(
            ty.get(DESIGN_PARAM_TYPES),
            Some(Value::List(vec![Value::Type(TypeDescriptor::String)]))
        );
        assert_eq!(
            ty.get(DESIGN_RETURN_TYPE),
            Some(Value::Type(TypeDescriptor::Void))
        );
    }

    #[test]
    fn test_constructor_has_only_param_types() {
        let ty = StaticType::constructor(vec![]);

        assert_eq!(ty.keys(), vec![DESIGN_PARAM_TYPES]);
        assert_eq!(ty.get(DESIGN_TYPE), None);
    }

    #[test]
    fn test_table_lookup() {
        let table = DesignTypeTable::new();
        let class = ClassId(0);
        table.declare_property(Target::Prototype(class), "name", TypeDescriptor::String);
        table.declare_constructor(class, vec![TypeDescriptor::Number]);

        let prop = table
            .lookup_static_type(Target::Prototype(class), Some("name"))
            .unwrap();
        assert_eq!(prop.design_type, Some(TypeDescriptor::String));

        let ctor = table
            .lookup_static_type(Target::Constructor(class), None)
            .unwrap();
        assert_eq!(ctor.param_types, Some(vec![TypeDescriptor::Number]));

        assert!(table
            .lookup_static_type(Target::Constructor(class), Some("name"))
            .is_none());
        assert!(table
            .lookup_static_type(Target::Prototype(ClassId(9)), None)
            .is_none());
    }

    #[test]
    fn test_no_reflection() {
        assert!(NoReflection
            .lookup_static_type(Target::Constructor(ClassId(0)), None)
            .is_none());
    }
}
