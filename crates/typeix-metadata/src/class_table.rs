//! Class Table
//!
//! Registers annotated classes and their inheritance. Every class gets a
//! stable [`ClassId`] and its full ancestor list is resolved once, when the
//! class is defined, so later queries never have to chase parent links.

use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{MetadataError, Result};

/// Stable handle for a registered class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

/// Object that metadata is physically attached to
///
/// A class has two storage surfaces: the class object itself (constructor
/// metadata and static members) and its instance-shaped prototype
/// (instance properties and methods).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// The class object
    Constructor(ClassId),
    /// The instance-shaped counterpart of the class
    Prototype(ClassId),
}

impl Target {
    /// Class this target belongs to
    pub fn class_id(self) -> ClassId {
        match self {
            Target::Constructor(id) | Target::Prototype(id) => id,
        }
    }

    /// Whether this is the class object rather than its prototype
    pub fn is_constructor(self) -> bool {
        matches!(self, Target::Constructor(_))
    }

    /// Same surface on another class
    pub fn with_class(self, id: ClassId) -> Target {
        match self {
            Target::Constructor(_) => Target::Constructor(id),
            Target::Prototype(_) => Target::Prototype(id),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Constructor(id) => write!(f, "{}", id),
            Target::Prototype(id) => write!(f, "{}.prototype", id),
        }
    }
}

/// A registered class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Class ID
    pub id: ClassId,
    /// Declared class name
    pub name: String,
    /// Direct parent (None for root classes)
    pub parent: Option<ClassId>,
    /// Every ancestor, nearest first
    pub ancestors: Vec<ClassId>,
}

impl ClassInfo {
    /// The class followed by its ancestors, most-derived first
    pub fn lineage(&self) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::once(self.id).chain(self.ancestors.iter().copied())
    }
}

/// Registry of annotated classes
#[derive(Debug, Default)]
pub struct ClassTable {
    /// Classes indexed by ID
    classes: Vec<ClassInfo>,
    /// Class name to most recently defined ID
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a class, resolving its ancestor list
    ///
    /// Names are not required to be unique; lookups by name return the most
    /// recent definition.
    pub fn define(&mut self, name: impl Into<String>, parent: Option<ClassId>) -> Result<ClassId> {
        let name = name.into();
        let ancestors = match parent {
            Some(parent_id) => {
                let parent_info = self
                    .get(parent_id)
                    .ok_or(MetadataError::UnknownClass(parent_id))?;
                parent_info.lineage().collect()
            }
            None => Vec::new(),
        };

        let id = ClassId(self.classes.len() as u32);
        debug!(%id, name = %name, ?parent, depth = ancestors.len(), "defined class");

        self.name_to_id.insert(name.clone(), id);
        self.classes.push(ClassInfo {
            id,
            name,
            parent,
            ancestors,
        });
        Ok(id)
    }

    /// Get class by ID
    pub fn get(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(id.0 as usize)
    }

    /// Get class by name
    pub fn get_by_name(&self, name: &str) -> Option<&ClassInfo> {
        self.name_to_id.get(name).and_then(|id| self.get(*id))
    }

    /// Check if a class is registered
    pub fn contains(&self, id: ClassId) -> bool {
        self.get(id).is_some()
    }

    /// The class and its ancestors, most-derived first
    ///
    /// Unknown classes yield just themselves.
    pub fn lineage(&self, id: ClassId) -> Vec<ClassId> {
        match self.get(id) {
            Some(info) => info.lineage().collect(),
            None => vec![id],
        }
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over all classes
    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_root_class() {
        let mut table = ClassTable::new();
        let id = table.define("Point", None).unwrap();

        assert_eq!(id, ClassId(0));
        let info = table.get(id).unwrap();
        assert_eq!(info.name, "Point");
        assert_eq!(info.parent, None);
        assert!(info.ancestors.is_empty());
    }

    #[test]
    fn test_ancestors_resolved_at_definition() {
        let mut table = ClassTable::new();
        let a = table.define("A", None).unwrap();
        let b = table.define("B", Some(a)).unwrap();
        let c = table.define("C", Some(b)).unwrap();

        assert_eq!(table.get(c).unwrap().ancestors, vec![b, a]);
        assert_eq!(table.lineage(c), vec![c, b, a]);
        assert_eq!(table.lineage(a), vec![a]);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut table = ClassTable::new();
        let err = table.define("Orphan", Some(ClassId(7))).unwrap_err();

        assert!(matches!(err, MetadataError::UnknownClass(ClassId(7))));
        assert!(table.is_empty());
    }

    #[test]
    fn test_get_by_name_returns_latest() {
        let mut table = ClassTable::new();
        table.define("Service", None).unwrap();
        let second = table.define("Service", None).unwrap();

        assert_eq!(table.get_by_name("Service").unwrap().id, second);
        assert_eq!(table.len(), 2);
        let ids: Vec<ClassId> = table.iter().map(|info| info.id).collect();
        assert_eq!(ids, vec![ClassId(0), second]);
        assert!(table.get_by_name("Missing").is_none());
    }

    #[test]
    fn test_target_with_class_keeps_surface() {
        let proto = Target::Prototype(ClassId(1));
        let ctor = Target::Constructor(ClassId(1));

        assert_eq!(proto.with_class(ClassId(2)), Target::Prototype(ClassId(2)));
        assert_eq!(ctor.with_class(ClassId(2)), Target::Constructor(ClassId(2)));
        assert!(ctor.is_constructor());
        assert_eq!(proto.to_string(), "class#1.prototype");
    }
}
