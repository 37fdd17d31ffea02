//! Metadata records and query results

use std::fmt;
use std::sync::Arc;

use crate::args::Args;
use crate::class_table::Target;
use crate::identity::{Decorator, DecoratorKind};
use crate::reflection::TypeDescriptor;
use crate::value::Value;

/// Concrete kind of slot a record was attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// The class itself
    Constructor,
    /// Instance property
    Property,
    /// Instance method
    Method,
    /// Static method
    Static,
    /// Constructor or method parameter
    Parameter,
}

impl SlotKind {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            SlotKind::Constructor => "constructor",
            SlotKind::Property => "property",
            SlotKind::Method => "method",
            SlotKind::Static => "static",
            SlotKind::Parameter => "parameter",
        }
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data recorded by one annotation application
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    /// Key the record is stored under
    pub metadata_key: String,
    /// Originating factory
    pub decorator: Decorator,
    /// Placement category of the factory
    pub decorator_type: DecoratorKind,
    /// Slot kind the record is attached to
    pub kind: SlotKind,
    /// Slot name (`"constructor"` for the class itself)
    pub property_key: String,
    /// Normalized arguments
    pub args: Args,
    /// Parameter position, for parameter records only
    pub param_index: Option<usize>,
    /// Declared type of the slot
    pub design_type: Option<TypeDescriptor>,
    /// Parameter types of the slot
    pub design_param: Option<Vec<TypeDescriptor>>,
    /// Return type of the slot
    pub design_return: Option<TypeDescriptor>,
}

/// Value stored under a metadata key
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    /// Record written by an annotation
    Record(Arc<MetadataRecord>),
    /// Raw value (`define_metadata` or a type descriptor)
    Value(Value),
}

impl MetadataValue {
    /// Borrow the record, if this is one
    pub fn as_record(&self) -> Option<&Arc<MetadataRecord>> {
        match self {
            MetadataValue::Record(record) => Some(record),
            MetadataValue::Value(_) => None,
        }
    }

    /// Take the record, if this is one
    pub fn into_record(self) -> Option<Arc<MetadataRecord>> {
        match self {
            MetadataValue::Record(record) => Some(record),
            MetadataValue::Value(_) => None,
        }
    }

    /// Borrow the raw value, if this is one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            MetadataValue::Value(value) => Some(value),
            MetadataValue::Record(_) => None,
        }
    }
}

/// Where a metadata key lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataKeyDescriptor {
    /// Storage target
    pub target: Target,
    /// Slot name (`None` for the class itself)
    pub property_key: Option<String>,
    /// The key
    pub metadata_key: String,
}

/// One entry of a per-target metadata listing
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataEntry {
    /// Type descriptor or raw value
    Value {
        /// The key
        metadata_key: String,
        /// Slot name (`None` for the class itself)
        property_key: Option<String>,
        /// Stored value
        value: Value,
    },
    /// Annotation record
    Record(Arc<MetadataRecord>),
}

impl MetadataEntry {
    /// Key of this entry
    pub fn metadata_key(&self) -> &str {
        match self {
            MetadataEntry::Value { metadata_key, .. } => metadata_key,
            MetadataEntry::Record(record) => &record.metadata_key,
        }
    }

    /// Borrow the record, if this is one
    pub fn as_record(&self) -> Option<&MetadataRecord> {
        match self {
            MetadataEntry::Record(record) => Some(record),
            MetadataEntry::Value { .. } => None,
        }
    }
}
