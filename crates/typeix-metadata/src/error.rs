//! Error types for annotation registration

use crate::class_table::ClassId;
use crate::identity::DecoratorKind;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Failures raised while defining classes or applying annotations
///
/// Lookups never fail; a missing record is reported as `None`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// Annotation that needs an instance member was applied to a static one
    #[error("Decorator can´t be declared on static method/property: {slot}")]
    StaticMember {
        /// Name of the static slot
        slot: String,
    },

    /// Annotation applied to a kind of site it does not support
    #[error("Decorator {decorator} can't be applied to {site}")]
    InvalidSite {
        /// Metadata key of the annotation
        decorator: String,
        /// Description of the rejected site
        site: String,
    },

    /// Factory handed to a creation function of another category
    #[error("Decorator {decorator} is a {actual} decorator, expected {expected}")]
    CategoryMismatch {
        /// Factory label
        decorator: String,
        /// Category required by the creation function
        expected: DecoratorKind,
        /// Category the factory was declared with
        actual: DecoratorKind,
    },

    /// Factory name contains the key separator `:`
    #[error("Invalid decorator name: {0:?}")]
    InvalidDecoratorName(String),

    /// Class handle not registered with the registry
    #[error("Unknown class: {0}")]
    UnknownClass(ClassId),
}
