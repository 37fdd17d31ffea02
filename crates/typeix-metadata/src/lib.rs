//! Typeix Metadata
//!
//! Runtime metadata registry for class-level annotations. Setup code
//! declares decorator factories, applies them to classes, properties,
//! methods and parameters, and a dependency-injection container or router
//! later asks what was declared, where, with which arguments, and with what
//! static type.
//!
//! - **Identity** (`identity`): namespaced metadata keys per factory
//! - **Arguments** (`args`): positional or named call arguments
//! - **Factories** (`decorators`): annotation creation and placement rules
//! - **Recorder** (`recorder`): writes records, merging static types
//! - **Queries** (`query`): single lookups, slot listings, inheritance walks
//!
//! # Example
//!
//! ```rust,ignore
//! use typeix_metadata::*;
//!
//! let types = Arc::new(DesignTypeTable::new());
//! let registry = MetadataRegistry::builder().reflector(types.clone()).build();
//!
//! let injectable = Decorator::class("Injectable");
//! let inject = Decorator::mixed("Inject");
//!
//! let repo = registry.define_class("Repo", None)?;
//! let service = registry.define_class("Service", None)?;
//! types.declare_constructor(service, vec![TypeDescriptor::Class(repo)]);
//!
//! create_class_decorator(&injectable, RawArgs::None)?
//!     .apply(&registry, Site::class(service))?;
//! create_parameter_and_property_decorator(&inject, RawArgs::None)?
//!     .apply(&registry, Site::constructor_parameter(service, 0))?;
//!
//! let record = registry.get_parameter_metadata(&inject, service, 0, "constructor");
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Argument normalization
pub mod args;

/// Class registration and inheritance
pub mod class_table;

/// Registry configuration
pub mod config;

/// Annotation factories
pub mod decorators;

/// Error types
pub mod error;

/// Static-member placement check
pub mod guard;

/// Decorator identity and metadata keys
pub mod identity;

/// Query layer
pub mod query;

/// Records and query results
pub mod record;

/// Metadata recorder
pub mod recorder;

/// Registry owning classes, storage and reflection
pub mod registry;

/// Compiler-emitted type descriptors
pub mod reflection;

/// Declaration sites and query slots
pub mod site;

/// Key/value attachment storage
pub mod store;

/// Dynamic values
pub mod value;

pub use args::{normalize, Args, RawArgs};
pub use class_table::{ClassId, ClassInfo, ClassTable, Target};
pub use config::{ConfigError, RegistryConfig};
pub use decorators::{
    create_class_decorator, create_method_decorator, create_parameter_and_property_decorator,
    create_parameter_decorator, create_property_decorator, Annotation,
};
pub use error::{MetadataError, Result};
pub use guard::assert_instance_member;
pub use identity::{decorator_id, Decorator, DecoratorKind, DEFAULT_NAMESPACE};
pub use record::{MetadataEntry, MetadataKeyDescriptor, MetadataRecord, MetadataValue, SlotKind};
pub use registry::{global, global_design_types, MetadataRegistry, MetadataRegistryBuilder};
pub use reflection::{
    DesignTypeTable, NoReflection, StaticType, TypeDescriptor, TypeReflector, DESIGN_PARAM_TYPES,
    DESIGN_RETURN_TYPE, DESIGN_TYPE,
};
pub use site::{Site, Slot, CONSTRUCTOR_SLOT};
pub use store::{InMemoryStore, MetadataStore};
pub use value::Value;
