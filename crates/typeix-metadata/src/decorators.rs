//! Annotation Factories
//!
//! `create_*_decorator` turns a factory handle and its call-time arguments
//! into an [`Annotation`]. Setup code then applies the annotation to a
//! declaration site right after declaring it:
//!
//! ```rust,ignore
//! let inject = Decorator::mixed("Inject");
//! let annotation = create_parameter_and_property_decorator(
//!     &inject,
//!     RawArgs::named([("token", Value::Type(TypeDescriptor::Class(repo)))]),
//! )?;
//! annotation.apply(&registry, Site::constructor_parameter(service, 0))?;
//! ```
//!
//! | Factory  | Accepted sites            | Recorded kind                    |
//! |----------|---------------------------|----------------------------------|
//! | class    | class                     | `constructor`                    |
//! | property | instance property         | `property`                       |
//! | method   | instance / static method  | `method` / `static`              |
//! | parameter| constructor / method param| `parameter`                      |
//! | mixed    | property or parameter     | `property` / `parameter`         |

use std::sync::Arc;

use crate::args::{normalize, Args, RawArgs};
use crate::error::{MetadataError, Result};
use crate::guard::assert_instance_member;
use crate::identity::{Decorator, DecoratorKind};
use crate::record::{MetadataRecord, SlotKind};
use crate::registry::MetadataRegistry;
use crate::site::Site;

/// A factory call, ready to be applied to a site
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    decorator: Decorator,
    args: Args,
}

impl Annotation {
    /// Originating factory
    pub fn decorator(&self) -> &Decorator {
        &self.decorator
    }

    /// Normalized arguments
    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Placement category
    pub fn kind(&self) -> DecoratorKind {
        self.decorator.kind()
    }

    /// Apply to `site`, recording metadata in `registry`
    pub fn apply(&self, registry: &MetadataRegistry, site: Site) -> Result<Arc<MetadataRecord>> {
        registry.apply(self, site)
    }

    /// Validate `site` for this annotation and compute the recorded kind
    ///
    /// The static-member check happens here, before anything is written.
    pub(crate) fn placement(&self, site: &Site) -> Option<Result<SlotKind>> {
        let kind = match (self.kind(), site) {
            (DecoratorKind::Constructor, Site::Class(_)) => Ok(SlotKind::Constructor),
            (DecoratorKind::Property | DecoratorKind::Mixed, Site::Property { .. }) => {
                assert_instance_member(site).map(|_| SlotKind::Property)
            }
            (DecoratorKind::Method, Site::Method { .. }) => Ok(if site.is_static() {
                SlotKind::Static
            } else {
                SlotKind::Method
            }),
            (DecoratorKind::Parameter | DecoratorKind::Mixed, Site::Parameter { .. }) => {
                assert_instance_member(site).map(|_| SlotKind::Parameter)
            }
            _ => return None,
        };
        Some(kind)
    }
}

fn create(decorator: &Decorator, expected: DecoratorKind, args: RawArgs) -> Result<Annotation> {
    if let Some(name) = decorator.name().filter(|name| name.contains(':')) {
        return Err(MetadataError::InvalidDecoratorName(name.to_string()));
    }
    if decorator.kind() != expected {
        return Err(MetadataError::CategoryMismatch {
            decorator: decorator.label().to_string(),
            expected,
            actual: decorator.kind(),
        });
    }
    Ok(Annotation {
        decorator: decorator.clone(),
        args: normalize(args),
    })
}

/// Annotation for class declarations
pub fn create_class_decorator(decorator: &Decorator, args: impl Into<RawArgs>) -> Result<Annotation> {
    create(decorator, DecoratorKind::Constructor, args.into())
}

/// Annotation for instance properties
pub fn create_property_decorator(decorator: &Decorator, args: impl Into<RawArgs>) -> Result<Annotation> {
    create(decorator, DecoratorKind::Property, args.into())
}

/// Annotation for instance and static methods
pub fn create_method_decorator(decorator: &Decorator, args: impl Into<RawArgs>) -> Result<Annotation> {
    create(decorator, DecoratorKind::Method, args.into())
}

/// Annotation for constructor and method parameters
pub fn create_parameter_decorator(decorator: &Decorator, args: impl Into<RawArgs>) -> Result<Annotation> {
    create(decorator, DecoratorKind::Parameter, args.into())
}

/// Annotation usable on both properties and parameters
pub fn create_parameter_and_property_decorator(
    decorator: &Decorator,
    args: impl Into<RawArgs>,
) -> Result<Annotation> {
    create(decorator, DecoratorKind::Mixed, args.into())
}
