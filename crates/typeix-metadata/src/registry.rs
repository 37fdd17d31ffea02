//! Metadata Registry
//!
//! Owns the class table and the injected store and reflector. Annotation
//! application writes through here at definition time; the query methods in
//! [`crate::query`] read the accumulated state afterwards.

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::warn;

use crate::class_table::{ClassId, ClassInfo, ClassTable, Target};
use crate::config::RegistryConfig;
use crate::decorators::Annotation;
use crate::error::{MetadataError, Result};
use crate::identity::{decorator_id, Decorator};
use crate::record::{MetadataRecord, MetadataValue};
use crate::recorder::{self, RecordBase};
use crate::reflection::{DesignTypeTable, NoReflection, TypeReflector};
use crate::site::{Site, CONSTRUCTOR_SLOT};
use crate::store::{InMemoryStore, MetadataStore};
use crate::value::Value;

/// Registry of annotation metadata
pub struct MetadataRegistry {
    config: RegistryConfig,
    classes: RwLock<ClassTable>,
    pub(crate) store: RwLock<Box<dyn MetadataStore>>,
    pub(crate) reflector: Arc<dyn TypeReflector>,
}

impl MetadataRegistry {
    /// Registry with default configuration, in-memory storage and no type
    /// reflection
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Start configuring a registry
    pub fn builder() -> MetadataRegistryBuilder {
        MetadataRegistryBuilder::default()
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Namespace prefixing every derived key
    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    /// Register a class, resolving its ancestors
    pub fn define_class(&self, name: &str, parent: Option<ClassId>) -> Result<ClassId> {
        self.classes.write().define(name, parent)
    }

    /// Get a registered class
    pub fn class(&self, id: ClassId) -> Option<ClassInfo> {
        self.classes.read().get(id).cloned()
    }

    /// Get the most recently registered class with this name
    pub fn class_by_name(&self, name: &str) -> Option<ClassInfo> {
        self.classes.read().get_by_name(name).cloned()
    }

    /// The class and its ancestors, most-derived first
    pub fn lineage(&self, class: ClassId) -> Vec<ClassId> {
        self.classes.read().lineage(class)
    }

    /// Metadata key for a factory, optionally scoped to a parameter
    pub fn get_decorator_id(&self, decorator: &Decorator, param_index: Option<usize>) -> String {
        decorator_id(&self.config.namespace, decorator, param_index)
    }

    /// Apply an annotation to a declaration site
    ///
    /// Fails without writing anything when the site is static and the
    /// annotation needs an instance member, when the annotation does not
    /// accept this kind of site, or when a member is named `constructor`.
    pub fn apply(&self, annotation: &Annotation, site: Site) -> Result<Arc<MetadataRecord>> {
        let class = site.class_id();
        if !self.classes.read().contains(class) {
            return Err(MetadataError::UnknownClass(class));
        }

        // "constructor" is reserved for the class-level slot
        if site.slot_name() == Some(CONSTRUCTOR_SLOT) {
            return Err(self.invalid_site(annotation, &site));
        }

        let kind = match annotation.placement(&site) {
            Some(kind) => kind?,
            None => return Err(self.invalid_site(annotation, &site)),
        };

        let key = self.get_decorator_id(annotation.decorator(), site.param_index());
        let base = RecordBase {
            decorator: annotation.decorator().clone(),
            args: annotation.args().clone(),
            kind,
        };

        let mut store = self.store.write();
        Ok(recorder::record(
            &mut **store,
            self.reflector.as_ref(),
            &site,
            key,
            base,
        ))
    }

    fn invalid_site(&self, annotation: &Annotation, site: &Site) -> MetadataError {
        MetadataError::InvalidSite {
            decorator: self.get_decorator_id(annotation.decorator(), None),
            site: site.to_string(),
        }
    }

    /// Attach a raw value under `key`
    pub fn define_metadata(&self, key: &str, value: Value, target: Target, slot: Option<&str>) {
        self.store
            .write()
            .define(target, slot, key, MetadataValue::Value(value));
    }
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`MetadataRegistry`]
#[derive(Default)]
pub struct MetadataRegistryBuilder {
    config: RegistryConfig,
    store: Option<Box<dyn MetadataStore>>,
    reflector: Option<Arc<dyn TypeReflector>>,
}

impl MetadataRegistryBuilder {
    /// Use this configuration
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this store instead of [`InMemoryStore`]
    pub fn store(mut self, store: impl MetadataStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Read compiler-emitted descriptors from this reflector
    pub fn reflector(mut self, reflector: Arc<dyn TypeReflector>) -> Self {
        self.reflector = Some(reflector);
        self
    }

    /// Build the registry
    pub fn build(self) -> MetadataRegistry {
        MetadataRegistry {
            config: self.config,
            classes: RwLock::new(ClassTable::new()),
            store: RwLock::new(self.store.unwrap_or_else(|| Box::new(InMemoryStore::new()))),
            reflector: self.reflector.unwrap_or_else(|| Arc::new(NoReflection)),
        }
    }
}

static GLOBAL_DESIGN_TYPES: Lazy<Arc<DesignTypeTable>> =
    Lazy::new(|| Arc::new(DesignTypeTable::new()));

static GLOBAL_REGISTRY: Lazy<MetadataRegistry> = Lazy::new(|| {
    let config = RegistryConfig::from_env().unwrap_or_else(|err| {
        warn!(%err, "falling back to default registry configuration");
        RegistryConfig::default()
    });
    let types: Arc<DesignTypeTable> = Arc::clone(&GLOBAL_DESIGN_TYPES);
    MetadataRegistry::builder()
        .config(config)
        .reflector(types)
        .build()
});

/// Process-wide registry, configured from the environment on first use
pub fn global() -> &'static MetadataRegistry {
    &GLOBAL_REGISTRY
}

/// Type table read by the [`global`] registry
pub fn global_design_types() -> &'static DesignTypeTable {
    &GLOBAL_DESIGN_TYPES
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::RawArgs;
    use crate::config::RegistryConfig;
    use crate::decorators::{create_class_decorator, create_property_decorator};

    #[test]
    fn test_apply_unknown_class() {
        let registry = MetadataRegistry::new();
        let injectable = Decorator::class("Injectable");
        let annotation = create_class_decorator(&injectable, RawArgs::None).unwrap();

        assert_eq!(
            annotation.apply(&registry, Site::class(ClassId(4))),
            Err(MetadataError::UnknownClass(ClassId(4)))
        );
    }

    #[test]
    fn test_apply_invalid_site() {
        let registry = MetadataRegistry::new();
        let class = registry.define_class("Service", None).unwrap();
        let injectable = Decorator::class("Injectable");
        let annotation = create_class_decorator(&injectable, RawArgs::None).unwrap();

        let err = annotation
            .apply(&registry, Site::property(class, "name"))
            .unwrap_err();
        assert_eq!(
            err,
            MetadataError::InvalidSite {
                decorator: "@typeix:constructor:Injectable".to_string(),
                site: "property name".to_string(),
            }
        );
        assert!(registry
            .get_own_metadata_keys(Target::Prototype(class), Some("name"))
            .is_empty());
    }

    #[test]
    fn test_configured_namespace() {
        let registry = MetadataRegistry::builder()
            .config(RegistryConfig::with_namespace("@app").unwrap())
            .build();
        let column = Decorator::property("Column");

        assert_eq!(registry.namespace(), "@app");
        assert_eq!(registry.config(), &RegistryConfig::with_namespace("@app").unwrap());
        assert_eq!(registry.get_decorator_id(&column, None), "@app:property:Column");
    }

    #[test]
    fn test_class_lookup() {
        let registry = MetadataRegistry::new();
        let base = registry.define_class("Base", None).unwrap();
        let derived = registry.define_class("Derived", Some(base)).unwrap();

        let info = registry.class_by_name("Derived").unwrap();
        assert_eq!(info.id, derived);
        assert_eq!(info.parent, Some(base));
        assert_eq!(registry.class(base).unwrap().name, "Base");
        assert!(registry.class_by_name("Missing").is_none());
        assert_eq!(registry.lineage(derived), vec![derived, base]);
    }

    #[test]
    fn test_rejected_static_leaves_nothing() {
        let registry = MetadataRegistry::new();
        let class = registry.define_class("Service", None).unwrap();
        let column = Decorator::property("Column");
        let annotation = create_property_decorator(&column, RawArgs::None).unwrap();

        assert!(annotation
            .apply(&registry, Site::static_property(class, "table"))
            .is_err());
        assert!(registry
            .get_own_metadata_keys(Target::Constructor(class), Some("table"))
            .is_empty());
    }

    #[test]
    fn test_global_registry_is_shared() {
        assert!(std::ptr::eq(global(), global()));
        assert!(!global().namespace().is_empty());
    }
}
