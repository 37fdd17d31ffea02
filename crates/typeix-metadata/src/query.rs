//! Query Layer
//!
//! Read-only views over recorded metadata. Three families:
//!
//! - raw access (`get_metadata`, `get_own_metadata_keys`, ...) by key,
//!   target and slot. `own` variants read one target; the others walk the
//!   ancestor list, prototype to prototype or class object to class object.
//! - per-factory lookups (`get_class_metadata`, `get_parameter_metadata`,
//!   ...) that derive the key and return the single matching record.
//! - listings (`get_metadata_for_target`, `get_all_metadata_for_target`)
//!   that enumerate a slot, or every slot across the inheritance chain.
//!
//! Within one slot, listings emit compiler descriptors first (declared type,
//! parameter types, return type), then records newest first. Misses are
//! `None` or empty, never errors.

use std::sync::Arc;

use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::class_table::{ClassId, Target};
use crate::identity::{matches_decorator_id, Decorator};
use crate::record::{MetadataEntry, MetadataKeyDescriptor, MetadataRecord, MetadataValue};
use crate::registry::MetadataRegistry;
use crate::site::Slot;
use crate::store::MetadataStore;

impl MetadataRegistry {
    fn targets_up(&self, target: Target) -> Vec<Target> {
        self.lineage(target.class_id())
            .into_iter()
            .map(|id| target.with_class(id))
            .collect()
    }

    fn own_value(
        &self,
        store: &dyn MetadataStore,
        key: &str,
        target: Target,
        slot: Option<&str>,
    ) -> Option<MetadataValue> {
        store.get_own(target, slot, key).or_else(|| {
            self.reflector
                .lookup_static_type(target, slot)?
                .get(key)
                .map(MetadataValue::Value)
        })
    }

    fn own_keys(&self, store: &dyn MetadataStore, target: Target, slot: Option<&str>) -> Vec<String> {
        let mut keys: IndexSet<String> = self
            .reflector
            .lookup_static_type(target, slot)
            .map(|types| types.keys().into_iter().map(str::to_string).collect())
            .unwrap_or_default();
        keys.extend(store.own_keys(target, slot));
        keys.into_iter().collect()
    }

    /// Keys and values of one slot: descriptors, then newest record first
    fn slot_listing(
        &self,
        store: &dyn MetadataStore,
        target: Target,
        slot: Option<&str>,
    ) -> Vec<(String, MetadataValue)> {
        let mut listing: Vec<(String, MetadataValue)> = Vec::new();

        if let Some(types) = self.reflector.lookup_static_type(target, slot) {
            for (key, value) in types.entries() {
                let value = store
                    .get_own(target, slot, key)
                    .unwrap_or(MetadataValue::Value(value));
                listing.push((key.to_string(), value));
            }
        }

        for key in store.own_keys(target, slot).into_iter().rev() {
            if listing.iter().any(|(listed, _)| *listed == key) {
                continue;
            }
            if let Some(value) = store.get_own(target, slot, &key) {
                listing.push((key, value));
            }
        }
        listing
    }

    /// Every slot to list for `class`, attributed to the level declaring it
    fn inherited_slots(&self, store: &dyn MetadataStore, class: ClassId) -> Vec<(ClassId, Slot)> {
        let mut seen: FxHashSet<Slot> = FxHashSet::default();
        let mut slots = Vec::new();

        for level in self.lineage(class) {
            slots.push((level, Slot::Constructor));
            let instance = store
                .slots(Target::Prototype(level))
                .into_iter()
                .map(Slot::Instance);
            let statics = store
                .slots(Target::Constructor(level))
                .into_iter()
                .map(Slot::Static);
            for slot in instance.chain(statics) {
                if seen.insert(slot.clone()) {
                    slots.push((level, slot));
                }
            }
        }
        trace!(%class, slots = slots.len(), "walked inheritance chain");
        slots
    }

    fn own_record(&self, key: &str, target: Target, slot: Option<&str>) -> Option<Arc<MetadataRecord>> {
        self.store.read().get_own(target, slot, key)?.into_record()
    }

    fn decorator_on(
        &self,
        store: &dyn MetadataStore,
        base_id: &str,
        target: Target,
        slot: Option<&str>,
    ) -> bool {
        store
            .own_keys(target, slot)
            .iter()
            .any(|key| matches_decorator_id(key, base_id))
    }

    // ========================================================================
    // Raw access
    // ========================================================================

    /// Value under `key` on exactly this target and slot
    pub fn get_own_metadata(&self, key: &str, target: Target, slot: Option<&str>) -> Option<MetadataValue> {
        let store = self.store.read();
        self.own_value(&**store, key, target, slot)
    }

    /// Value under `key`, searching ancestors when the target has none
    pub fn get_metadata(&self, key: &str, target: Target, slot: Option<&str>) -> Option<MetadataValue> {
        let store = self.store.read();
        self.targets_up(target)
            .into_iter()
            .find_map(|t| self.own_value(&**store, key, t, slot))
    }

    /// Check for `key` on exactly this target and slot
    pub fn has_own_metadata(&self, key: &str, target: Target, slot: Option<&str>) -> bool {
        self.get_own_metadata(key, target, slot).is_some()
    }

    /// Check for `key` on the target or any ancestor
    pub fn has_metadata(&self, key: &str, target: Target, slot: Option<&str>) -> bool {
        self.get_metadata(key, target, slot).is_some()
    }

    /// Keys on exactly this target and slot: descriptors, then write order
    pub fn get_own_metadata_keys(&self, target: Target, slot: Option<&str>) -> Vec<String> {
        let store = self.store.read();
        self.own_keys(&**store, target, slot)
    }

    /// Keys on the target followed by keys only found on ancestors
    pub fn get_metadata_keys(&self, target: Target, slot: Option<&str>) -> Vec<String> {
        let store = self.store.read();
        let mut keys: IndexSet<String> = IndexSet::new();
        for t in self.targets_up(target) {
            keys.extend(self.own_keys(&**store, t, slot));
        }
        keys.into_iter().collect()
    }

    /// Check whether this target and slot carry any key
    pub fn has_own_metadata_keys(&self, target: Target, slot: Option<&str>) -> bool {
        !self.get_own_metadata_keys(target, slot).is_empty()
    }

    /// Check whether the target or an ancestor carries any key on this slot
    pub fn has_metadata_keys(&self, target: Target, slot: Option<&str>) -> bool {
        !self.get_metadata_keys(target, slot).is_empty()
    }

    // ========================================================================
    // Per-factory lookups
    // ========================================================================

    /// Check for a record of `decorator` (any parameter index) on the slot
    pub fn has_own_decorator(&self, decorator: &Decorator, class: ClassId, slot: impl Into<Slot>) -> bool {
        let slot = slot.into();
        let (target, name) = slot.locate(class);
        let base_id = self.get_decorator_id(decorator, None);
        let store = self.store.read();
        self.decorator_on(&**store, &base_id, target, name)
    }

    /// Like [`MetadataRegistry::has_own_decorator`], also searching ancestors
    pub fn has_decorator(&self, decorator: &Decorator, class: ClassId, slot: impl Into<Slot>) -> bool {
        let slot = slot.into();
        let (target, name) = slot.locate(class);
        let base_id = self.get_decorator_id(decorator, None);
        let store = self.store.read();
        self.targets_up(target)
            .into_iter()
            .any(|t| self.decorator_on(&**store, &base_id, t, name))
    }

    /// Record of a class annotation
    pub fn get_class_metadata(&self, decorator: &Decorator, class: ClassId) -> Option<Arc<MetadataRecord>> {
        let key = self.get_decorator_id(decorator, None);
        self.own_record(&key, Target::Constructor(class), None)
    }

    /// Record of a property annotation
    pub fn get_property_metadata(
        &self,
        decorator: &Decorator,
        class: ClassId,
        name: &str,
        is_static: bool,
    ) -> Option<Arc<MetadataRecord>> {
        let key = self.get_decorator_id(decorator, None);
        let slot = Slot::member(name, is_static);
        let (target, name) = slot.locate(class);
        self.own_record(&key, target, name)
    }

    /// Record of a method annotation
    pub fn get_method_metadata(
        &self,
        decorator: &Decorator,
        class: ClassId,
        name: &str,
        is_static: bool,
    ) -> Option<Arc<MetadataRecord>> {
        self.get_property_metadata(decorator, class, name, is_static)
    }

    /// Record of a parameter annotation; `method` is `"constructor"` for
    /// constructor parameters
    pub fn get_parameter_metadata(
        &self,
        decorator: &Decorator,
        class: ClassId,
        index: usize,
        method: &str,
    ) -> Option<Arc<MetadataRecord>> {
        let key = self.get_decorator_id(decorator, Some(index));
        let slot = Slot::from(method);
        let (target, name) = slot.locate(class);
        self.own_record(&key, target, name)
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Keys owned by one slot of `class`
    pub fn get_metadata_keys_for_target(
        &self,
        class: ClassId,
        slot: impl Into<Slot>,
    ) -> Vec<MetadataKeyDescriptor> {
        let slot = slot.into();
        let store = self.store.read();
        self.keys_for_slot(&**store, class, &slot)
    }

    /// Entries owned by one slot of `class`
    pub fn get_metadata_for_target(&self, class: ClassId, slot: impl Into<Slot>) -> Vec<MetadataEntry> {
        let slot = slot.into();
        let store = self.store.read();
        self.entries_for_slot(&**store, class, &slot)
    }

    /// Keys of every slot of `class` and its ancestors, most-derived first
    pub fn get_all_metadata_keys_for_target(&self, class: ClassId) -> Vec<MetadataKeyDescriptor> {
        let store = self.store.read();
        self.inherited_slots(&**store, class)
            .into_iter()
            .flat_map(|(level, slot)| self.keys_for_slot(&**store, level, &slot))
            .collect()
    }

    /// Entries of every slot of `class` and its ancestors, most-derived first
    pub fn get_all_metadata_for_target(&self, class: ClassId) -> Vec<MetadataEntry> {
        let store = self.store.read();
        self.inherited_slots(&**store, class)
            .into_iter()
            .flat_map(|(level, slot)| self.entries_for_slot(&**store, level, &slot))
            .collect()
    }

    fn keys_for_slot(&self, store: &dyn MetadataStore, class: ClassId, slot: &Slot) -> Vec<MetadataKeyDescriptor> {
        let (target, name) = slot.locate(class);
        self.slot_listing(store, target, name)
            .into_iter()
            .map(|(metadata_key, _)| MetadataKeyDescriptor {
                target,
                property_key: name.map(str::to_string),
                metadata_key,
            })
            .collect()
    }

    fn entries_for_slot(&self, store: &dyn MetadataStore, class: ClassId, slot: &Slot) -> Vec<MetadataEntry> {
        let (target, name) = slot.locate(class);
        self.slot_listing(store, target, name)
            .into_iter()
            .map(|(metadata_key, value)| match value {
                MetadataValue::Record(record) => MetadataEntry::Record(record),
                MetadataValue::Value(value) => MetadataEntry::Value {
                    metadata_key,
                    property_key: name.map(str::to_string),
                    value,
                },
            })
            .collect()
    }
}
