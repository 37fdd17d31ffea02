//! Metadata Storage
//!
//! Key/value attachment service behind the registry. Metadata is attached
//! to a [`Target`], either directly (the class-level slot) or to a named
//! slot on it. Keys keep their first-write position; writing an existing key
//! replaces the value in place.
//!
//! The registry talks to storage only through [`MetadataStore`], so hosts
//! can swap [`InMemoryStore`] for their own attachment mechanism.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::class_table::Target;
use crate::record::MetadataValue;

/// Per-target key/value storage
pub trait MetadataStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value
    fn define(&mut self, target: Target, slot: Option<&str>, key: &str, value: MetadataValue);

    /// Read the value under `key` on exactly this target and slot
    fn get_own(&self, target: Target, slot: Option<&str>, key: &str) -> Option<MetadataValue>;

    /// Check for `key` on exactly this target and slot
    fn has_own(&self, target: Target, slot: Option<&str>, key: &str) -> bool {
        self.get_own(target, slot, key).is_some()
    }

    /// Keys on this target and slot, in first-write order
    fn own_keys(&self, target: Target, slot: Option<&str>) -> Vec<String>;

    /// Named slots carrying metadata on this target, in first-write order
    fn slots(&self, target: Target) -> Vec<String>;
}

/// Metadata storage for a single target
#[derive(Debug, Default)]
struct TargetMetadata {
    /// Direct metadata on the target (key -> value)
    direct: IndexMap<String, MetadataValue>,
    /// Slot-level metadata (slot -> key -> value)
    properties: IndexMap<String, IndexMap<String, MetadataValue>>,
}

impl TargetMetadata {
    fn entries(&self, slot: Option<&str>) -> Option<&IndexMap<String, MetadataValue>> {
        match slot {
            Some(name) => self.properties.get(name),
            None => Some(&self.direct),
        }
    }
}

/// Default in-process store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Map from target to its metadata
    targets: FxHashMap<Target, TargetMetadata>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total number of targets with metadata
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    fn entries(&self, target: Target, slot: Option<&str>) -> Option<&IndexMap<String, MetadataValue>> {
        self.targets.get(&target)?.entries(slot)
    }
}

impl MetadataStore for InMemoryStore {
    fn define(&mut self, target: Target, slot: Option<&str>, key: &str, value: MetadataValue) {
        let entry = self.targets.entry(target).or_default();
        let entries = match slot {
            Some(name) => entry.properties.entry(name.to_string()).or_default(),
            None => &mut entry.direct,
        };
        entries.insert(key.to_string(), value);
    }

    fn get_own(&self, target: Target, slot: Option<&str>, key: &str) -> Option<MetadataValue> {
        self.entries(target, slot)?.get(key).cloned()
    }

    fn has_own(&self, target: Target, slot: Option<&str>, key: &str) -> bool {
        self.entries(target, slot)
            .is_some_and(|entries| entries.contains_key(key))
    }

    fn own_keys(&self, target: Target, slot: Option<&str>) -> Vec<String> {
        self.entries(target, slot)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn slots(&self, target: Target) -> Vec<String> {
        self.targets
            .get(&target)
            .map(|entry| entry.properties.keys().cloned().collect())
            .unwrap_or_default()
    }
}
