//! Metadata Recorder
//!
//! Assembles a [`MetadataRecord`] for an annotation application and writes
//! it to the store. Compiler-emitted descriptors for the same (target, slot)
//! are copied onto the record when the reflector has them:
//!
//! | Slot                    | Copied descriptors                      |
//! |-------------------------|-----------------------------------------|
//! | class-level             | parameter types                         |
//! | property / method       | declared type, parameter types, return  |
//!
//! A missing descriptor leaves its field unset.

use std::sync::Arc;

use tracing::debug;

use crate::args::Args;
use crate::identity::Decorator;
use crate::record::{MetadataRecord, MetadataValue, SlotKind};
use crate::reflection::TypeReflector;
use crate::site::Site;
use crate::store::MetadataStore;

/// Caller-supplied part of a record
#[derive(Debug, Clone)]
pub struct RecordBase {
    /// Originating factory
    pub decorator: Decorator,
    /// Normalized arguments
    pub args: Args,
    /// Slot kind computed for the site
    pub kind: SlotKind,
}

/// Write the record for `site` under `metadata_key`
///
/// Replaces any record already stored under the same key on the same
/// target and slot.
pub fn record(
    store: &mut dyn MetadataStore,
    reflector: &dyn TypeReflector,
    site: &Site,
    metadata_key: String,
    base: RecordBase,
) -> Arc<MetadataRecord> {
    let target = site.target();
    let slot = site.slot_name();

    let mut record = MetadataRecord {
        metadata_key,
        decorator_type: base.decorator.kind(),
        decorator: base.decorator,
        kind: base.kind,
        property_key: site.property_key().to_string(),
        args: base.args,
        param_index: site.param_index(),
        design_type: None,
        design_param: None,
        design_return: None,
    };

    if let Some(types) = reflector.lookup_static_type(target, slot) {
        record.design_param = types.param_types;
        if slot.is_some() {
            record.design_type = types.design_type;
            record.design_return = types.return_type;
        }
    }

    let record = Arc::new(record);
    debug!(
        %target,
        slot = site.property_key(),
        key = %record.metadata_key,
        kind = %record.kind,
        "recorded annotation"
    );
    store.define(
        target,
        slot,
        &record.metadata_key,
        MetadataValue::Record(Arc::clone(&record)),
    );
    record
}
