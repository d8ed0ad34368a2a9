//! Instance synthesis.
//!
//! Catalog templates carry a single instance with id 0. When the document
//! attributes or telemeters resources of other instances, those instances
//! are cloned from instance 0 and given derived default key names.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::naming::instance_key_name;
use crate::model::ObjectNode;
use crate::path::ResourcePath;
use crate::profile::ObserveAttr;

/// Template instance every synthesized instance is cloned from.
pub const DEFAULT_INSTANCE_ID: u16 = 0;

/// Non-zero instance paths referenced by `attribute ∪ telemetry`, per object key.
///
/// Observe-only references do not trigger expansion.
pub fn referenced_instances(observe_attr: &ObserveAttr) -> BTreeMap<String, BTreeSet<ResourcePath>> {
    let mut referenced: BTreeMap<String, BTreeSet<ResourcePath>> = BTreeMap::new();
    for path in observe_attr.attribute.iter().chain(observe_attr.telemetry.iter()) {
        let Some(instance_path) = path.instance_path() else {
            continue;
        };
        if instance_path.instance_id() == Some(DEFAULT_INSTANCE_ID) {
            continue;
        }
        referenced
            .entry(path.object_key().to_string())
            .or_default()
            .insert(instance_path);
    }
    referenced
}

/// Append one synthesized instance per referenced id to `object`.
///
/// Ids already present are left alone. Returns the number of instances added.
pub fn expand_instances(object: &mut ObjectNode, instance_paths: &BTreeSet<ResourcePath>) -> usize {
    let Some(template) = object.instance(DEFAULT_INSTANCE_ID).cloned() else {
        tracing::debug!(object = %object.key_id, "No default instance to expand from");
        return 0;
    };

    let mut added = 0;
    // BTreeSet iteration is already natural path order
    for path in instance_paths {
        let Some(instance_id) = path.instance_id() else {
            continue;
        };
        if !path.belongs_to(&object.key_id)
            || instance_id == DEFAULT_INSTANCE_ID
            || object.instance(instance_id).is_some()
        {
            continue;
        }

        let mut instance = template.clone_with_id(instance_id);
        for resource in &mut instance.resources {
            resource.key_name = instance_key_name(&resource.name, instance_id);
        }
        object.instances.push(instance);
        added += 1;
    }

    if added > 0 {
        tracing::debug!(object = %object.key_id, added, "Synthesized object instances");
    }
    added
}
