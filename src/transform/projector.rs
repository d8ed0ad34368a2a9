//! Build the editable tree from catalog templates and a document.

use std::collections::BTreeMap;

use crate::model::{ObjectNode, ObjectTemplate, ProfileTree, ResourceFlag};
use crate::observability::metrics;
use crate::path::ResourcePath;
use crate::profile::ObserveAttr;
use crate::transform::expander::{expand_instances, referenced_instances};

/// Project `observe_attr` onto deep copies of `templates`.
///
/// The document's `keyName` map is pruned to `attribute ∪ telemetry` as a
/// side effect, so stale names never reach the tree or a later flatten.
pub fn project(templates: &[ObjectTemplate], observe_attr: &mut ObserveAttr) -> ProfileTree {
    let mut tree = ProfileTree::new(templates.iter().map(ObjectNode::from_template).collect());
    let mut unresolved = 0usize;

    for (object_key, instance_paths) in referenced_instances(observe_attr) {
        match tree.object_mut(&object_key) {
            Some(object) => {
                expand_instances(object, &instance_paths);
            }
            None => tracing::debug!(object = %object_key, "Instance reference to unknown object"),
        }
    }

    let flag_sources = [
        (&observe_attr.observe, ResourceFlag::Observe),
        (&observe_attr.attribute, ResourceFlag::Attribute),
        (&observe_attr.telemetry, ResourceFlag::Telemetry),
    ];
    for (paths, flag) in flag_sources {
        for path in paths {
            match tree.resource_mut(path) {
                Some(resource) => resource.set_flag(flag, true),
                None => {
                    unresolved += 1;
                    tracing::debug!(path = %path, flag = ?flag, "Skipping unresolved path");
                }
            }
        }
    }

    for (path, overrides) in &observe_attr.attribute_override {
        match tree.resolve_mut(path) {
            Some(node) => node.set_attribute_override(overrides.clone()),
            None => {
                unresolved += 1;
                tracing::debug!(path = %path, "Skipping unresolved attribute override");
            }
        }
    }

    observe_attr.key_name = validate_key_names(observe_attr);
    for (path, key_name) in &observe_attr.key_name {
        match tree.resource_mut(path) {
            Some(resource) => resource.key_name = key_name.clone(),
            None => {
                unresolved += 1;
                tracing::debug!(path = %path, "Skipping unresolved key name");
            }
        }
    }

    tracing::debug!(objects = tree.objects.len(), unresolved, "Projected profile tree");
    metrics::record_projection(tree.objects.len(), unresolved);
    tree
}

/// Key names whose path is attributed or telemetered.
pub fn validate_key_names(observe_attr: &ObserveAttr) -> BTreeMap<ResourcePath, String> {
    let reported = observe_attr.reported_paths();
    observe_attr
        .key_name
        .iter()
        .filter(|(path, _)| reported.contains(path))
        .map(|(path, name)| (path.clone(), name.clone()))
        .collect()
}
