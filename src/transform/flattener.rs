//! Rebuild the path-keyed document fields from an edited tree.

use crate::model::attributes::non_empty;
use crate::model::ProfileTree;
use crate::observability::metrics;
use crate::path::ResourcePath;
use crate::profile::{ConfigDocument, ObserveAttr};

/// Walk the tree and produce the five path-keyed fields in canonical order.
///
/// - Object and instance overrides are kept whenever non-empty
/// - Paths, key names and resource overrides are emitted only for attributed
///   or telemetered resources; `observe` alone does not make a resource
///   persistent, so flattening a projected tree again yields the same fields
pub fn flatten(tree: &ProfileTree) -> ObserveAttr {
    let mut flat = ObserveAttr::default();

    for object in &tree.objects {
        if let Some(overrides) = non_empty(&object.attribute_override) {
            flat.attribute_override.insert(object.path(), overrides.clone());
        }

        for instance in &object.instances {
            if let Some(overrides) = non_empty(&instance.attribute_override) {
                flat.attribute_override.insert(
                    ResourcePath::instance(object.key_id.clone(), instance.id),
                    overrides.clone(),
                );
            }

            for resource in &instance.resources {
                let path = ResourcePath::resource(object.key_id.clone(), instance.id, resource.id);

                if !resource.is_reported() {
                    continue;
                }
                if let Some(overrides) = non_empty(&resource.attribute_override) {
                    flat.attribute_override.insert(path.clone(), overrides.clone());
                }
                if resource.observe {
                    flat.observe.push(path.clone());
                }
                if resource.attribute {
                    flat.attribute.push(path.clone());
                }
                if resource.telemetry {
                    flat.telemetry.push(path.clone());
                }
                flat.key_name.insert(path, resource.key_name.clone());
            }
        }
    }

    flat.canonicalize();
    metrics::record_flatten(flat.attribute.len(), flat.telemetry.len());
    flat
}

/// Replace the document's path-keyed fields with the flattened tree.
///
/// Client and bootstrap settings, and fields of `observeAttr` the tree does
/// not manage, are left untouched.
pub fn flatten_into(tree: &ProfileTree, document: &mut ConfigDocument) {
    let extra = std::mem::take(&mut document.observe_attr.extra);
    document.observe_attr = flatten(tree);
    document.observe_attr.extra = extra;
    tracing::debug!(
        observe = document.observe_attr.observe.len(),
        attribute = document.observe_attr.attribute.len(),
        telemetry = document.observe_attr.telemetry.len(),
        overrides = document.observe_attr.attribute_override.len(),
        "Flattened profile tree"
    );
}
