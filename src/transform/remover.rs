//! Object removal with reference purging.

use crate::model::ProfileTree;
use crate::observability::metrics;
use crate::profile::ObserveAttr;

/// What a removal touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    /// The object node was present in the tree.
    pub node_removed: bool,
    /// Entries dropped across the five path-keyed fields.
    pub purged_entries: usize,
}

/// Remove `object_key` from the tree and purge every path under it.
///
/// Matching is by object-key segment, so removing `3` leaves `/30/0/1` alone.
pub fn remove_object(
    tree: &mut ProfileTree,
    observe_attr: &mut ObserveAttr,
    object_key: &str,
) -> RemovalSummary {
    let before = tree.objects.len();
    tree.objects.retain(|object| object.key_id != object_key);
    let node_removed = tree.objects.len() != before;

    let mut purged_entries = 0;
    for paths in [
        &mut observe_attr.observe,
        &mut observe_attr.attribute,
        &mut observe_attr.telemetry,
    ] {
        let len = paths.len();
        paths.retain(|path| !path.belongs_to(object_key));
        purged_entries += len - paths.len();
    }

    let len = observe_attr.key_name.len();
    observe_attr.key_name.retain(|path, _| !path.belongs_to(object_key));
    purged_entries += len - observe_attr.key_name.len();

    let len = observe_attr.attribute_override.len();
    observe_attr
        .attribute_override
        .retain(|path, _| !path.belongs_to(object_key));
    purged_entries += len - observe_attr.attribute_override.len();

    tracing::info!(object = %object_key, node_removed, purged_entries, "Removed object from profile");
    metrics::record_object_removed();

    RemovalSummary {
        node_removed,
        purged_entries,
    }
}
