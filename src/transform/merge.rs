//! Adding newly fetched templates to an existing tree.

use crate::model::{ObjectNode, ObjectTemplate, ProfileTree};
use crate::path;

/// Append deep copies of templates not yet in the tree.
///
/// Existing nodes, including their flags and overrides, are not touched.
/// The tree is re-ordered by object id, key as tie-breaker. Returns the
/// number of objects added.
pub fn add_objects(tree: &mut ProfileTree, templates: &[ObjectTemplate]) -> usize {
    let mut added = 0;
    for template in templates {
        if tree.contains(&template.key_id) {
            tracing::debug!(object = %template.key_id, "Object already in tree");
            continue;
        }
        tree.objects.push(ObjectNode::from_template(template));
        added += 1;
    }

    tree.objects
        .sort_by(|a, b| a.id.cmp(&b.id).then_with(|| path::compare(&a.key_id, &b.key_id)));
    tracing::debug!(added, total = tree.objects.len(), "Merged catalog objects into tree");
    added
}
