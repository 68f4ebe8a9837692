//! Conjunctive visibility over the DAG

use std::collections::HashSet;

use crate::host::SceneHost;

fn flag(host: &dyn SceneHost, node: &str, attr: &str, default: bool) -> bool {
    host.attribute(node, attr)
        .and_then(|value| value.as_bool())
        .unwrap_or(default)
}

/// Whether the flags on `node` itself allow it to render
///
/// Only flags the node actually carries take part. Override visibility is
/// consulted whenever the node exposes the override toggle at all.
pub fn is_locally_visible(host: &dyn SceneHost, node: &str) -> bool {
    flag(host, node, "visibility", true)
        && !flag(host, node, "intermediateObject", false)
        && (!host.has_attribute(node, "overrideEnabled")
            || flag(host, node, "overrideVisibility", true))
}

/// Whether `node` and every ancestor are visible
///
/// Stops at the first invisible node. Parent loops in malformed host data
/// are walked once.
pub fn is_visible(host: &dyn SceneHost, node: &str) -> bool {
    let mut seen = HashSet::new();
    let mut pending = vec![node.to_string()];

    while let Some(current) = pending.pop() {
        if !seen.insert(current.clone()) {
            continue;
        }
        if !is_locally_visible(host, &current) {
            log::debug!("{node} hidden by {current}");
            return false;
        }
        pending.extend(host.parents(&current));
    }
    true
}
