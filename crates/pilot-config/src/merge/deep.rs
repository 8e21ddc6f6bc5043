use serde_json::Value;
use tracing::debug;

use super::lockable::{is_lockable, unwrap_lockable};
use super::path::join_path;
use super::types::{MergeTrack, Tier};

/// Fold one tier's raw tree into the accumulated tree.
///
/// Objects merge recursively per key. Scalars, arrays, `null`, lockable
/// wrappers, and type-mismatched nodes replace the accumulated value
/// wholesale. An assignment is skipped when its path is already locked, or
/// — for wholesale replacement — when any descendant of the path is locked,
/// so a lock can never be washed away by replacing its parent subtree.
pub fn merge_tier(base: &mut Value, overlay: &Value, tier: Tier, track: &mut MergeTrack) {
    merge_node(base, overlay, "", tier, track);
}

/// Record every leaf of the defaults tree as sourced from the installation
/// tier. Called once at the start of each fold.
pub fn record_defaults(tree: &Value, track: &mut MergeTrack) {
    record_leaves(tree, "", Tier::Installation, track);
}

fn merge_node(base: &mut Value, overlay: &Value, path: &str, tier: Tier, track: &mut MergeTrack) {
    if is_lockable(overlay) {
        let unwrapped = unwrap_lockable(overlay);
        assign_payload(
            base,
            unwrapped.value,
            path,
            tier,
            track,
            unwrapped.locked,
            unwrapped.lock_reason,
        );
        return;
    }

    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let child_path = join_path(path, key);
                let slot = base_map.entry(key.clone()).or_insert(Value::Null);
                merge_node(slot, overlay_val, &child_path, tier, track);
            }
        }
        (slot, _) => {
            assign_raw(slot, overlay, path, tier, track);
        }
    }
}

/// Wholesale assignment of a lockable wrapper's payload. The payload is the
/// raw value — wrappers are not recognized inside it.
fn assign_payload(
    slot: &mut Value,
    payload: &Value,
    path: &str,
    tier: Tier,
    track: &mut MergeTrack,
    locked: bool,
    reason: Option<&str>,
) {
    if skip_if_locked(path, tier, track) {
        return;
    }
    track.purge_below(path);
    track.sources.remove(path);
    record_leaves(payload, path, tier, track);
    if locked {
        track.lock(path, reason);
    }
    *slot = payload.clone();
}

/// Wholesale assignment of a raw overlay node: a scalar, array, `null`, or
/// type-mismatched subtree. Lockable wrappers nested anywhere in the
/// overlay are unwrapped on the way in.
fn assign_raw(slot: &mut Value, overlay: &Value, path: &str, tier: Tier, track: &mut MergeTrack) {
    if skip_if_locked(path, tier, track) {
        return;
    }
    track.purge_below(path);
    track.sources.remove(path);
    *slot = sanitize_subtree(overlay, path, tier, track);
}

fn skip_if_locked(path: &str, tier: Tier, track: &MergeTrack) -> bool {
    if track.is_locked(path) {
        debug!(%path, %tier, "skipping assignment to locked path");
        return true;
    }
    if track.has_locked_descendant(path) {
        debug!(%path, %tier, "skipping replacement of subtree with locked descendants");
        return true;
    }
    false
}

/// Deep-copy a raw tier subtree, unwrapping lockable wrappers at any depth
/// and recording provenance and locks for the paths they cover.
fn sanitize_subtree(node: &Value, path: &str, tier: Tier, track: &mut MergeTrack) -> Value {
    if is_lockable(node) {
        let unwrapped = unwrap_lockable(node);
        record_leaves(unwrapped.value, path, tier, track);
        if unwrapped.locked {
            track.lock(path, unwrapped.lock_reason);
        }
        return unwrapped.value.clone();
    }

    match node {
        Value::Object(map) => {
            let mut clean = serde_json::Map::new();
            for (key, child) in map {
                let child_path = join_path(path, key);
                clean.insert(key.clone(), sanitize_subtree(child, &child_path, tier, track));
            }
            Value::Object(clean)
        }
        leaf => {
            track.sources.insert(path.to_owned(), tier);
            leaf.clone()
        }
    }
}

/// Record provenance for every leaf under `val`; a non-object `val` is
/// itself the leaf at `path`.
fn record_leaves(val: &Value, path: &str, tier: Tier, track: &mut MergeTrack) {
    if let Value::Object(map) = val {
        for (key, child) in map {
            record_leaves(child, &join_path(path, key), tier, track);
        }
    } else {
        track.sources.insert(path.to_owned(), tier);
    }
}
