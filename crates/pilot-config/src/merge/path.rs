use serde_json::Value;
use tracing::warn;

/// Navigate into a nested value by pre-split path segments.
pub(crate) fn get_nested<'a>(val: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    let mut current = val;
    for segment in segments {
        current = current.as_object()?.get(*segment)?;
    }
    Some(current)
}

/// Navigate into a nested value by dotted path.
pub(crate) fn get_path<'a>(val: &'a Value, dotted: &str) -> Option<&'a Value> {
    let segments: Vec<&str> = dotted.split('.').collect();
    get_nested(val, &segments)
}

/// Set a value at a nested path. The env override table only targets paths
/// that exist in the default schema, so a missing intermediate object is a
/// bug worth a warning, not a panic.
pub(crate) fn set_nested(val: &mut Value, segments: &[&str], new_val: Value) {
    let Some((leaf, parents)) = segments.split_last() else {
        return;
    };

    let mut current = val;
    for segment in parents {
        let Some(next) = current.as_object_mut().and_then(|map| map.get_mut(*segment)) else {
            warn!("set_nested: missing intermediate object at '{segment}'; skipping");
            return;
        };
        current = next;
    }

    if let Some(map) = current.as_object_mut() {
        map.insert((*leaf).to_owned(), new_val);
    }
}

/// Join a dotted prefix with one more key.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}
