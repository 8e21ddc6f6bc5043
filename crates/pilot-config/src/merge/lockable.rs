use serde_json::Value;

/// A tier-file node unwrapped from the `{value, locked?, lockReason?}`
/// shape.
#[derive(Debug)]
pub struct Unwrapped<'a> {
    /// The raw configuration value the node carries.
    pub value: &'a Value,
    /// Whether the node locks its path against higher-priority tiers.
    pub locked: bool,
    /// Administrator-supplied reason for the lock.
    pub lock_reason: Option<&'a str>,
}

/// Whether a node qualifies as a lockable wrapper: a plain object (not an
/// array, not `null`) containing a `value` key. A bare object without
/// `value` is an ordinary nested node.
#[must_use]
pub fn is_lockable(node: &Value) -> bool {
    node.as_object().is_some_and(|map| map.contains_key("value"))
}

/// Unwrap a node. Non-qualifying nodes pass through unchanged with
/// `locked = false`.
#[must_use]
pub fn unwrap_lockable(node: &Value) -> Unwrapped<'_> {
    if let Some(map) = node.as_object()
        && let Some(value) = map.get("value")
    {
        return Unwrapped {
            value,
            locked: map.get("locked").and_then(Value::as_bool).unwrap_or(false),
            lock_reason: map.get("lockReason").and_then(Value::as_str),
        };
    }
    Unwrapped {
        value: node,
        locked: false,
        lock_reason: None,
    }
}
