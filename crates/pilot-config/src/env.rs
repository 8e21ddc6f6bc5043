//! Environment overlay: the synthetic highest-priority "session" tier.
//!
//! A fixed table maps `CLAUDE_PILOT_*` variables onto tree paths, each with
//! its own parser. A value that fails its parser is an invalid override and
//! leaves the prior tier's value untouched; a path locked by a lower tier
//! is never overridden. The overlay reads from an [`EnvSnapshot`] captured
//! once per resolution, so tests inject fixed snapshots instead of mutating
//! process-global state.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::merge::path::set_nested;
use crate::merge::{MergeTrack, Tier};

/// Snapshot of the process environment taken once per resolution.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from fixed key/value pairs.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

/// One entry of the fixed override table.
struct EnvOverride {
    var: &'static str,
    path: &'static [&'static str],
    parse: fn(&str) -> Option<Value>,
}

/// The session-tier override table.
const ENV_OVERRIDES: &[EnvOverride] = &[
    EnvOverride {
        var: "CLAUDE_PILOT_MODEL",
        path: &["llm", "model"],
        parse: parse_string,
    },
    EnvOverride {
        var: "CLAUDE_PILOT_MAX_TOKENS",
        path: &["llm", "maxTokens"],
        parse: parse_integer,
    },
    EnvOverride {
        var: "CLAUDE_PILOT_THINKING_ENABLED",
        path: &["llm", "thinkingEnabled"],
        parse: parse_bool_lenient,
    },
    EnvOverride {
        var: "CLAUDE_PILOT_SANDBOX",
        path: &["security", "sandboxMode"],
        parse: parse_bool_strict,
    },
    EnvOverride {
        var: "CLAUDE_PILOT_THEME",
        path: &["ui", "theme"],
        parse: parse_theme,
    },
    EnvOverride {
        var: "CLAUDE_PILOT_TELEMETRY",
        path: &["telemetry", "enabled"],
        parse: parse_bool_strict,
    },
    EnvOverride {
        var: "CLAUDE_PILOT_OTEL_ENDPOINT",
        path: &["telemetry", "otelEndpoint"],
        parse: parse_string,
    },
];

/// Apply the override table on top of the merged tree. Returns the number
/// of overrides applied.
pub fn apply_env(tree: &mut Value, track: &mut MergeTrack, env: &EnvSnapshot) -> usize {
    let mut applied: usize = 0;
    for entry in ENV_OVERRIDES {
        let Some(raw) = env.get(entry.var) else {
            continue;
        };
        let Some(parsed) = (entry.parse)(raw) else {
            debug!(var = entry.var, value = raw, "ignoring invalid environment override");
            continue;
        };
        let dotted = entry.path.join(".");
        if track.is_locked(&dotted) {
            debug!(var = entry.var, path = %dotted, "environment override blocked by lock");
            continue;
        }
        set_nested(tree, entry.path, parsed);
        track.sources.insert(dotted, Tier::Session);
        applied = applied.saturating_add(1);
    }
    applied
}

fn parse_string(raw: &str) -> Option<Value> {
    Some(Value::String(raw.to_owned()))
}

fn parse_integer(raw: &str) -> Option<Value> {
    raw.parse::<u64>().ok().map(Value::from)
}

/// `"1"` and `"true"` parse to `true`; everything else, including `"0"` and
/// `"false"`, parses to `false`.
fn parse_bool_lenient(raw: &str) -> Option<Value> {
    Some(Value::Bool(matches!(raw, "1" | "true")))
}

/// Only the canonical boolean spellings are accepted; anything else is an
/// invalid override.
fn parse_bool_strict(raw: &str) -> Option<Value> {
    match raw {
        "1" | "true" => Some(Value::Bool(true)),
        "0" | "false" => Some(Value::Bool(false)),
        _ => None,
    }
}

fn parse_theme(raw: &str) -> Option<Value> {
    matches!(raw, "dark" | "light" | "system").then(|| Value::String(raw.to_owned()))
}
