//! The resolved configuration: merged tree plus provenance metadata.
//!
//! A [`ResolvedConfig`] is created by one `resolve()` call and lives in the
//! resolver's cache until invalidated. It is read-only to consumers —
//! mutation goes through the persistence API, which writes the underlying
//! tier file and invalidates the cache.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::merge::Tier;
use crate::merge::path::get_path;
use crate::types::PilotConfig;

/// Provenance and lock metadata for one resolution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Which tier supplied the final value at each leaf path.
    pub sources: BTreeMap<String, Tier>,
    /// Paths locked by an administrator tier.
    pub locked: BTreeSet<String>,
    /// Lock reasons, where the locking tier supplied one.
    pub lock_reasons: BTreeMap<String, String>,
    /// When this resolution was computed. Strictly increases across real
    /// recomputations.
    pub resolved_at: DateTime<Utc>,
    /// Project root in effect during the resolution, if any.
    pub project_path: Option<PathBuf>,
    /// Tier files that were actually read and merged.
    pub loaded_files: Vec<String>,
}

/// One row of the diagnostics listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEntry {
    /// Dotted leaf path.
    pub key: String,
    /// Final resolved value at the path.
    pub value: Value,
    /// Tier that supplied the value.
    pub source_tier: Tier,
    /// Whether the path is locked.
    pub is_locked: bool,
}

/// The authoritative output of one `resolve()` call.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// The fully merged tree. Always contains the full default shape.
    #[serde(flatten)]
    pub config: Value,
    /// Provenance, lock, and cache metadata.
    #[serde(rename = "_meta")]
    pub meta: Meta,
}

impl ResolvedConfig {
    /// Fetch and deserialize the value at a dotted path.
    ///
    /// Returns `None` on any missing segment or when the value does not
    /// deserialize to `T`.
    pub fn get<T: DeserializeOwned>(&self, dot_path: &str) -> Option<T> {
        let node = self.get_value(dot_path)?;
        serde_json::from_value(node.clone()).ok()
    }

    /// Borrow the raw value at a dotted path.
    #[must_use]
    pub fn get_value(&self, dot_path: &str) -> Option<&Value> {
        get_path(&self.config, dot_path)
    }

    /// Tier that supplied the final value at a path.
    #[must_use]
    pub fn get_source(&self, dot_path: &str) -> Option<Tier> {
        self.meta.sources.get(dot_path).copied()
    }

    /// Whether a path is locked. Unknown paths are not locked.
    #[must_use]
    pub fn is_locked(&self, dot_path: &str) -> bool {
        self.meta.locked.contains(dot_path)
    }

    /// Reason the administrator attached to a lock, if any.
    #[must_use]
    pub fn lock_reason(&self, dot_path: &str) -> Option<&str> {
        self.meta.lock_reasons.get(dot_path).map(String::as_str)
    }

    /// One entry per leaf path known to the merge, sorted by key.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<DiagnosticEntry> {
        self.meta
            .sources
            .iter()
            .map(|(key, tier)| DiagnosticEntry {
                key: key.clone(),
                value: self.get_value(key).cloned().unwrap_or(Value::Null),
                source_tier: *tier,
                is_locked: self.is_locked(key),
            })
            .collect()
    }

    /// Deserialize the merged tree into the typed schema view. A shape
    /// mismatch falls back to the defaults rather than failing.
    #[must_use]
    pub fn typed(&self) -> PilotConfig {
        serde_json::from_value(self.config.clone()).unwrap_or_default()
    }

    /// Full tree plus the reserved `_meta` field, for IPC and UI export.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut root = self.config.clone();
        if let Value::Object(map) = &mut root {
            map.insert(
                "_meta".to_owned(),
                serde_json::to_value(&self.meta).unwrap_or(Value::Null),
            );
        }
        root
    }
}
