//! Tier Store: reads one tier's JSON document, degrading instead of failing.
//!
//! Absence is normal (most machines have no admin policy and many projects
//! have no `.claude/pilot.json`). Unreadable or malformed input is warned
//! about and then treated exactly like an absent tier, so a broken file can
//! never take the application down — the next-lower tiers still apply.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};

/// Maximum allowed tier file size (1 MiB).
const MAX_TIER_FILE_SIZE: usize = 1_048_576;

/// Outcome of reading a tier file.
#[derive(Debug)]
pub(crate) enum TierFile {
    /// File existed and parsed to a JSON object.
    Loaded(Value),
    /// File does not exist; nothing to merge.
    Absent,
    /// File exists but is unreadable, oversized, malformed, or not an
    /// object at the root. Treated as absent for merge purposes.
    Failed,
}

/// Read one tier file. Nothing propagates to the caller: failures degrade
/// to [`TierFile::Failed`] with a warning.
pub(crate) fn read_tier_file(path: &Path) -> TierFile {
    match try_read(path) {
        Ok(Some(value @ Value::Object(_))) => TierFile::Loaded(value),
        Ok(Some(_)) => {
            warn!(path = %path.display(), "tier file root is not a JSON object; ignoring tier");
            TierFile::Failed
        }
        Ok(None) => {
            debug!(path = %path.display(), "tier file not found, skipping");
            TierFile::Absent
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to load tier file; ignoring tier");
            TierFile::Failed
        }
    }
}

/// Load one tier as `(raw_object, ok)`.
///
/// Absence yields `({}, true)` silently; unreadable or malformed input
/// yields `({}, false)` after a warning. Callers treat `false` identically
/// to an absent tier for merge purposes — the flag exists for diagnostics.
#[must_use]
pub fn load_tier(path: &Path) -> (Value, bool) {
    match read_tier_file(path) {
        TierFile::Loaded(value) => (value, true),
        TierFile::Absent => (Value::Object(Map::new()), true),
        TierFile::Failed => (Value::Object(Map::new()), false),
    }
}

/// Read and parse a tier file, `Ok(None)` when it does not exist.
///
/// A single read call, no separate existence check (avoids TOCTOU races).
fn try_read(path: &Path) -> ConfigResult<Option<Value>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source: err,
            });
        }
    };

    if content.len() > MAX_TIER_FILE_SIZE {
        return Err(ConfigError::Oversized {
            path: path.display().to_string(),
            bytes: content.len(),
        });
    }

    let value: Value = serde_json::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        source: err,
    })?;
    Ok(Some(value))
}
