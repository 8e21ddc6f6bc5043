//! The resolver: tier fold orchestration, caching, and persistence.
//!
//! One [`ConfigResolver`] instance owns the only mutable state in the
//! engine — the cached [`ResolvedConfig`] and the current project path —
//! behind an `RwLock`, since `resolve()` and `set_project_path` are both
//! read-modify-write sequences. Everything else is a pure, bounded,
//! synchronous computation over small JSON documents.
//!
//! Nothing here returns an error to the caller: resolution runs on every
//! startup and on every settings change, and a broken tier file or a failed
//! write must degrade (warn, fall back, report `false`), never crash the
//! host.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::env::{EnvSnapshot, apply_env};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{MergeTrack, Tier, merge_tier, record_defaults};
use crate::paths::TierPaths;
use crate::resolved::{DiagnosticEntry, Meta, ResolvedConfig};
use crate::store::{TierFile, read_tier_file};
use crate::types::default_tree;

/// Mutable resolver state, exclusively owned through the lock.
#[derive(Debug, Default)]
struct ResolverState {
    cache: Option<Arc<ResolvedConfig>>,
    project_path: Option<PathBuf>,
    /// Timestamp of the last real recomputation. Survives cache
    /// invalidation so `resolved_at` stays strictly increasing.
    last_resolved_at: Option<DateTime<Utc>>,
}

/// Tiered configuration resolver for one application instance.
///
/// Owned by the composition root and passed by reference; the [`crate::global`]
/// module wraps one process-wide instance for legacy call sites.
#[derive(Debug)]
pub struct ConfigResolver {
    paths: TierPaths,
    /// Fixed environment snapshot for tests; `None` captures the process
    /// environment on every resolution.
    env: Option<EnvSnapshot>,
    state: RwLock<ResolverState>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigResolver {
    /// Resolver over the discovered platform tier locations.
    #[must_use]
    pub fn new() -> Self {
        Self::with_paths(TierPaths::discover())
    }

    /// Resolver over explicit tier locations (tests, embedders).
    #[must_use]
    pub fn with_paths(paths: TierPaths) -> Self {
        Self {
            paths,
            env: None,
            state: RwLock::new(ResolverState::default()),
        }
    }

    /// Use a fixed environment snapshot instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, env: EnvSnapshot) -> Self {
        self.env = Some(env);
        self
    }

    // -----------------------------------------------------------------------
    // Resolution and cache
    // -----------------------------------------------------------------------

    /// Produce the authoritative merged configuration.
    ///
    /// Returns the cached result unless `force_refresh` is set, the cache
    /// is empty, or it was invalidated since the last resolution. Repeated
    /// calls without invalidation return the identical object (same
    /// `resolved_at`).
    pub fn resolve(&self, force_refresh: bool) -> Arc<ResolvedConfig> {
        if !force_refresh {
            let state = self.read_state();
            if let Some(cached) = &state.cache {
                return Arc::clone(cached);
            }
        }

        let mut state = self.write_state();
        // Another caller may have resolved while this one waited for the
        // write lock.
        if !force_refresh
            && let Some(cached) = &state.cache
        {
            return Arc::clone(cached);
        }

        let resolved = Arc::new(self.compute(state.project_path.as_deref(), state.last_resolved_at));
        state.last_resolved_at = Some(resolved.meta.resolved_at);
        state.cache = Some(Arc::clone(&resolved));
        resolved
    }

    /// Drop the cached result; the next [`Self::resolve`] recomputes.
    pub fn invalidate_cache(&self) {
        self.write_state().cache = None;
    }

    /// Point the resolver at a project root. Invalidates the cache only
    /// when the path actually changes.
    pub fn set_project_path(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        let mut state = self.write_state();
        if state.project_path.as_ref() == Some(&path) {
            debug!(path = %path.display(), "project path unchanged; keeping cache");
            return;
        }
        info!(path = %path.display(), "project path changed; invalidating cache");
        state.project_path = Some(path);
        state.cache = None;
    }

    /// The current project root, if one has been set.
    #[must_use]
    pub fn project_path(&self) -> Option<PathBuf> {
        self.read_state().project_path.clone()
    }

    // -----------------------------------------------------------------------
    // Accessors over the (lazily resolved) result
    // -----------------------------------------------------------------------

    /// Fetch and deserialize one value from the resolved configuration.
    pub fn get<T: DeserializeOwned>(&self, dot_path: &str) -> Option<T> {
        self.resolve(false).get(dot_path)
    }

    /// Tier that supplied the final value at a path.
    #[must_use]
    pub fn get_source(&self, dot_path: &str) -> Option<Tier> {
        self.resolve(false).get_source(dot_path)
    }

    /// Whether a path is locked by an administrator tier.
    #[must_use]
    pub fn is_locked(&self, dot_path: &str) -> bool {
        self.resolve(false).is_locked(dot_path)
    }

    /// One entry per known leaf path, sorted by key.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<DiagnosticEntry> {
        self.resolve(false).diagnostics()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Merge `partial` into the user-tier file, shallowly at the top level,
    /// and invalidate the cache. Returns `false` (after a warning) on any
    /// I/O failure.
    pub fn save_user_config(&self, partial: &Map<String, Value>) -> bool {
        let Some(path) = self.paths.user_file.clone() else {
            warn!("cannot save user settings: no user settings path on this system");
            return false;
        };
        self.save_partial(&path, partial)
    }

    /// Merge `partial` into the project-tier file, shallowly at the top
    /// level, and invalidate the cache. Fails (with a warning, returning
    /// `false`) when no project path has been set.
    pub fn save_project_config(&self, partial: &Map<String, Value>) -> bool {
        let project_root = self.read_state().project_path.clone();
        let Some(root) = project_root else {
            warn!(error = %ConfigError::NoProjectPath, "cannot save project settings");
            return false;
        };
        self.save_partial(&TierPaths::project_file(&root), partial)
    }

    fn save_partial(&self, path: &Path, partial: &Map<String, Value>) -> bool {
        match write_shallow_merge(path, partial) {
            Ok(()) => {
                info!(path = %path.display(), "saved settings");
                self.invalidate_cache();
                true
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to save settings");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// One full fold: defaults, then system, user, and project files in
    /// ascending priority, then the environment overlay on top.
    fn compute(
        &self,
        project_root: Option<&Path>,
        previous: Option<DateTime<Utc>>,
    ) -> ResolvedConfig {
        let mut tree = default_tree();
        let mut track = MergeTrack::new();
        record_defaults(&tree, &mut track);

        let mut loaded_files = Vec::new();
        let file_tiers = [
            (Some(self.paths.system_file.clone()), Tier::System),
            (self.paths.user_file.clone(), Tier::User),
            (project_root.map(TierPaths::project_file), Tier::Project),
        ];
        for (path, tier) in file_tiers {
            let Some(path) = path else { continue };
            if let TierFile::Loaded(overlay) = read_tier_file(&path) {
                merge_tier(&mut tree, &overlay, tier, &mut track);
                info!(path = %path.display(), %tier, "merged tier file");
                loaded_files.push(path.display().to_string());
            }
        }

        let env = match &self.env {
            Some(snapshot) => snapshot.clone(),
            None => EnvSnapshot::from_process(),
        };
        let applied = apply_env(&mut tree, &mut track, &env);
        if applied > 0 {
            debug!(count = applied, "applied environment overrides");
        }

        let now = Utc::now();
        let resolved_at = match previous {
            // The wall clock may not tick between consecutive
            // recomputations; `resolved_at` must still strictly increase.
            Some(prev) if now <= prev => prev
                .checked_add_signed(TimeDelta::nanoseconds(1))
                .unwrap_or(now),
            _ => now,
        };

        ResolvedConfig {
            config: tree,
            meta: Meta {
                sources: track.sources,
                locked: track.locked,
                lock_reasons: track.lock_reasons,
                resolved_at,
                project_path: project_root.map(Path::to_path_buf),
                loaded_files,
            },
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, ResolverState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ResolverState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Shallow, top-level-only merge into the existing file: nested objects
/// under a changed top-level key are replaced wholesale, not deep-merged.
fn write_shallow_merge(path: &Path, partial: &Map<String, Value>) -> ConfigResult<()> {
    // An unreadable or malformed existing file degrades to `{}`, exactly
    // like an absent one.
    let mut existing = match read_tier_file(path) {
        TierFile::Loaded(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in partial {
        existing.insert(key.clone(), value.clone());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| ConfigError::Write {
            path: path.display().to_string(),
            source: err,
        })?;
    }

    let body = serde_json::to_string_pretty(&Value::Object(existing)).map_err(|err| {
        ConfigError::Serialize {
            path: path.display().to_string(),
            source: err,
        }
    })?;
    std::fs::write(path, body).map_err(|err| ConfigError::Write {
        path: path.display().to_string(),
        source: err,
    })
}
