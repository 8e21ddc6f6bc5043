//! Process-wide singleton boundary.
//!
//! The explicit [`ConfigResolver`] is the primary API, owned by the
//! application's composition root and passed by reference. These free
//! functions exist only for the boundary where legacy call sites (IPC
//! handlers, the settings UI) cannot thread a resolver through; they are
//! the entire surface other subsystems are allowed to depend on.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;

use crate::resolved::ResolvedConfig;
use crate::resolver::ConfigResolver;

static RESOLVER: OnceLock<ConfigResolver> = OnceLock::new();

fn resolver() -> &'static ConfigResolver {
    RESOLVER.get_or_init(ConfigResolver::new)
}

/// Resolve (or return the cached) configuration.
pub fn resolve_config() -> Arc<ResolvedConfig> {
    resolver().resolve(false)
}

/// Fetch and deserialize one value from the resolved configuration.
pub fn get_config_value<T: DeserializeOwned>(dot_path: &str) -> Option<T> {
    resolver().get(dot_path)
}

/// Whether a path is locked by an administrator tier.
#[must_use]
pub fn is_config_locked(dot_path: &str) -> bool {
    resolver().is_locked(dot_path)
}

/// Point the process-wide resolver at a project root, invalidating its
/// cache when the path actually changes.
pub fn set_project_path(path: impl Into<PathBuf>) {
    resolver().set_project_path(path);
}
