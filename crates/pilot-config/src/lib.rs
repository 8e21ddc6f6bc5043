#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Tiered configuration resolution for Claude Pilot.
//!
//! This crate produces the single authoritative configuration object for
//! the application by folding five ordered sources, lowest priority first:
//!
//! 1. **installation** — defaults compiled into the binary
//! 2. **system** — machine-wide admin policy (`/etc/claude-pilot/policy.json`)
//! 3. **user** — per-user settings (platform config dir)
//! 4. **project** — `<project>/.claude/pilot.json`
//! 5. **session** — `CLAUDE_PILOT_*` environment overrides
//!
//! Any tier may mark a leaf with the lockable shape
//! `{"value": ..., "locked": true, "lockReason": "..."}`; once locked, no
//! higher-priority tier — including the environment overlay — changes that
//! path. The resolved result carries per-path provenance and lock status
//! for diagnostics and UI display, and is cached until invalidated.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pilot_config::ConfigResolver;
//!
//! let resolver = ConfigResolver::new();
//! resolver.set_project_path("/home/user/project");
//!
//! let resolved = resolver.resolve(false);
//! let model: Option<String> = resolved.get("llm.model");
//! let sandbox_locked = resolved.is_locked("security.sandboxMode");
//! println!("model {model:?}, sandbox locked: {sandbox_locked}");
//! ```
//!
//! # Degradation, never failure
//!
//! Resolution runs on every startup and on every settings change, so no
//! failure in this crate reaches the caller as an error: a missing tier is
//! normal, a malformed or unreadable tier is warned about and skipped, an
//! invalid environment override keeps the prior tier's value, and a failed
//! save reports `false`.

/// Environment overlay (the synthetic session tier).
pub mod env;
/// Configuration error types (internal; the public surface degrades).
pub mod error;
/// Process-wide singleton boundary for legacy call sites.
pub mod global;
/// Lock-aware deep merge with provenance tracking.
pub mod merge;
/// Per-OS locations of the tier files.
pub mod paths;
/// Resolved configuration, provenance metadata, and diagnostics.
pub mod resolved;
/// The resolver: cache, project path, and persistence.
pub mod resolver;
/// Tier Store: reads one tier's JSON document.
pub mod store;
/// Typed schema and installation defaults.
pub mod types;

// Re-export primary types at the crate root.
pub use env::EnvSnapshot;
pub use error::{ConfigError, ConfigResult};
pub use global::{get_config_value, is_config_locked, resolve_config, set_project_path};
pub use merge::{MergeTrack, Tier};
pub use paths::TierPaths;
pub use resolved::{DiagnosticEntry, Meta, ResolvedConfig};
pub use resolver::ConfigResolver;
pub use types::*;
