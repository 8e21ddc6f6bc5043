use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Which configuration tier a value came from.
///
/// Variants are listed lowest priority first. The fold order in the
/// resolver is fixed; [`Tier::priority`] exists for documentation and
/// ordering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Built-in installation defaults compiled into the binary.
    Installation,
    /// Machine-wide administrator policy file.
    System,
    /// Per-user settings file.
    User,
    /// Per-project settings file.
    Project,
    /// Process environment overrides (`CLAUDE_PILOT_*`).
    Session,
}

impl Tier {
    /// Strictly increasing priority, 0 for installation through 4 for
    /// session.
    #[must_use]
    pub fn priority(self) -> u8 {
        match self {
            Self::Installation => 0,
            Self::System => 1,
            Self::User => 2,
            Self::Project => 3,
            Self::Session => 4,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Installation => write!(f, "installation (built-in defaults)"),
            Self::System => write!(f, "system (admin policy)"),
            Self::User => write!(f, "user (per-user settings)"),
            Self::Project => write!(f, "project (.claude/pilot.json)"),
            Self::Session => write!(f, "session (environment override)"),
        }
    }
}

/// Per-path bookkeeping threaded through the merge fold.
#[derive(Debug, Default)]
pub struct MergeTrack {
    /// Which tier supplied the final value at each leaf path.
    pub sources: BTreeMap<String, Tier>,
    /// Paths locked by some tier. Once a path is in this set, no later
    /// (higher-priority) tier changes its value.
    pub locked: BTreeSet<String>,
    /// Administrator-supplied reasons for locked paths.
    pub lock_reasons: BTreeMap<String, String>,
}

impl MergeTrack {
    /// Empty tracking state for the start of a fold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this exact path is locked.
    #[must_use]
    pub fn is_locked(&self, path: &str) -> bool {
        self.locked.contains(path)
    }

    /// Whether any locked path lies strictly below `path`.
    #[must_use]
    pub fn has_locked_descendant(&self, path: &str) -> bool {
        let prefix = format!("{path}.");
        self.locked
            .range(prefix.clone()..)
            .next()
            .is_some_and(|p| p.starts_with(&prefix))
    }

    /// Record a lock at `path`, keeping the reason if one was supplied.
    pub fn lock(&mut self, path: &str, reason: Option<&str>) {
        self.locked.insert(path.to_owned());
        if let Some(reason) = reason {
            self.lock_reasons.insert(path.to_owned(), reason.to_owned());
        }
    }

    /// Drop source records strictly below `path`. Called before a wholesale
    /// replacement so stale leaf paths never outlive the subtree that held
    /// them.
    pub(crate) fn purge_below(&mut self, path: &str) {
        let prefix = format!("{path}.");
        self.sources.retain(|key, _| !key.starts_with(&prefix));
    }
}
