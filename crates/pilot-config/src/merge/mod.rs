//! Deep merge of JSON tiers with lock and provenance tracking.
//!
//! The merge operates on raw [`serde_json::Value`] trees rather than
//! deserialized structs. This correctly handles "absent vs default" — a key
//! missing from a tier file never overrides the lower tiers — and lets
//! administrator locks be recognized structurally at any leaf.

mod deep;
mod lockable;
pub(crate) mod path;
mod types;

pub use deep::{merge_tier, record_defaults};
pub use lockable::{Unwrapped, is_lockable, unwrap_lockable};
pub use types::{MergeTrack, Tier};

#[cfg(test)]
mod tests;
