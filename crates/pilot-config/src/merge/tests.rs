use serde_json::{Value, json};

use super::*;

fn fold(tiers: &[(Value, Tier)]) -> (Value, MergeTrack) {
    let mut tree = crate::types::default_tree();
    let mut track = MergeTrack::new();
    record_defaults(&tree, &mut track);
    for (overlay, tier) in tiers {
        merge_tier(&mut tree, overlay, *tier, &mut track);
    }
    (tree, track)
}

#[test]
fn test_merge_scalars() {
    let (tree, track) = fold(&[(json!({"llm": {"maxTokens": 8192}}), Tier::User)]);

    assert_eq!(tree["llm"]["maxTokens"], 8192);
    assert_eq!(tree["llm"]["model"], "claude-sonnet-4-20250514");
    assert_eq!(track.sources.get("llm.maxTokens"), Some(&Tier::User));
    assert_eq!(track.sources.get("llm.model"), Some(&Tier::Installation));
}

#[test]
fn test_merge_new_keys() {
    let (tree, track) = fold(&[(
        json!({"extensions": {"spellcheck": {"enabled": true}}}),
        Tier::Project,
    )]);

    assert_eq!(tree["extensions"]["spellcheck"]["enabled"], true);
    assert_eq!(
        track.sources.get("extensions.spellcheck.enabled"),
        Some(&Tier::Project)
    );
}

#[test]
fn test_later_tier_wins() {
    let (tree, track) = fold(&[
        (json!({"ui": {"theme": "light"}}), Tier::System),
        (json!({"ui": {"theme": "system"}}), Tier::User),
    ]);

    assert_eq!(tree["ui"]["theme"], "system");
    assert_eq!(track.sources.get("ui.theme"), Some(&Tier::User));
}

#[test]
fn test_arrays_replace_wholesale() {
    let (tree, track) = fold(&[
        (
            json!({"mcp": {"discoveryPriority": ["system", "builtin"]}}),
            Tier::System,
        ),
        (
            json!({"mcp": {"discoveryPriority": ["user", "project"]}}),
            Tier::User,
        ),
    ]);

    assert_eq!(tree["mcp"]["discoveryPriority"], json!(["user", "project"]));
    assert_eq!(track.sources.get("mcp.discoveryPriority"), Some(&Tier::User));
}

#[test]
fn test_null_is_an_explicit_override() {
    let (tree, track) = fold(&[(json!({"telemetry": {"otelEndpoint": null}}), Tier::User)]);

    assert_eq!(tree["telemetry"]["otelEndpoint"], Value::Null);
    assert_eq!(track.sources.get("telemetry.otelEndpoint"), Some(&Tier::User));
}

#[test]
fn test_lockable_unwrapped_and_recorded() {
    let (tree, track) = fold(&[(
        json!({"security": {"sandboxMode": {
            "value": true, "locked": true, "lockReason": "IT policy"
        }}}),
        Tier::System,
    )]);

    assert_eq!(tree["security"]["sandboxMode"], true);
    assert!(track.is_locked("security.sandboxMode"));
    assert_eq!(
        track.lock_reasons.get("security.sandboxMode").map(String::as_str),
        Some("IT policy")
    );
    assert_eq!(track.sources.get("security.sandboxMode"), Some(&Tier::System));
}

#[test]
fn test_lock_blocks_later_tiers() {
    let (tree, track) = fold(&[
        (
            json!({"security": {"sandboxMode": {"value": true, "locked": true}}}),
            Tier::System,
        ),
        (json!({"security": {"sandboxMode": false}}), Tier::User),
        (json!({"security": {"sandboxMode": false}}), Tier::Project),
    ]);

    assert_eq!(tree["security"]["sandboxMode"], true);
    assert_eq!(track.sources.get("security.sandboxMode"), Some(&Tier::System));
}

#[test]
fn test_lock_blocks_wholesale_parent_replacement() {
    let (tree, track) = fold(&[
        (
            json!({"security": {"sandboxMode": {"value": true, "locked": true}}}),
            Tier::System,
        ),
        // Replacing the whole `security` subtree with a scalar would erase
        // the locked leaf; the assignment must be skipped outright.
        (json!({"security": "off"}), Tier::User),
    ]);

    assert_eq!(tree["security"]["sandboxMode"], true);
    assert!(track.is_locked("security.sandboxMode"));
    assert_eq!(tree["security"]["allowDangerousOperations"], false);
}

#[test]
fn test_unlocked_lockable_does_not_lock() {
    let (tree, track) = fold(&[
        (
            json!({"llm": {"model": {"value": "org-model"}}}),
            Tier::System,
        ),
        (json!({"llm": {"model": "user-model"}}), Tier::User),
    ]);

    assert_eq!(tree["llm"]["model"], "user-model");
    assert!(!track.is_locked("llm.model"));
    assert_eq!(track.sources.get("llm.model"), Some(&Tier::User));
}

#[test]
fn test_lockable_inside_new_subtree() {
    let (tree, track) = fold(&[
        (
            json!({"extensions": {"updater": {
                "channel": {"value": "stable", "locked": true},
                "checkInterval": 3600
            }}}),
            Tier::System,
        ),
        (
            json!({"extensions": {"updater": {"channel": "nightly"}}}),
            Tier::User,
        ),
    ]);

    assert_eq!(tree["extensions"]["updater"]["channel"], "stable");
    assert!(track.is_locked("extensions.updater.channel"));
    assert_eq!(
        track.sources.get("extensions.updater.checkInterval"),
        Some(&Tier::System)
    );
}

#[test]
fn test_lockable_object_payload_assigns_wholesale() {
    let (tree, track) = fold(&[(
        json!({"mcp": {"servers": {
            "value": {"search": {"command": "pilot-search"}},
            "locked": true
        }}}),
        Tier::System,
    )]);

    assert_eq!(tree["mcp"]["servers"]["search"]["command"], "pilot-search");
    assert!(track.is_locked("mcp.servers"));
    assert_eq!(
        track.sources.get("mcp.servers.search.command"),
        Some(&Tier::System)
    );
}

#[test]
fn test_type_mismatch_replaces_and_purges_stale_sources() {
    let (tree, track) = fold(&[
        (
            json!({"extensions": {"linter": {"enabled": true, "level": "strict"}}}),
            Tier::User,
        ),
        // Project collapses the object to a scalar; the old leaf paths must
        // disappear from the source map.
        (json!({"extensions": {"linter": "off"}}), Tier::Project),
    ]);

    assert_eq!(tree["extensions"]["linter"], "off");
    assert_eq!(track.sources.get("extensions.linter"), Some(&Tier::Project));
    assert!(!track.sources.contains_key("extensions.linter.enabled"));
    assert!(!track.sources.contains_key("extensions.linter.level"));
}

#[test]
fn test_scalar_replaced_by_object() {
    let (tree, track) = fold(&[
        (json!({"extensions": {"linter": "off"}}), Tier::User),
        (
            json!({"extensions": {"linter": {"enabled": false}}}),
            Tier::Project,
        ),
    ]);

    assert_eq!(tree["extensions"]["linter"]["enabled"], false);
    assert_eq!(
        track.sources.get("extensions.linter.enabled"),
        Some(&Tier::Project)
    );
    assert!(!track.sources.contains_key("extensions.linter"));
}

#[test]
fn test_record_defaults_covers_all_leaves() {
    let tree = crate::types::default_tree();
    let mut track = MergeTrack::new();
    record_defaults(&tree, &mut track);

    assert_eq!(track.sources.get("$version"), Some(&Tier::Installation));
    assert_eq!(track.sources.get("llm.model"), Some(&Tier::Installation));
    assert_eq!(
        track.sources.get("mcp.discoveryPriority"),
        Some(&Tier::Installation)
    );
    assert!(track.locked.is_empty());
}

#[test]
fn test_has_locked_descendant() {
    let mut track = MergeTrack::new();
    track.lock("security.sandboxMode", None);

    assert!(track.has_locked_descendant("security"));
    assert!(!track.has_locked_descendant("security.sandboxMode"));
    assert!(!track.has_locked_descendant("securit"));
    assert!(!track.has_locked_descendant("ui"));
}
