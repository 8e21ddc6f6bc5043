//! Typed schema for the resolved configuration tree.
//!
//! The merge itself operates on raw [`serde_json::Value`] trees so that
//! "absent" and "set to the default value" stay distinguishable across
//! tiers. The structs here are the consumer-facing view: every section
//! implements [`Default`] with the installation-tier values, and
//! [`default_tree`] produces the same shape as a raw tree for the base of
//! the fold. A unit test keeps the two in sync.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration shape for Claude Pilot.
///
/// Deserialized from the fully merged tree; unknown keys introduced by tier
/// files are ignored, and missing sections fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PilotConfig {
    /// Schema version tag.
    #[serde(rename = "$version")]
    pub version: u32,
    /// Model selection and token limits.
    pub llm: LlmConfig,
    /// Sandbox and dangerous-operation policy.
    pub security: SecurityConfig,
    /// Appearance settings.
    pub ui: UiConfig,
    /// Telemetry opt-in and export endpoint.
    pub telemetry: TelemetryConfig,
    /// MCP server definitions and discovery order.
    pub mcp: McpConfig,
    /// Free-form extension settings, absent unless a tier provides them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl Default for PilotConfig {
    fn default() -> Self {
        Self {
            version: 1,
            llm: LlmConfig::default(),
            security: SecurityConfig::default(),
            ui: UiConfig::default(),
            telemetry: TelemetryConfig::default(),
            mcp: McpConfig::default(),
            extensions: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Model selection and token limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LlmConfig {
    /// Model name sent to the provider API.
    pub model: String,
    /// Maximum tokens to request per completion.
    pub max_tokens: u64,
    /// Whether extended thinking is enabled.
    pub thinking_enabled: bool,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_owned(),
            max_tokens: 64_000,
            thinking_enabled: true,
            temperature: 1.0,
        }
    }
}

/// Sandbox and dangerous-operation policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Whether commands run inside the sandbox.
    pub sandbox_mode: bool,
    /// Whether operations flagged as dangerous may run at all.
    pub allow_dangerous_operations: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            sandbox_mode: true,
            allow_dangerous_operations: false,
        }
    }
}

/// Appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiConfig {
    /// Color theme.
    pub theme: Theme,
    /// Base font size in points.
    pub font_size: u16,
    /// Font family for the terminal and editor panes.
    pub font_family: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            font_size: 14,
            font_family: "monospace".to_owned(),
        }
    }
}

/// Color theme. The session-tier override accepts exactly these values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark theme (the default).
    #[default]
    Dark,
    /// Light theme.
    Light,
    /// Follow the operating system.
    System,
}

/// Telemetry opt-in and export endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelemetryConfig {
    /// Whether telemetry is collected.
    pub enabled: bool,
    /// OTLP endpoint to export to; `null` means the built-in default.
    pub otel_endpoint: Option<String>,
}

/// MCP server definitions and discovery order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct McpConfig {
    /// Named server definitions, keyed by server name.
    pub servers: Map<String, Value>,
    /// Order in which server sources are consulted. Replaced wholesale by
    /// any tier that sets it; never merged element-wise.
    pub discovery_priority: Vec<String>,
    /// Whether discovered servers start automatically.
    pub auto_start: bool,
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            servers: Map::new(),
            discovery_priority: vec![
                "builtin".to_owned(),
                "system".to_owned(),
                "user".to_owned(),
                "project".to_owned(),
            ],
            auto_start: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Installation defaults as a raw tree
// ---------------------------------------------------------------------------

/// The installation-tier defaults as a raw tree.
///
/// This is the base of every fold: every key here is present in every
/// resolved result. Mirrors [`PilotConfig::default`] field for field.
#[must_use]
pub fn default_tree() -> Value {
    json!({
        "$version": 1,
        "llm": {
            "model": "claude-sonnet-4-20250514",
            "maxTokens": 64_000,
            "thinkingEnabled": true,
            "temperature": 1.0,
        },
        "security": {
            "sandboxMode": true,
            "allowDangerousOperations": false,
        },
        "ui": {
            "theme": "dark",
            "fontSize": 14,
            "fontFamily": "monospace",
        },
        "telemetry": {
            "enabled": false,
            "otelEndpoint": null,
        },
        "mcp": {
            "servers": {},
            "discoveryPriority": ["builtin", "system", "user", "project"],
            "autoStart": false,
        },
    })
}
