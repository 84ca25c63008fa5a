// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sprocket assistant service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages. The
//! configuration surface is deliberately enumerated; there are no other
//! knobs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Sprocket configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SprocketConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP server bind settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// LINE Messaging API credentials.
    #[serde(default)]
    pub line: LineConfig,

    /// NLU provider selection and per-provider settings.
    #[serde(default)]
    pub nlu: NluConfig,

    /// Dialog behavior settings.
    #[serde(default)]
    pub dialog: DialogConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "sprocket".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8700
}

/// LINE Messaging API configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LineConfig {
    /// Channel access token for reply/push calls. `None` disables sending.
    #[serde(default)]
    pub channel_access_token: Option<String>,

    /// Channel secret used to verify webhook signatures. `None` disables
    /// signature verification (local development only).
    #[serde(default)]
    pub channel_secret: Option<String>,
}

/// Which NLU backend classifies inbound messages.
///
/// Exactly one provider is active at a time. `Google` and `Dialogflow` are
/// defined but unimplemented; selecting them always fails over to the rule
/// engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NluProviderKind {
    /// Hosted chat-completions API.
    Remote,
    /// HTTP-hosted local LLM (Ollama generate API).
    #[default]
    Local,
    /// Deterministic rule engine (also the universal fallback).
    Rules,
    /// Placeholder; always fails over.
    Google,
    /// Placeholder; always fails over.
    Dialogflow,
}

/// NLU provider selection and per-provider settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NluConfig {
    /// Active provider, selected once at startup.
    #[serde(default)]
    pub provider: NluProviderKind,

    /// Hosted chat API settings.
    #[serde(default)]
    pub remote: RemoteNluConfig,

    /// Local LLM settings.
    #[serde(default)]
    pub local: LocalNluConfig,
}

/// Hosted chat-completions provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteNluConfig {
    /// API key. `None` makes the provider fail over at classification time;
    /// it is never fatal at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the chat-completions API.
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_remote_model")]
    pub model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteNluConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_remote_base_url(),
            model: default_remote_model(),
            timeout_secs: default_remote_timeout_secs(),
        }
    }
}

fn default_remote_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_remote_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_remote_timeout_secs() -> u64 {
    30
}

/// Local HTTP-hosted LLM provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LocalNluConfig {
    /// Base URL of the local LLM server.
    #[serde(default = "default_local_base_url")]
    pub base_url: String,

    /// Model name to request.
    #[serde(default = "default_local_model")]
    pub model: String,

    /// Request timeout in seconds; the call is aborted when exceeded.
    #[serde(default = "default_local_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum classification attempts before failing over.
    #[serde(default = "default_local_max_attempts")]
    pub max_attempts: u32,

    /// Bounded classification cache capacity (entries).
    #[serde(default = "default_local_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for LocalNluConfig {
    fn default() -> Self {
        Self {
            base_url: default_local_base_url(),
            model: default_local_model(),
            timeout_secs: default_local_timeout_secs(),
            max_attempts: default_local_max_attempts(),
            cache_capacity: default_local_cache_capacity(),
        }
    }
}

fn default_local_base_url() -> String {
    "http://127.0.0.1:11434".to_string()
}

fn default_local_model() -> String {
    "qwen2.5:7b".to_string()
}

fn default_local_timeout_secs() -> u64 {
    30
}

fn default_local_max_attempts() -> u32 {
    3
}

fn default_local_cache_capacity() -> usize {
    128
}

/// Dialog behavior configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DialogConfig {
    /// Maximum history entries retained per conversation. `None` keeps the
    /// full history (the historical behavior); when set, the oldest entries
    /// are pruned after each turn.
    #[serde(default)]
    pub history_limit: Option<usize>,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "sprocket.db".to_string()
}
