// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Sprocket configuration system.

use sprocket_config::diagnostic::{ConfigError, suggest_key};
use sprocket_config::model::{NluProviderKind, SprocketConfig};
use sprocket_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_sprocket_config() {
    let toml = r#"
[service]
name = "dealer-assistant"
log_level = "debug"

[server]
host = "0.0.0.0"
port = 9000

[line]
channel_access_token = "token-123"
channel_secret = "secret-456"

[nlu]
provider = "local"

[nlu.remote]
api_key = "sk-test"
base_url = "https://api.example.com/v1"
model = "gpt-4o-mini"
timeout_secs = 15

[nlu.local]
base_url = "http://127.0.0.1:11434"
model = "qwen2.5:7b"
timeout_secs = 20
max_attempts = 2
cache_capacity = 64

[dialog]
history_limit = 40

[storage]
database_path = "/tmp/sprocket-test.db"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "dealer-assistant");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.line.channel_access_token.as_deref(), Some("token-123"));
    assert_eq!(config.line.channel_secret.as_deref(), Some("secret-456"));
    assert_eq!(config.nlu.provider, NluProviderKind::Local);
    assert_eq!(config.nlu.remote.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.nlu.remote.timeout_secs, 15);
    assert_eq!(config.nlu.local.timeout_secs, 20);
    assert_eq!(config.nlu.local.max_attempts, 2);
    assert_eq!(config.nlu.local.cache_capacity, 64);
    assert_eq!(config.dialog.history_limit, Some(40));
    assert_eq!(config.storage.database_path, "/tmp/sprocket-test.db");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.service.name, "sprocket");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8700);
    assert!(config.line.channel_access_token.is_none());
    assert!(config.line.channel_secret.is_none());
    assert_eq!(config.nlu.provider, NluProviderKind::Local);
    assert_eq!(config.nlu.local.max_attempts, 3);
    assert_eq!(config.nlu.local.timeout_secs, 30);
    assert!(config.dialog.history_limit.is_none());
    assert_eq!(config.storage.database_path, "sprocket.db");
}

/// Unknown field in [line] section produces an error.
#[test]
fn unknown_field_in_line_produces_error() {
    let toml = r#"
[line]
chanel_secret = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("chanel_secret"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field surfaces as an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_field_yields_suggestion_diagnostic() {
    let toml = r#"
[nlu]
provder = "rules"
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce diagnostics");
    let unknown = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { key, suggestion, .. } => Some((key.clone(), suggestion.clone())),
        _ => None,
    });
    let (key, suggestion) = unknown.expect("expected an UnknownKey diagnostic");
    assert_eq!(key, "provder");
    assert_eq!(suggestion.as_deref(), Some("provider"));
}

/// An invalid provider name is rejected at deserialization time.
#[test]
fn invalid_provider_name_is_rejected() {
    let toml = r#"
[nlu]
provider = "watson"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Validation errors are collected, not fail-fast.
#[test]
fn validation_collects_all_errors() {
    let toml = r#"
[nlu.local]
max_attempts = 0
cache_capacity = 0

[storage]
database_path = ""
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.len() >= 3, "expected all errors collected, got {}", errors.len());
}

/// Dotted overrides (the env-var shape) merge over TOML values.
#[test]
fn dotted_override_merges_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let toml_content = r#"
[nlu]
provider = "local"
"#;

    let config: SprocketConfig = Figment::new()
        .merge(Serialized::defaults(SprocketConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("nlu.provider", "rules"))
        .merge(("line.channel_access_token", "from-env"))
        .extract()
        .expect("should merge dotted overrides");

    assert_eq!(config.nlu.provider, NluProviderKind::Rules);
    assert_eq!(config.line.channel_access_token.as_deref(), Some("from-env"));
}

/// Typo suggestions come from Jaro-Winkler similarity.
#[test]
fn suggest_key_matches_close_typos_only() {
    let valid = &["channel_access_token", "channel_secret"];
    assert_eq!(
        suggest_key("channel_acess_token", valid),
        Some("channel_access_token".to_string())
    );
    assert_eq!(suggest_key("qqqq", valid), None);
}
