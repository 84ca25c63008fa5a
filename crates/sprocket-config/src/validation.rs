// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and sane
//! retry/cache bounds. Missing NLU credentials are deliberately NOT a
//! validation error: an unconfigured provider fails over to the rule
//! engine at classification time instead of refusing to start.

use crate::diagnostic::ConfigError;
use crate::model::SprocketConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SprocketConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate server.host is not empty and looks like an IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate provider base URLs are not empty
    if config.nlu.remote.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "nlu.remote.base_url must not be empty".to_string(),
        });
    }
    if config.nlu.local.base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "nlu.local.base_url must not be empty".to_string(),
        });
    }

    // Validate retry and timeout bounds
    if config.nlu.local.max_attempts == 0 {
        errors.push(ConfigError::Validation {
            message: "nlu.local.max_attempts must be at least 1".to_string(),
        });
    }
    if config.nlu.local.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "nlu.local.timeout_secs must be at least 1".to_string(),
        });
    }
    if config.nlu.remote.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "nlu.remote.timeout_secs must be at least 1".to_string(),
        });
    }

    // Validate cache capacity
    if config.nlu.local.cache_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "nlu.local.cache_capacity must be at least 1".to_string(),
        });
    }

    // Validate history retention, if set
    if let Some(limit) = config.dialog.history_limit
        && limit < 2
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "dialog.history_limit must keep at least one full turn (2 entries), got {limit}"
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = SprocketConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = SprocketConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn zero_max_attempts_fails_validation() {
        let mut config = SprocketConfig::default();
        config.nlu.local.max_attempts = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("max_attempts"))
        ));
    }

    #[test]
    fn zero_cache_capacity_fails_validation() {
        let mut config = SprocketConfig::default();
        config.nlu.local.cache_capacity = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("cache_capacity"))
        ));
    }

    #[test]
    fn tiny_history_limit_fails_validation() {
        let mut config = SprocketConfig::default();
        config.dialog.history_limit = Some(1);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("history_limit"))
        ));
    }

    #[test]
    fn missing_nlu_credentials_are_not_fatal() {
        // An unconfigured remote provider falls back at runtime; it must not
        // fail validation.
        let mut config = SprocketConfig::default();
        config.nlu.provider = crate::model::NluProviderKind::Remote;
        config.nlu.remote.api_key = None;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = SprocketConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.storage.database_path = "/tmp/test.db".to_string();
        config.dialog.history_limit = Some(40);
        assert!(validate_config(&config).is_ok());
    }
}
