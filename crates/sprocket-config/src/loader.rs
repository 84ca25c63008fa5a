// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./sprocket.toml` > `~/.config/sprocket/sprocket.toml`
//! > `/etc/sprocket/sprocket.toml` with environment variable overrides via
//! `SPROCKET_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SprocketConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/sprocket/sprocket.toml` (system-wide)
/// 3. `~/.config/sprocket/sprocket.toml` (user XDG config)
/// 4. `./sprocket.toml` (local directory)
/// 5. `SPROCKET_*` environment variables
pub fn load_config() -> Result<SprocketConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SprocketConfig::default()))
        .merge(Toml::file("/etc/sprocket/sprocket.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("sprocket/sprocket.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("sprocket.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<SprocketConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SprocketConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SprocketConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SprocketConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `SPROCKET_LINE_CHANNEL_ACCESS_TOKEN` must
/// map to `line.channel_access_token`, not `line.channel.access.token`.
fn env_provider() -> Env {
    Env::prefixed("SPROCKET_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: SPROCKET_LINE_CHANNEL_SECRET -> "line_channel_secret"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("server_", "server.", 1)
            .replacen("line_", "line.", 1)
            .replacen("nlu_remote_", "nlu.remote.", 1)
            .replacen("nlu_local_", "nlu.local.", 1)
            .replacen("nlu_", "nlu.", 1)
            .replacen("dialog_", "dialog.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
