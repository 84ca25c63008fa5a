// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sprocket config` command implementation.

use sprocket_config::SprocketConfig;

const REDACTED: &str = "***";

/// Prints the effective configuration as TOML with secrets redacted.
pub fn run_config(config: &SprocketConfig) {
    let mut redacted = config.clone();
    if redacted.line.channel_access_token.is_some() {
        redacted.line.channel_access_token = Some(REDACTED.to_string());
    }
    if redacted.line.channel_secret.is_some() {
        redacted.line.channel_secret = Some(REDACTED.to_string());
    }
    if redacted.nlu.remote.api_key.is_some() {
        redacted.nlu.remote.api_key = Some(REDACTED.to_string());
    }

    match toml::to_string_pretty(&redacted) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("error: failed to render configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_redacted() {
        let mut config = SprocketConfig::default();
        config.line.channel_access_token = Some("real-token".into());
        config.nlu.remote.api_key = Some("sk-real".into());

        let mut redacted = config.clone();
        if redacted.line.channel_access_token.is_some() {
            redacted.line.channel_access_token = Some(REDACTED.to_string());
        }
        if redacted.nlu.remote.api_key.is_some() {
            redacted.nlu.remote.api_key = Some(REDACTED.to_string());
        }

        let rendered = toml::to_string_pretty(&redacted).unwrap();
        assert!(!rendered.contains("real-token"));
        assert!(!rendered.contains("sk-real"));
        assert!(rendered.contains("***"));
    }
}
