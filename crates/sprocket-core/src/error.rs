// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sprocket assistant service.

use thiserror::Error;

/// The primary error type used across all Sprocket adapter traits and core operations.
#[derive(Debug, Error)]
pub enum SprocketError {
    /// Configuration errors (invalid TOML, missing credentials, unknown provider).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messaging channel errors (reply/push rejected, connection failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// NLU provider errors (transport failure, malformed payload, unimplemented backend).
    #[error("nlu provider error: {message}")]
    Nlu {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SprocketError {
    /// Shorthand for an NLU error without an underlying source.
    pub fn nlu(message: impl Into<String>) -> Self {
        Self::Nlu {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a channel error without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }
}
