// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sprocket conversational assistant.
//!
//! This crate provides the foundational trait definitions, error type, and
//! domain types used throughout the Sprocket workspace. The dialog pipeline,
//! NLU providers, storage backends, and messaging channel all implement or
//! consume seams defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SprocketError;
pub use types::{
    Conversation, DialogContext, DialogState, HistoryEntry, Intent, MessageRole, NluResult,
    OutboundMessage, ReplyToken, TurnContext,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    AccountDirectory, ConversationStore, NluProvider, OrderLookup, ProductLookup, ReplySender,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprocket_error_has_all_variants() {
        // Verify all 6 error variants exist and can be constructed.
        let _config = SprocketError::Config("test".into());
        let _storage = SprocketError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _channel = SprocketError::Channel {
            message: "test".into(),
            source: None,
        };
        let _nlu = SprocketError::Nlu {
            message: "test".into(),
            source: None,
        };
        let _timeout = SprocketError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        let _internal = SprocketError::Internal("test".into());
    }

    #[test]
    fn error_shorthands_carry_messages() {
        let e = SprocketError::nlu("backend not implemented");
        assert!(e.to_string().contains("backend not implemented"));
        let e = SprocketError::channel("reply rejected");
        assert!(e.to_string().contains("reply rejected"));
    }

    #[test]
    fn all_trait_modules_are_exported() {
        // Compile-time check that every adapter trait is reachable through
        // the public API.
        fn _assert_nlu<T: NluProvider>() {}
        fn _assert_store<T: ConversationStore>() {}
        fn _assert_orders<T: OrderLookup>() {}
        fn _assert_products<T: ProductLookup>() {}
        fn _assert_directory<T: AccountDirectory>() {}
        fn _assert_channel<T: ReplySender>() {}
    }
}
