// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Each trait is a seam between the dialog pipeline and an external
//! collaborator: the NLU backend, the conversation store, the read-only
//! business catalog, the account-linking directory, and the outbound
//! messaging channel. Implementations are selected once at startup from
//! configuration so tests can substitute deterministic doubles.

pub mod catalog;
pub mod channel;
pub mod directory;
pub mod nlu;
pub mod store;

pub use catalog::{OrderLookup, ProductLookup};
pub use channel::ReplySender;
pub use directory::AccountDirectory;
pub use nlu::NluProvider;
pub use store::ConversationStore;
