// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sprocket integration tests.
//!
//! Deterministic doubles for every adapter seam: scripted NLU providers, a
//! recording outbound channel, and in-memory store/directory/catalog
//! implementations with shared fixtures.

pub mod memory;
pub mod mock_channel;
pub mod mock_nlu;

pub use memory::{
    MemoryConversationStore, StaticCatalog, StaticDirectory, chainring_products, sample_order,
};
pub use mock_channel::{MockChannel, SentRecord};
pub use mock_nlu::{FailingNlu, MockNlu, ScriptedOutcome};
