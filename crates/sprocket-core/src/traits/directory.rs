// SPDX-FileCopyrightText: 2026 Sprocket Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account-linking directory trait.

use async_trait::async_trait;

use crate::error::SprocketError;
use crate::types::LinkedUser;

/// Resolves an external chat account to a linked business user.
///
/// An account the platform knows about but no business user claims is the
/// unregistered case — a normal branch, not an error.
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    async fn linked_user(
        &self,
        external_account_id: &str,
    ) -> Result<Option<LinkedUser>, SprocketError>;
}
