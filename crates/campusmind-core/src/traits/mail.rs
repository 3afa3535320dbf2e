// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mail adapter trait for outbound email.

use async_trait::async_trait;

use crate::error::CampusMindError;
use crate::traits::adapter::PluginAdapter;
use crate::types::SupportEmail;

/// Adapter for an outbound mail transport.
#[async_trait]
pub trait MailAdapter: PluginAdapter {
    /// Delivers an already-validated support email.
    async fn send(&self, email: &SupportEmail) -> Result<(), CampusMindError>;
}
