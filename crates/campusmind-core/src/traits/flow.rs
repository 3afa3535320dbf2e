// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow adapter trait: the injectable decision function behind the two prompt flows.

use async_trait::async_trait;

use crate::error::CampusMindError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ResponseFlowInput, ResponseFlowOutput, TriageInput, TriageOutput};

/// One method per prompt flow.
///
/// Implementations return schema-validated outputs or an error; fallback and
/// failure policy are applied by the callers, not here.
#[async_trait]
pub trait FlowAdapter: PluginAdapter {
    /// Generates a short empathetic reply to the user's message.
    async fn respond(
        &self,
        input: &ResponseFlowInput,
    ) -> Result<ResponseFlowOutput, CampusMindError>;

    /// Classifies the user's message into one of the triage categories.
    async fn triage(&self, input: &TriageInput) -> Result<TriageOutput, CampusMindError>;
}
