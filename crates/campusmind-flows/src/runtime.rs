// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-backed implementation of [`FlowAdapter`].
//!
//! Each flow renders its template, asks the model for JSON matching the
//! output contract, validates the reply, and deserializes it. Nothing here
//! interprets the user's text.

use std::sync::Arc;

use async_trait::async_trait;
use campusmind_core::error::CampusMindError;
use campusmind_core::traits::{FlowAdapter, ModelAdapter, PluginAdapter};
use campusmind_core::types::{
    AdapterType, HealthStatus, ModelRequest, ResponseFlowInput, ResponseFlowOutput, TriageInput,
    TriageOutput,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::prompts::{self, RESPONSE_TEMPLATE, TRIAGE_TEMPLATE};
use crate::schema::{OutputContract, extract_json};

/// Both flows, running on one hosted model.
pub struct PromptFlows {
    model: Arc<dyn ModelAdapter>,
    temperature: Option<f32>,
    response_contract: OutputContract,
    triage_contract: OutputContract,
}

impl PromptFlows {
    /// Compiles both output contracts up front.
    pub fn new(model: Arc<dyn ModelAdapter>) -> Result<Self, CampusMindError> {
        Ok(Self {
            model,
            temperature: None,
            response_contract: OutputContract::of::<ResponseFlowOutput>("response flow")?,
            triage_contract: OutputContract::of::<TriageOutput>("triage flow")?,
        })
    }

    /// Overrides the sampling temperature for both flows.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    async fn run<T: DeserializeOwned>(
        &self,
        template: &str,
        user_input: &str,
        contract: &OutputContract,
    ) -> Result<T, CampusMindError> {
        let request = ModelRequest {
            prompt: prompts::render(template, user_input),
            output_schema: Some(contract.schema().clone()),
            temperature: self.temperature,
        };
        let reply = self.model.generate(request).await?;
        debug!(model = %reply.model, bytes = reply.text.len(), "flow reply received");

        let value = extract_json(&reply.text)?;
        contract.check(&value)?;
        serde_json::from_value(value).map_err(|e| CampusMindError::Provider {
            message: format!("failed to decode flow reply: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl PluginAdapter for PromptFlows {
    fn name(&self) -> &str {
        "prompt-flows"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Flow
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusMindError> {
        self.model.health_check().await
    }

    async fn shutdown(&self) -> Result<(), CampusMindError> {
        self.model.shutdown().await
    }
}

#[async_trait]
impl FlowAdapter for PromptFlows {
    async fn respond(
        &self,
        input: &ResponseFlowInput,
    ) -> Result<ResponseFlowOutput, CampusMindError> {
        let output: ResponseFlowOutput = self
            .run(RESPONSE_TEMPLATE, &input.user_input, &self.response_contract)
            .await?;
        if output.response.trim().is_empty() {
            return Err(CampusMindError::Provider {
                message: "response flow returned an empty response".into(),
                source: None,
            });
        }
        Ok(output)
    }

    async fn triage(&self, input: &TriageInput) -> Result<TriageOutput, CampusMindError> {
        let output: TriageOutput = self
            .run(TRIAGE_TEMPLATE, &input.user_input, &self.triage_contract)
            .await?;
        Ok(enforce_crisis_priority(output))
    }
}

/// Escalation outranks every other suggestion: an escalated output never
/// carries resource tags.
pub fn enforce_crisis_priority(mut output: TriageOutput) -> TriageOutput {
    if output.escalate_to_professional && !output.suggested_resources.is_empty() {
        warn!(
            dropped = ?output.suggested_resources,
            "escalated triage output carried resources; clearing them"
        );
        output.suggested_resources.clear();
    }
    output
}
