// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry points callers actually use.
//!
//! [`FlowService`] puts a deadline on every flow call and applies the failure
//! semantics: the response flow always answers (falling back to a fixed
//! apology), the triage flow follows [`TriageFailurePolicy`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use campusmind_config::model::{FlowsConfig, TriageFailurePolicy};
use campusmind_core::CampusMindError;
use campusmind_core::traits::FlowAdapter;
use campusmind_core::types::{
    ResponseFlowInput, ResponseFlowOutput, TriageCategory, TriageInput, TriageOutput,
};
use tracing::{error, info, warn};

/// Failure-aware wrapper around a [`FlowAdapter`].
#[derive(Clone)]
pub struct FlowService {
    flows: Arc<dyn FlowAdapter>,
    timeout: Duration,
    fallback: String,
    triage_policy: TriageFailurePolicy,
}

impl FlowService {
    pub fn new(flows: Arc<dyn FlowAdapter>, config: &FlowsConfig) -> Self {
        Self {
            flows,
            timeout: Duration::from_secs(config.timeout_secs),
            fallback: config.fallback_response.clone(),
            triage_policy: config.triage_on_failure,
        }
    }

    /// The reply used whenever the response flow fails.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// The adapter behind this service.
    pub fn adapter(&self) -> &Arc<dyn FlowAdapter> {
        &self.flows
    }

    /// Runs the response flow. Never fails: any error becomes the fallback.
    pub async fn respond(&self, input: &ResponseFlowInput) -> ResponseFlowOutput {
        match self.bounded(self.flows.respond(input)).await {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "response flow failed, returning fallback");
                ResponseFlowOutput {
                    response: self.fallback.clone(),
                }
            }
        }
    }

    /// Runs the triage flow under the configured failure policy.
    pub async fn triage(&self, input: &TriageInput) -> Result<TriageOutput, CampusMindError> {
        match self.bounded(self.flows.triage(input)).await {
            Ok(output) => {
                info!(category = %output.category(), "triage classified input");
                Ok(output)
            }
            Err(e) => match self.triage_policy {
                TriageFailurePolicy::FailClosed => {
                    error!(error = %e, "triage flow failed");
                    Err(e)
                }
                TriageFailurePolicy::GeneralChat => {
                    warn!(error = %e, "triage flow failed, answering as general chat");
                    Ok(TriageCategory::GeneralChat.canonical_output())
                }
            },
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, CampusMindError>>,
    ) -> Result<T, CampusMindError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| CampusMindError::Timeout {
                duration: self.timeout,
            })?
    }
}

impl std::fmt::Debug for FlowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowService")
            .field("flows", &self.flows.name())
            .field("timeout", &self.timeout)
            .field("triage_policy", &self.triage_policy)
            .finish()
    }
}
