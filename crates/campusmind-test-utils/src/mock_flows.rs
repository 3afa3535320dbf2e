// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock flow runtime for chat and gateway tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use campusmind_core::CampusMindError;
use campusmind_core::traits::{FlowAdapter, PluginAdapter};
use campusmind_core::types::{
    AdapterType, HealthStatus, ResponseFlowInput, ResponseFlowOutput, TriageCategory, TriageInput,
    TriageOutput,
};

/// A mock flow runtime.
///
/// Replies are popped from a FIFO queue; when the queue is empty a default
/// "mock response" is returned. Triage answers with the configured output,
/// or the general-chat shape.
pub struct MockFlows {
    replies: Mutex<VecDeque<String>>,
    triage: Mutex<Option<TriageOutput>>,
    failing: AtomicBool,
    delay: Option<Duration>,
    respond_calls: AtomicUsize,
    triage_calls: AtomicUsize,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockFlows {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            triage: Mutex::new(None),
            failing: AtomicBool::new(false),
            delay: None,
            respond_calls: AtomicUsize::new(0),
            triage_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        let flows = Self::new();
        *lock(&flows.replies) = replies.into();
        flows
    }

    /// Triage output returned from now on.
    pub fn with_triage(self, output: TriageOutput) -> Self {
        *lock(&self.triage) = Some(output);
        self
    }

    /// Sleep this long inside every invocation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make every invocation fail with a provider error.
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        lock(&self.replies).push_back(reply.into());
    }

    pub fn respond_calls(&self) -> usize {
        self.respond_calls.load(Ordering::SeqCst)
    }

    pub fn triage_calls(&self) -> usize {
        self.triage_calls.load(Ordering::SeqCst)
    }

    async fn invoke(&self) -> Result<(), CampusMindError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CampusMindError::Provider {
                message: "mock flow failure".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}

impl Default for MockFlows {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockFlows {
    fn name(&self) -> &str {
        "mock-flows"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Flow
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusMindError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CampusMindError> {
        Ok(())
    }
}

#[async_trait]
impl FlowAdapter for MockFlows {
    async fn respond(
        &self,
        _input: &ResponseFlowInput,
    ) -> Result<ResponseFlowOutput, CampusMindError> {
        self.respond_calls.fetch_add(1, Ordering::SeqCst);
        self.invoke().await?;
        let response = lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string());
        Ok(ResponseFlowOutput { response })
    }

    async fn triage(&self, _input: &TriageInput) -> Result<TriageOutput, CampusMindError> {
        self.triage_calls.fetch_add(1, Ordering::SeqCst);
        self.invoke().await?;
        Ok(lock(&self.triage)
            .clone()
            .unwrap_or_else(|| TriageCategory::GeneralChat.canonical_output()))
    }
}
