// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock hosted model for deterministic flow tests.
//!
//! `MockModel` implements `ModelAdapter` with a FIFO script of replies and
//! errors, and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use campusmind_core::CampusMindError;
use campusmind_core::traits::{ModelAdapter, PluginAdapter};
use campusmind_core::types::{AdapterType, HealthStatus, ModelRequest, ModelResponse};

enum Scripted {
    Text(String),
    Error(String),
}

/// A mock model that replays a script.
///
/// An exhausted script is a provider error, so a test that forgets to
/// script a reply sees the failure path rather than a made-up answer.
pub struct MockModel {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
    delay: Option<Duration>,
}

impl MockModel {
    /// Create a mock model with an empty script.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Create a mock model pre-loaded with raw reply texts.
    pub fn with_responses(responses: Vec<String>) -> Self {
        let model = Self::new();
        let script = responses.into_iter().map(Scripted::Text).collect();
        Self {
            script: Arc::new(Mutex::new(script)),
            ..model
        }
    }

    /// Sleep this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a reply text.
    pub async fn push_text(&self, text: impl Into<String>) {
        self.script.lock().await.push_back(Scripted::Text(text.into()));
    }

    /// Queue a transport failure.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .await
            .push_back(Scripted::Error(message.into()));
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockModel {
    fn name(&self) -> &str {
        "mock-model"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Model
    }

    async fn health_check(&self) -> Result<HealthStatus, CampusMindError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), CampusMindError> {
        Ok(())
    }
}

#[async_trait]
impl ModelAdapter for MockModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, CampusMindError> {
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.script.lock().await.pop_front() {
            Some(Scripted::Text(text)) => Ok(ModelResponse {
                text,
                model: "mock-model".to_string(),
            }),
            Some(Scripted::Error(message)) => Err(CampusMindError::Provider {
                message,
                source: None,
            }),
            None => Err(CampusMindError::Provider {
                message: "mock model has no scripted reply".to_string(),
                source: None,
            }),
        }
    }
}
