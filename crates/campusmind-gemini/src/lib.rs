// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini model adapter.
//!
//! Implements [`ModelAdapter`] over the `generateContent` REST API, with
//! structured JSON output when the request carries a schema.

pub mod client;
pub mod schema;
pub mod types;

use async_trait::async_trait;
use campusmind_config::model::GeminiConfig;
use campusmind_core::error::CampusMindError;
use campusmind_core::traits::{ModelAdapter, PluginAdapter};
use campusmind_core::types::{AdapterType, HealthStatus, ModelRequest, ModelResponse};
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::schema::sanitize_schema;
use crate::types::{Content, GenerateContentRequest, GenerationConfig};

/// Environment variables consulted, in order, when the config has no key.
const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Gemini-backed [`ModelAdapter`].
///
/// API key resolution order: `gemini.api_key` -> `GEMINI_API_KEY` ->
/// `GOOGLE_API_KEY` -> error.
pub struct GeminiModel {
    client: GeminiClient,
    default_temperature: Option<f32>,
}

impl GeminiModel {
    /// Creates the adapter from the `[gemini]` config section.
    pub fn new(config: &GeminiConfig) -> Result<Self, CampusMindError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), |var| std::env::var(var).ok())?;
        let client = GeminiClient::new(&api_key, &config.base_url, &config.model)?;
        info!(model = %config.model, "Gemini model adapter initialized");
        Ok(Self {
            client,
            default_temperature: config.temperature,
        })
    }

    /// Wraps an already-built client.
    pub fn with_client(client: GeminiClient, default_temperature: Option<f32>) -> Self {
        Self {
            client,
            default_temperature,
        }
    }

    fn to_wire(&self, request: &ModelRequest) -> GenerateContentRequest {
        let temperature = request.temperature.or(self.default_temperature);
        let generation_config = match (&request.output_schema, temperature) {
            (None, None) => None,
            (schema, temperature) => Some(GenerationConfig {
                response_mime_type: schema.as_ref().map(|_| "application/json".to_string()),
                response_schema: schema.as_ref().map(sanitize_schema),
                temperature,
            }),
        };
        GenerateContentRequest {
            contents: vec![Content::user_text(&request.prompt)],
            generation_config,
        }
    }
}

#[async_trait]
impl PluginAdapter for GeminiModel {
    fn name(&self) -> &str {
        "gemini"
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
        debug!("Gemini model adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl ModelAdapter for GeminiModel {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, CampusMindError> {
        let wire = self.to_wire(&request);
        let response = self.client.generate_content(&wire).await?;

        let Some(text) = response.first_text() else {
            let reason = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone())
                .unwrap_or_else(|| "no candidates".to_string());
            warn!(reason = %reason, "Gemini returned no usable candidate");
            return Err(CampusMindError::Provider {
                message: format!("model returned no content ({reason})"),
                source: None,
            });
        };

        Ok(ModelResponse {
            text,
            model: response
                .model_version
                .unwrap_or_else(|| self.client.model().to_string()),
        })
    }
}

/// Resolves the API key from config, then the environment.
fn resolve_api_key(
    config_key: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String, CampusMindError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.to_string());
    }

    API_KEY_VARS
        .iter()
        .filter_map(|var| env(var))
        .find(|key| !key.is_empty())
        .ok_or_else(|| {
            CampusMindError::Config(
                "Gemini API key not found. Set gemini.api_key in config or GEMINI_API_KEY environment variable.".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn api_key_from_config_wins() {
        let key = resolve_api_key(Some("cfg"), |_| Some("env".into())).unwrap();
        assert_eq!(key, "cfg");
    }

    #[test]
    fn api_key_falls_back_through_env_vars() {
        let key = resolve_api_key(Some(""), |var| {
            (var == "GOOGLE_API_KEY").then(|| "google".to_string())
        })
        .unwrap();
        assert_eq!(key, "google");
    }

    #[test]
    fn missing_api_key_is_config_error() {
        let err = resolve_api_key(None, no_env).unwrap_err();
        assert!(matches!(err, CampusMindError::Config(_)));
        assert!(err.to_string().contains("API key not found"));
    }

    fn model_for(server: &MockServer) -> GeminiModel {
        let client = GeminiClient::new("k", &server.uri(), "gemini-test").unwrap();
        GeminiModel::with_client(client, Some(0.3))
    }

    #[test]
    fn plain_prompt_has_only_temperature() {
        let client = GeminiClient::new("k", "http://localhost", "m").unwrap();
        let model = GeminiModel::with_client(client, Some(0.3));
        let wire = model.to_wire(&ModelRequest {
            prompt: "hi".into(),
            output_schema: None,
            temperature: None,
        });
        let config = wire.generation_config.unwrap();
        assert_eq!(config.temperature, Some(0.3));
        assert!(config.response_mime_type.is_none());
    }

    #[tokio::test]
    async fn structured_request_sends_sanitized_schema() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(body_partial_json(serde_json::json!({
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "responseSchema": {"type": "object"}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "{\"response\":\"hey\"}"}]}}]
            })))
            .mount(&server)
            .await;

        let resp = model_for(&server)
            .generate(ModelRequest {
                prompt: "say hey".into(),
                output_schema: Some(serde_json::json!({
                    "$schema": "https://json-schema.org/draft/2020-12/schema",
                    "title": "ResponseFlowOutput",
                    "type": "object"
                })),
                temperature: None,
            })
            .await
            .unwrap();
        assert_eq!(resp.text, "{\"response\":\"hey\"}");
        assert_eq!(resp.model, "gemini-test");

        let received = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
        let schema = &body["generationConfig"]["responseSchema"];
        assert!(schema.get("$schema").is_none());
        assert!(schema.get("title").is_none());
    }

    #[tokio::test]
    async fn blocked_prompt_is_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": {"blockReason": "SAFETY"}
            })))
            .mount(&server)
            .await;

        let err = model_for(&server)
            .generate(ModelRequest {
                prompt: "x".into(),
                output_schema: None,
                temperature: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("SAFETY"), "got: {err}");
    }

    #[tokio::test]
    async fn adapter_metadata() {
        let server = MockServer::start().await;
        let model = model_for(&server);
        assert_eq!(model.name(), "gemini");
        assert_eq!(model.adapter_type(), AdapterType::Model);
        assert_eq!(model.health_check().await.unwrap(), HealthStatus::Healthy);
    }
}
