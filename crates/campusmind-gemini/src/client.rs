// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use campusmind_core::CampusMindError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Default delay between attempts on a transient failure.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Thin client over `POST {base}/v1beta/models/{model}:generateContent`.
///
/// Retries once on 429/500/503/529 before surfacing the error.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl GeminiClient {
    /// Builds a client that authenticates with `x-goog-api-key`.
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Result<Self, CampusMindError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| CampusMindError::Config(format!("invalid Gemini API key: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| CampusMindError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            max_retries: 1,
            retry_delay: RETRY_DELAY,
        })
    }

    /// Model identifier requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Shortens the retry delay so tests don't sleep.
    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Sends one generation request, retrying transient failures.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, CampusMindError> {
        let url = self.endpoint();
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generateContent after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&url)
                .json(request)
                .send()
                .await
                .map_err(|e| CampusMindError::Provider {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, model = %self.model, "generateContent response");

            if status.is_success() {
                let body = response.text().await.map_err(|e| CampusMindError::Provider {
                    message: format!("failed to read response body: {e}"),
                    source: Some(Box::new(e)),
                })?;
                return serde_json::from_str(&body).map_err(|e| CampusMindError::Provider {
                    message: format!("failed to parse Gemini response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let error = api_error(status, &body);
            if is_transient(status) && attempt < self.max_retries {
                warn!(status = %status, "transient Gemini error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| CampusMindError::Provider {
            message: "generateContent failed after retries".into(),
            source: None,
        }))
    }
}

fn api_error(status: StatusCode, body: &str) -> CampusMindError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => format!(
            "Gemini API error ({} {}): {}",
            parsed.error.code, parsed.error.status, parsed.error.message
        ),
        Err(_) => format!("Gemini API returned {status}: {body}"),
    };
    CampusMindError::Provider {
        message,
        source: None,
    }
}

fn is_transient(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Content;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-key", base_url, "gemini-test")
            .unwrap()
            .with_retry_delay(Duration::from_millis(10))
    }

    fn request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text("hello")],
            generation_config: None,
        }
    }

    fn reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }],
            "modelVersion": "gemini-test-001"
        })
    }

    fn error_body(code: u16, status: &str, message: &str) -> serde_json::Value {
        serde_json::json!({"error": {"code": code, "status": status, "message": message}})
    }

    #[tokio::test]
    async fn success_returns_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("hi!")))
            .mount(&server)
            .await;

        let resp = test_client(&server.uri())
            .generate_content(&request())
            .await
            .unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("hi!"));
        assert_eq!(resp.model_version.as_deref(), Some("gemini-test-001"));
    }

    #[tokio::test]
    async fn retries_once_on_429() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(
                ResponseTemplate::new(429).set_body_json(error_body(
                    429,
                    "RESOURCE_EXHAUSTED",
                    "quota",
                )),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("after retry")))
            .mount(&server)
            .await;

        let resp = test_client(&server.uri())
            .generate_content(&request())
            .await
            .unwrap();
        assert_eq!(resp.first_text().as_deref(), Some("after retry"));
    }

    #[tokio::test]
    async fn bad_request_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
                400,
                "INVALID_ARGUMENT",
                "Invalid JSON payload",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&request())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("INVALID_ARGUMENT"), "got: {err}");
    }

    #[tokio::test]
    async fn exhausts_retries_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(503).set_body_json(error_body(
                503,
                "UNAVAILABLE",
                "overloaded",
            )))
            .expect(2)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate_content(&request())
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("UNAVAILABLE"), "got: {err}");
    }

    #[tokio::test]
    async fn sends_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply("ok")))
            .mount(&server)
            .await;

        let result = test_client(&server.uri()).generate_content(&request()).await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = GeminiClient::new("k", "http://localhost:1/", "m").unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:1/v1beta/models/m:generateContent"
        );
    }
}
