// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end HTTP testing.
//!
//! `TestHarness` assembles the full router over mock adapters and drives it
//! in-process with `tower::ServiceExt::oneshot`; no socket is opened.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use campusmind_config::model::CampusMindConfig;
use campusmind_core::types::{TriageOutput, UserRecord};
use campusmind_core::{IdentityAdapter, MailAdapter};
use campusmind_flows::FlowService;
use campusmind_gateway::{AppState, router};
use serde_json::Value;
use tower::ServiceExt;

use crate::mock_flows::MockFlows;
use crate::mock_identity::MockIdentity;
use crate::mock_mail::MockMail;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: CampusMindConfig,
    replies: Vec<String>,
    triage: Option<TriageOutput>,
    users: Vec<UserRecord>,
    flow_delay: Option<Duration>,
    identity: bool,
    mail: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        let mut config = CampusMindConfig::default();
        config.session.secure = false;
        Self {
            config,
            replies: Vec::new(),
            triage: None,
            users: Vec::new(),
            flow_delay: None,
            identity: true,
            mail: true,
        }
    }

    /// Replies the mock flows return, in order.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_triage(mut self, output: TriageOutput) -> Self {
        self.triage = Some(output);
        self
    }

    /// Records preloaded into the mock identity provider.
    pub fn with_users(mut self, users: Vec<UserRecord>) -> Self {
        self.users = users;
        self
    }

    pub fn with_flow_delay(mut self, delay: Duration) -> Self {
        self.flow_delay = Some(delay);
        self
    }

    /// Adjust the configuration before the state is built.
    pub fn with_config(mut self, edit: impl FnOnce(&mut CampusMindConfig)) -> Self {
        edit(&mut self.config);
        self
    }

    /// Build without an identity provider, as when no service account is set.
    pub fn without_identity(mut self) -> Self {
        self.identity = false;
        self
    }

    /// Build without a mail transport.
    pub fn without_mail(mut self) -> Self {
        self.mail = false;
        self
    }

    pub fn build(self) -> TestHarness {
        let mut flows = MockFlows::with_replies(self.replies);
        if let Some(delay) = self.flow_delay {
            flows = flows.with_delay(delay);
        }
        if let Some(triage) = self.triage {
            flows = flows.with_triage(triage);
        }
        let flows = Arc::new(flows);
        let identity = Arc::new(MockIdentity::with_users(self.users));
        let mail = Arc::new(MockMail::new());

        let service = FlowService::new(flows.clone(), &self.config.flows);
        let state = AppState::new(
            self.config,
            service,
            self.identity
                .then(|| identity.clone() as Arc<dyn IdentityAdapter>),
            self.mail.then(|| mail.clone() as Arc<dyn MailAdapter>),
        );

        TestHarness {
            router: router(state.clone()),
            state,
            flows,
            identity,
            mail,
        }
    }
}

/// A complete router over mock adapters.
pub struct TestHarness {
    pub router: Router,
    pub state: AppState,
    pub flows: Arc<MockFlows>,
    pub identity: Arc<MockIdentity>,
    pub mail: Arc<MockMail>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or `Value::Null` when the body is empty or not JSON.
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// The first `Set-Cookie` header.
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` from the `Set-Cookie` header, ready for a `Cookie` header.
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next())
            .map(str::to_string)
    }
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Harness with defaults.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// A `Cookie` header value carrying a fresh session for `uid`.
    pub fn session_for(&self, uid: &str) -> String {
        format!(
            "{}={}",
            self.state.config.session.cookie_name,
            self.identity.issue_session(uid)
        )
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, None, cookie).await
    }

    pub async fn post(&self, path: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.send(Method::POST, path, Some(body), cookie).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("test request is well-formed");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        tracing::debug!(path, status = status.as_u16(), "test request");
        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
