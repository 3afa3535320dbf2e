// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for CampusMind.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level CampusMind configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CampusMindConfig {
    /// Application identity and logging.
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Session cookie and gate settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Hosted model settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Prompt flow runtime settings.
    #[serde(default)]
    pub flows: FlowsConfig,

    /// Identity provider settings.
    #[serde(default)]
    pub firebase: FirebaseConfig,

    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,

    /// Appointment booking settings.
    #[serde(default)]
    pub booking: BookingConfig,
}

/// Application identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name used in prompts and logs.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "CampusMind".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9002
}

/// How the session gate decides whether a request carries a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Cookie presence alone counts as a session.
    #[default]
    Presence,
    /// The cookie must also verify with the identity provider.
    Verify,
}

/// Session cookie and gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Session lifetime in seconds.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,

    /// Mark the cookie `Secure`.
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Gate decision mode.
    #[serde(default)]
    pub gate_mode: GateMode,

    /// Views that require a session.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,

    /// Views that are only reachable without a session.
    #[serde(default = "default_auth_paths")]
    pub auth_paths: Vec<String>,

    /// Where requests without a session are sent.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Where requests with a session are sent away from auth views.
    #[serde(default = "default_home_path")]
    pub home_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            max_age_secs: default_max_age_secs(),
            secure: true,
            gate_mode: GateMode::default(),
            protected_paths: default_protected_paths(),
            auth_paths: default_auth_paths(),
            login_path: default_login_path(),
            home_path: default_home_path(),
        }
    }
}

fn default_cookie_name() -> String {
    "firebase-session".to_string()
}

fn default_max_age_secs() -> u64 {
    60 * 60 * 24 * 5
}

fn default_true() -> bool {
    true
}

fn default_protected_paths() -> Vec<String> {
    [
        "/",
        "/chat",
        "/scheduling",
        "/consultations",
        "/booking",
        "/resources",
        "/forum",
        "/profile",
        "/admin",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_auth_paths() -> Vec<String> {
    vec!["/auth/login".to_string(), "/auth/signup".to_string()]
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

/// Hosted model configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to `GEMINI_API_KEY` / `GOOGLE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Sampling temperature for flow prompts.
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_gemini_base_url(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

/// What the triage entry point returns when the flow itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageFailurePolicy {
    /// Surface the failure to the caller.
    #[default]
    FailClosed,
    /// Answer with the general-chat shape.
    GeneralChat,
}

/// Prompt flow runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FlowsConfig {
    /// Upper bound on a single flow invocation.
    #[serde(default = "default_flow_timeout_secs")]
    pub timeout_secs: u64,

    /// Behavior of the triage entry point on flow failure.
    #[serde(default)]
    pub triage_on_failure: TriageFailurePolicy,

    /// Reply used when the response flow fails.
    #[serde(default = "default_fallback_response")]
    pub fallback_response: String,
}

impl Default for FlowsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_flow_timeout_secs(),
            triage_on_failure: TriageFailurePolicy::default(),
            fallback_response: default_fallback_response(),
        }
    }
}

fn default_flow_timeout_secs() -> u64 {
    30
}

/// Fixed apology returned when the response flow fails.
pub const DEFAULT_FALLBACK_RESPONSE: &str =
    "I'm sorry, but I'm having trouble connecting right now. Please try again in a moment.";

fn default_fallback_response() -> String {
    DEFAULT_FALLBACK_RESPONSE.to_string()
}

/// Identity provider configuration.
#[derive(Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FirebaseConfig {
    /// Project id. Defaults to the service account's `project_id`.
    #[serde(default)]
    pub project_id: Option<String>,

    /// Service account key as inline JSON. Falls back to `FIREBASE_SERVICE_ACCOUNT_KEY`.
    #[serde(default)]
    pub service_account_key: Option<String>,

    /// Path to a service account key file.
    #[serde(default)]
    pub service_account_path: Option<String>,

    /// Web API key, required only for server-side password sign-in.
    #[serde(default)]
    pub web_api_key: Option<String>,

    /// Override for the Identity Toolkit base URL.
    #[serde(default)]
    pub identity_base_url: Option<String>,
}

impl std::fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("project_id", &self.project_id)
            .field(
                "service_account_key",
                &self.service_account_key.as_ref().map(|_| "[redacted]"),
            )
            .field("service_account_path", &self.service_account_path)
            .field("web_api_key", &self.web_api_key.as_ref().map(|_| "[redacted]"))
            .field("identity_base_url", &self.identity_base_url)
            .finish()
    }
}

/// Outbound mail configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// SMTP relay host. `None` disables support email.
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,

    /// Sender used when the form leaves `fromEmail` empty.
    #[serde(default = "default_from")]
    pub default_from: String,
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .field("default_from", &self.default_from)
            .finish()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: None,
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
            default_from: default_from(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from() -> String {
    "support@campusmind.app".to_string()
}

/// Appointment booking configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// How many days ahead an appointment may be booked.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
        }
    }
}

fn default_horizon_days() -> u32 {
    60
}
