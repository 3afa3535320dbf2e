// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the CampusMind services.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CampusMindError;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Model,
    Flow,
    Identity,
    Mail,
}

// --- Chat transcript ---

/// Creation-ordered identifier of a chat turn within one transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(pub u64);

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// A single immutable entry in a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub id: TurnId,
    pub sender: Sender,
    pub text: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

// --- Prompt flow contracts ---

/// Input to the response flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFlowInput {
    /// The user input describing their current mental state.
    pub user_input: String,
}

impl ResponseFlowInput {
    /// Builds a validated input. Blank text is rejected before any model call.
    pub fn new(user_input: impl Into<String>) -> Result<Self, CampusMindError> {
        let user_input = user_input.into();
        if user_input.trim().is_empty() {
            return Err(CampusMindError::validation(
                "userInput",
                "Please enter a message.",
            ));
        }
        Ok(Self { user_input })
    }
}

/// Output of the response flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResponseFlowOutput {
    /// A short, empathetic, and conversational response. It should ask clarifying
    /// questions if the user seems distressed, or just be friendly for simple greetings.
    pub response: String,
}

/// Input to the triage flow. Same contract shape as [`ResponseFlowInput`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriageInput {
    /// The user input describing their current mental or emotional state.
    pub user_input: String,
}

impl TriageInput {
    /// Builds a validated input. Blank text is rejected before any model call.
    pub fn new(user_input: impl Into<String>) -> Result<Self, CampusMindError> {
        let user_input = user_input.into();
        if user_input.trim().is_empty() {
            return Err(CampusMindError::validation(
                "userInput",
                "Please enter a message.",
            ));
        }
        Ok(Self { user_input })
    }
}

/// Resource tag pointing at the booking view.
pub const RESOURCE_BOOKING: &str = "booking";
/// Resource tag pointing at the resource library.
pub const RESOURCE_LIBRARY: &str = "resources";

/// Structured classification returned by the triage flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriageOutput {
    /// A summary of the user needs and recommended resources or actions. If the user
    /// expresses thoughts of self-harm, direct them to immediate professional help.
    pub triage_result: String,
    /// A list of suggested resources (e.g., "booking", "resources") based on the user
    /// input. Empty if no resources are needed.
    pub suggested_resources: Vec<String>,
    /// Whether the situation requires immediate escalation to a professional mental
    /// health resource.
    pub escalate_to_professional: bool,
}

impl TriageOutput {
    /// Derives the category this output belongs to.
    ///
    /// Escalation outranks everything; a library suggestion outranks a booking one.
    pub fn category(&self) -> TriageCategory {
        if self.escalate_to_professional {
            TriageCategory::UrgentCrisis
        } else if self.suggests(RESOURCE_LIBRARY) {
            TriageCategory::NeedsResources
        } else if self.suggests(RESOURCE_BOOKING) {
            TriageCategory::NeedsBooking
        } else {
            TriageCategory::GeneralChat
        }
    }

    /// Returns true if the given resource tag was suggested.
    pub fn suggests(&self, tag: &str) -> bool {
        self.suggested_resources.iter().any(|r| r == tag)
    }
}

/// The four mutually exclusive triage categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TriageCategory {
    GeneralChat,
    NeedsResources,
    NeedsBooking,
    UrgentCrisis,
}

impl TriageCategory {
    /// The canonical output shape for this category.
    pub fn canonical_output(self) -> TriageOutput {
        let (summary, resources, escalate): (&str, &[&str], bool) = match self {
            Self::GeneralChat => (
                "General conversation, no immediate resources needed.",
                &[],
                false,
            ),
            Self::NeedsResources => (
                "User is seeking information or coping strategies.",
                &[RESOURCE_LIBRARY],
                false,
            ),
            Self::NeedsBooking => (
                "User may benefit from talking to a counselor.",
                &[RESOURCE_BOOKING],
                false,
            ),
            Self::UrgentCrisis => (
                "User is in distress and requires immediate escalation to professional help.",
                &[],
                true,
            ),
        };
        TriageOutput {
            triage_result: summary.to_string(),
            suggested_resources: resources.iter().map(|s| s.to_string()).collect(),
            escalate_to_professional: escalate,
        }
    }
}

// --- Model transport ---

/// A single-shot structured generation request to a hosted model.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    /// Fully rendered prompt text.
    pub prompt: String,
    /// JSON Schema the reply must conform to, if structured output is requested.
    pub output_schema: Option<serde_json::Value>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
}

/// Raw reply from a hosted model.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    /// Concatenated text parts of the first candidate.
    pub text: String,
    /// Model identifier that produced the reply.
    pub model: String,
}

// --- Identity ---

/// Capability level of an identity record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

/// Capability checks for an authenticated principal.
pub trait Capabilities {
    /// Returns the principal's role.
    fn role(&self) -> Role;

    /// Whether the principal may open the administrative view.
    fn can_administer(&self) -> bool {
        self.role() == Role::Admin
    }
}

/// An identity record as owned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    pub disabled: bool,
    #[serde(default)]
    pub role: Role,
}

impl Capabilities for UserRecord {
    fn role(&self) -> Role {
        self.role
    }
}

/// Verified contents of a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: String,
    pub email: Option<String>,
    /// Seconds since the Unix epoch.
    pub issued_at: i64,
    /// Seconds since the Unix epoch.
    pub expires_at: i64,
    pub role: Role,
}

impl Capabilities for SessionClaims {
    fn role(&self) -> Role {
        self.role
    }
}

/// Account creation request.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}

/// A provider-minted session credential.
#[derive(Clone)]
pub struct SessionCookie {
    /// Opaque signed token.
    pub value: String,
    /// Lifetime the provider granted.
    pub max_age: std::time::Duration,
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("value", &"[redacted]")
            .field("max_age", &self.max_age)
            .finish()
    }
}

// --- Mail ---

/// A support email submitted from the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportEmail {
    pub to_email: String,
    #[serde(default)]
    pub from_email: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Result shape returned by form-style actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_outputs_map_back_to_their_category() {
        for category in [
            TriageCategory::GeneralChat,
            TriageCategory::NeedsResources,
            TriageCategory::NeedsBooking,
            TriageCategory::UrgentCrisis,
        ] {
            assert_eq!(category.canonical_output().category(), category);
        }
    }

    #[test]
    fn crisis_shape_has_no_resources() {
        let out = TriageCategory::UrgentCrisis.canonical_output();
        assert!(out.escalate_to_professional);
        assert!(out.suggested_resources.is_empty());
    }

    #[test]
    fn escalation_outranks_suggestions() {
        let out = TriageOutput {
            triage_result: "x".into(),
            suggested_resources: vec!["booking".into()],
            escalate_to_professional: true,
        };
        assert_eq!(out.category(), TriageCategory::UrgentCrisis);
    }

    #[test]
    fn library_outranks_booking() {
        let out = TriageOutput {
            triage_result: "User is seeking information or coping strategies.".into(),
            suggested_resources: vec!["resources".into(), "booking".into()],
            escalate_to_professional: false,
        };
        assert_eq!(out.category(), TriageCategory::NeedsResources);
    }

    #[test]
    fn flow_types_use_camel_case_on_the_wire() {
        let json = serde_json::to_value(TriageCategory::NeedsBooking.canonical_output()).unwrap();
        assert!(json.get("triageResult").is_some());
        assert!(json.get("suggestedResources").is_some());
        assert!(json.get("escalateToProfessional").is_some());

        let input: ResponseFlowInput =
            serde_json::from_str(r#"{"userInput": "hello"}"#).unwrap();
        assert_eq!(input.user_input, "hello");
    }

    #[test]
    fn blank_input_is_rejected() {
        assert!(ResponseFlowInput::new("   ").is_err());
        assert!(TriageInput::new("").is_err());
        assert!(ResponseFlowInput::new("hi").is_ok());
    }

    #[test]
    fn user_record_photo_url_keeps_original_key() {
        let record = UserRecord {
            uid: "u1".into(),
            email: Some("a@b.edu".into()),
            display_name: None,
            photo_url: Some("https://example.com/p.png".into()),
            disabled: false,
            role: Role::Student,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["photoURL"], "https://example.com/p.png");
        assert!(!record.can_administer());
    }

    #[test]
    fn session_cookie_debug_redacts_value() {
        let cookie = SessionCookie {
            value: "secret-cookie".into(),
            max_age: std::time::Duration::from_secs(60),
        };
        let debug = format!("{cookie:?}");
        assert!(!debug.contains("secret-cookie"));
    }
}
