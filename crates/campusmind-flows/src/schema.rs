// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output contracts: JSON Schemas derived from the flow types, and a
//! validator that checks model replies against them.

use campusmind_core::CampusMindError;
use jsonschema::Validator;
use schemars::JsonSchema;
use serde_json::Value;

/// A compiled output contract.
pub struct OutputContract {
    name: &'static str,
    schema: Value,
    validator: Validator,
}

impl OutputContract {
    /// Derives and compiles the contract for `T`.
    pub fn of<T: JsonSchema>(name: &'static str) -> Result<Self, CampusMindError> {
        let schema = serde_json::to_value(schemars::schema_for!(T)).map_err(|e| {
            CampusMindError::Internal(format!("failed to serialize {name} schema: {e}"))
        })?;
        let validator = jsonschema::validator_for(&schema).map_err(|e| {
            CampusMindError::Internal(format!("invalid {name} schema: {e}"))
        })?;
        Ok(Self {
            name,
            schema,
            validator,
        })
    }

    /// The schema document sent to the model.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Checks a reply, reporting every violation at once.
    pub fn check(&self, reply: &Value) -> Result<(), CampusMindError> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(reply)
            .map(|e| {
                let at = e.instance_path.to_string();
                if at.is_empty() {
                    e.to_string()
                } else {
                    format!("{at}: {e}")
                }
            })
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(CampusMindError::Provider {
                message: format!(
                    "{} reply violates its schema: {}",
                    self.name,
                    violations.join("; ")
                ),
                source: None,
            })
        }
    }
}

impl std::fmt::Debug for OutputContract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputContract")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Pulls the JSON object out of a model reply.
///
/// Structured output normally yields bare JSON, but some models still wrap it
/// in a markdown fence.
pub fn extract_json(text: &str) -> Result<Value, CampusMindError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body).map_err(|e| CampusMindError::Provider {
        message: format!("model reply is not valid JSON: {e}"),
        source: Some(Box::new(e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusmind_core::types::{ResponseFlowOutput, TriageOutput};
    use serde_json::json;

    #[test]
    fn triage_schema_uses_wire_field_names() {
        let contract = OutputContract::of::<TriageOutput>("triage").unwrap();
        let required = contract.schema()["required"].as_array().unwrap();
        for field in ["triageResult", "suggestedResources", "escalateToProfessional"] {
            assert!(required.contains(&json!(field)), "missing {field}");
        }
    }

    #[test]
    fn valid_triage_reply_passes() {
        let contract = OutputContract::of::<TriageOutput>("triage").unwrap();
        let reply = json!({
            "triageResult": "General conversation, no immediate resources needed.",
            "suggestedResources": [],
            "escalateToProfessional": false
        });
        assert!(contract.check(&reply).is_ok());
    }

    #[test]
    fn wrong_types_report_every_violation() {
        let contract = OutputContract::of::<TriageOutput>("triage").unwrap();
        let reply = json!({
            "triageResult": 3,
            "suggestedResources": "booking",
            "escalateToProfessional": "yes"
        });
        let err = contract.check(&reply).unwrap_err().to_string();
        assert!(err.contains("/triageResult"), "got: {err}");
        assert!(err.contains("/suggestedResources"), "got: {err}");
        assert!(err.contains("/escalateToProfessional"), "got: {err}");
    }

    #[test]
    fn missing_response_field_fails() {
        let contract = OutputContract::of::<ResponseFlowOutput>("response").unwrap();
        assert!(contract.check(&json!({"reply": "hi"})).is_err());
    }

    #[test]
    fn extract_handles_fenced_and_bare_json() {
        assert_eq!(
            extract_json("```json\n{\"response\": \"hi\"}\n```").unwrap(),
            json!({"response": "hi"})
        );
        assert_eq!(
            extract_json("  {\"response\": \"hi\"}  ").unwrap(),
            json!({"response": "hi"})
        );
        assert!(extract_json("Sure! Here you go.").is_err());
    }
}
