// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapts JSON Schema documents to the subset `responseSchema` accepts.

use serde_json::Value;

/// Keywords the structured-output endpoint rejects.
const UNSUPPORTED_KEYWORDS: &[&str] = &["$schema", "$id", "title", "additionalProperties", "examples"];

/// Recursively removes keywords the Gemini schema dialect does not support.
///
/// Property names are never touched, so a field literally called `title` survives.
pub fn sanitize_schema(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (key, value) in map {
                if UNSUPPORTED_KEYWORDS.contains(&key.as_str()) {
                    continue;
                }
                let cleaned = if key == "properties" {
                    match value {
                        Value::Object(props) => Value::Object(
                            props
                                .iter()
                                .map(|(name, sub)| (name.clone(), sanitize_schema(sub)))
                                .collect(),
                        ),
                        other => other.clone(),
                    }
                } else {
                    sanitize_schema(value)
                };
                out.insert(key.clone(), cleaned);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.iter().map(sanitize_schema).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_top_level_metadata() {
        let schema = json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "title": "TriageOutput",
            "type": "object",
            "additionalProperties": false,
            "required": ["triageResult"],
            "properties": {"triageResult": {"type": "string"}}
        });
        let cleaned = sanitize_schema(&schema);
        assert!(cleaned.get("$schema").is_none());
        assert!(cleaned.get("title").is_none());
        assert!(cleaned.get("additionalProperties").is_none());
        assert_eq!(cleaned["required"], json!(["triageResult"]));
    }

    #[test]
    fn strips_nested_keywords_but_keeps_property_names() {
        let schema = json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "title": "Title"},
                "items": {"type": "array", "items": {"type": "string", "examples": ["a"]}}
            }
        });
        let cleaned = sanitize_schema(&schema);
        assert_eq!(cleaned["properties"]["title"], json!({"type": "string"}));
        assert_eq!(
            cleaned["properties"]["items"]["items"],
            json!({"type": "string"})
        );
    }
}
