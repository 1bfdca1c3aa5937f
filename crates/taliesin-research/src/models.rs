//! Structured payloads exchanged with the generation provider.
//!
//! Each type pairs a serde shape with the JSON schema sent alongside the
//! request so the provider's structured-output mode can enforce it. Schemas
//! use `additionalProperties: false` and list every property as required,
//! which strict mode demands.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// ─────────────────────────────────────────────────────────────────────────────
// Clarification
// ─────────────────────────────────────────────────────────────────────────────

/// Questions to put to the user before research begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarifyingQuestions {
    pub questions: Vec<String>,
}

impl ClarifyingQuestions {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Two to four questions that narrow the scope of the research topic"
                }
            },
            "required": ["questions"],
            "additionalProperties": false
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query Planning
// ─────────────────────────────────────────────────────────────────────────────

/// A batch of web search queries produced by the planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQueryBatch {
    pub queries: Vec<String>,
}

impl SearchQueryBatch {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "queries": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Distinct web search queries, one per line of investigation"
                }
            },
            "required": ["queries"],
            "additionalProperties": false
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reflection
// ─────────────────────────────────────────────────────────────────────────────

/// The reflector's judgement on whether the findings suffice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionVerdict {
    /// The model's reasoning, kept only for logging.
    #[serde(rename = "thought_process")]
    pub thought: String,
    /// Specific unanswered questions in the current findings.
    #[serde(default)]
    pub knowledge_gaps: Vec<String>,
    /// Whether another search round is warranted.
    #[serde(default)]
    pub needs_more_context: bool,
    /// Queries that would close the named gaps.
    #[serde(default)]
    pub follow_up_queries: Vec<String>,
}

impl ReflectionVerdict {
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "thought_process": {
                    "type": "string",
                    "description": "Step-by-step reasoning about coverage and depth of the findings"
                },
                "knowledge_gaps": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Specific questions the findings do not yet answer"
                },
                "needs_more_context": {
                    "type": "boolean",
                    "description": "True if another round of searching is warranted"
                },
                "follow_up_queries": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Web search queries that would close the gaps, empty if none are needed"
                }
            },
            "required": ["thought_process", "knowledge_gaps", "needs_more_context", "follow_up_queries"],
            "additionalProperties": false
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_decodes_thought_process_field() {
        let raw = json!({
            "thought_process": "coverage looks thin on pricing",
            "knowledge_gaps": ["pricing model"],
            "needs_more_context": true,
            "follow_up_queries": ["vendor pricing comparison 2025"]
        });

        let verdict: ReflectionVerdict = serde_json::from_value(raw).unwrap();
        assert_eq!(verdict.thought, "coverage looks thin on pricing");
        assert_eq!(verdict.knowledge_gaps, vec!["pricing model"]);
        assert!(verdict.needs_more_context);
        assert_eq!(verdict.follow_up_queries.len(), 1);
    }

    #[test]
    fn test_verdict_tolerates_missing_optional_fields() {
        let raw = json!({
            "thought_process": "sufficient",
            "needs_more_context": false
        });

        let verdict: ReflectionVerdict = serde_json::from_value(raw).unwrap();
        assert!(verdict.knowledge_gaps.is_empty());
        assert!(verdict.follow_up_queries.is_empty());
        assert!(!verdict.needs_more_context);
    }

    #[test]
    fn test_query_batch_round_trips() {
        let batch = SearchQueryBatch {
            queries: vec!["a".to_string(), "b".to_string()],
        };

        let value = serde_json::to_value(&batch).unwrap();
        let back: SearchQueryBatch = serde_json::from_value(value).unwrap();
        assert_eq!(back.queries, vec!["a", "b"]);
    }

    #[test]
    fn test_schemas_are_strict() {
        for schema in [
            ClarifyingQuestions::schema(),
            SearchQueryBatch::schema(),
            ReflectionVerdict::schema(),
        ] {
            assert_eq!(schema["additionalProperties"], false);
            assert!(schema["required"].as_array().is_some());
        }
    }

    #[test]
    fn test_verdict_schema_requires_every_property() {
        let schema = ReflectionVerdict::schema();
        let required = schema["required"].as_array().unwrap();
        let properties = schema["properties"].as_object().unwrap();

        assert_eq!(required.len(), properties.len());
        for key in properties.keys() {
            assert!(required.iter().any(|r| r == key));
        }
    }
}
