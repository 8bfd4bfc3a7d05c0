pub mod credentials;
pub mod credentials_ident;
pub mod instance;
pub mod schema;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LLMError, LLMResult};
use crate::json::trim_and_load_json;

/// Output of a single generation: the raw reply text, or the JSON object
/// extracted from it and validated against an [`schema::OutputSchema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Generation {
    Text(String),
    Structured(Value),
}

impl Generation {
    /// Deserializes the generation into `T`.
    ///
    /// Text generations go through [`trim_and_load_json`] first, so a plain
    /// text reply that wraps a JSON object is accepted as well.
    pub fn into_typed<T: DeserializeOwned>(self) -> LLMResult<T> {
        let value = match self {
            Generation::Structured(value) => value,
            Generation::Text(text) => trim_and_load_json(&text)?,
        };

        serde_json::from_value(value).map_err(|e| LLMError::SchemaValidation(e.to_string()))
    }
}

/// Token counts reported by the provider for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        score: f64,
        reason: String,
    }

    #[test]
    fn structured_generation_into_typed() {
        let generation = Generation::Structured(json!({"score": 1.0, "reason": "toxic"}));
        let verdict: Verdict = generation.into_typed().unwrap();
        assert_eq!(
            verdict,
            Verdict {
                score: 1.0,
                reason: "toxic".to_string()
            }
        );
    }

    #[test]
    fn text_generation_is_repaired_before_deserializing() {
        let generation =
            Generation::Text("Sure! {\"score\": 0.0, \"reason\": \"fine\",} hope it helps".into());
        let verdict: Verdict = generation.into_typed().unwrap();
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.reason, "fine");
    }

    #[test]
    fn mismatched_shape_is_a_schema_error() {
        let generation = Generation::Structured(json!({"score": "high"}));
        let err = generation.into_typed::<Verdict>().unwrap_err();
        assert!(matches!(err, LLMError::SchemaValidation(_)));
    }

    #[test]
    fn generation_serializes_with_type_tag() {
        let value = serde_json::to_value(Generation::Text("hi".into())).unwrap();
        assert_eq!(value, json!({"type": "text", "value": "hi"}));
    }
}
