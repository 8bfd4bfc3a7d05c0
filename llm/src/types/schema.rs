use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LLMError, LLMResult};

/// JSON Schema that a structured generation must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSchema(Value);

impl OutputSchema {
    pub fn new(schema: Value) -> Self {
        Self(schema)
    }

    /// Derives the schema from a Rust type.
    pub fn of<T: JsonSchema>() -> Self {
        Self(schemars::schema_for!(T).to_value())
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Checks `instance` against the schema, collecting every violation.
    pub fn validate(&self, instance: &Value) -> LLMResult<()> {
        let validator = jsonschema::validator_for(&self.0)
            .map_err(|e| LLMError::InvalidSchema(e.to_string()))?;

        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|err| err.to_string())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LLMError::SchemaValidation(errors.join("; ")))
        }
    }
}

impl From<Value> for OutputSchema {
    fn from(schema: Value) -> Self {
        Self::new(schema)
    }
}
