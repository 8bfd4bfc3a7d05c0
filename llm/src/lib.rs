//! Evaluation-model layer: a single-request adapter over the Anthropic
//! Messages API with structured output, JSON repair and cost estimation.

pub mod config;
pub mod error;
pub mod json;
pub mod pricing;
pub mod provider;
pub mod types;

pub use config::AnthropicConfig;
pub use error::{LLMError, LLMResult};
pub use provider::anthropic::{AnthropicModel, ModelClient};
pub use types::credentials::ApiKeyCredentials;
pub use types::instance::{EvaluationModel, StructuredOutput};
pub use types::schema::OutputSchema;
pub use types::{Generation, ModelUsage};
