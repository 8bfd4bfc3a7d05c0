use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::error::LLMResult;
use crate::types::schema::OutputSchema;
use crate::types::Generation;

/// A model used as an evaluation judge.
///
/// Each call performs exactly one request and returns the generation with
/// its estimated cost in USD.
#[async_trait]
pub trait EvaluationModel: Send + Sync {
    fn get_model_name(&self) -> &str;

    fn generate(&self, prompt: &str, schema: Option<&OutputSchema>)
        -> LLMResult<(Generation, f64)>;

    async fn a_generate(
        &self,
        prompt: &str,
        schema: Option<&OutputSchema>,
    ) -> LLMResult<(Generation, f64)>;
}

/// Typed structured output on top of any [`EvaluationModel`].
#[async_trait]
pub trait StructuredOutput: EvaluationModel {
    fn generate_as<T>(&self, prompt: &str) -> LLMResult<(T, f64)>
    where
        T: DeserializeOwned + JsonSchema,
    {
        let schema = OutputSchema::of::<T>();
        let (generation, cost) = self.generate(prompt, Some(&schema))?;
        Ok((generation.into_typed()?, cost))
    }

    async fn a_generate_as<T>(&self, prompt: &str) -> LLMResult<(T, f64)>
    where
        T: DeserializeOwned + JsonSchema + Send,
    {
        let schema = OutputSchema::of::<T>();
        let (generation, cost) = self.a_generate(prompt, Some(&schema)).await?;
        Ok((generation.into_typed()?, cost))
    }
}

impl<M: EvaluationModel + ?Sized> StructuredOutput for M {}
