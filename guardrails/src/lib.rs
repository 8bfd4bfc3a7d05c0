//! Guard contract for scoring user input and model responses, plus an
//! LLM-as-judge guard built on [`vigil_llm::EvaluationModel`].

pub mod error;
pub mod guards;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{GuardError, GuardResult};
pub use types::{DecorativeGuard, Guard, GuardOutcome, GuardType};
