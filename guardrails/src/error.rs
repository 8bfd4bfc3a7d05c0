use thiserror::Error;
use vigil_llm::LLMError;

use crate::types::GuardType;

pub type GuardResult<T> = Result<T, GuardError>;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("{operation} is not implemented for {guard}")]
    NotImplemented {
        guard: String,
        operation: &'static str,
    },
    #[error("Async execution for {guard} not supported yet.")]
    UnsupportedAsync { guard: String },
    #[error("{guard} is an {guard_type} and cannot run {operation}")]
    WrongStage {
        guard: String,
        guard_type: GuardType,
        operation: &'static str,
    },
    #[error("Failed to render judge prompt: {0}")]
    Prompt(#[from] minijinja::Error),
    #[error(transparent)]
    Model(#[from] LLMError),
}

impl GuardError {
    pub(crate) fn not_implemented<G: ?Sized>(operation: &'static str) -> Self {
        GuardError::NotImplemented {
            guard: short_type_name::<G>().to_string(),
            operation,
        }
    }

    pub(crate) fn unsupported_async<G: ?Sized>() -> Self {
        GuardError::UnsupportedAsync {
            guard: short_type_name::<G>().to_string(),
        }
    }
}

/// `my_crate::guards::ToxicityGuard<M>` -> `ToxicityGuard`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let name = std::any::type_name::<T>();
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}
