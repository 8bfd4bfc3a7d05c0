use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GuardError, GuardResult};

/// Which side of a conversation a guard inspects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GuardType {
    /// Applied to user input before it reaches the model
    Input,
    /// Applied to model responses before they reach the user
    Output,
}

impl fmt::Display for GuardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardType::Input => write!(f, "Input Guard"),
            GuardType::Output => write!(f, "Output Guard"),
        }
    }
}

/// Result attributes of the last guard call.
///
/// Everything is `None` until a guard call returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GuardOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_breakdown: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GuardOutcome {
    pub fn is_evaluated(&self) -> bool {
        self.score.is_some() || self.error.is_some()
    }
}

/// Attributes every guard exposes, whether or not it can evaluate text.
pub trait DecorativeGuard: Send + Sync {
    /// Display name, e.g. "Toxicity Guard".
    fn name(&self) -> &str;

    fn guard_type(&self) -> GuardType;

    fn outcome(&self) -> &GuardOutcome;
}

/// A guard that scores user input and/or model responses.
///
/// Implementations override the operations they support. The sync defaults
/// fail with [`GuardError::NotImplemented`], the async ones with
/// [`GuardError::UnsupportedAsync`]; both name the implementing type.
/// Every successful call overwrites [`DecorativeGuard::outcome`].
#[async_trait]
pub trait Guard: DecorativeGuard {
    fn guard_input(&mut self, _input: &str) -> GuardResult<f64> {
        Err(GuardError::not_implemented::<Self>("guard_input"))
    }

    async fn a_guard_input(&mut self, _input: &str) -> GuardResult<f64> {
        Err(GuardError::unsupported_async::<Self>())
    }

    fn guard_response(&mut self, _response: &str) -> GuardResult<f64> {
        Err(GuardError::not_implemented::<Self>("guard_response"))
    }

    async fn a_guard_response(&mut self, _response: &str) -> GuardResult<f64> {
        Err(GuardError::unsupported_async::<Self>())
    }
}
