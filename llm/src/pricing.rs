use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::error::{LLMError, LLMResult};
use crate::types::ModelUsage;

/// Price in USD per single token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingEntry {
    pub input: f64,
    pub output: f64,
}

impl PricingEntry {
    fn per_million(input: f64, output: f64) -> Self {
        Self {
            input: input / 1e6,
            output: output / 1e6,
        }
    }
}

lazy_static! {
    static ref MODEL_PRICING: HashMap<&'static str, PricingEntry> = HashMap::from([
        ("claude-3-7-sonnet-latest", PricingEntry::per_million(3.00, 15.00)),
        ("claude-3-5-haiku-latest", PricingEntry::per_million(0.80, 4.00)),
        ("claude-3-5-sonnet-latest", PricingEntry::per_million(3.00, 15.00)),
        ("claude-3-opus-latest", PricingEntry::per_million(15.00, 75.00)),
        ("claude-3-sonnet-20240229", PricingEntry::per_million(3.00, 15.00)),
        ("claude-3-haiku-20240307", PricingEntry::per_million(0.25, 1.25)),
        ("claude-instant-1.2", PricingEntry::per_million(0.80, 2.40)),
    ]);
}

/// Looks up the pricing entry for an exact model identifier.
pub fn model_pricing(model: &str) -> Option<PricingEntry> {
    MODEL_PRICING.get(model).copied()
}

/// Cost in USD of a request to `model`.
///
/// Unknown models are an error rather than a silent zero so that missing
/// table entries show up at the call site.
pub fn calculate_cost(model: &str, input_tokens: u32, output_tokens: u32) -> LLMResult<f64> {
    let pricing =
        model_pricing(model).ok_or_else(|| LLMError::UnknownModelPricing(model.to_string()))?;

    let input_cost = input_tokens as f64 * pricing.input;
    let output_cost = output_tokens as f64 * pricing.output;
    Ok(input_cost + output_cost)
}

pub fn calculate_usage_cost(model: &str, usage: &ModelUsage) -> LLMResult<f64> {
    calculate_cost(model, usage.input_tokens, usage.output_tokens)
}
