use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vigil_llm::EvaluationModel;

use crate::guards::llm_judge::{JudgeGuard, DEFAULT_THRESHOLD};
use crate::guards::traced::TracedGuard;
use crate::types::{Guard, GuardType};

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// A judge guard as written in a guards file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub guard_type: GuardType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub criteria: String,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Evaluation model for this guard; the caller's default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuardsConfig {
    pub guards: Vec<GuardDefinition>,
}

/// Load guards from a YAML configuration string
pub fn load_guards_from_yaml(yaml_str: &str) -> Result<Vec<GuardDefinition>, serde_yaml::Error> {
    let config: GuardsConfig = serde_yaml::from_str(yaml_str)?;
    Ok(config.guards)
}

/// Load the default guards from the embedded configuration
pub fn load_default_guards() -> Result<HashMap<String, GuardDefinition>, serde_yaml::Error> {
    let default_config = include_str!("config/default_guards.yaml");
    let guards = load_guards_from_yaml(default_config)?;
    Ok(guards.into_iter().map(|g| (g.id.clone(), g)).collect())
}

/// Builds a traced judge guard for every definition.
///
/// `model_factory` receives the definition's `model` field and returns the
/// evaluation model to use for it.
pub fn build_guards<F>(definitions: &[GuardDefinition], model_factory: F) -> Vec<Box<dyn Guard>>
where
    F: Fn(Option<&str>) -> Arc<dyn EvaluationModel>,
{
    definitions
        .iter()
        .map(|definition| {
            let model = model_factory(definition.model.as_deref());
            let guard = JudgeGuard::from_definition(definition, model);
            Box::new(TracedGuard::new(Box::new(guard))) as Box<dyn Guard>
        })
        .collect()
}
