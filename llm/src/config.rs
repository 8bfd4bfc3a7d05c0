use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use minijinja::Environment;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ANTHROPIC_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-latest";
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Settings for [`crate::provider::anthropic::AnthropicModel`].
///
/// `api_key` is the externally supplied default; credentials passed to the
/// model constructor take precedence over it.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnthropicConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub endpoint: String,
    pub max_tokens: u32,
    pub anthropic_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            anthropic_version: ANTHROPIC_VERSION.to_string(),
        }
    }
}

impl fmt::Debug for AnthropicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .field("anthropic_version", &self.anthropic_version)
            .finish()
    }
}

fn replace_env_vars(content: String) -> Result<String, ConfigError> {
    let env = Environment::new();
    let template = env.template_from_str(&content)?;
    let parameters = template.undeclared_variables(false);

    let mut variables = HashMap::new();
    parameters.iter().for_each(|k| {
        if let Ok(v) = std::env::var(k) {
            variables.insert(k, v);
        };
    });

    Ok(template.render(variables)?)
}

impl AnthropicConfig {
    /// Default settings with the API key taken from `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(ANTHROPIC_API_KEY_ENV)
                .ok()
                .filter(|key| !key.is_empty()),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Parses YAML, substituting `{{ VAR }}` placeholders from the
    /// environment first. Unset variables render as empty strings.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let content = replace_env_vars(content.to_string())?;
        let mut config: Self = serde_yaml::from_str(&content)?;
        if config.api_key.as_deref() == Some("") {
            config.api_key = None;
        }
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path)?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_messages_api() {
        let config = AnthropicConfig::default();
        assert_eq!(config.model, "claude-3-7-sonnet-latest");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.endpoint, "https://api.anthropic.com");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn yaml_fills_missing_fields_with_defaults() {
        let config = AnthropicConfig::from_yaml_str("model: claude-3-5-haiku-latest\n").unwrap();
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.max_tokens, 1024);
    }

    #[test]
    fn yaml_substitutes_environment_variables() {
        std::env::set_var("VIGIL_TEST_CONFIG_KEY", "sk-ant-from-env");
        let config = AnthropicConfig::from_yaml_str(
            "api_key: \"{{ VIGIL_TEST_CONFIG_KEY }}\"\nmax_tokens: 256\n",
        )
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-ant-from-env"));
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn unset_variable_leaves_no_key() {
        let config =
            AnthropicConfig::from_yaml_str("api_key: \"{{ VIGIL_TEST_UNSET_VARIABLE }}\"\n")
                .unwrap();
        assert!(config.api_key.is_none());
    }

    #[test]
    fn invalid_yaml_is_a_parse_error() {
        let err = AnthropicConfig::from_yaml_str("max_tokens: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn from_env_reads_anthropic_api_key() {
        std::env::set_var(ANTHROPIC_API_KEY_ENV, "sk-ant-env");
        let config = AnthropicConfig::from_env();
        assert_eq!(config.api_key.as_deref(), Some("sk-ant-env"));
        assert_eq!(config.model, DEFAULT_MODEL);

        std::env::set_var(ANTHROPIC_API_KEY_ENV, "");
        assert!(AnthropicConfig::from_env().api_key.is_none());

        std::env::remove_var(ANTHROPIC_API_KEY_ENV);
        assert!(AnthropicConfig::from_env().api_key.is_none());
    }

    #[test]
    fn load_reads_yaml_file() {
        let path = std::env::temp_dir().join(format!("vigil-config-{}.yaml", std::process::id()));
        std::fs::write(
            &path,
            "model: claude-3-opus-latest\nendpoint: http://127.0.0.1:9000\nmax_tokens: 64\n",
        )
        .unwrap();

        let config = AnthropicConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.model, "claude-3-opus-latest");
        assert_eq!(config.endpoint, "http://127.0.0.1:9000");
        assert_eq!(config.max_tokens, 64);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn load_missing_file_is_an_io_error() {
        let err = AnthropicConfig::load("/nonexistent/vigil/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::StdIOError(_)));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = AnthropicConfig::default().with_api_key("sk-ant-secret");
        assert!(!format!("{config:?}").contains("sk-ant-secret"));
    }
}
