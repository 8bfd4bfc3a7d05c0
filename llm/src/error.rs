use thiserror::Error;

pub type LLMResult<T> = Result<T, LLMError>;

pub const INVALID_JSON_MESSAGE: &str =
    "Evaluation LLM outputted an invalid JSON. Please use a better evaluation model.";

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("Evaluation LLM outputted an invalid JSON. Please use a better evaluation model.")]
    InvalidJson,
    #[error("An unexpected error occurred: {0}")]
    UnexpectedParse(String),
    #[error("Output does not match schema: {0}")]
    SchemaValidation(String),
    #[error("Invalid schema definition: {0}")]
    InvalidSchema(String),
    #[error("No pricing available for model {0}")]
    UnknownModelPricing(String),
    #[error("Anthropic API key is not set. Pass credentials or set ANTHROPIC_API_KEY")]
    MissingApiKey,
    #[error("Prompt must not be empty")]
    EmptyPrompt,
    #[error("Model response has no text content")]
    NoTextContent,
    #[error("Anthropic API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse config file. Error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("Failed to read template in config. Error: {0}")]
    ReadError(#[from] minijinja::Error),
    #[error(transparent)]
    StdIOError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_json_message_recommends_better_model() {
        assert_eq!(LLMError::InvalidJson.to_string(), INVALID_JSON_MESSAGE);
    }

    #[test]
    fn unexpected_parse_keeps_parser_message() {
        let err = LLMError::UnexpectedParse("boom".to_string());
        assert_eq!(err.to_string(), "An unexpected error occurred: boom");
    }
}
