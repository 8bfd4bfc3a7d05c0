use crate::config::AnthropicConfig;
use crate::error::{LLMError, LLMResult};
use crate::json;
use crate::pricing::{calculate_cost, calculate_usage_cost};
use crate::types::credentials::ApiKeyCredentials;
use crate::types::credentials_ident::CredentialsIdent;
use crate::types::instance::EvaluationModel;
use crate::types::schema::OutputSchema;
use crate::types::{Generation, ModelUsage};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::field;
use tracing::Instrument;
use tracing::Span;
use vigil_telemetry::events::SPAN_ANTHROPIC;

macro_rules! target {
    () => {
        "vigil::user_tracing::models::anthropic"
    };
    ($subtgt:literal) => {
        concat!("vigil::user_tracing::models::anthropic::", $subtgt)
    };
}

const MESSAGES_PATH: &str = "/v1/messages";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: ModelUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

fn api_error(status: reqwest::StatusCode, body: &str) -> LLMError {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => format!("{}: {}", parsed.error.kind, parsed.error.message),
        Err(_) if body.is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        Err(_) => body.to_string(),
    };

    LLMError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Client returned by [`AnthropicModel::load_model`].
#[derive(Debug, Clone)]
pub enum ModelClient {
    Blocking(reqwest::blocking::Client),
    Async(reqwest::Client),
}

/// Evaluation model backed by the Anthropic Messages API.
///
/// Every call sends a single user message and builds a fresh HTTP client,
/// so the model holds no connection state between calls.
#[derive(Debug, Clone)]
pub struct AnthropicModel {
    config: AnthropicConfig,
    credentials: Option<ApiKeyCredentials>,
}

impl AnthropicModel {
    pub fn new(config: AnthropicConfig, credentials: Option<ApiKeyCredentials>) -> Self {
        Self {
            config,
            credentials,
        }
    }

    /// Model `model` with the key read from `ANTHROPIC_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Self {
        Self::new(AnthropicConfig::from_env().with_model(model), None)
    }

    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    fn api_key(&self) -> LLMResult<(&str, CredentialsIdent)> {
        if let Some(credentials) = &self.credentials {
            return Ok((credentials.api_key.as_str(), CredentialsIdent::Own));
        }

        self.config
            .api_key
            .as_deref()
            .map(|key| (key, CredentialsIdent::Config))
            .ok_or(LLMError::MissingApiKey)
    }

    fn default_headers(&self) -> LLMResult<HeaderMap> {
        let (api_key, _) = self.api_key()?;
        let mut api_key = HeaderValue::from_str(api_key)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(&self.config.anthropic_version)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn blocking_client(&self) -> LLMResult<reqwest::blocking::Client> {
        Ok(reqwest::blocking::Client::builder()
            .default_headers(self.default_headers()?)
            .build()?)
    }

    fn async_client(&self) -> LLMResult<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .default_headers(self.default_headers()?)
            .build()?)
    }

    /// Builds a new client bound to the resolved API key.
    ///
    /// Explicit credentials win over the key in the configuration. Both
    /// `generate` paths go through here, one fresh client per call.
    pub fn load_model(&self, async_mode: bool) -> LLMResult<ModelClient> {
        if async_mode {
            Ok(ModelClient::Async(self.async_client()?))
        } else {
            Ok(ModelClient::Blocking(self.blocking_client()?))
        }
    }

    pub fn calculate_cost(&self, input_tokens: u32, output_tokens: u32) -> LLMResult<f64> {
        calculate_cost(&self.config.model, input_tokens, output_tokens)
    }

    pub fn trim_and_load_json(&self, input: &str) -> LLMResult<Value> {
        json::trim_and_load_json(input)
    }

    fn messages_url(&self) -> String {
        format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            MESSAGES_PATH
        )
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> LLMResult<MessagesRequest<'a>> {
        if prompt.is_empty() {
            return Err(LLMError::EmptyPrompt);
        }

        Ok(MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
        })
    }

    fn call_span(&self, structured: bool) -> LLMResult<Span> {
        let (_, credentials_ident) = self.api_key()?;
        Ok(tracing::info_span!(
            target: target!("messages"),
            SPAN_ANTHROPIC,
            model = %self.config.model,
            credentials_identifier = %credentials_ident,
            structured,
            input_tokens = field::Empty,
            output_tokens = field::Empty,
            cost = field::Empty,
            error = field::Empty,
        ))
    }

    fn process_response(
        &self,
        span: &Span,
        response: MessagesResponse,
        schema: Option<&OutputSchema>,
    ) -> LLMResult<(Generation, f64)> {
        let usage = response.usage;
        span.record("input_tokens", usage.input_tokens);
        span.record("output_tokens", usage.output_tokens);

        let cost = calculate_usage_cost(&self.config.model, &usage)?;
        span.record("cost", cost);

        let text = response
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or(LLMError::NoTextContent)?;

        let Some(schema) = schema else {
            return Ok((Generation::Text(text), cost));
        };

        let value = self.trim_and_load_json(&text)?;
        schema.validate(&value)?;
        Ok((Generation::Structured(value), cost))
    }

    fn record_error<T>(span: &Span, result: LLMResult<T>) -> LLMResult<T> {
        if let Err(e) = &result {
            span.record("error", field::display(e));
            tracing::warn!(target: target!(), "Anthropic call failed: {e}");
        }
        result
    }

    fn send_blocking(&self, request: &MessagesRequest<'_>) -> LLMResult<MessagesResponse> {
        let ModelClient::Blocking(client) = self.load_model(false)? else {
            unreachable!("load_model(false) builds a blocking client");
        };
        let response = client.post(self.messages_url()).json(request).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(response.json()?)
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> LLMResult<MessagesResponse> {
        let ModelClient::Async(client) = self.load_model(true)? else {
            unreachable!("load_model(true) builds an async client");
        };
        let response = client
            .post(self.messages_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(response.json().await?)
    }

    /// Sends `prompt` and waits for the reply on the current thread.
    ///
    /// Must not be called from an async runtime worker; use
    /// [`AnthropicModel::a_generate`] there.
    pub fn generate(
        &self,
        prompt: &str,
        schema: Option<&OutputSchema>,
    ) -> LLMResult<(Generation, f64)> {
        let request = self.build_request(prompt)?;
        let span = self.call_span(schema.is_some())?;
        let _entered = span.enter();

        let result = self
            .send_blocking(&request)
            .and_then(|response| self.process_response(&span, response, schema));

        Self::record_error(&span, result)
    }

    pub async fn a_generate(
        &self,
        prompt: &str,
        schema: Option<&OutputSchema>,
    ) -> LLMResult<(Generation, f64)> {
        let request = self.build_request(prompt)?;
        let span = self.call_span(schema.is_some())?;

        let result = self
            .send(&request)
            .instrument(span.clone())
            .await
            .and_then(|response| self.process_response(&span, response, schema));

        Self::record_error(&span, result)
    }
}

#[async_trait]
impl EvaluationModel for AnthropicModel {
    fn get_model_name(&self) -> &str {
        &self.config.model
    }

    fn generate(
        &self,
        prompt: &str,
        schema: Option<&OutputSchema>,
    ) -> LLMResult<(Generation, f64)> {
        AnthropicModel::generate(self, prompt, schema)
    }

    async fn a_generate(
        &self,
        prompt: &str,
        schema: Option<&OutputSchema>,
    ) -> LLMResult<(Generation, f64)> {
        AnthropicModel::a_generate(self, prompt, schema).await
    }
}
