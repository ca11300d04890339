use super::scrub::http_error;
use super::traits::{ASSISTANT_INSTRUCTION, Provider, build_user_prompt, http_client, transport_error};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const PROVIDER_NAME: &str = "OpenAI";
const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f64 = 0.7;

pub struct OpenAiProvider {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    cached_chat_url: String,
    model: String,
    timeout_secs: u64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Self {
        Self::with_options(api_key, None, None, timeout_secs)
    }

    pub fn with_options(
        api_key: Option<&str>,
        base_url: Option<&str>,
        model: Option<&str>,
        timeout_secs: u64,
    ) -> Self {
        let base = base_url
            .map_or(DEFAULT_BASE_URL, |u| u.trim_end_matches('/'))
            .to_string();
        Self {
            cached_auth_header: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| format!("Bearer {k}")),
            cached_chat_url: format!("{base}/v1/chat/completions"),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            timeout_secs,
            client: http_client(timeout_secs),
        }
    }

    fn build_request(&self, question: &str, context: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: ASSISTANT_INSTRUCTION.to_string(),
                },
                Message {
                    role: "user",
                    content: build_user_prompt(question, context),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }

    fn decode(body: &str) -> Result<String, ProviderError> {
        let payload_error = |message: String| ProviderError::Payload {
            provider: PROVIDER_NAME.to_string(),
            message,
        };

        let response: ChatResponse =
            serde_json::from_str(body).map_err(|e| payload_error(e.to_string()))?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| payload_error("missing choices[0].message.content".to_string()))
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn answer(&self, question: &str, context: &str) -> Result<String, ProviderError> {
        let auth_header = self
            .cached_auth_header
            .as_ref()
            .ok_or_else(|| ProviderError::MissingKey {
                provider: PROVIDER_NAME.to_string(),
            })?;

        let request = self.build_request(question, context);
        let response = self
            .client
            .post(&self.cached_chat_url)
            .header("Authorization", auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, self.timeout_secs, &e))?;

        if !response.status().is_success() {
            return Err(http_error(PROVIDER_NAME, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(PROVIDER_NAME, self.timeout_secs, &e))?;
        Self::decode(&body)
    }
}
