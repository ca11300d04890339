use super::scrub::http_error;
use super::traits::{Provider, build_inline_prompt, http_client, transport_error};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const PROVIDER_NAME: &str = "Claude";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-2.1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 500;

pub struct ClaudeProvider {
    api_key: Option<String>,
    cached_messages_url: String,
    model: String,
    timeout_secs: u64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

impl ClaudeProvider {
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
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            cached_messages_url: format!("{base}/v1/messages"),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            timeout_secs,
            client: http_client(timeout_secs),
        }
    }

    fn build_request(&self, question: &str, context: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: build_inline_prompt(question, context),
            }],
        }
    }

    fn decode(body: &str) -> Result<String, ProviderError> {
        let payload_error = |message: String| ProviderError::Payload {
            provider: PROVIDER_NAME.to_string(),
            message,
        };

        let response: MessagesResponse =
            serde_json::from_str(body).map_err(|e| payload_error(e.to_string()))?;
        response
            .content
            .into_iter()
            .find_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text),
                ResponseContentBlock::Unsupported => None,
            })
            .ok_or_else(|| payload_error("missing content[0].text".to_string()))
    }
}

#[async_trait]
impl Provider for ClaudeProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn answer(&self, question: &str, context: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ProviderError::MissingKey {
                provider: PROVIDER_NAME.to_string(),
            })?;

        let request = self.build_request(question, context);
        let response = self
            .client
            .post(&self.cached_messages_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
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
