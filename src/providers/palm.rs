use super::scrub::http_error;
use super::traits::{Provider, build_inline_prompt, http_client, transport_error};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const PROVIDER_NAME: &str = "Google PaLM";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "text-bison-001";
const TEMPERATURE: f64 = 0.7;
const TOP_K: u32 = 40;
const TOP_P: f64 = 0.95;
const CANDIDATE_COUNT: u32 = 1;

/// PaLM carries its credential as a `key` query parameter and has no system
/// slot; the shared instruction is inlined into the single prompt text.
pub struct PalmProvider {
    api_key: Option<String>,
    cached_generate_url: String,
    timeout_secs: u64,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GenerateTextRequest {
    prompt: TextPrompt,
    temperature: f64,
    top_k: u32,
    top_p: f64,
    candidate_count: u32,
}

#[derive(Debug, Serialize)]
struct TextPrompt {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateTextResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    output: Option<String>,
}

impl PalmProvider {
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
        let model = model.unwrap_or(DEFAULT_MODEL);
        Self {
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string),
            cached_generate_url: format!("{base}/v1beta/models/{model}:generateText"),
            timeout_secs,
            client: http_client(timeout_secs),
        }
    }

    fn build_request(question: &str, context: &str) -> GenerateTextRequest {
        GenerateTextRequest {
            prompt: TextPrompt {
                text: build_inline_prompt(question, context),
            },
            temperature: TEMPERATURE,
            top_k: TOP_K,
            top_p: TOP_P,
            candidate_count: CANDIDATE_COUNT,
        }
    }

    fn decode(body: &str) -> Result<String, ProviderError> {
        let payload_error = |message: String| ProviderError::Payload {
            provider: PROVIDER_NAME.to_string(),
            message,
        };

        let response: GenerateTextResponse =
            serde_json::from_str(body).map_err(|e| payload_error(e.to_string()))?;
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.output)
            .ok_or_else(|| payload_error("missing candidates[0].output".to_string()))
    }
}

#[async_trait]
impl Provider for PalmProvider {
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

        let request = Self::build_request(question, context);
        let response = self
            .client
            .post(&self.cached_generate_url)
            .query(&[("key", api_key)])
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
