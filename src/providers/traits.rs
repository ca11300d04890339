use crate::error::ProviderError;
use async_trait::async_trait;
use std::time::Duration;

/// Instruction shared by every provider encoder. The wire shape differs per
/// provider (system slot vs. inlined prompt), the semantics must not.
pub const ASSISTANT_INSTRUCTION: &str = "You are an AI assistant that helps users understand \
     webpage content. Provide clear, helpful, and accurate responses based on the content provided.";

/// The user-facing prompt embedding both the page context and the question.
pub fn build_user_prompt(question: &str, context: &str) -> String {
    format!(
        "Webpage Content: {context}\n\nUser Question: {question}\n\n\
         Please provide a helpful response based on the webpage content."
    )
}

/// Prompt variant for providers without a dedicated system/instruction slot:
/// the instruction is inlined ahead of the user prompt.
pub fn build_inline_prompt(question: &str, context: &str) -> String {
    format!(
        "{ASSISTANT_INSTRUCTION}\n\n{}",
        build_user_prompt(question, context)
    )
}

/// One upstream text-generation service behind a uniform contract.
///
/// Implementations encode `(question, context)` into their wire shape, issue
/// one request, and decode the reply into a single answer string. Adding a
/// provider means implementing this trait and registering it in
/// `factory::create_provider` — call sites never branch on provider identity.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name, used in error messages and logs.
    fn name(&self) -> &'static str;

    async fn answer(&self, question: &str, context: &str) -> Result<String, ProviderError>;
}

/// Shared HTTP client construction: one bounded total timeout per request.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a reqwest transport failure onto the provider taxonomy.
pub(crate) fn transport_error(
    provider: &str,
    timeout_secs: u64,
    error: &reqwest::Error,
) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            timeout_secs,
        }
    } else {
        ProviderError::Request {
            provider: provider.to_string(),
            message: error.to_string(),
        }
    }
}
