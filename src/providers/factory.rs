use super::claude::ClaudeProvider;
use super::openai::OpenAiProvider;
use super::palm::PalmProvider;
use super::traits::Provider;
use crate::error::ProviderError;

/// Default total timeout for one upstream request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Per-call provider knobs; sampling parameters stay fixed per provider.
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Override the provider's default model identifier.
    pub model: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            model: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Resolve an API key for a provider from an explicit value or environment.
///
/// Resolution order:
/// 1. Explicitly provided `api_key` parameter (trimmed, filtered if empty)
/// 2. Provider-specific environment variable(s)
/// 3. Generic fallback variables (`PAGEASK_API_KEY`, `API_KEY`)
pub fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env_candidates: &[&str] = match name {
        "openai" => &["OPENAI_API_KEY"],
        "palm" | "google" | "google-palm" => &["PALM_API_KEY", "GOOGLE_API_KEY"],
        "claude" | "anthropic" => &["ANTHROPIC_API_KEY", "CLAUDE_API_KEY"],
        _ => &[],
    };

    for env_var in provider_env_candidates
        .iter()
        .chain(["PAGEASK_API_KEY", "API_KEY"].iter())
    {
        if let Ok(value) = std::env::var(env_var) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Dispatch a provider identifier to its implementation.
///
/// Unknown identifiers fail here, before any network activity. New providers
/// are added as new arms; call sites stay provider-agnostic behind
/// `Box<dyn Provider>`.
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
    options: &ProviderOptions,
) -> Result<Box<dyn Provider>, ProviderError> {
    let model = options.model.as_deref();
    match name {
        "openai" => Ok(Box::new(OpenAiProvider::with_options(
            api_key,
            None,
            model,
            options.timeout_secs,
        ))),
        "palm" | "google" | "google-palm" => Ok(Box::new(PalmProvider::with_options(
            api_key,
            None,
            model,
            options.timeout_secs,
        ))),
        "claude" | "anthropic" => Ok(Box::new(ClaudeProvider::with_options(
            api_key,
            None,
            model,
            options.timeout_secs,
        ))),
        _ => Err(ProviderError::Unsupported {
            name: name.to_string(),
        }),
    }
}
