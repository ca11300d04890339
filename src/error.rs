use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `pageask`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum PageAskError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Provider ────────────────────────────────────────────────────────
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),

    // ── Page fetching ───────────────────────────────────────────────────
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Provider errors ────────────────────────────────────────────────────────

/// Failure taxonomy for upstream LLM providers.
///
/// `Unsupported` is raised by the factory before any network activity.
/// `Http`, `Payload` and `Timeout` map one upstream call outcome each;
/// `Request` covers transport-level failures (DNS, TLS, connection reset).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unsupported provider: {name}")]
    Unsupported { name: String },

    #[error("{provider} API key not set")]
    MissingKey { provider: String },

    #[error("{provider} API error ({status}): {message}")]
    Http {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{provider} returned an unexpected payload: {message}")]
    Payload { provider: String, message: String },

    #[error("{provider} request timed out after {timeout_secs}s")]
    Timeout {
        provider: String,
        timeout_secs: u64,
    },

    #[error("{provider} request failed: {message}")]
    Request { provider: String, message: String },
}

impl ProviderError {
    /// Provider name this error originated from, if any.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Unsupported { .. } => None,
            Self::MissingKey { provider }
            | Self::Http { provider, .. }
            | Self::Payload { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Request { provider, .. } => Some(provider),
        }
    }

    /// Upstream HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ─── Fetch errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, PageAskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_provider_displays_name() {
        let err = ProviderError::Unsupported {
            name: "gpt9000".into(),
        };
        assert!(err.to_string().contains("gpt9000"));
        assert_eq!(err.provider(), None);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn http_error_carries_provider_and_status() {
        let err = ProviderError::Http {
            provider: "OpenAI".into(),
            status: 429,
            message: "rate limited".into(),
        };
        assert!(err.to_string().contains("429"));
        assert_eq!(err.provider(), Some("OpenAI"));
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn timeout_displays_bound() {
        let err = ProviderError::Timeout {
            provider: "Claude".into(),
            timeout_secs: 30,
        };
        assert!(err.to_string().contains("30s"));
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let err: PageAskError = anyhow_err.into();
        assert!(err.to_string().contains("something went wrong"));
    }
}
