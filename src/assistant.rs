use crate::error::ProviderError;
use crate::providers::{Provider, ProviderOptions, create_provider};

/// Canned questions fed through the same `answer` call as free-form ones.
/// These are named presets over one operation, not separate protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Summarize,
    Explain,
    Questions,
    AnalyzeArticle,
    AnalyzeNews,
    AnalyzeTechnical,
}

impl QuickAction {
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Summarize => {
                "Please provide a concise summary of the main points from this webpage content."
            }
            Self::Explain => {
                "Please explain the key concepts and ideas presented on this webpage in simple terms."
            }
            Self::Questions => {
                "Based on this webpage content, generate 3-5 interesting questions that could \
                 help someone better understand the topic."
            }
            Self::AnalyzeArticle => {
                "Analyze this article and provide insights about the main arguments, evidence, \
                 and conclusions."
            }
            Self::AnalyzeNews => {
                "Analyze this news article and provide context about the key events, people \
                 involved, and implications."
            }
            Self::AnalyzeTechnical => {
                "Analyze this technical content and explain the concepts in simple terms for a \
                 general audience."
            }
        }
    }
}

/// Outcome of the connectivity smoke test. Always a value, never a panic or
/// a raw error bubbling up to the UI.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    pub success: bool,
    pub message: String,
}

/// Facade over one selected provider.
///
/// Stateless per request: the credential and provider are fixed at
/// construction, each `ask` performs exactly one outbound call, and nothing
/// is retained between calls.
pub struct Assistant {
    provider: Box<dyn Provider>,
}

impl Assistant {
    pub fn new(provider: Box<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Build an assistant for a provider identifier; fails with
    /// `ProviderError::Unsupported` for unknown identifiers.
    pub fn for_provider(
        name: &str,
        api_key: Option<&str>,
        options: &ProviderOptions,
    ) -> Result<Self, ProviderError> {
        Ok(Self::new(create_provider(name, api_key, options)?))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Ask a free-form question about the given page context.
    pub async fn ask(&self, question: &str, context: &str) -> Result<String, ProviderError> {
        tracing::debug!(
            provider = self.provider.name(),
            context_chars = context.chars().count(),
            "sending question upstream"
        );
        self.provider.answer(question, context).await
    }

    /// Run one of the canned quick actions against the page context.
    pub async fn quick(&self, action: QuickAction, context: &str) -> Result<String, ProviderError> {
        self.ask(action.prompt(), context).await
    }

    /// Send a trivial question/context pair through the full pipeline and
    /// report the outcome as a value.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.ask("Hello", "Test message").await {
            Ok(_) => ConnectionStatus {
                success: true,
                message: "Connection successful".to_string(),
            },
            Err(e) => ConnectionStatus {
                success: false,
                message: e.to_string(),
            },
        }
    }
}
