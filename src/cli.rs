use crate::assistant::QuickAction;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// `pageask` — ask questions about any webpage from your terminal.
#[derive(Parser, Debug)]
#[command(name = "pageask")]
#[command(version)]
#[command(about = "Ask questions about any webpage from your terminal.", long_about = None)]
pub struct Cli {
    /// Provider to use (openai, palm, claude)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// API key (overrides environment variables and the config file)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Model override for the selected provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the page comes from. With neither `--url` nor `--file`, HTML is
/// read from stdin.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Page URL to fetch and extract
    #[arg(long)]
    pub url: Option<String>,

    /// Local HTML file to extract instead of fetching
    #[arg(long, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Use the lightweight extractor (smaller caps, no links)
    #[arg(long)]
    pub lite: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AnalyzeKind {
    Article,
    News,
    Technical,
}

impl From<AnalyzeKind> for QuickAction {
    fn from(kind: AnalyzeKind) -> Self {
        match kind {
            AnalyzeKind::Article => Self::AnalyzeArticle,
            AnalyzeKind::News => Self::AnalyzeNews,
            AnalyzeKind::Technical => Self::AnalyzeTechnical,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a free-form question about a page
    Ask {
        question: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Summarize the page's main points
    Summarize {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Explain the page's key concepts in simple terms
    Explain {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Generate 3-5 study questions about the page
    Questions {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Run a content-type specific analysis
    Analyze {
        #[arg(value_enum)]
        kind: AnalyzeKind,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print extracted page content without contacting a provider
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        /// Emit the full extraction result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Smoke-test connectivity to the configured provider
    Test,
}
