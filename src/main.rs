#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

use anyhow::Result;
use clap::Parser;
use pageask::assistant::Assistant;
use pageask::cli::{Cli, Commands, SourceArgs};
use pageask::config::Settings;
use pageask::extract::{ExtractedContent, extract, fetch_page};
use pageask::providers::resolve_api_key;
use tokio::io::AsyncReadExt;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    let settings = Settings::load_or_init()?;
    dispatch(cli, settings).await
}

async fn dispatch(cli: Cli, settings: Settings) -> Result<()> {
    match cli.command {
        Commands::Ask { ref question, ref source } => {
            let content = load_context(source, &settings).await?;
            let assistant = build_assistant(&cli, &settings)?;
            let answer = assistant.ask(question, &content.content).await?;
            println!("{answer}");
        }

        Commands::Summarize { ref source } => {
            quick(&cli, &settings, source, pageask::QuickAction::Summarize).await?;
        }
        Commands::Explain { ref source } => {
            quick(&cli, &settings, source, pageask::QuickAction::Explain).await?;
        }
        Commands::Questions { ref source } => {
            quick(&cli, &settings, source, pageask::QuickAction::Questions).await?;
        }
        Commands::Analyze { kind, ref source } => {
            quick(&cli, &settings, source, kind.into()).await?;
        }

        Commands::Extract { ref source, json } => {
            let content = load_context(source, &settings).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&content)?);
            } else {
                print_extraction(&content);
            }
        }

        Commands::Test => {
            let assistant = build_assistant(&cli, &settings)?;
            let status = assistant.test_connection().await;
            println!(
                "{}: {}",
                assistant.provider_name(),
                status.message
            );
            if !status.success {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn quick(
    cli: &Cli,
    settings: &Settings,
    source: &SourceArgs,
    action: pageask::QuickAction,
) -> Result<()> {
    let content = load_context(source, settings).await?;
    let assistant = build_assistant(cli, settings)?;
    let answer = assistant.quick(action, &content.content).await?;
    println!("{answer}");
    Ok(())
}

fn build_assistant(cli: &Cli, settings: &Settings) -> Result<Assistant> {
    let provider = cli.provider.as_deref().unwrap_or(&settings.provider);
    let api_key =
        resolve_api_key(provider, cli.api_key.as_deref()).or_else(|| settings.api_key.clone());
    let options = settings.provider_options(cli.model.as_deref());
    Ok(Assistant::for_provider(provider, api_key.as_deref(), &options)?)
}

async fn load_context(source: &SourceArgs, settings: &Settings) -> Result<ExtractedContent> {
    let opts = if source.lite {
        settings.lite_extract_options()
    } else {
        settings.full_extract_options()
    };

    if let Some(url) = &source.url {
        let page = fetch_page(url, settings.timeout_secs).await?;
        if !page.is_html {
            tracing::debug!(url = %page.url, "response is not HTML, extracting as plain text");
        }
        Ok(extract(&page.body, &page.url, &opts))
    } else if let Some(file) = &source.file {
        let html = tokio::fs::read_to_string(file).await?;
        let url = format!("file://{}", file.display());
        Ok(extract(&html, &url, &opts))
    } else {
        let mut html = String::new();
        tokio::io::stdin().read_to_string(&mut html).await?;
        Ok(extract(&html, "stdin", &opts))
    }
}

fn print_extraction(content: &ExtractedContent) {
    println!("Title: {}", content.title);
    println!("URL: {}", content.url);
    if !content.meta_description.is_empty() {
        println!("Description: {}", content.meta_description);
    }
    if !content.meta_keywords.is_empty() {
        println!("Keywords: {}", content.meta_keywords);
    }
    if !content.headings.is_empty() {
        println!("Headings:");
        for heading in &content.headings {
            println!("  - {heading}");
        }
    }
    if !content.links.is_empty() {
        println!("Links:");
        for link in &content.links {
            println!("  - {} ({})", link.text, link.url);
        }
    }
    if let Some(error) = &content.error {
        println!("Note: {error}");
    }
    println!();
    println!("{}", content.content);
}
