//! `mermaidai summarize` -- run the change summarizer over diagram files.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use console::style;
use secrecy::SecretString;

use mermaidai_core::summary::initial::initial_summary;
use mermaidai_core::summary::{BoxSummaryBackend, ChangeSummarizer, SummaryJob};
use mermaidai_infra::backend::summarize::SummarizeEndpoint;
use mermaidai_infra::openai::OpenAiClient;
use mermaidai_types::config::AppConfig;
use mermaidai_types::error::ConfigError;
use mermaidai_types::version::{ChangeSummary, VersionId};

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// The edited definition.
    pub new: PathBuf,

    /// The definition before the edit. Omit to describe a first version.
    #[arg(long)]
    pub old: Option<PathBuf>,

    /// What the user asked for when making the edit.
    #[arg(long, short, default_value = "")]
    pub query: String,

    /// Summarize through a running backend (e.g. `http://localhost:8000`)
    /// instead of calling the upstream API directly.
    #[arg(long)]
    pub server: Option<String>,

    /// Model override for this run.
    #[arg(long)]
    pub model: Option<String>,

    /// Upstream API key, used when `--server` is not given.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

pub async fn summarize(args: SummarizeArgs, config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let summary = summarize_files(&args, config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!(
            "  {} {}",
            style("Intent: ").bold(),
            style(&summary.user_intent).cyan()
        );
        println!("  {} {}", style("Changes:").bold(), summary.technical_changes);
        println!();
    }
    Ok(())
}

async fn summarize_files(args: &SummarizeArgs, config: &AppConfig) -> anyhow::Result<ChangeSummary> {
    let new_definition = tokio::fs::read_to_string(&args.new)
        .await
        .with_context(|| format!("failed to read {}", args.new.display()))?;

    let Some(old_path) = &args.old else {
        return Ok(initial_summary(&new_definition));
    };
    let old_definition = tokio::fs::read_to_string(old_path)
        .await
        .with_context(|| format!("failed to read {}", old_path.display()))?;

    let model = args.model.clone().unwrap_or_else(|| config.summary_model.clone());
    let summarizer = ChangeSummarizer::new(build_backend(args, config)?, model);

    let job = SummaryJob {
        version_id: VersionId::FIRST.next(),
        old_definition,
        new_definition,
        user_query: args.query.clone(),
    };
    Ok(summarizer.summarize(&job).await)
}

fn build_backend(args: &SummarizeArgs, config: &AppConfig) -> anyhow::Result<BoxSummaryBackend> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    if let Some(server) = &args.server {
        return Ok(BoxSummaryBackend::new(SummarizeEndpoint::new(server, timeout)?));
    }

    let api_key = args.api_key.clone().ok_or(ConfigError::MissingApiKey)?;
    let client = OpenAiClient::new(SecretString::from(api_key), timeout)?
        .with_base_url(&config.openai_base_url);
    Ok(BoxSummaryBackend::new(client))
}
