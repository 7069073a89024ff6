//! CLI command definitions for the `mermaidai` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod render;
pub mod summarize;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use mermaidai_types::config::AppConfig;

/// Voice and text assistant backend for editing Mermaid diagrams.
#[derive(Parser)]
#[command(name = "mermaidai", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Human-readable logs with source locations instead of JSON lines.
    #[arg(long, global = true)]
    pub dev: bool,

    /// Also export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP backend (`/summarize`, `/session`, static assets).
    Serve(ServeArgs),

    /// Summarize the change between two diagram files.
    Summarize(summarize::SummarizeArgs),

    /// Render a diagram file to SVG through the Mermaid CLI.
    Render(render::RenderArgs),

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Options for `mermaidai serve`. Flags override `config.toml`.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Read configuration from this file instead of `{data_dir}/config.toml`.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. `0.0.0.0:8000`.
    #[arg(long)]
    pub addr: Option<String>,

    /// Realtime model to mint sessions for.
    #[arg(long)]
    pub model: Option<String>,

    /// Model used when summarizing changes.
    #[arg(long)]
    pub summary_model: Option<String>,

    /// Directory of static web assets served at `/`.
    #[arg(long)]
    pub static_dir: Option<String>,

    /// Base URL of the upstream OpenAI-compatible API.
    #[arg(long, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    /// Upstream API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ServeArgs {
    /// Layer the command-line overrides on top of the loaded config.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(addr) = &self.addr {
            config.addr = addr.clone();
        }
        if let Some(model) = &self.model {
            config.realtime_model = model.clone();
        }
        if let Some(model) = &self.summary_model {
            config.summary_model = model.clone();
        }
        if let Some(dir) = &self.static_dir {
            config.static_dir = dir.clone();
        }
        if let Some(url) = &self.openai_base_url {
            config.openai_base_url = url.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_flags_override_config() {
        let cli = Cli::parse_from([
            "mermaidai",
            "serve",
            "--addr",
            "127.0.0.1:9000",
            "--model",
            "gpt-4o-mini-realtime-preview",
            "--api-key",
            "sk-test",
        ]);
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve");
        };

        let config = args.apply(AppConfig::default());
        assert_eq!(config.addr, "127.0.0.1:9000");
        assert_eq!(config.realtime_model, "gpt-4o-mini-realtime-preview");
        assert_eq!(config.summary_model, AppConfig::default().summary_model);
        assert_eq!(args.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_global_flags_follow_subcommand() {
        let cli = Cli::parse_from(["mermaidai", "serve", "--dev", "-vv"]);
        assert!(cli.dev);
        assert_eq!(cli.verbose, 2);
    }
}
