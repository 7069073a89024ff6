//! MermaidAI CLI and HTTP backend entry point.
//!
//! Binary name: `mermaidai`
//!
//! Parses CLI arguments, initializes tracing, then dispatches to the
//! appropriate command handler or starts the HTTP backend.

mod cli;
mod http;
mod state;
#[cfg(test)]
mod test_support;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;
use secrecy::SecretString;

use mermaidai_infra::config::{load_app_config, load_config_file, resolve_data_dir};
use mermaidai_observe::{LogFormat, filter_for_verbosity, init_tracing, shutdown_tracing};
use mermaidai_types::error::ConfigError;

use cli::{Cli, Commands, ServeArgs};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need logging or config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "mermaidai", &mut std::io::stdout());
        return Ok(());
    }

    let format = if cli.dev {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    };
    let filter = match (&cli.command, cli.verbose, cli.quiet) {
        (Commands::Serve(_), 0, false) => "info",
        (_, verbose, quiet) => filter_for_verbosity(verbose, quiet),
    };
    init_tracing(format, filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();

    match cli.command {
        Commands::Serve(args) => serve(args, &data_dir).await,
        Commands::Summarize(args) => {
            let config = load_app_config(&data_dir).await;
            cli::summarize::summarize(args, &config, cli.json).await
        }
        Commands::Render(args) => cli::render::render(args, cli.json).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

async fn serve(args: ServeArgs, data_dir: &Path) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => load_config_file(path).await?,
        None => load_app_config(data_dir).await,
    };
    let config = args.apply(config);

    let Some(api_key) = args.api_key.filter(|key| !key.trim().is_empty()) else {
        tracing::error!("no api key provided");
        return Err(ConfigError::MissingApiKey.into());
    };

    let addr = listen_addr(&config.addr);
    let state = AppState::new(config, SecretString::from(api_key))?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %addr, "Server starting");

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Accept the short `:8000` form for "all interfaces".
fn listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{addr}")
    } else {
        addr.to_string()
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_addr_listens_on_all_interfaces() {
        assert_eq!(listen_addr(":8000"), "0.0.0.0:8000");
        assert_eq!(listen_addr("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_serve_without_api_key_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = serve(ServeArgs::default(), tmp.path()).await.unwrap_err();
        assert_eq!(err.to_string(), "no api key provided");
    }
}
