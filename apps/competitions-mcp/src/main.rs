//! # Competitions MCP Server
//!
//! Entry point for the MCP (Model Context Protocol) bridge to the
//! trading-competitions API.
//!
//! Reads configuration from the environment, an optional `.env` file and
//! an optional TOML file (see `config`):
//! - `COMPETITIONS_API_KEY`: Bearer token (required)
//! - `COMPETITIONS_API_URL`: API base URL (default: production API)
//!
//! Communicates with AI clients via MCP over stdio and forwards tool calls
//! to the competitions HTTP API.

use clap::Parser;
use competitions_mcp::cli::{self, Cli};
use competitions_mcp::config::{ConfigSources, DotenvOrigin, LogFormat, LogSettings};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let sources = ConfigSources::load(&cli.env_file, cli.config.as_deref());
    init_tracing(
        sources
            .as_ref()
            .map(ConfigSources::log_settings)
            .unwrap_or_default(),
    );

    let sources = match sources {
        Ok(sources) => sources,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            return ExitCode::FAILURE;
        }
    };
    report_sources(&sources);

    match cli::execute(cli.command, &sources).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logging goes to stderr; stdout carries the MCP stdio transport.
fn init_tracing(settings: LogSettings) {
    let default_level = if settings.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("competitions_mcp={default_level},competitions_core={default_level}").into()
    });

    match settings.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_ansi(false),
                )
                .init();
        }
    }

    if settings.debug {
        tracing::info!("Starting Competitions MCP with debug mode enabled");
    }
}

fn report_sources(sources: &ConfigSources) {
    match sources.dotenv_origin() {
        Some(DotenvOrigin::External) => tracing::info!(
            "Using environment variables from external environment (system/container/CI)."
        ),
        Some(DotenvOrigin::Loaded(path)) => {
            tracing::info!("Loaded environment variables from {}", path.display());
        }
        Some(DotenvOrigin::Missing { path, reason }) => tracing::warn!(
            "No valid .env file at {}: {}. Using external environment variables or defaults.",
            path.display(),
            reason
        ),
        None => {}
    }

    let unset = sources.unset_optional();
    if !unset.is_empty() {
        tracing::info!(
            "Optional variables not set: {}. Using defaults.",
            unset.join(", ")
        );
    }
}
