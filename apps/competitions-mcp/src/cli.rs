//! # CLI Module
//!
//! ## Available Commands
//!
//! - `serve` - Run the MCP server on stdio (default)
//! - `tools` - Print the tool catalog as JSON
//! - `call` - Execute one tool and print its result

use crate::client::CompetitionsClient;
use crate::config::ConfigSources;
use crate::dispatch::Dispatcher;
use crate::server::CompetitionsMcp;
use clap::{Parser, Subcommand};
use competitions_core::{CompetitionsError, ToolRequest};
use rmcp::{ServiceExt, transport::stdio};
use serde_json::Value;
use std::path::PathBuf;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Competitions MCP - trading-competitions API as MCP tools
#[derive(Parser, Debug)]
#[command(name = "competitions-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dotenv file consulted when COMPETITIONS_API_KEY is not set
    #[arg(long, global = true, default_value = ".env")]
    pub env_file: PathBuf,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server over stdio
    Serve,

    /// Print the tool catalog (names, descriptions, input schemas)
    Tools,

    /// Execute a single tool call and print the JSON result
    Call {
        /// Tool name, e.g. getCompetitionTrades
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute a parsed command against the loaded configuration sources.
pub async fn execute(
    command: Option<Commands>,
    sources: &ConfigSources,
) -> Result<(), CompetitionsError> {
    match command {
        Some(Commands::Tools) => cmd_tools(),
        Some(Commands::Call { tool, args }) => cmd_call(sources, &tool, &args).await,
        Some(Commands::Serve) | None => cmd_serve(sources).await,
    }
}

fn dispatcher(sources: &ConfigSources) -> Result<Dispatcher, CompetitionsError> {
    let config = sources.resolve()?;
    tracing::info!("API URL: {}", config.api_url);
    tracing::debug!("Configuration: {:?}", config);
    let client = CompetitionsClient::new(&config)?;
    Ok(Dispatcher::new(client))
}

/// Serve MCP over stdio until the client disconnects or a signal arrives.
async fn cmd_serve(sources: &ConfigSources) -> Result<(), CompetitionsError> {
    let mcp = CompetitionsMcp::new(dispatcher(sources)?);

    let service = mcp.serve(stdio()).await.map_err(|e| {
        tracing::error!("MCP serve error: {:?}", e);
        CompetitionsError::Transport(e.to_string())
    })?;

    tracing::info!("Competitions MCP Server running on stdio");

    tokio::select! {
        result = service.waiting() => {
            result.map_err(|e| CompetitionsError::Transport(e.to_string()))?;
            tracing::info!("Client disconnected");
        }
        () = shutdown_signal() => {
            tracing::info!("Shutting down Competitions MCP Server...");
        }
    }
    Ok(())
}

fn cmd_tools() -> Result<(), CompetitionsError> {
    let catalog = CompetitionsMcp::tool_catalog();
    let text = serde_json::to_string_pretty(&catalog)
        .map_err(|e| CompetitionsError::ParseError(e.to_string()))?;
    println!("{text}");
    Ok(())
}

async fn cmd_call(sources: &ConfigSources, tool: &str, args: &str) -> Result<(), CompetitionsError> {
    let arguments: Value =
        serde_json::from_str(args).map_err(|e| CompetitionsError::InvalidArguments {
            tool: tool.to_string(),
            reason: format!("--args is not valid JSON: {e}"),
        })?;
    let request = ToolRequest::decode(tool, arguments)?;

    let value = dispatcher(sources)?.execute(request).await?;
    let text = serde_json::to_string_pretty(&value)
        .map_err(|e| CompetitionsError::ParseError(e.to_string()))?;
    println!("{text}");
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Cannot listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["competitions-mcp"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.env_file, PathBuf::from(".env"));
    }

    #[test]
    fn call_takes_tool_and_args() {
        let cli = Cli::try_parse_from([
            "competitions-mcp",
            "--config",
            "competitions.toml",
            "call",
            "getAgent",
            "--args",
            r#"{"agentId":"a1"}"#,
        ])
        .expect("parse");

        assert_eq!(cli.config, Some(PathBuf::from("competitions.toml")));
        assert!(matches!(
            cli.command,
            Some(Commands::Call { ref tool, ref args }) if tool == "getAgent" && args.contains("a1")
        ));
    }

    #[tokio::test]
    async fn call_with_bad_json_fails_before_config() {
        let sources = ConfigSources::default();
        let err = cmd_call(&sources, "getAgent", "{not json")
            .await
            .expect_err("invalid json");
        assert!(matches!(err, CompetitionsError::InvalidArguments { .. }));
    }
}
