//! # competitions-mcp
//!
//! MCP bridge to the trading-competitions REST API.
//!
//! ```text
//! MCP client ──stdio──▶ CompetitionsMcp ──▶ Dispatcher ──▶ CompetitionsClient ──HTTPS──▶ API
//!                                               │
//!                                               └── fetchAll ──▶ competitions_core::Drain
//! ```
//!
//! The library half exists so the dispatcher and client can be exercised
//! by integration tests against a mock API.

pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod server;

pub use client::CompetitionsClient;
pub use config::{Config, ConfigSources};
pub use dispatch::{Dispatcher, ToolOutcome};
pub use server::CompetitionsMcp;
