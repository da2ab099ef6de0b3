//! # Core Type Definitions
//!
//! Shared vocabulary of the competitions bridge:
//! - Filter enumerations accepted by the API (`CompetitionStatus`,
//!   `PositionStatus`, `CompetitionType`)
//! - The error type (`CompetitionsError`)
//!
//! Enumerations serialize to the exact strings the API expects and expose
//! them through `as_str` for query-string rendering.

use crate::pagination::PageLimitExceeded;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// COMPETITION STATUS
// =============================================================================

/// Lifecycle filter for competition listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionStatus {
    Pending,
    Active,
    Ended,
    /// No status filter on the server side.
    All,
}

impl CompetitionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Ended => "ended",
            Self::All => "all",
        }
    }
}

impl fmt::Display for CompetitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// POSITION STATUS
// =============================================================================

/// Filter for perpetual futures positions.
///
/// The API capitalizes the concrete states but keeps `all` lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum PositionStatus {
    Open,
    Closed,
    Liquidated,
    #[serde(rename = "all")]
    All,
}

impl PositionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Liquidated => "Liquidated",
            Self::All => "all",
        }
    }
}

impl fmt::Display for PositionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// COMPETITION TYPE
// =============================================================================

/// Competition flavour used by the global leaderboard filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CompetitionType {
    Trading,
    PerpetualFutures,
    SpotLiveTrading,
}

impl CompetitionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trading => "trading",
            Self::PerpetualFutures => "perpetual_futures",
            Self::SpotLiveTrading => "spot_live_trading",
        }
    }
}

impl fmt::Display for CompetitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors surfaced by the competitions bridge.
///
/// - No silent failures: every variant reaches the tool caller
/// - `Api` carries the server's own message when it sent one
#[derive(Debug, Error)]
pub enum CompetitionsError {
    /// The API could not be reached at all.
    #[error("Cannot connect to competitions API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// The API answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A success response body could not be decoded.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Tool arguments did not match the tool's declared shape.
    #[error("Invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// No tool with this name exists.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// A bounded drain hit its page cap before the server reported the end.
    #[error(transparent)]
    PageLimitExceeded(#[from] PageLimitExceeded),

    /// The MCP stdio transport failed.
    #[error("MCP transport error: {0}")]
    Transport(String),

    /// Startup configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
