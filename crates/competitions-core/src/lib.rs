//! # competitions-core
//!
//! Transport-free logic of the competitions MCP bridge.
//!
//! The centrepiece is the pagination drain engine ([`Drain`]): given a
//! page-fetch closure and an item extractor it walks an offset/limit
//! endpoint until the server reports no more data and returns one ordered
//! sequence.
//!
//! Around it sit the pieces every caller of the API needs:
//! - [`PageEnvelope`]: typed view of a paginated response
//! - [`QueryParams`] and the filter structs: query-string mapping
//! - [`ToolRequest`]: typed, decoded-once tool invocations
//! - [`CompetitionsError`]: the shared error type
//!
//! ## Architectural Constraints
//!
//! - No network code: fetches are injected by the caller
//! - No async runtime: futures are awaited, never spawned
//! - No module-level state

// =============================================================================
// MODULES
// =============================================================================

pub mod envelope;
pub mod pagination;
pub mod query;
pub mod request;
pub mod types;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use envelope::{PageEnvelope, Pagination};
pub use pagination::{DEFAULT_PAGE_SIZE, Drain, PageLimitExceeded, PageRequest, Paginated, drain};
pub use query::{
    AgentsFilter, CompetitionAgentsFilter, CompetitionsFilter, LeaderboardFilter, PageParams,
    PerpsPositionFilter, QueryParams, timeline_query,
};
pub use request::{FetchMode, TOOL_NAMES, ToolRequest};
pub use types::{CompetitionStatus, CompetitionType, CompetitionsError, PositionStatus};
