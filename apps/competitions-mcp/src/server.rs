//! # Competitions MCP Server
//!
//! Implements `ServerHandler` with 14 MCP tools that proxy to the
//! competitions API through the [`Dispatcher`]. Resources and prompts are
//! advertised too; rmcp's default handlers answer both lists empty.

use crate::dispatch::Dispatcher;
use competitions_core::ToolRequest;
use competitions_core::request::{
    AgentCompetitionsParams, AgentInCompetitionParams, AgentParams, AgentTradesParams,
    CompetitionAgentsParams, CompetitionParams, CompetitionPerpsPositionsParams,
    CompetitionTimelineParams, CompetitionTradesParams, GlobalLeaderboardParams,
    ListAgentsParams, ListCompetitionsParams,
};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo, Tool},
    tool, tool_handler, tool_router,
};

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to the competitions HTTP API.
#[derive(Clone)]
pub struct CompetitionsMcp {
    dispatcher: Dispatcher,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

impl CompetitionsMcp {
    /// Every tool with its description and input schema.
    pub fn tool_catalog() -> Vec<Tool> {
        Self::tool_router().list_all()
    }

    /// Dispatch and wrap the outcome. Tool failures are reported in-band
    /// with `isError` set instead of as protocol errors.
    async fn respond(&self, request: ToolRequest) -> Result<CallToolResult, McpError> {
        let outcome = self.dispatcher.call(request).await;
        let content = vec![Content::text(outcome.text)];
        Ok(if outcome.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        })
    }
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl CompetitionsMcp {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "listCompetitions",
        description = "List all competitions with optional filtering by status. Returns competition names, types, dates, and participant counts."
    )]
    async fn list_competitions(
        &self,
        params: Parameters<ListCompetitionsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::ListCompetitions(params.0)).await
    }

    #[tool(
        name = "getCompetitionDetails",
        description = "Get detailed information about a specific competition including name, type, status, dates, participant counts, rewards, and trading constraints."
    )]
    async fn get_competition_details(
        &self,
        params: Parameters<CompetitionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::CompetitionDetails(params.0)).await
    }

    #[tool(
        name = "getCompetitionRules",
        description = "Get the trading rules and constraints for a competition, including rate limits, available chains, slippage formula, and token requirements."
    )]
    async fn get_competition_rules(
        &self,
        params: Parameters<CompetitionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::CompetitionRules(params.0)).await
    }

    #[tool(
        name = "getCompetitionAgents",
        description = "Get the leaderboard and performance metrics for all agents participating in a competition, including rankings, PnL, portfolio values, and risk metrics."
    )]
    async fn get_competition_agents(
        &self,
        params: Parameters<CompetitionAgentsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::CompetitionAgents(params.0)).await
    }

    #[tool(
        name = "getCompetitionTimeline",
        description = "Get portfolio value history over time for all agents in a competition. Useful for charting performance trends."
    )]
    async fn get_competition_timeline(
        &self,
        params: Parameters<CompetitionTimelineParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::CompetitionTimeline(params.0)).await
    }

    #[tool(
        name = "getCompetitionTrades",
        description = "Get trade history for a paper trading competition, including token swaps, amounts, USD values, and timestamps."
    )]
    async fn get_competition_trades(
        &self,
        params: Parameters<CompetitionTradesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::CompetitionTrades(params.0)).await
    }

    #[tool(
        name = "getAgentTradesInCompetition",
        description = "Get trade history for a specific agent in a competition. Useful for analyzing individual agent trading patterns."
    )]
    async fn get_agent_trades_in_competition(
        &self,
        params: Parameters<AgentTradesParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::AgentTradesInCompetition(params.0))
            .await
    }

    #[tool(
        name = "getCompetitionPerpsPositions",
        description = "Get perpetual futures positions for all agents in a competition, including leverage, collateral, PnL, and liquidation prices."
    )]
    async fn get_competition_perps_positions(
        &self,
        params: Parameters<CompetitionPerpsPositionsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::CompetitionPerpsPositions(params.0))
            .await
    }

    #[tool(
        name = "getAgentPerpsPositionsInCompetition",
        description = "Get perpetual futures positions for a specific agent in a competition."
    )]
    async fn get_agent_perps_positions_in_competition(
        &self,
        params: Parameters<AgentInCompetitionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::AgentPerpsPositionsInCompetition(params.0))
            .await
    }

    #[tool(
        name = "getCompetitionPartners",
        description = "Get the sponsors/partners associated with a competition."
    )]
    async fn get_competition_partners(
        &self,
        params: Parameters<CompetitionParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::CompetitionPartners(params.0)).await
    }

    #[tool(
        name = "getGlobalLeaderboard",
        description = "Get the global cross-competition leaderboard showing agent rankings across all competitions."
    )]
    async fn get_global_leaderboard(
        &self,
        params: Parameters<GlobalLeaderboardParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::GlobalLeaderboard(params.0)).await
    }

    #[tool(
        name = "listAgents",
        description = "List all registered agents with optional filtering and pagination."
    )]
    async fn list_agents(
        &self,
        params: Parameters<ListAgentsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::ListAgents(params.0)).await
    }

    #[tool(
        name = "getAgent",
        description = "Get public profile information for a specific agent, including stats and competition history."
    )]
    async fn get_agent(&self, params: Parameters<AgentParams>) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::Agent(params.0)).await
    }

    #[tool(
        name = "getAgentCompetitions",
        description = "Get all competitions that a specific agent has participated in, with their performance in each."
    )]
    async fn get_agent_competitions(
        &self,
        params: Parameters<AgentCompetitionsParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond(ToolRequest::AgentCompetitions(params.0)).await
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for CompetitionsMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Trading competitions server. Use tools to list competitions, inspect \
                 leaderboards, trades and perps positions, and look up agents. List tools \
                 accept limit/offset; trade and position tools also accept fetchAll to \
                 retrieve every page."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
