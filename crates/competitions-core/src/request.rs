//! # Tool Requests
//!
//! Typed arguments for every tool the bridge exposes, and the
//! [`ToolRequest`] union that a `(tool name, JSON arguments)` pair is
//! decoded into once at the boundary.
//!
//! Argument names are camelCase on the wire. Required fields are plain
//! types; optional fields are `Option`s and never sent when absent.

use crate::query::{
    AgentsFilter, CompetitionAgentsFilter, CompetitionsFilter, LeaderboardFilter, PageParams,
    PerpsPositionFilter,
};
use crate::types::{CompetitionStatus, CompetitionType, CompetitionsError, PositionStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// FETCH MODE
// =============================================================================

/// How a list tool should read its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// One page, honouring the caller's `limit`/`offset`.
    Page(PageParams),
    /// Every page, through the drain engine; caller paging is ignored.
    All,
}

impl FetchMode {
    #[must_use]
    pub fn from_args(limit: Option<u64>, offset: Option<u64>, fetch_all: Option<bool>) -> Self {
        if fetch_all.unwrap_or(false) {
            Self::All
        } else {
            Self::Page(PageParams { limit, offset })
        }
    }
}

// =============================================================================
// TOOL PARAMETER STRUCTS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListCompetitionsParams {
    #[schemars(
        description = "Filter by competition status: 'pending', 'active', 'ended', or 'all' (default: 'active')"
    )]
    pub status: Option<CompetitionStatus>,
    #[schemars(description = "Sort field (default: 'createdDate')")]
    pub sort: Option<String>,
    #[schemars(
        description = "Maximum number of competitions to return (default: 10)",
        range(min = 1, max = 100)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
}

impl ListCompetitionsParams {
    #[must_use]
    pub fn filter(&self) -> CompetitionsFilter {
        CompetitionsFilter {
            status: self.status,
            sort: self.sort.clone(),
            page: PageParams {
                limit: self.limit,
                offset: self.offset,
            },
        }
    }
}

/// Arguments of tools addressing a single competition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionParams {
    #[schemars(description = "The ID of the competition")]
    pub competition_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionAgentsParams {
    #[schemars(description = "The ID of the competition")]
    pub competition_id: String,
    #[schemars(
        description = "Maximum number of agents to return (default: 100)",
        range(min = 1, max = 250)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
    #[schemars(description = "Whether to include inactive agents (default: false)")]
    pub include_inactive: Option<bool>,
    #[schemars(description = "Filter agents by name")]
    pub filter: Option<String>,
    #[schemars(description = "Sort field for agents")]
    pub sort: Option<String>,
}

impl CompetitionAgentsParams {
    #[must_use]
    pub fn filter(&self) -> CompetitionAgentsFilter {
        CompetitionAgentsFilter {
            page: PageParams {
                limit: self.limit,
                offset: self.offset,
            },
            include_inactive: self.include_inactive,
            filter: self.filter.clone(),
            sort: self.sort.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionTimelineParams {
    #[schemars(description = "The ID of the competition")]
    pub competition_id: String,
    #[schemars(
        description = "Time bucket interval in minutes (default: 30)",
        range(min = 1)
    )]
    pub bucket: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionTradesParams {
    #[schemars(description = "The ID of the competition")]
    pub competition_id: String,
    #[schemars(
        description = "Maximum number of trades to return (default: 100)",
        range(min = 1, max = 250)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
    #[schemars(
        description = "Whether to fetch ALL trades (ignores limit/offset, may be slow for large datasets)"
    )]
    pub fetch_all: Option<bool>,
}

impl CompetitionTradesParams {
    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        FetchMode::from_args(self.limit, self.offset, self.fetch_all)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentTradesParams {
    #[schemars(description = "The ID of the competition")]
    pub competition_id: String,
    #[schemars(description = "The ID of the agent")]
    pub agent_id: String,
    #[schemars(
        description = "Maximum number of trades to return (default: 100)",
        range(min = 1, max = 250)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
    #[schemars(description = "Whether to fetch ALL trades for this agent (ignores limit/offset)")]
    pub fetch_all: Option<bool>,
}

impl AgentTradesParams {
    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        FetchMode::from_args(self.limit, self.offset, self.fetch_all)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionPerpsPositionsParams {
    #[schemars(description = "The ID of the competition")]
    pub competition_id: String,
    #[schemars(
        description = "Filter positions by status: 'Open', 'Closed', 'Liquidated', or 'all'"
    )]
    pub status: Option<PositionStatus>,
    #[schemars(
        description = "Maximum number of positions to return (default: 100)",
        range(min = 1, max = 250)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
    #[schemars(
        description = "Whether to fetch ALL positions (ignores limit/offset, may be slow for large datasets)"
    )]
    pub fetch_all: Option<bool>,
}

impl CompetitionPerpsPositionsParams {
    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        FetchMode::from_args(self.limit, self.offset, self.fetch_all)
    }

    #[must_use]
    pub fn filter(&self) -> PerpsPositionFilter {
        PerpsPositionFilter {
            page: PageParams {
                limit: self.limit,
                offset: self.offset,
            },
            status: self.status,
        }
    }
}

/// Arguments of tools addressing one agent inside one competition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentInCompetitionParams {
    #[schemars(description = "The ID of the competition")]
    pub competition_id: String,
    #[schemars(description = "The ID of the agent")]
    pub agent_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLeaderboardParams {
    #[serde(rename = "type")]
    #[schemars(
        description = "Filter by competition type: 'trading', 'perpetual_futures', or 'spot_live_trading'"
    )]
    pub competition_type: Option<CompetitionType>,
    #[schemars(description = "Filter by arena ID")]
    pub arena_id: Option<String>,
    #[schemars(
        description = "Maximum number of agents to return (default: 100)",
        range(min = 1, max = 250)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
}

impl GlobalLeaderboardParams {
    #[must_use]
    pub fn filter(&self) -> LeaderboardFilter {
        LeaderboardFilter {
            page: PageParams {
                limit: self.limit,
                offset: self.offset,
            },
            competition_type: self.competition_type,
            arena_id: self.arena_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListAgentsParams {
    #[schemars(description = "Filter agents by name")]
    pub filter: Option<String>,
    #[schemars(description = "Sort field for agents")]
    pub sort: Option<String>,
    #[schemars(
        description = "Maximum number of agents to return (default: 100)",
        range(min = 1, max = 250)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
}

impl ListAgentsParams {
    #[must_use]
    pub fn filter(&self) -> AgentsFilter {
        AgentsFilter {
            page: PageParams {
                limit: self.limit,
                offset: self.offset,
            },
            filter: self.filter.clone(),
            sort: self.sort.clone(),
        }
    }
}

/// Arguments of tools addressing a single agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentParams {
    #[schemars(description = "The ID of the agent")]
    pub agent_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgentCompetitionsParams {
    #[schemars(description = "The ID of the agent")]
    pub agent_id: String,
    #[schemars(
        description = "Filter by competition status: 'pending', 'active', 'ended', or 'all'"
    )]
    pub status: Option<CompetitionStatus>,
    #[schemars(description = "Sort field for competitions")]
    pub sort: Option<String>,
    #[schemars(
        description = "Maximum number of competitions to return (default: 100)",
        range(min = 1, max = 250)
    )]
    pub limit: Option<u64>,
    #[schemars(description = "Offset for pagination (default: 0)")]
    pub offset: Option<u64>,
}

impl AgentCompetitionsParams {
    #[must_use]
    pub fn filter(&self) -> CompetitionsFilter {
        CompetitionsFilter {
            status: self.status,
            sort: self.sort.clone(),
            page: PageParams {
                limit: self.limit,
                offset: self.offset,
            },
        }
    }
}

// =============================================================================
// TOOL REQUEST
// =============================================================================

/// One decoded tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "tool", content = "arguments")]
pub enum ToolRequest {
    #[serde(rename = "listCompetitions")]
    ListCompetitions(ListCompetitionsParams),
    #[serde(rename = "getCompetitionDetails")]
    CompetitionDetails(CompetitionParams),
    #[serde(rename = "getCompetitionRules")]
    CompetitionRules(CompetitionParams),
    #[serde(rename = "getCompetitionAgents")]
    CompetitionAgents(CompetitionAgentsParams),
    #[serde(rename = "getCompetitionTimeline")]
    CompetitionTimeline(CompetitionTimelineParams),
    #[serde(rename = "getCompetitionTrades")]
    CompetitionTrades(CompetitionTradesParams),
    #[serde(rename = "getAgentTradesInCompetition")]
    AgentTradesInCompetition(AgentTradesParams),
    #[serde(rename = "getCompetitionPerpsPositions")]
    CompetitionPerpsPositions(CompetitionPerpsPositionsParams),
    #[serde(rename = "getAgentPerpsPositionsInCompetition")]
    AgentPerpsPositionsInCompetition(AgentInCompetitionParams),
    #[serde(rename = "getCompetitionPartners")]
    CompetitionPartners(CompetitionParams),
    #[serde(rename = "getGlobalLeaderboard")]
    GlobalLeaderboard(GlobalLeaderboardParams),
    #[serde(rename = "listAgents")]
    ListAgents(ListAgentsParams),
    #[serde(rename = "getAgent")]
    Agent(AgentParams),
    #[serde(rename = "getAgentCompetitions")]
    AgentCompetitions(AgentCompetitionsParams),
}

/// Every tool name, in catalog order.
pub const TOOL_NAMES: [&str; 14] = [
    "listCompetitions",
    "getCompetitionDetails",
    "getCompetitionRules",
    "getCompetitionAgents",
    "getCompetitionTimeline",
    "getCompetitionTrades",
    "getAgentTradesInCompetition",
    "getCompetitionPerpsPositions",
    "getAgentPerpsPositionsInCompetition",
    "getCompetitionPartners",
    "getGlobalLeaderboard",
    "listAgents",
    "getAgent",
    "getAgentCompetitions",
];

impl ToolRequest {
    /// Decode a tool call. `null` arguments count as an empty object.
    pub fn decode(name: &str, arguments: Value) -> Result<Self, CompetitionsError> {
        if !TOOL_NAMES.contains(&name) {
            return Err(CompetitionsError::UnknownTool(name.to_string()));
        }
        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        let mut tagged = Map::new();
        tagged.insert("tool".into(), Value::String(name.to_string()));
        tagged.insert("arguments".into(), arguments);

        let request: Self = serde_json::from_value(Value::Object(tagged)).map_err(|e| {
            CompetitionsError::InvalidArguments {
                tool: name.to_string(),
                reason: e.to_string(),
            }
        })?;
        request.validate()?;
        Ok(request)
    }

    /// Wire name of the tool.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ListCompetitions(_) => "listCompetitions",
            Self::CompetitionDetails(_) => "getCompetitionDetails",
            Self::CompetitionRules(_) => "getCompetitionRules",
            Self::CompetitionAgents(_) => "getCompetitionAgents",
            Self::CompetitionTimeline(_) => "getCompetitionTimeline",
            Self::CompetitionTrades(_) => "getCompetitionTrades",
            Self::AgentTradesInCompetition(_) => "getAgentTradesInCompetition",
            Self::CompetitionPerpsPositions(_) => "getCompetitionPerpsPositions",
            Self::AgentPerpsPositionsInCompetition(_) => "getAgentPerpsPositionsInCompetition",
            Self::CompetitionPartners(_) => "getCompetitionPartners",
            Self::GlobalLeaderboard(_) => "getGlobalLeaderboard",
            Self::ListAgents(_) => "listAgents",
            Self::Agent(_) => "getAgent",
            Self::AgentCompetitions(_) => "getAgentCompetitions",
        }
    }

    /// Reject blank identifiers; they would silently address a list
    /// endpoint instead of a resource.
    pub fn validate(&self) -> Result<(), CompetitionsError> {
        let (competition_id, agent_id) = match self {
            Self::ListCompetitions(_) | Self::GlobalLeaderboard(_) | Self::ListAgents(_) => {
                (None, None)
            }
            Self::CompetitionDetails(p) | Self::CompetitionRules(p) | Self::CompetitionPartners(p) => {
                (Some(&p.competition_id), None)
            }
            Self::CompetitionAgents(p) => (Some(&p.competition_id), None),
            Self::CompetitionTimeline(p) => (Some(&p.competition_id), None),
            Self::CompetitionTrades(p) => (Some(&p.competition_id), None),
            Self::CompetitionPerpsPositions(p) => (Some(&p.competition_id), None),
            Self::AgentTradesInCompetition(p) => (Some(&p.competition_id), Some(&p.agent_id)),
            Self::AgentPerpsPositionsInCompetition(p) => {
                (Some(&p.competition_id), Some(&p.agent_id))
            }
            Self::Agent(p) => (None, Some(&p.agent_id)),
            Self::AgentCompetitions(p) => (None, Some(&p.agent_id)),
        };

        for (field, value) in [("competitionId", competition_id), ("agentId", agent_id)] {
            if value.is_some_and(|v| v.trim().is_empty()) {
                return Err(CompetitionsError::InvalidArguments {
                    tool: self.name().to_string(),
                    reason: format!("{field} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_arguments() {
        let request = ToolRequest::decode(
            "getCompetitionTrades",
            json!({"competitionId": "c1", "limit": 50, "fetchAll": true}),
        )
        .expect("decode");

        assert_eq!(
            request,
            ToolRequest::CompetitionTrades(CompetitionTradesParams {
                competition_id: "c1".into(),
                limit: Some(50),
                offset: None,
                fetch_all: Some(true),
            })
        );
        assert_eq!(request.name(), "getCompetitionTrades");
    }

    #[test]
    fn null_arguments_are_an_empty_object() {
        let request = ToolRequest::decode("listAgents", Value::Null).expect("decode");
        assert_eq!(request, ToolRequest::ListAgents(ListAgentsParams::default()));
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = ToolRequest::decode("deleteEverything", json!({})).expect_err("unknown");
        assert!(matches!(err, CompetitionsError::UnknownTool(name) if name == "deleteEverything"));
    }

    #[test]
    fn missing_required_field_is_invalid() {
        let err = ToolRequest::decode("getAgentTradesInCompetition", json!({"competitionId": "c1"}))
            .expect_err("agentId missing");
        assert!(matches!(
            err,
            CompetitionsError::InvalidArguments { ref tool, .. } if tool == "getAgentTradesInCompetition"
        ));
    }

    #[test]
    fn blank_identifier_is_invalid() {
        let err = ToolRequest::decode("getAgent", json!({"agentId": "  "})).expect_err("blank");
        assert!(err.to_string().contains("agentId must not be empty"));
    }

    #[test]
    fn enum_arguments_use_wire_spelling() {
        let request = ToolRequest::decode(
            "getGlobalLeaderboard",
            json!({"type": "spot_live_trading", "arenaId": "a1"}),
        )
        .expect("decode");
        let ToolRequest::GlobalLeaderboard(params) = request else {
            unreachable!("decoded into the wrong variant");
        };
        assert_eq!(params.competition_type, Some(CompetitionType::SpotLiveTrading));

        assert!(
            ToolRequest::decode(
                "getCompetitionPerpsPositions",
                json!({"competitionId": "c1", "status": "open"}),
            )
            .is_err()
        );
    }

    #[test]
    fn fetch_all_ignores_paging() {
        assert_eq!(FetchMode::from_args(Some(5), Some(10), Some(true)), FetchMode::All);
        assert_eq!(
            FetchMode::from_args(Some(5), None, Some(false)),
            FetchMode::Page(PageParams {
                limit: Some(5),
                offset: None,
            })
        );
        assert_eq!(
            FetchMode::from_args(None, None, None),
            FetchMode::Page(PageParams::default())
        );
    }

    #[test]
    fn every_catalog_name_decodes_or_reports_missing_fields() {
        for name in TOOL_NAMES {
            let result = ToolRequest::decode(name, json!({}));
            if let Err(err) = result {
                assert!(matches!(err, CompetitionsError::InvalidArguments { .. }));
            }
        }
    }
}
