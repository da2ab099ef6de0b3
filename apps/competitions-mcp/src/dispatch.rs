//! # Tool Dispatch
//!
//! Maps a decoded [`ToolRequest`] to client calls and renders the outcome.
//!
//! List tools with `fetchAll` go through the drain engine and answer with a
//! summary object; everything else forwards the API response verbatim.

use crate::client::CompetitionsClient;
use competitions_core::{CompetitionsError, FetchMode, ToolRequest};
use serde_json::{Map, Value, json};

/// Rendered result of one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Pretty-printed JSON on success, compact error payload on failure.
    pub text: String,
    pub is_error: bool,
}

/// Executes tool requests against the competitions API.
#[derive(Clone)]
pub struct Dispatcher {
    client: CompetitionsClient,
}

impl Dispatcher {
    pub fn new(client: CompetitionsClient) -> Self {
        Self { client }
    }

    /// Run a request and render it; failures become an error payload.
    pub async fn call(&self, request: ToolRequest) -> ToolOutcome {
        let tool = request.name();
        tracing::info!("Received tool call: {}", tool);
        tracing::debug!("Arguments: {:?}", request);

        match self.execute(request).await.and_then(|value| render(&value)) {
            Ok(text) => ToolOutcome {
                text,
                is_error: false,
            },
            Err(e) => {
                tracing::error!("Error processing {}: {}", tool, e);
                ToolOutcome {
                    text: json!({ "error": format!("Error: {e}") }).to_string(),
                    is_error: true,
                }
            }
        }
    }

    /// Run a request and return the JSON it produced.
    pub async fn execute(&self, request: ToolRequest) -> Result<Value, CompetitionsError> {
        request.validate()?;
        let client = &self.client;

        match request {
            ToolRequest::ListCompetitions(p) => client.list_competitions(&p.filter()).await,
            ToolRequest::CompetitionDetails(p) => {
                tracing::info!("Getting competition details for ID: {}", p.competition_id);
                client.competition_details(&p.competition_id).await
            }
            ToolRequest::CompetitionRules(p) => client.competition_rules(&p.competition_id).await,
            ToolRequest::CompetitionAgents(p) => {
                tracing::info!("Getting agents for competition: {}", p.competition_id);
                client
                    .competition_agents(&p.competition_id, &p.filter())
                    .await
            }
            ToolRequest::CompetitionTimeline(p) => {
                client
                    .competition_timeline(&p.competition_id, p.bucket)
                    .await
            }
            ToolRequest::CompetitionTrades(p) => {
                tracing::info!("Getting trades for competition: {}", p.competition_id);
                match p.fetch_mode() {
                    FetchMode::All => {
                        tracing::info!("Fetching ALL trades (this may take a while)...");
                        let trades = client.all_competition_trades(&p.competition_id).await?;
                        Ok(drained("trades", trades, "trades"))
                    }
                    FetchMode::Page(page) => {
                        client.competition_trades(&p.competition_id, page).await
                    }
                }
            }
            ToolRequest::AgentTradesInCompetition(p) => match p.fetch_mode() {
                FetchMode::All => {
                    tracing::info!(
                        "Fetching ALL trades for agent {} (this may take a while)...",
                        p.agent_id
                    );
                    let trades = client
                        .all_agent_trades_in_competition(&p.competition_id, &p.agent_id)
                        .await?;
                    Ok(drained("trades", trades, "trades"))
                }
                FetchMode::Page(page) => {
                    client
                        .agent_trades_in_competition(&p.competition_id, &p.agent_id, page)
                        .await
                }
            },
            ToolRequest::CompetitionPerpsPositions(p) => {
                tracing::info!("Getting perps positions for competition: {}", p.competition_id);
                match p.fetch_mode() {
                    FetchMode::All => {
                        let label = p.status.map_or("all", |s| s.as_str());
                        tracing::info!(
                            "Fetching ALL {} positions (this may take a while)...",
                            label
                        );
                        let positions = client
                            .all_competition_perps_positions(&p.competition_id, p.status)
                            .await?;
                        Ok(drained("positions", positions, &format!("{label} positions")))
                    }
                    FetchMode::Page(_) => {
                        client
                            .competition_perps_positions(&p.competition_id, &p.filter())
                            .await
                    }
                }
            }
            ToolRequest::AgentPerpsPositionsInCompetition(p) => {
                client
                    .agent_perps_positions_in_competition(&p.competition_id, &p.agent_id)
                    .await
            }
            ToolRequest::CompetitionPartners(p) => {
                client.competition_partners(&p.competition_id).await
            }
            ToolRequest::GlobalLeaderboard(p) => client.global_leaderboard(&p.filter()).await,
            ToolRequest::ListAgents(p) => client.list_agents(&p.filter()).await,
            ToolRequest::Agent(p) => client.agent(&p.agent_id).await,
            ToolRequest::AgentCompetitions(p) => {
                client.agent_competitions(&p.agent_id, &p.filter()).await
            }
        }
    }
}

/// Summary object for a completed drain.
fn drained(key: &str, items: Vec<Value>, noun: &str) -> Value {
    let total = items.len();
    let mut payload = Map::new();
    payload.insert("success".into(), Value::Bool(true));
    payload.insert(key.into(), Value::Array(items));
    payload.insert("total".into(), json!(total));
    payload.insert(
        "message".into(),
        Value::String(format!("Fetched all {total} {noun}")),
    );
    Value::Object(payload)
}

fn render(value: &Value) -> Result<String, CompetitionsError> {
    serde_json::to_string_pretty(value).map_err(|e| CompetitionsError::ParseError(e.to_string()))
}

// =============================================================================
// TESTS
// =============================================================================
