//! # Competitions HTTP Client
//!
//! Authenticated wrapper around the trading-competitions REST API.
//!
//! Every endpoint returns the parsed JSON body unchanged. The `all_*`
//! helpers bind an endpoint's path parameters and run it through the
//! pagination drain engine.

use crate::config::Config;
use competitions_core::{
    AgentsFilter, CompetitionAgentsFilter, CompetitionsError, CompetitionsFilter, Drain,
    LeaderboardFilter, PageEnvelope, PageParams, PageRequest, PerpsPositionFilter,
    PositionStatus, QueryParams, timeline_query,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::future::Future;

/// HTTP client for the competitions API.
#[derive(Clone)]
pub struct CompetitionsClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    drain: Drain,
}

impl CompetitionsClient {
    /// Create a client from resolved configuration.
    pub fn new(config: &Config) -> Result<Self, CompetitionsError> {
        let base_url = Url::parse(config.api_url.trim_end_matches('/')).map_err(|e| {
            CompetitionsError::Config(format!("invalid API URL '{}': {e}", config.api_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CompetitionsError::Config(format!(
                "API URL '{}' cannot carry a path",
                config.api_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("competitions-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CompetitionsError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            drain: config.drain,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// GET an endpoint with Bearer auth and decode the JSON body.
    async fn get(&self, segments: &[&str], query: &QueryParams) -> Result<Value, CompetitionsError> {
        let url = self.endpoint(segments);
        tracing::debug!(path = url.path(), query = ?query.pairs(), "GET");

        let mut req = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            req = req.query(query.pairs());
        }

        let resp = req
            .send()
            .await
            .map_err(|e| CompetitionsError::ConnectionFailed {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        handle_response(resp).await
    }

    // =========================================================================
    // COMPETITION ENDPOINTS
    // =========================================================================

    /// GET /api/competitions
    pub async fn list_competitions(
        &self,
        filter: &CompetitionsFilter,
    ) -> Result<Value, CompetitionsError> {
        self.get(&["api", "competitions"], &filter.to_query()).await
    }

    /// GET /api/competitions/{id}
    pub async fn competition_details(&self, competition_id: &str) -> Result<Value, CompetitionsError> {
        self.get(&["api", "competitions", competition_id], &QueryParams::new())
            .await
    }

    /// GET /api/competitions/{id}/rules
    pub async fn competition_rules(&self, competition_id: &str) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "competitions", competition_id, "rules"],
            &QueryParams::new(),
        )
        .await
    }

    /// GET /api/competitions/{id}/agents → competition leaderboard.
    pub async fn competition_agents(
        &self,
        competition_id: &str,
        filter: &CompetitionAgentsFilter,
    ) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "competitions", competition_id, "agents"],
            &filter.to_query(),
        )
        .await
    }

    /// GET /api/competitions/{id}/timeline → portfolio value history.
    pub async fn competition_timeline(
        &self,
        competition_id: &str,
        bucket: Option<u64>,
    ) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "competitions", competition_id, "timeline"],
            &timeline_query(bucket),
        )
        .await
    }

    /// GET /api/competitions/{id}/trades
    pub async fn competition_trades(
        &self,
        competition_id: &str,
        page: PageParams,
    ) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "competitions", competition_id, "trades"],
            &page.to_query(),
        )
        .await
    }

    /// GET /api/competitions/{id}/agents/{agent}/trades
    pub async fn agent_trades_in_competition(
        &self,
        competition_id: &str,
        agent_id: &str,
        page: PageParams,
    ) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "competitions", competition_id, "agents", agent_id, "trades"],
            &page.to_query(),
        )
        .await
    }

    /// GET /api/competitions/{id}/perps/all-positions
    pub async fn competition_perps_positions(
        &self,
        competition_id: &str,
        filter: &PerpsPositionFilter,
    ) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "competitions", competition_id, "perps", "all-positions"],
            &filter.to_query(),
        )
        .await
    }

    /// GET /api/competitions/{id}/agents/{agent}/perps/positions
    pub async fn agent_perps_positions_in_competition(
        &self,
        competition_id: &str,
        agent_id: &str,
    ) -> Result<Value, CompetitionsError> {
        self.get(
            &[
                "api",
                "competitions",
                competition_id,
                "agents",
                agent_id,
                "perps",
                "positions",
            ],
            &QueryParams::new(),
        )
        .await
    }

    /// GET /api/competitions/{id}/partners
    pub async fn competition_partners(&self, competition_id: &str) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "competitions", competition_id, "partners"],
            &QueryParams::new(),
        )
        .await
    }

    // =========================================================================
    // LEADERBOARD & AGENT ENDPOINTS
    // =========================================================================

    /// GET /api/leaderboard → cross-competition rankings.
    pub async fn global_leaderboard(
        &self,
        filter: &LeaderboardFilter,
    ) -> Result<Value, CompetitionsError> {
        self.get(&["api", "leaderboard"], &filter.to_query()).await
    }

    /// GET /api/agents
    pub async fn list_agents(&self, filter: &AgentsFilter) -> Result<Value, CompetitionsError> {
        self.get(&["api", "agents"], &filter.to_query()).await
    }

    /// GET /api/agents/{agent}
    pub async fn agent(&self, agent_id: &str) -> Result<Value, CompetitionsError> {
        self.get(&["api", "agents", agent_id], &QueryParams::new())
            .await
    }

    /// GET /api/agents/{agent}/competitions
    pub async fn agent_competitions(
        &self,
        agent_id: &str,
        filter: &CompetitionsFilter,
    ) -> Result<Value, CompetitionsError> {
        self.get(
            &["api", "agents", agent_id, "competitions"],
            &filter.to_query(),
        )
        .await
    }

    // =========================================================================
    // FULL DRAINS
    // =========================================================================

    /// Every trade of a competition.
    pub async fn all_competition_trades(
        &self,
        competition_id: &str,
    ) -> Result<Vec<Value>, CompetitionsError> {
        self.drain_items("trades", |req| {
            self.competition_trades(competition_id, PageParams::from(req))
        })
        .await
    }

    /// Every trade of one agent in a competition.
    pub async fn all_agent_trades_in_competition(
        &self,
        competition_id: &str,
        agent_id: &str,
    ) -> Result<Vec<Value>, CompetitionsError> {
        self.drain_items("trades", |req| {
            self.agent_trades_in_competition(competition_id, agent_id, PageParams::from(req))
        })
        .await
    }

    /// Every perps position of a competition, optionally filtered by status.
    pub async fn all_competition_perps_positions(
        &self,
        competition_id: &str,
        status: Option<PositionStatus>,
    ) -> Result<Vec<Value>, CompetitionsError> {
        self.drain_items("positions", |req| {
            let filter = PerpsPositionFilter {
                page: PageParams::from(req),
                status,
            };
            async move { self.competition_perps_positions(competition_id, &filter).await }
        })
        .await
    }

    /// Drain a JSON endpoint, collecting the array stored under `key`.
    async fn drain_items<F, Fut>(
        &self,
        key: &'static str,
        mut fetch: F,
    ) -> Result<Vec<Value>, CompetitionsError>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<Value, CompetitionsError>>,
    {
        let items = self
            .drain
            .run(
                |req| {
                    tracing::debug!(key, offset = req.offset, limit = req.limit, "Fetching page");
                    let page = fetch(req);
                    async move { PageEnvelope::from_value(page.await?) }
                },
                PageEnvelope::items_at(key),
            )
            .await?;

        tracing::info!(key, count = items.len(), "Drained all pages");
        Ok(items)
    }
}

// =============================================================================
// RESPONSE HANDLING
// =============================================================================

/// Turn a response into JSON or an error carrying the server's message.
async fn handle_response(resp: reqwest::Response) -> Result<Value, CompetitionsError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(CompetitionsError::Api {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }
    resp.json::<Value>()
        .await
        .map_err(|e| CompetitionsError::ParseError(e.to_string()))
}

/// Pick the most useful message out of an error body.
///
/// Order: JSON `error` field, JSON `message` field, status code (JSON
/// body), status line (non-JSON body). Non-string fields are rendered as
/// JSON; `null`, `false` and empty strings are skipped.
pub fn error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => ["error", "message"]
            .iter()
            .find_map(|field| match json.get(field)? {
                Value::Null | Value::Bool(false) => None,
                Value::String(m) if m.is_empty() => None,
                Value::String(m) => Some(m.clone()),
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| format!("API request failed: {}", status.as_u16())),
        Err(_) => match status.canonical_reason() {
            Some(reason) => format!("API request failed: {} {reason}", status.as_u16()),
            None => format!("API request failed: {}", status.as_u16()),
        },
    }
}

// =============================================================================
// TESTS
// =============================================================================
