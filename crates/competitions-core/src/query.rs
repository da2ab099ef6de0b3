//! # Query Module
//!
//! Query-string mapping for the competitions API.
//!
//! - Parameters keep the order in which they are pushed
//! - Optional parameters are only sent when the caller defined them
//! - Values are rendered with `Display` (decimal integers, `true`/`false`)

use crate::pagination::PageRequest;
use crate::types::{CompetitionStatus, CompetitionType, PositionStatus};
use std::fmt::Display;

/// Ordered list of query parameters for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, name: &'static str, value: impl Display) {
        self.pairs.push((name, value.to_string()));
    }

    /// Append a parameter only when it is defined.
    pub fn push_opt<T: Display>(&mut self, name: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The pairs in insertion order, ready for URL encoding.
    #[must_use]
    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Value of the first parameter called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

// =============================================================================
// FILTERS
// =============================================================================

/// Plain `limit`/`offset` paging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageParams {
    fn append_to(&self, query: &mut QueryParams) {
        query.push_opt("limit", self.limit);
        query.push_opt("offset", self.offset);
    }

    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.append_to(&mut query);
        query
    }
}

impl From<PageRequest> for PageParams {
    fn from(req: PageRequest) -> Self {
        Self {
            limit: Some(req.limit),
            offset: Some(req.offset),
        }
    }
}

/// Filters for competition listings (global and per agent).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitionsFilter {
    pub status: Option<CompetitionStatus>,
    pub sort: Option<String>,
    pub page: PageParams,
}

impl CompetitionsFilter {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        query.push_opt("status", self.status);
        query.push_opt("sort", self.sort.as_deref());
        self.page.append_to(&mut query);
        query
    }
}

/// Filters for a competition's agent leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompetitionAgentsFilter {
    pub page: PageParams,
    pub include_inactive: Option<bool>,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

impl CompetitionAgentsFilter {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.page.append_to(&mut query);
        query.push_opt("includeInactive", self.include_inactive);
        query.push_opt("filter", self.filter.as_deref());
        query.push_opt("sort", self.sort.as_deref());
        query
    }
}

/// Filters for the competition-wide perps positions feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerpsPositionFilter {
    pub page: PageParams,
    pub status: Option<PositionStatus>,
}

impl PerpsPositionFilter {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.page.append_to(&mut query);
        query.push_opt("status", self.status);
        query
    }
}

/// Filters for the global leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardFilter {
    pub page: PageParams,
    pub competition_type: Option<CompetitionType>,
    pub arena_id: Option<String>,
}

impl LeaderboardFilter {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.page.append_to(&mut query);
        query.push_opt("type", self.competition_type);
        query.push_opt("arenaId", self.arena_id.as_deref());
        query
    }
}

/// Filters for the agent directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentsFilter {
    pub page: PageParams,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

impl AgentsFilter {
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        self.page.append_to(&mut query);
        query.push_opt("filter", self.filter.as_deref());
        query.push_opt("sort", self.sort.as_deref());
        query
    }
}

/// Bucket size (minutes) for the portfolio timeline.
#[must_use]
pub fn timeline_query(bucket: Option<u64>) -> QueryParams {
    let mut query = QueryParams::new();
    query.push_opt("bucket", bucket);
    query
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_parameters_are_not_sent() {
        assert!(PageParams::default().to_query().is_empty());
        assert!(CompetitionAgentsFilter::default().to_query().is_empty());
        assert!(timeline_query(None).is_empty());
    }

    #[test]
    fn competitions_filter_order() {
        let filter = CompetitionsFilter {
            status: Some(CompetitionStatus::Active),
            sort: Some("-createdAt".into()),
            page: PageParams {
                limit: Some(10),
                offset: Some(20),
            },
        };
        let query = filter.to_query();
        assert_eq!(
            query.pairs(),
            &[
                ("status", "active".to_string()),
                ("sort", "-createdAt".to_string()),
                ("limit", "10".to_string()),
                ("offset", "20".to_string()),
            ]
        );
    }

    #[test]
    fn agents_filter_sends_booleans_as_text() {
        let filter = CompetitionAgentsFilter {
            page: PageParams {
                limit: Some(5),
                offset: None,
            },
            include_inactive: Some(false),
            filter: None,
            sort: Some("rank".into()),
        };
        let query = filter.to_query();
        assert_eq!(query.get("includeInactive"), Some("false"));
        assert_eq!(query.get("offset"), None);
        assert_eq!(
            query.pairs().iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec!["limit", "includeInactive", "sort"]
        );
    }

    #[test]
    fn zero_offset_is_still_sent() {
        let query = PageParams::from(PageRequest {
            limit: 100,
            offset: 0,
        })
        .to_query();
        assert_eq!(query.get("limit"), Some("100"));
        assert_eq!(query.get("offset"), Some("0"));
    }

    #[test]
    fn leaderboard_and_positions_use_wire_names() {
        let leaderboard = LeaderboardFilter {
            page: PageParams::default(),
            competition_type: Some(CompetitionType::PerpetualFutures),
            arena_id: Some("arena-1".into()),
        }
        .to_query();
        assert_eq!(leaderboard.get("type"), Some("perpetual_futures"));
        assert_eq!(leaderboard.get("arenaId"), Some("arena-1"));

        let positions = PerpsPositionFilter {
            page: PageParams::default(),
            status: Some(PositionStatus::Liquidated),
        }
        .to_query();
        assert_eq!(positions.get("status"), Some("Liquidated"));
    }
}
