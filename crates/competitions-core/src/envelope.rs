//! # Page Envelope
//!
//! Typed view of one paginated API response.
//!
//! Only the fields the bridge interprets are typed (`success` and the
//! pagination descriptor); everything else, including the domain item
//! arrays, stays as raw JSON so it can be forwarded unchanged.

use crate::pagination::Paginated;
use crate::types::CompetitionsError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Pagination descriptor attached to list responses.
///
/// Absent or `null` fields take their defaults, so a descriptor without
/// `hasMore` reads as the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub limit: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub offset: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub has_more: bool,
}

/// One page as returned by a paginated endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Every other field of the response, untouched.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PageEnvelope {
    /// Decode a page from a parsed JSON response.
    pub fn from_value(value: Value) -> Result<Self, CompetitionsError> {
        serde_json::from_value(value)
            .map_err(|e| CompetitionsError::ParseError(format!("invalid page envelope: {e}")))
    }

    /// Move the array stored under `key` out of the page, leaving an empty
    /// array behind.
    ///
    /// A missing or non-array field yields no items and is left untouched.
    pub fn take_items(&mut self, key: &str) -> Vec<Value> {
        match self.body.get_mut(key) {
            Some(Value::Array(items)) => std::mem::take(items),
            _ => Vec::new(),
        }
    }

    /// Extractor for [`crate::Drain::run`] that keeps the array under `key`.
    pub fn items_at(key: &'static str) -> impl FnMut(Self) -> Vec<Value> + Send {
        move |mut page: Self| page.take_items(key)
    }
}

impl Paginated for PageEnvelope {
    fn has_more(&self) -> bool {
        self.pagination.is_some_and(|p| p.has_more)
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
    fn decodes_trade_page_and_keeps_body() {
        let page = PageEnvelope::from_value(json!({
            "success": true,
            "trades": [{"id": "t1"}, {"id": "t2"}],
            "total": 2,
            "pagination": {"total": 2, "limit": 100, "offset": 0, "hasMore": false}
        }))
        .expect("page");

        assert!(page.success);
        assert_eq!(
            page.pagination,
            Some(Pagination {
                total: 2,
                limit: 100,
                offset: 0,
                has_more: false,
            })
        );
        assert_eq!(page.body.get("total"), Some(&json!(2)));
        assert!(!page.has_more());
    }

    #[test]
    fn descriptor_without_has_more_is_terminal() {
        let page = PageEnvelope::from_value(json!({
            "success": true,
            "positions": [],
            "pagination": {"total": 500, "limit": 100, "offset": 0}
        }))
        .expect("page");

        assert!(!page.has_more());
    }

    #[test]
    fn null_has_more_reads_as_last_page() {
        let page = PageEnvelope::from_value(json!({
            "success": true,
            "trades": [1],
            "pagination": {"total": 1, "limit": 100, "offset": 0, "hasMore": null}
        }))
        .expect("page");

        assert!(!page.has_more());
    }

    #[test]
    fn null_numbers_and_success_take_defaults() {
        let page = PageEnvelope::from_value(json!({
            "success": null,
            "positions": [],
            "pagination": {"total": null, "limit": 10, "offset": null, "hasMore": true}
        }))
        .expect("page");

        assert!(!page.success);
        assert_eq!(
            page.pagination,
            Some(Pagination {
                total: 0,
                limit: 10,
                offset: 0,
                has_more: true,
            })
        );
        assert!(page.has_more());
    }

    #[test]
    fn null_descriptor_is_terminal() {
        let page = PageEnvelope::from_value(json!({"trades": [], "pagination": null}))
            .expect("page");
        assert_eq!(page.pagination, None);
        assert!(!page.has_more());
    }

    #[test]
    fn take_items_returns_array_or_nothing() {
        let mut page = PageEnvelope::from_value(json!({
            "success": true,
            "trades": [1, 2, 3],
            "total": 3
        }))
        .expect("page");

        assert_eq!(page.take_items("positions"), Vec::<Value>::new());
        assert_eq!(page.take_items("total"), Vec::<Value>::new());
        assert_eq!(page.take_items("trades"), vec![json!(1), json!(2), json!(3)]);
        assert_eq!(page.body.get("trades"), Some(&json!([])));
        assert_eq!(page.body.get("total"), Some(&json!(3)));
    }

    #[test]
    fn non_object_response_is_a_parse_error() {
        let err = PageEnvelope::from_value(json!([1, 2])).expect_err("array is not a page");
        assert!(matches!(err, CompetitionsError::ParseError(_)));
    }
}
