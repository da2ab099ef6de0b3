//! # Property-Based Tests
//!
//! Drain completeness and call-count invariants over simulated
//! offset-paginated datasets.

use competitions_core::{
    CompetitionsError, Drain, PageEnvelope, PageRequest, Pagination, drain,
};
use proptest::prelude::*;
use serde_json::{Value, json};
use std::num::NonZeroU64;

// =============================================================================
// HELPERS
// =============================================================================

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
}

/// One page of a `trades` listing, shaped like the real API response.
fn trades_page(data: &[u64], req: PageRequest) -> PageEnvelope {
    let start = (req.offset as usize).min(data.len());
    let end = start.saturating_add(req.limit as usize).min(data.len());
    let trades: Vec<Value> = data[start..end].iter().map(|id| json!({"id": id})).collect();

    let mut body = serde_json::Map::new();
    body.insert("trades".into(), Value::Array(trades));
    body.insert("total".into(), json!(data.len()));
    PageEnvelope {
        success: true,
        pagination: Some(Pagination {
            total: data.len() as u64,
            limit: req.limit,
            offset: req.offset,
            has_more: end < data.len(),
        }),
        body,
    }
}

fn ids(items: &[Value]) -> Vec<u64> {
    items
        .iter()
        .filter_map(|item| item.get("id").and_then(Value::as_u64))
        .collect()
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Draining N items in pages of P returns exactly the N items in order.
    #[test]
    fn drain_returns_every_item_in_order(n in 0u64..400, p in 1u64..60) {
        let data: Vec<u64> = (0..n).collect();
        let page_size = NonZeroU64::new(p).expect("p >= 1");

        let items = runtime().block_on(drain(
            |req| {
                let page = trades_page(&data, req);
                async move { Ok::<_, CompetitionsError>(page) }
            },
            PageEnvelope::items_at("trades"),
            page_size,
        )).expect("drain");

        prop_assert_eq!(ids(&items), data);
    }

    /// Exactly ceil(N / P) calls (one call when N = 0), at offsets k * P.
    #[test]
    fn drain_issues_one_call_per_page(n in 0u64..400, p in 1u64..60) {
        let data: Vec<u64> = (0..n).collect();
        let page_size = NonZeroU64::new(p).expect("p >= 1");
        let mut offsets = Vec::new();

        runtime().block_on(drain(
            |req| {
                offsets.push(req.offset);
                let page = trades_page(&data, req);
                async move { Ok::<_, CompetitionsError>(page) }
            },
            PageEnvelope::items_at("trades"),
            page_size,
        )).expect("drain");

        let expected_calls = n.div_ceil(p).max(1);
        let expected: Vec<u64> = (0..expected_calls).map(|k| k * p).collect();
        prop_assert_eq!(offsets, expected);
    }

    /// A cap at or above the real page count never changes the result.
    #[test]
    fn sufficient_page_cap_is_transparent(n in 0u64..200, p in 1u64..30, slack in 0u64..5) {
        let data: Vec<u64> = (0..n).collect();
        let page_size = NonZeroU64::new(p).expect("p >= 1");
        let pages_needed = n.div_ceil(p).max(1);
        let cap = NonZeroU64::new(pages_needed + slack).expect("cap >= 1");

        let items = runtime().block_on(
            Drain::new(page_size).with_max_pages(Some(cap)).run(
                |req| {
                    let page = trades_page(&data, req);
                    async move { Ok::<_, CompetitionsError>(page) }
                },
                PageEnvelope::items_at("trades"),
            ),
        ).expect("drain");

        prop_assert_eq!(ids(&items), data);
    }

    /// A cap below the real page count fails after exactly `cap` calls.
    #[test]
    fn insufficient_page_cap_fails(n in 2u64..200, p in 1u64..10) {
        let data: Vec<u64> = (0..n).collect();
        let page_size = NonZeroU64::new(p).expect("p >= 1");
        let pages_needed = n.div_ceil(p);
        prop_assume!(pages_needed >= 2);
        let cap = pages_needed - 1;
        let mut calls = 0u64;

        let result = runtime().block_on(
            Drain::new(page_size)
                .with_max_pages(NonZeroU64::new(cap))
                .run(
                    |req| {
                        calls += 1;
                        let page = trades_page(&data, req);
                        async move { Ok::<_, CompetitionsError>(page) }
                    },
                    PageEnvelope::items_at("trades"),
                ),
        );

        let is_limit = matches!(
            result,
            Err(CompetitionsError::PageLimitExceeded(e)) if e.max_pages == cap
        );
        prop_assert!(is_limit);
        prop_assert_eq!(calls, cap);
    }
}
