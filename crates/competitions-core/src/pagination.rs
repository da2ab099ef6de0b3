//! # Pagination Drain Engine
//!
//! Turns an offset/limit paginated endpoint into one complete sequence.
//!
//! The engine owns the cursor loop and nothing else: the caller injects a
//! page-fetch closure (already bound to its path parameters and carrying
//! authentication) and an extractor that picks the item array out of a page.
//!
//! ## Guarantees
//!
//! - Pages are fetched strictly sequentially, offsets `0, P, 2P, ...`
//! - Items are appended in fetch order; nothing is reordered or deduplicated
//! - The first fetch error aborts the drain and is returned unchanged
//! - Cursor, page counter and accumulator live inside a single call
//!
//! ## Limitations
//!
//! The cursor is a plain offset. If the backing dataset changes while a
//! drain is in progress, items can be skipped or returned twice. Fixing that
//! needs server-issued cursors and is outside what this engine can promise.
//!
//! Termination relies on the server eventually reporting `hasMore = false`.
//! A [`Drain`] is unbounded unless a page cap is set with
//! [`Drain::with_max_pages`].

use std::future::Future;
use std::num::NonZeroU64;
use thiserror::Error;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: NonZeroU64 = match NonZeroU64::new(100) {
    Some(size) => size,
    None => NonZeroU64::MIN,
};

// =============================================================================
// PAGE CONTRACT
// =============================================================================

/// Arguments of a single page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of items requested.
    pub limit: u64,
    /// Index of the first requested item.
    pub offset: u64,
}

/// A page response that can tell whether more data follows it.
pub trait Paginated {
    /// `true` only when the server explicitly reported more pages.
    fn has_more(&self) -> bool;
}

// =============================================================================
// ERRORS
// =============================================================================

/// A bounded drain fetched its maximum number of pages and the last one
/// still reported more data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "Pagination limit exceeded: fetched {max_pages} pages ({fetched_items} items) and the server still reports more data"
)]
pub struct PageLimitExceeded {
    /// The configured page cap.
    pub max_pages: u64,
    /// Items accumulated before the drain was abandoned.
    pub fetched_items: usize,
}

// =============================================================================
// DRAIN
// =============================================================================

/// Configuration of a drain: page size and optional page cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Drain {
    page_size: NonZeroU64,
    max_pages: Option<NonZeroU64>,
}

impl Default for Drain {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Drain {
    /// Unbounded drain with the given page size.
    #[must_use]
    pub const fn new(page_size: NonZeroU64) -> Self {
        Self {
            page_size,
            max_pages: None,
        }
    }

    /// Set (or clear) the maximum number of pages fetched per drain.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: Option<NonZeroU64>) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub const fn page_size(&self) -> NonZeroU64 {
        self.page_size
    }

    #[must_use]
    pub const fn max_pages(&self) -> Option<NonZeroU64> {
        self.max_pages
    }

    /// Fetch pages until one reports no more data and return every
    /// extracted item in fetch order.
    ///
    /// `has_more` is read before the page is handed to `extract_items`, so
    /// extractors may consume the page.
    pub async fn run<P, T, E, F, Fut, X>(
        &self,
        mut fetch_page: F,
        mut extract_items: X,
    ) -> Result<Vec<T>, E>
    where
        P: Paginated,
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<P, E>>,
        X: FnMut(P) -> Vec<T>,
        E: From<PageLimitExceeded>,
    {
        let limit = self.page_size.get();
        let mut offset = 0u64;
        let mut pages = 0u64;
        let mut accumulated = Vec::new();

        loop {
            if let Some(max_pages) = self.max_pages
                && pages >= max_pages.get()
            {
                return Err(PageLimitExceeded {
                    max_pages: max_pages.get(),
                    fetched_items: accumulated.len(),
                }
                .into());
            }

            let page = fetch_page(PageRequest { limit, offset }).await?;
            pages = pages.saturating_add(1);

            let has_more = page.has_more();
            accumulated.extend(extract_items(page));
            offset = offset.saturating_add(limit);

            if !has_more {
                return Ok(accumulated);
            }
        }
    }
}

/// Unbounded drain with an explicit page size.
///
/// Without a page cap there is no limit error to report, so any error type
/// the fetch produces is accepted as is.
pub async fn drain<P, T, E, F, Fut, X>(
    mut fetch_page: F,
    mut extract_items: X,
    page_size: NonZeroU64,
) -> Result<Vec<T>, E>
where
    P: Paginated,
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<P, E>>,
    X: FnMut(P) -> Vec<T>,
{
    let limit = page_size.get();
    let mut offset = 0u64;
    let mut accumulated = Vec::new();

    loop {
        let page = fetch_page(PageRequest { limit, offset }).await?;
        let has_more = page.has_more();
        accumulated.extend(extract_items(page));
        offset = offset.saturating_add(limit);

        if !has_more {
            return Ok(accumulated);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
