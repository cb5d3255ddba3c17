//! Page slicing shared by listing and search.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{NoteSyncError, Result};

pub const DEFAULT_PAGE_LIMIT: usize = 9;

/// Which page a caller wants, and how large pages are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based.
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    /// Reject page 0 and limit 0 before they reach the resolver.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(NoteSyncError::validation("page must be at least 1"));
        }
        if self.limit == 0 {
            return Err(NoteSyncError::validation("limit must be at least 1"));
        }
        Ok(())
    }
}

/// Pagination descriptor returned with every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(rename = "page")]
    pub current_page: usize,
    #[serde(rename = "pages")]
    pub total_pages: usize,
    #[serde(rename = "total")]
    pub total_notes: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_notes: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// One page of results plus its descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "data")]
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Slice bounds and descriptor for one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub range: Range<usize>,
    pub pagination: Pagination,
}

/// Number of pages needed for `total` items; never less than 1.
pub fn total_pages(total: usize, limit: usize) -> usize {
    let limit = limit.max(1);
    total.div_ceil(limit).max(1)
}

/// Resolve `page` of size `limit` over `total` items. Bounds are clamped to
/// `[0, total]`, so an out-of-range page gives an empty range with accurate
/// totals. A zero page or limit is treated as 1.
pub fn resolve(total: usize, page: usize, limit: usize) -> PageWindow {
    let page = page.max(1);
    let limit = limit.max(1);

    let start = (page - 1).saturating_mul(limit).min(total);
    let end = page.saturating_mul(limit).min(total);

    PageWindow {
        range: start..end,
        pagination: Pagination {
            current_page: page,
            total_pages: total_pages(total, limit),
            total_notes: total,
            limit,
        },
    }
}

/// Cut the requested page out of an already-ordered collection.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let window = resolve(items.len(), request.page, request.limit);
    Page {
        items: items[window.range].to_vec(),
        pagination: window.pagination,
    }
}
