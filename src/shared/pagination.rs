//! Page/limit pagination shared by every list endpoint.
//!
//! Query values arrive as loose strings. Anything that does not parse to a
//! positive integer falls back to the default, and `limit` is capped.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Raw `?page=&limit=` query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl PageQuery {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
        }
    }

    /// Resolve the loose query into a concrete page request
    pub fn resolve(&self) -> PageRequest {
        PageRequest::new(
            parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            parse_positive(self.limit.as_deref()).unwrap_or(DEFAULT_LIMIT),
        )
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value >= 1)
}

/// A validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Number of records to skip before this page
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Wrap one page of items with its pagination metadata
    pub fn paginate<T>(self, items: Vec<T>, total_items: u64) -> Paginated<T> {
        Paginated {
            items,
            pagination: Pagination::compute(self, total_items),
        }
    }
}

/// Pagination metadata returned alongside a page of items
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn compute(request: PageRequest, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(request.limit);
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            limit: request.limit,
            has_next: request.page < total_pages,
            has_prev: request.page > 1,
        }
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}
