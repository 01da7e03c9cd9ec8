use serde::Serialize;

use super::{parse_int, QueryMap};

/// Page size used when `limit` is missing, unparsable or not positive.
pub const DEFAULT_LIMIT: i64 = 10;

/// Result-set window derived from the `page` and `limit` query values.
///
/// `page` is one-based on the wire; `page=0` and `page=1` both select the
/// first window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationFilter {
    pub limit: i64,
    offset: i64,
}

impl PaginationFilter {
    pub fn new(page: i64, limit: i64) -> Self {
        let limit = if limit > 0 { limit } else { DEFAULT_LIMIT };
        let offset = page.saturating_sub(1).max(0).saturating_mul(limit);
        Self { limit, offset }
    }

    /// Build from raw `page`/`limit` values. Values that do not parse count
    /// as 0, which then falls back to the first page and the default limit.
    pub fn from_query(query: &QueryMap) -> Self {
        let read = |key: &str| {
            query
                .get(key)
                .and_then(|raw| parse_int(raw))
                .unwrap_or(0)
        };
        Self::new(read("page"), read("limit"))
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// One-based page number this window corresponds to.
    pub fn page(&self) -> i64 {
        // `limit` is positive for every value built through `new`.
        (self.offset / self.limit.max(1)).saturating_add(1)
    }

    /// Wrap one window of results together with the total row count.
    pub fn paginate<T>(&self, data: T, total: i64) -> Pagination<T> {
        Pagination { total, data }
    }
}

impl Default for PaginationFilter {
    fn default() -> Self {
        Self::new(1, DEFAULT_LIMIT)
    }
}

/// One window of results plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination<T> {
    pub total: i64,
    pub data: T,
}
