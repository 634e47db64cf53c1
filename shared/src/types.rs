//! Shared Types
//!
//! Pagination and sorting parameters plus the paginated list envelope.

use serde::{Deserialize, Serialize};

/// Hard cap on page size, regardless of what the client asks for.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters
///
/// Raw values come straight from the query string; use [`page()`],
/// [`limit()`] and [`offset()`] for normalized values (page >= 1,
/// 1 <= limit <= [`MAX_PAGE_SIZE`]).
///
/// [`page()`]: PaginationParams::page
/// [`limit()`]: PaginationParams::limit
/// [`offset()`]: PaginationParams::offset
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    /// Normalized page number (minimum 1)
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// Normalized page size (clamped to 1..=MAX_PAGE_SIZE)
    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, MAX_PAGE_SIZE)
    }

    /// Offset for SQL queries
    ///
    /// Widened to `i64` before multiplying: `page` is client-controlled
    /// and the product can exceed `u32`.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page()) - 1) * i64::from(self.limit())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Sorting query parameters
///
/// `sort_by` names a wire-level field; consumers resolve it against a
/// whitelist of sortable columns and fall back to their default when the
/// field is unknown or absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortParams {
    pub sort_by: Option<String>,

    #[serde(default)]
    pub order: SortOrder,
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
    pub page_count: i64,
}

impl<T> Paginated<T> {
    /// Build a page envelope; `page_count = ceil(total / limit)`
    pub fn new(items: Vec<T>, total: i64, pagination: &PaginationParams) -> Self {
        let limit = pagination.limit();
        let page_count = (total + i64::from(limit) - 1) / i64::from(limit);
        Self {
            items,
            total,
            page: pagination.page(),
            limit,
            page_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagination_is_clamped() {
        let p = PaginationParams { page: 0, limit: 0 };
        assert_eq!(p.page(), 1);
        assert_eq!(p.limit(), 1);

        let p = PaginationParams {
            page: 3,
            limit: 5000,
        };
        assert_eq!(p.limit(), MAX_PAGE_SIZE);
        assert_eq!(p.offset(), i64::from(2 * MAX_PAGE_SIZE));
    }

    #[test]
    fn offset_handles_the_largest_page_number() {
        let p = PaginationParams {
            page: u32::MAX,
            limit: 100,
        };
        assert_eq!(p.offset(), (i64::from(u32::MAX) - 1) * 100);
    }

    #[test]
    fn page_count_rounds_up() {
        let pagination = PaginationParams { page: 1, limit: 10 };
        let page = Paginated::new(vec![1, 2, 3], 21, &pagination);
        assert_eq!(page.page_count, 3);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, &pagination);
        assert_eq!(empty.page_count, 0);
    }
}
