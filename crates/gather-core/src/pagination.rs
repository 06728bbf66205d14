//! Pagination parameters and response metadata.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Normalized 1-indexed page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Clamp raw query values: page >= 1, 1 <= limit <= 100, with defaults
    /// applied for missing values.
    pub fn normalize(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::normalize(None, None)
    }
}

/// Pagination metadata returned alongside every list page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    /// `total_pages == ceil(total / limit)`.
    pub fn new(total: i64, params: PageParams) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + params.limit - 1) / params.limit
        };
        Self {
            total,
            page: params.page,
            limit: params.limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_defaults() {
        let p = PageParams::normalize(None, None);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_normalize_clamps_limit_to_cap() {
        let p = PageParams::normalize(Some(2), Some(500));
        assert_eq!(p.limit, MAX_PAGE_SIZE);
        assert_eq!(p.offset(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_normalize_rejects_nonpositive_values() {
        let p = PageParams::normalize(Some(0), Some(-5));
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        let params = PageParams::normalize(Some(1), Some(10));
        assert_eq!(Pagination::new(0, params).total_pages, 0);
        assert_eq!(Pagination::new(1, params).total_pages, 1);
        assert_eq!(Pagination::new(10, params).total_pages, 1);
        assert_eq!(Pagination::new(11, params).total_pages, 2);
        assert_eq!(Pagination::new(101, params).total_pages, 11);
    }
}
