//! Pagination window arithmetic.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page/limit query parameters shared by listing endpoints
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number (default: 1)
    pub page: Option<i64>,
    /// Items per page (default: 12, max: 100)
    pub limit: Option<i64>,
}

/// Pagination metadata returned alongside every listing
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page, 1-based
    pub page: i64,
    /// Items per page
    pub limit: i64,
    /// Total matching items
    pub total_count: i64,
    /// Total pages for this limit
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    /// Compute the window for a page/limit pair over `total_count` items.
    ///
    /// Pages past the end are allowed: they produce an empty window, not
    /// an error.
    pub fn compute(params: PageParams, total_count: i64) -> Self {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let total_count = total_count.max(0);
        let total_pages = (total_count + limit - 1) / limit;

        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }

    /// Documents to skip before this page starts. Saturates instead of
    /// overflowing: `page` is client-controlled and has no upper bound.
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).max(0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, limit: i64) -> PageParams {
        PageParams {
            page: Some(page),
            limit: Some(limit),
        }
    }

    #[test]
    fn defaults_apply_when_params_absent() {
        let p = Pagination::compute(PageParams { page: None, limit: None }, 30);
        assert_eq!(p.page, 1);
        assert_eq!(p.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.skip(), 0);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination::compute(params(1, 12), 25);
        assert_eq!(p.total_pages, 3);

        let p = Pagination::compute(params(1, 12), 24);
        assert_eq!(p.total_pages, 2);
    }

    #[test]
    fn next_and_prev_flags() {
        let p = Pagination::compute(params(1, 12), 25);
        assert!(p.has_next_page);
        assert!(!p.has_prev_page);

        let p = Pagination::compute(params(3, 12), 25);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);
    }

    #[test]
    fn skip_window() {
        let p = Pagination::compute(params(3, 12), 100);
        assert_eq!(p.skip(), 24);
    }

    #[test]
    fn page_beyond_range_is_permitted() {
        let p = Pagination::compute(params(999, 12), 24);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next_page);
        assert!(p.has_prev_page);
        assert_eq!(p.skip(), 11976);
    }

    #[test]
    fn huge_page_saturates_instead_of_overflowing() {
        let p = Pagination::compute(params(i64::MAX, 12), 24);
        assert_eq!(p.skip(), i64::MAX as u64);
        assert!(!p.has_next_page);
    }

    #[test]
    fn empty_result_set() {
        let p = Pagination::compute(params(1, 12), 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next_page);
        assert!(!p.has_prev_page);
    }

    #[test]
    fn zero_page_clamps_to_first() {
        let p = Pagination::compute(params(0, 12), 24);
        assert_eq!(p.page, 1);
        assert_eq!(p.skip(), 0);
    }
}
