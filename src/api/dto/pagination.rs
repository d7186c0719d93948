//! Pagination-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters for pagination.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams, Validate)]
pub struct PaginationParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: u32,

    /// Number of items per page (max 100)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 20)]
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Calculates the offset for database queries.
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    /// Returns the limit for database queries.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size.clamp(1, MAX_PAGE_SIZE))
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Generic paged response wrapper.
#[derive(Debug, Serialize, ToSchema)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    #[schema(example = 1)]
    pub page: u32,

    #[schema(example = 20)]
    pub page_size: u32,

    /// Total number of items across all pages
    #[schema(example = 100)]
    pub total_items: u64,

    #[schema(example = 5)]
    pub total_pages: u32,

    pub has_next: bool,

    pub has_prev: bool,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total_items: u64) -> Self {
        let page_size = u64::from(params.page_size.max(1));
        let total_pages = total_items.div_ceil(page_size) as u32;

        Self {
            data,
            pagination: PaginationMeta {
                page: params.page,
                page_size: params.page_size,
                total_items,
                total_pages,
                has_next: params.page < total_pages,
                has_prev: params.page > 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_limit() {
        let params = PaginationParams::new(3, 20);
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);
        assert_eq!(PaginationParams::default().offset(), 0);
    }

    #[test]
    fn test_page_meta() {
        let response = PagedResponse::new(vec![1, 2], &PaginationParams::new(2, 2), 5);
        assert_eq!(response.pagination.total_pages, 3);
        assert!(response.pagination.has_next);
        assert!(response.pagination.has_prev);

        let empty: PagedResponse<i32> = PagedResponse::new(vec![], &PaginationParams::default(), 0);
        assert_eq!(empty.pagination.total_pages, 0);
        assert!(!empty.pagination.has_next);
        assert!(!empty.pagination.has_prev);
    }
}
