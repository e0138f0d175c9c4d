//! Pagination-related DTOs for API requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for pagination.
///
/// Page numbering is 0-based; `size` counts users, never joined rows.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct PaginationParams {
    /// Page number (0-based)
    #[serde(default)]
    #[param(minimum = 0, example = 0)]
    pub page: u32,

    /// Number of items per page (max 100)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 10)]
    pub size: u32,
}

impl PaginationParams {
    /// Calculates the offset for database queries.
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Returns the limit for database queries.
    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    10
}

/// Generic page envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct PageResponse<T> {
    /// The data items for this page
    pub content: Vec<T>,

    /// Current page number (0-based)
    #[schema(example = 0)]
    pub page: u32,

    /// Number of items per page
    #[schema(example = 10)]
    pub size: u32,

    /// Total number of items across all pages
    #[schema(example = 12)]
    pub total_elements: u64,

    /// Total number of pages
    #[schema(example = 2)]
    pub total_pages: u32,
}

impl<T> PageResponse<T> {
    /// Creates a new page envelope.
    ///
    /// `total_elements` counts distinct top-level items (users, for the
    /// listing), so the page math is never skewed by to-many children.
    pub fn new(content: Vec<T>, params: &PaginationParams, total_elements: u64) -> Self {
        let total_pages = total_elements.div_ceil(u64::from(params.size)) as u32;
        Self {
            content,
            page: params.page,
            size: params.size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_first_page_of_ten() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 0);
        assert_eq!(params.size, 10);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.limit(), 10);
    }

    #[test]
    fn twelve_items_at_size_ten_make_two_pages() {
        let params = PaginationParams { page: 0, size: 10 };
        let page = PageResponse::new(vec![0u8; 10], &params, 12);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let params = PaginationParams::default();
        let page = PageResponse::<u8>::new(Vec::new(), &params, 0);
        assert_eq!(page.total_pages, 0);
    }

    proptest! {
        #[test]
        fn offset_never_overflows(page in 0u32..=u32::MAX, size in 1u32..=100) {
            let params = PaginationParams { page, size };
            let offset = params.offset();
            prop_assert!(offset >= 0);
            prop_assert_eq!(offset, i64::from(page) * i64::from(size));
        }

        #[test]
        fn total_pages_covers_all_elements(total in 0u64..=1_000_000, size in 1u32..=100) {
            let params = PaginationParams { page: 0, size };
            let page = PageResponse::<u8>::new(Vec::new(), &params, total);
            let covered = u64::from(page.total_pages) * u64::from(size);
            prop_assert!(covered >= total);
            if page.total_pages > 0 {
                let prev = u64::from(page.total_pages - 1) * u64::from(size);
                prop_assert!(prev < total);
            }
        }
    }
}
