//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Pagination metadata included in list responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

/// Default page number for list endpoints.
pub(crate) fn default_page() -> u32 {
    1
}

/// Default page size for list endpoints.
pub(crate) fn default_per_page() -> u32 {
    20
}

/// Applies page/per-page slicing to an already-filtered, already-ordered
/// result set. `per_page` is clamped to 100.
pub(crate) fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> (Vec<T>, PaginationMeta) {
    let page = page.max(1);
    let per_page = per_page.clamp(1, 100);

    let total = items.len() as u32;
    let total_pages = if total == 0 {
        0
    } else {
        total.div_ceil(per_page)
    };

    let start = ((page - 1) * per_page) as usize;
    let data: Vec<T> = items
        .into_iter()
        .skip(start)
        .take(per_page as usize)
        .collect();

    (
        data,
        PaginationMeta {
            page,
            per_page,
            total,
            total_pages,
        },
    )
}
