//! Pagination of listing responses
//!
//! Slicing happens after the store returns the full result set. Out-of-range
//! sizes reset to the default rather than clamping to the nearest bound.

use serde::Serialize;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 50;

/// Sanitized page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-indexed
    pub page: usize,
    pub page_size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Build from raw query values; anything unusable falls back to a default
    ///
    /// # Examples
    /// ```
    /// use persons_api::api::pagination::PageRequest;
    ///
    /// let p = PageRequest::from_raw(Some("3"), Some("200"));
    /// assert_eq!(p.page, 3);
    /// assert_eq!(p.page_size, 10);  // Out of range resets, no clamping
    /// ```
    pub fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .and_then(|p| usize::try_from(p).ok())
            .unwrap_or(DEFAULT_PAGE);

        let page_size = page_size
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|s| (1..=MAX_PAGE_SIZE as i64).contains(s))
            .map(|s| s as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Self { page, page_size }
    }

    /// Offset of the first item on this page
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Paginated envelope
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// Slice `items` down to the requested page
///
/// A page past the end yields empty `data`.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Paginated<T> {
    let total = items.len();
    let total_pages = total.div_ceil(request.page_size);

    let data = items
        .into_iter()
        .skip(request.offset())
        .take(request.page_size)
        .collect();

    Paginated {
        data,
        page: request.page,
        page_size: request.page_size,
        total,
        total_pages,
    }
}
