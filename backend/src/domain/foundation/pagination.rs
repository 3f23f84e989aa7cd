//! Page/page-size windowing shared by every listing endpoint.
//!
//! A listing endpoint receives a [`PageQuery`] from the query string, turns
//! it into a normalised [`PageRequest`], asks its repository for one window
//! of rows plus the total row count, and returns a [`Page`].
//!
//! # Invariants
//!
//! - `1 <= page_size <= MAX_PAGE_SIZE` and `page >= 1` (out-of-range input is clamped)
//! - `pages == ceil(total / page_size)`, so `total == 0` gives `pages == 0`
//! - `items.len() <= page_size`
//!
//! ```
//! use saas_api::domain::foundation::{Page, PageRequest};
//!
//! let request = PageRequest::new(1, 10);
//! let page = Page::new((1..=10).collect::<Vec<u32>>(), 25, &request);
//! assert_eq!(page.pages, 3);
//! ```

use serde::{Deserialize, Serialize};

/// First page number.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Number of pages needed to hold `total` items, `page_size` per page.
///
/// `page_size` of zero is treated as one.
pub fn page_count(total: u64, page_size: u32) -> u64 {
    let page_size = u64::from(page_size.max(1));
    total.div_ceil(page_size)
}

/// Raw pagination parameters as they arrive on the query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageQuery {
    /// Applies defaults, then clamps into the allowed window.
    pub fn into_request(self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(DEFAULT_PAGE),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        query.into_request()
    }
}

/// A normalised, 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Creates a request, clamping `page` to at least 1 and `page_size`
    /// into `1..=MAX_PAGE_SIZE`.
    pub fn new(page: u32, page_size: u32) -> Self {
        let clamped_size = page_size.clamp(1, MAX_PAGE_SIZE);
        if clamped_size != page_size {
            tracing::debug!(requested = page_size, clamped = clamped_size, "page_size clamped");
        }
        Self {
            page: page.max(1),
            page_size: clamped_size,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Rows to skip before this window starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Maximum rows in this window.
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Cuts this request's window out of an already ordered, fully
    /// materialised collection.
    pub fn slice<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(all.len());
        let end = start.saturating_add(self.page_size as usize).min(all.len());
        &all[start..end]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PAGE_SIZE)
    }
}

/// One window of an ordered listing plus total-count metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items in this window, in listing order.
    pub items: Vec<T>,

    /// Count of all matching entities, across every page.
    pub total: u64,

    /// The 1-based page number that was served.
    pub page: u32,

    /// The effective (clamped) page size.
    pub page_size: u32,

    /// Total number of pages: `ceil(total / page_size)`.
    pub pages: u64,
}

impl<T> Page<T> {
    /// Bundles a window of items with metadata for `request`.
    ///
    /// Items beyond `page_size` are dropped so the window never exceeds the
    /// requested size, whatever the repository returned.
    pub fn new(mut items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        items.truncate(request.page_size as usize);
        Self {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
            pages: page_count(total, request.page_size),
        }
    }

    /// A page with no items and a total of zero.
    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Converts every item, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn twenty_five_items_in_pages_of_ten_make_three_pages() {
        let request = PageRequest::new(1, 10);
        let page = Page::new((0..10).collect::<Vec<_>>(), 25, &request);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn zero_total_gives_zero_pages_and_no_items() {
        let page: Page<u32> = Page::empty(&PageRequest::default());
        assert_eq!(page.pages, 0);
        assert_eq!(page.total, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn page_count_holds_at_the_top_of_the_range() {
        assert_eq!(page_count(u64::MAX - 5, 10), u64::MAX / 10);
        assert_eq!(page_count(u64::MAX, 10), u64::MAX / 10 + 1);
        assert_eq!(page_count(u64::MAX, 1), u64::MAX);
        assert_eq!(page_count(u64::MAX, 0), u64::MAX);
    }

    #[test]
    fn oversized_page_size_is_clamped_to_max() {
        let request = PageRequest::new(1, 500);
        assert_eq!(request.page_size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn zero_page_and_page_size_are_raised_to_one() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), 1);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn query_defaults_to_first_page_of_ten() {
        let request = PageQuery::default().into_request();
        assert_eq!(request, PageRequest::new(1, 10));
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(PageRequest::new(3, 25).offset(), 50);
        assert_eq!(PageRequest::new(3, 25).limit(), 25);
    }

    #[test]
    fn slice_cuts_window_and_tolerates_overrun() {
        let all: Vec<u32> = (1..=25).collect();
        assert_eq!(PageRequest::new(3, 10).slice(&all), &[21, 22, 23, 24, 25]);
        assert!(PageRequest::new(9, 10).slice(&all).is_empty());
    }

    #[test]
    fn new_truncates_overlong_windows() {
        let request = PageRequest::new(1, 2);
        let page = Page::new(vec![1, 2, 3], 3, &request);
        assert_eq!(page.items, vec![1, 2]);
    }

    #[test]
    fn map_keeps_metadata() {
        let request = PageRequest::new(2, 2);
        let page = Page::new(vec![3, 4], 5, &request).map(|n| n.to_string());
        assert_eq!(page.items, vec!["3".to_string(), "4".to_string()]);
        assert_eq!(page.page, 2);
        assert_eq!(page.pages, 3);
    }

    #[test]
    fn serializes_with_flat_metadata() {
        let page = Page::new(vec!["a"], 1, &PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"items": ["a"], "total": 1, "page": 1, "page_size": 10, "pages": 1})
        );
    }

    proptest! {
        #[test]
        fn pages_is_ceiling_of_total_over_page_size(total in 0u64..1_000_000, page_size in 1u32..=100) {
            let page: Page<()> = Page::new(Vec::new(), total, &PageRequest::new(1, page_size));
            let expected = (total as f64 / page_size as f64).ceil() as u64;
            prop_assert_eq!(page.pages, expected);
        }

        #[test]
        fn request_is_always_within_bounds(page in any::<u32>(), page_size in any::<u32>()) {
            let request = PageRequest::new(page, page_size);
            prop_assert!(request.page() >= 1);
            prop_assert!((1..=MAX_PAGE_SIZE).contains(&request.page_size()));
        }

        #[test]
        fn window_never_exceeds_page_size(len in 0usize..300, page in 1u32..20, page_size in 1u32..=100) {
            let all: Vec<usize> = (0..len).collect();
            let request = PageRequest::new(page, page_size);
            let page = Page::new(request.slice(&all).to_vec(), len as u64, &request);
            prop_assert!(page.items.len() <= page.page_size as usize);
        }
    }
}
