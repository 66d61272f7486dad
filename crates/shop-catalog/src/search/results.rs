//! Paginated results and page metadata.

use serde::{Deserialize, Serialize};

/// Fixed page size shared by the server and its clients.
pub const PER_PAGE: u32 = 6;

/// Pagination info for one result page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Items after filtering, before pagination.
    pub total_items: u64,
    /// Always at least 1.
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    /// Compute page metadata.
    pub fn new(page: u32, per_page: u32, total_items: u64) -> Self {
        let per_page = per_page.max(1);
        let pages = total_items.div_ceil(u64::from(per_page)).max(1);
        let total_pages = u32::try_from(pages).unwrap_or(u32::MAX);

        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }

    /// Offset of the first item on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Every page number, for pager links.
    pub fn page_numbers(&self) -> Vec<u32> {
        (1..=self.total_pages).collect()
    }

    /// The previous page, clamped into range.
    pub fn previous_page(&self) -> u32 {
        self.page.saturating_sub(1).clamp(1, self.total_pages)
    }

    /// The next page, clamped into range.
    pub fn next_page(&self) -> u32 {
        self.page.saturating_add(1).clamp(1, self.total_pages)
    }

    /// Check if on an out-of-range page.
    pub fn is_out_of_range(&self) -> bool {
        self.page > self.total_pages
    }

    /// Get start item number (1-indexed), 0 when the page is empty.
    pub fn start_item(&self) -> u64 {
        if self.offset() >= self.total_items {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> u64 {
        (self.offset() + u64::from(self.per_page)).min(self.total_items)
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self::new(1, PER_PAGE, 0)
    }
}

/// One page of items plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> PaginatedResult<T> {
    /// Create a result page.
    pub fn new(data: Vec<T>, meta: PageMeta) -> Self {
        Self { data, meta }
    }

    /// Create an empty first page.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::default(),
        }
    }

    /// Transform the items, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResult<U> {
        PaginatedResult {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get number of items in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl<T> Default for PaginatedResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_meta_basic() {
        let meta = PageMeta::new(1, 6, 8);
        assert_eq!(meta.total_pages, 2);
        assert!(meta.has_next_page);
        assert!(!meta.has_previous_page);
        assert_eq!(meta.start_item(), 1);
        assert_eq!(meta.end_item(), 6);

        let meta = PageMeta::new(2, 6, 8);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
        assert_eq!(meta.start_item(), 7);
        assert_eq!(meta.end_item(), 8);
    }

    #[test]
    fn test_empty_set_has_one_page() {
        let meta = PageMeta::new(1, 6, 0);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next_page);
        assert_eq!(meta.start_item(), 0);
        assert_eq!(meta.end_item(), 0);
    }

    #[test]
    fn test_out_of_range_page() {
        let meta = PageMeta::new(9, 6, 8);
        assert!(meta.is_out_of_range());
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
        assert_eq!(meta.start_item(), 0);
        assert_eq!(meta.previous_page(), 2);
    }

    #[test]
    fn test_pager_helpers() {
        let meta = PageMeta::new(2, 6, 20);
        assert_eq!(meta.page_numbers(), vec![1, 2, 3, 4]);
        assert_eq!(meta.previous_page(), 1);
        assert_eq!(meta.next_page(), 3);

        let last = PageMeta::new(4, 6, 20);
        assert_eq!(last.next_page(), 4);
        let first = PageMeta::new(1, 6, 20);
        assert_eq!(first.previous_page(), 1);
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let result: PaginatedResult<u32> = PaginatedResult::new(vec![1, 2], PageMeta::new(1, 6, 2));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["meta"]["perPage"], 6);
        assert_eq!(json["meta"]["totalItems"], 2);
        assert_eq!(json["meta"]["hasNextPage"], false);
        assert_eq!(json["meta"]["hasPreviousPage"], false);
    }

    #[test]
    fn test_map_keeps_meta() {
        let result = PaginatedResult::new(vec![1, 2, 3], PageMeta::new(1, 6, 3));
        let mapped = result.map(|n| n * 10);
        assert_eq!(mapped.data, vec![10, 20, 30]);
        assert_eq!(mapped.meta.total_items, 3);
        assert_eq!(mapped.len(), 3);
    }
}
