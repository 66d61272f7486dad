//! Structured catalog queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort keys understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Newest first by creation timestamp.
    #[default]
    Newest,
    /// Sort by price, low to high.
    PriceAsc,
    /// Sort by price, high to low.
    PriceDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Newest, SortKey::PriceAsc, SortKey::PriceDesc];

    /// Query-string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
        }
    }

    /// Parse a query-string value; unknown values yield `None`.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "newest" => Some(SortKey::Newest),
            "price_asc" => Some(SortKey::PriceAsc),
            "price_desc" => Some(SortKey::PriceDesc),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortKey::Newest => "Terbaru",
            SortKey::PriceAsc => "Harga Termurah",
            SortKey::PriceDesc => "Harga Tertinggi",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter, sort and page request against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free text; empty matches everything.
    #[serde(default)]
    pub search: String,
    /// Category id; empty means all categories.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sort: SortKey,
    /// 1-indexed page number.
    #[serde(default = "first_page")]
    pub page: u32,
}

fn first_page() -> u32 {
    1
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: String::new(),
            sort: SortKey::Newest,
            page: 1,
        }
    }
}

impl CatalogQuery {
    /// Create a query with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Set the category filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the sort key.
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    /// Set the page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Fill defaults the same way the codec does: trimmed text and a
    /// page of at least 1.
    pub fn normalized(&self) -> Self {
        Self {
            search: self.search.trim().to_string(),
            category: self.category.trim().to_string(),
            sort: self.sort,
            page: self.page.max(1),
        }
    }

    /// Apply a single-field change.
    ///
    /// Changing search, category or sort resets the page to 1, since the
    /// previous page number no longer refers to the same result set.
    pub fn apply(&self, change: QueryChange) -> Self {
        let mut next = self.clone();
        match change {
            QueryChange::Search(search) => {
                next.search = search;
                next.page = 1;
            }
            QueryChange::Category(category) => {
                next.category = category;
                next.page = 1;
            }
            QueryChange::Sort(sort) => {
                next.sort = sort;
                next.page = 1;
            }
            QueryChange::Page(page) => next.page = page.max(1),
        }
        next
    }
}

/// One user-driven edit to a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryChange {
    Search(String),
    Category(String),
    Sort(SortKey),
    Page(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let q = CatalogQuery::default();
        assert_eq!(q.page, 1);
        assert_eq!(q.sort, SortKey::Newest);
        assert!(q.search.is_empty());
        assert!(q.category.is_empty());
    }

    #[test]
    fn test_sort_key_params() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::from_param(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::from_param("price"), None);
        assert_eq!(
            serde_json::to_string(&SortKey::PriceDesc).unwrap(),
            r#""price_desc""#
        );
    }

    #[test]
    fn test_filter_change_resets_page() {
        let q = CatalogQuery::new().with_search("kit").with_page(3);

        let sorted = q.apply(QueryChange::Sort(SortKey::PriceAsc));
        assert_eq!(sorted.page, 1);
        assert_eq!(sorted.search, "kit");

        let searched = q.apply(QueryChange::Search("speaker".into()));
        assert_eq!(searched.page, 1);

        let filtered = q.apply(QueryChange::Category("cat-robotics".into()));
        assert_eq!(filtered.page, 1);
        assert_eq!(filtered.category, "cat-robotics");
    }

    #[test]
    fn test_page_change_keeps_filters() {
        let q = CatalogQuery::new()
            .with_search("kit")
            .with_sort(SortKey::PriceDesc);
        let next = q.apply(QueryChange::Page(2));
        assert_eq!(next.page, 2);
        assert_eq!(next.search, "kit");
        assert_eq!(next.sort, SortKey::PriceDesc);

        assert_eq!(q.apply(QueryChange::Page(0)).page, 1);
    }

    #[test]
    fn test_normalized() {
        let q = CatalogQuery::new()
            .with_search("  kit ")
            .with_category(" cat-robotics")
            .with_page(0);
        let n = q.normalized();
        assert_eq!(n.search, "kit");
        assert_eq!(n.category, "cat-robotics");
        assert_eq!(n.page, 1);
    }
}
