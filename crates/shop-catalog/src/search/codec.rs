//! Mapping between [`CatalogQuery`] and URL query-string parameters.
//!
//! Parameters are `search`, `category`, `sort` and `page`. Parsing never
//! fails: missing or invalid values take their defaults. Serializing drops
//! every parameter that holds its default, so the browser-visible URL
//! stays minimal.

use url::form_urlencoded;

use crate::search::{CatalogQuery, SortKey};

pub const PARAM_SEARCH: &str = "search";
pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_PAGE: &str = "page";

/// Build a query from key/value pairs.
///
/// The first occurrence of a key wins; unknown keys are ignored.
pub fn parse<I, K, V>(pairs: I) -> CatalogQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut search = None;
    let mut category = None;
    let mut sort = None;
    let mut page = None;

    for (key, value) in pairs {
        let value = value.as_ref().trim();
        let slot = match key.as_ref() {
            PARAM_SEARCH => &mut search,
            PARAM_CATEGORY => &mut category,
            PARAM_SORT => &mut sort,
            PARAM_PAGE => &mut page,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(value.to_string());
        }
    }

    CatalogQuery {
        search: search.unwrap_or_default(),
        category: category.unwrap_or_default(),
        sort: sort
            .as_deref()
            .and_then(SortKey::from_param)
            .unwrap_or_default(),
        page: page.as_deref().map(parse_page).unwrap_or(1),
    }
}

/// Parse a raw query string such as `?search=kit&page=2`.
pub fn parse_query_string(raw: &str) -> CatalogQuery {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    parse(form_urlencoded::parse(raw.as_bytes()))
}

// Non-numeric and non-positive pages become 1.
fn parse_page(value: &str) -> u32 {
    match value.parse::<u32>() {
        Ok(page) if page > 0 => page,
        _ => 1,
    }
}

/// Serialize a query to ordered key/value pairs, omitting defaults.
pub fn serialize(query: &CatalogQuery) -> Vec<(&'static str, String)> {
    let query = query.normalized();
    let mut pairs = Vec::with_capacity(4);

    if !query.search.is_empty() {
        pairs.push((PARAM_SEARCH, query.search));
    }
    if !query.category.is_empty() {
        pairs.push((PARAM_CATEGORY, query.category));
    }
    if query.sort != SortKey::Newest {
        pairs.push((PARAM_SORT, query.sort.as_str().to_string()));
    }
    if query.page != 1 {
        pairs.push((PARAM_PAGE, query.page.to_string()));
    }

    pairs
}

/// Serialize a query to a URL-encoded string without a leading `?`.
pub fn to_query_string(query: &CatalogQuery) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(serialize(query))
        .finish()
}
