//! The catalog query engine: filter, sort, paginate.
//!
//! Pure functions over a borrowed product set. The pipeline always runs
//! search filter, category filter, stable sort, then pagination, and
//! `meta` is computed over the filtered set before slicing.

use std::cmp::Reverse;

use crate::catalog::ProductRecord;
use crate::search::{CatalogQuery, PageMeta, PaginatedResult, SortKey, PER_PAGE};

/// Run a query with the shared page size.
pub fn query<'a, I>(products: I, query: &CatalogQuery) -> PaginatedResult<ProductRecord>
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    query_with_page_size(products, query, PER_PAGE)
}

/// Run a query with an explicit page size.
pub fn query_with_page_size<'a, I>(
    products: I,
    query: &CatalogQuery,
    per_page: u32,
) -> PaginatedResult<ProductRecord>
where
    I: IntoIterator<Item = &'a ProductRecord>,
{
    let needle = query.search.trim().to_lowercase();
    let category = query.category.trim();

    let mut matched: Vec<&ProductRecord> = products
        .into_iter()
        .filter(|product| product.matches_text(&needle))
        .filter(|product| matches_category(product, category))
        .collect();

    sort_products(&mut matched, query.sort);

    let meta = PageMeta::new(query.page.max(1), per_page, matched.len() as u64);
    let offset = usize::try_from(meta.offset()).unwrap_or(usize::MAX);
    let data = matched
        .into_iter()
        .skip(offset)
        .take(meta.per_page as usize)
        .cloned()
        .collect();

    PaginatedResult::new(data, meta)
}

fn matches_category(product: &ProductRecord, category: &str) -> bool {
    category.is_empty()
        || product
            .category_id
            .as_ref()
            .is_some_and(|id| id.as_str() == category)
}

/// Stable sort by the requested key; ties keep their input order.
pub fn sort_products(products: &mut [&ProductRecord], key: SortKey) {
    match key {
        SortKey::Newest => products.sort_by_key(|p| Reverse(p.created_at)),
        SortKey::PriceAsc => products.sort_by_key(|p| p.price),
        SortKey::PriceDesc => products.sort_by_key(|p| Reverse(p.price)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductMetadata, ProductStatus};
    use crate::ids::{CategoryId, ProductId};
    use crate::money::Currency;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_717_200_000 + secs, 0).unwrap()
    }

    fn record(n: usize, name: &str, price: u64, created: i64, category: Option<&str>) -> ProductRecord {
        ProductRecord {
            id: ProductId::new(format!("prd-{n}")),
            slug: format!("p-{n}"),
            name: name.to_string(),
            summary: String::new(),
            description: String::new(),
            price,
            currency: Currency::IDR,
            status: ProductStatus::Active,
            category_id: category.map(CategoryId::new),
            categories: Vec::new(),
            tags: Vec::new(),
            assets: Vec::new(),
            metadata: ProductMetadata::default(),
            created_at: at(created),
            updated_at: at(created),
            variants: Vec::new(),
        }
    }

    fn slugs(result: &PaginatedResult<ProductRecord>) -> Vec<String> {
        result.data.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let products = vec![
            record(0, "Edge KIT", 10, 0, None),
            record(1, "Speaker", 20, 0, None),
        ];
        let result = query(&products, &CatalogQuery::new().with_search("  kIt "));
        assert_eq!(slugs(&result), vec!["p-0"]);
    }

    #[test]
    fn test_price_desc_is_stable() {
        let products = vec![
            record(0, "a", 5, 0, None),
            record(1, "b", 9, 0, None),
            record(2, "c", 5, 0, None),
            record(3, "d", 9, 0, None),
        ];
        let result = query(&products, &CatalogQuery::new().with_sort(SortKey::PriceDesc));
        assert_eq!(slugs(&result), vec!["p-1", "p-3", "p-0", "p-2"]);
    }

    #[test]
    fn test_newest_sorts_by_created_desc() {
        let products = vec![
            record(0, "a", 1, 10, None),
            record(1, "b", 1, 30, None),
            record(2, "c", 1, 20, None),
        ];
        let result = query(&products, &CatalogQuery::new());
        assert_eq!(slugs(&result), vec!["p-1", "p-2", "p-0"]);
    }

    #[test]
    fn test_page_beyond_total_is_empty() {
        let products: Vec<_> = (0..8).map(|n| record(n, "x", 1, 0, None)).collect();
        let result = query(&products, &CatalogQuery::new().with_page(3));
        assert!(result.is_empty());
        assert_eq!(result.meta.page, 3);
        assert_eq!(result.meta.total_items, 8);
        assert_eq!(result.meta.total_pages, 2);
        assert!(!result.meta.has_next_page);
        assert!(result.meta.has_previous_page);
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let products: Vec<_> = (0..3).map(|n| record(n, "x", 1, 0, None)).collect();
        let result = query(&products, &CatalogQuery::new().with_page(0));
        assert_eq!(result.meta.page, 1);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_products_without_category_never_match_a_filter() {
        let products = vec![
            record(0, "a", 1, 0, None),
            record(1, "b", 1, 0, Some("cat-robotics")),
        ];
        let result = query(&products, &CatalogQuery::new().with_category("cat-robotics"));
        assert_eq!(slugs(&result), vec!["p-1"]);
    }

    fn arb_products() -> impl Strategy<Value = Vec<ProductRecord>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["Kit", "kit", "Speaker", "Display", "Lamp"]),
                0u64..5,
                0i64..4,
                prop::sample::select(vec![None, Some("cat-a"), Some("cat-b")]),
            ),
            0..30,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(n, (name, price, created, cat))| record(n, name, price, created, cat))
                .collect()
        })
    }

    fn arb_query() -> impl Strategy<Value = CatalogQuery> {
        (
            prop::sample::select(vec!["", "kit", "KIT", "lamp", "zzz"]),
            prop::sample::select(vec!["", "cat-a", "cat-b"]),
            prop::sample::select(SortKey::ALL.to_vec()),
            1u32..8,
        )
            .prop_map(|(search, category, sort, page)| CatalogQuery {
                search: search.to_string(),
                category: category.to_string(),
                sort,
                page,
            })
    }

    proptest! {
        #[test]
        fn test_total_counts_filtered_set(products in arb_products(), q in arb_query()) {
            let result = query(&products, &q);
            let needle = q.search.to_lowercase();
            let expected = products
                .iter()
                .filter(|p| p.matches_text(&needle))
                .filter(|p| q.category.is_empty()
                    || p.category_id.as_ref().is_some_and(|c| c.as_str() == q.category))
                .count();
            prop_assert_eq!(result.meta.total_items, expected as u64);
            prop_assert!(result.data.len() <= PER_PAGE as usize);
            prop_assert!(result.meta.total_pages >= 1);
        }

        #[test]
        fn test_query_is_idempotent(products in arb_products(), q in arb_query()) {
            prop_assert_eq!(query(&products, &q), query(&products, &q));
        }

        #[test]
        fn test_equal_keys_keep_input_order(products in arb_products(), sort in prop::sample::select(SortKey::ALL.to_vec())) {
            let q = CatalogQuery::new().with_sort(sort);
            let result = query_with_page_size(&products, &q, u32::MAX);
            // Slugs encode input position, so ties must stay ascending.
            let position = |p: &ProductRecord| p.slug[2..].parse::<usize>().unwrap();
            for pair in result.data.windows(2) {
                let same_key = match sort {
                    SortKey::Newest => pair[0].created_at == pair[1].created_at,
                    SortKey::PriceAsc | SortKey::PriceDesc => pair[0].price == pair[1].price,
                };
                if same_key {
                    prop_assert!(position(&pair[0]) < position(&pair[1]));
                }
            }
        }
    }
}
