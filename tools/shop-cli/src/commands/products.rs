//! List a page of products through the catalog API.

use anyhow::{Context as _, Result};
use shop_catalog::catalog::ProductRecord;
use shop_catalog::search::{codec, CatalogQuery, PaginatedResult, SortKey};
use shop_service::CatalogSource;

use super::ProductsArgs;
use crate::context::Context;
use crate::output::{format_price, truncate};

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    if let Some(sort) = args.sort.as_deref() {
        if SortKey::from_param(sort).is_none() {
            ctx.output.warn(&format!(
                "Unknown sort '{}', using '{}'",
                sort,
                SortKey::default().as_str()
            ));
        }
    }

    let query = build_query(&args);
    ctx.output.debug(&format!(
        "GET /products?{}",
        codec::to_query_string(&query)
    ));

    let spinner = ctx.output.spinner("Memuat produk...");
    let result = ctx.remote().list_products(&query, &ctx.shutdown).await;
    spinner.finish_and_clear();
    let page = result.context("Failed to list products")?;

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    print_page(&query, &page, ctx);
    Ok(())
}

/// Build the query the same way the listing page reads its URL.
pub fn build_query(args: &ProductsArgs) -> CatalogQuery {
    let pairs = [
        (codec::PARAM_SEARCH, args.search.as_deref()),
        (codec::PARAM_CATEGORY, args.category.as_deref()),
        (codec::PARAM_SORT, args.sort.as_deref()),
        (codec::PARAM_PAGE, args.page.as_deref()),
    ];
    codec::parse(
        pairs
            .into_iter()
            .filter_map(|(key, value)| value.map(|value| (key, value))),
    )
}

fn print_page(query: &CatalogQuery, page: &PaginatedResult<ProductRecord>, ctx: &Context) {
    ctx.output.header(&format!("Produk ({})", query.sort.display_name()));

    if page.is_empty() {
        ctx.output.info("Produk tidak ditemukan");
    } else {
        let widths = [24, 32, 40];
        ctx.output.table_row(&["SLUG", "NAMA", "HARGA"], &widths);
        for product in &page.data {
            let price = format_price(&product.card_price());
            ctx.output.table_row(
                &[
                    &truncate(&product.slug, widths[0]),
                    &truncate(&product.name, widths[1]),
                    &price,
                ],
                &widths,
            );
        }
    }

    let meta = &page.meta;
    ctx.output.info("");
    ctx.output.info(&format!(
        "Halaman {} dari {} ({} produk)",
        meta.page, meta.total_pages, meta.total_items
    ));
    if meta.has_next_page {
        ctx.output
            .info(&format!("Halaman berikutnya: --page {}", meta.next_page()));
    }
}
