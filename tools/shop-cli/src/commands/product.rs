//! Show one product with its variants.

use anyhow::{bail, Result};
use serde::Serialize;
use shop_catalog::catalog::{PriceDisplay, ProductDetail, VariantRecord};
use shop_service::{CatalogSource, ServiceError};

use super::ProductArgs;
use crate::context::Context;
use crate::output::{format_price, stock_badge};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DetailView<'a> {
    #[serde(flatten)]
    detail: &'a ProductDetail,
    selected_variant: &'a str,
    price: PriceDisplay,
    image: &'a str,
}

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Memuat produk...");
    let result = ctx.remote().product_detail(&args.slug, &ctx.shutdown).await;
    spinner.finish_and_clear();

    let detail = match result {
        Ok(detail) => detail,
        Err(err) if err.is_not_found() => bail!("Produk tidak ditemukan: {}", args.slug),
        Err(err) => return Err(err_context(err, &args.slug)),
    };

    let Some(variant) = pick_variant(&detail, args.variant.as_deref(), ctx) else {
        bail!("Produk tidak ditemukan: {}", args.slug);
    };
    let price = detail.price_for(variant);

    if ctx.output.is_json() {
        ctx.output.json(&DetailView {
            detail: &detail,
            selected_variant: variant.id.as_str(),
            price,
            image: detail.image_for(variant),
        });
        return Ok(());
    }

    let product = &detail.product;
    ctx.output.header(&product.name);
    if !product.summary.is_empty() {
        ctx.output.info(&product.summary);
    }
    ctx.output.kv("Harga", &format_price(&price));
    if let Some(discount) = price.discount_percentage() {
        ctx.output.kv("Hemat", &format!("{discount:.0}%"));
    }
    ctx.output.kv("Varian", &variant.label());
    ctx.output.kv("Stok", &stock_badge(variant.stock));
    ctx.output.kv("Gambar", detail.image_for(variant));
    if !product.categories.is_empty() {
        let names: Vec<&str> = product.categories.iter().map(|c| c.name.as_str()).collect();
        ctx.output.kv("Kategori", &names.join(", "));
    }

    ctx.output.header("Varian");
    let widths = [28, 22, 32, 8];
    ctx.output
        .table_row(&["VARIAN", "SKU", "HARGA", "STOK"], &widths);
    for candidate in &detail.variants {
        let marker = if candidate.id == variant.id { "* " } else { "  " };
        ctx.output.table_row(
            &[
                &format!("{marker}{}", candidate.label()),
                &candidate.sku,
                &format_price(&detail.price_for(candidate)),
                &stock_badge(candidate.stock),
            ],
            &widths,
        );
    }

    Ok(())
}

fn pick_variant<'a>(
    detail: &'a ProductDetail,
    requested: Option<&str>,
    ctx: &Context,
) -> Option<&'a VariantRecord> {
    if let Some(id) = requested {
        if !detail.variants.iter().any(|v| v.id.as_str() == id) {
            ctx.output
                .warn(&format!("Unknown variant '{id}', using the default variant"));
        }
        return detail.select_variant(id);
    }
    detail.default_variant()
}

fn err_context(err: ServiceError, slug: &str) -> anyhow::Error {
    anyhow::Error::new(err).context(format!("Failed to load product '{slug}'"))
}
