//! List categories, or show one category with its children.

use anyhow::{bail, Context as _, Result};
use shop_catalog::catalog::category::{children_of, orphans, top_level};
use shop_catalog::catalog::CategoryRecord;
use shop_service::CatalogSource;

use super::CategoriesArgs;
use crate::context::Context;

/// Run the categories command.
pub async fn run(args: CategoriesArgs, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Memuat kategori...");
    let result = ctx.remote().list_categories(&ctx.shutdown).await;
    spinner.finish_and_clear();
    let categories = result.context("Failed to list categories")?;

    match args.slug {
        Some(slug) => show_category(&slug, &categories, ctx),
        None => {
            if ctx.output.is_json() {
                ctx.output.json(&categories);
            } else {
                print_tree(&categories, ctx);
            }
            Ok(())
        }
    }
}

fn show_category(slug: &str, categories: &[CategoryRecord], ctx: &Context) -> Result<()> {
    let Some(category) = categories.iter().find(|c| c.slug == slug) else {
        bail!("Kategori tidak ditemukan: {slug}");
    };
    let children = children_of(categories, &category.id);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "category": category,
            "children": children,
        }));
        return Ok(());
    }

    ctx.output.header(&category.name);
    ctx.output.kv("Id", category.id.as_str());
    ctx.output.kv("Slug", &category.slug);
    if let Some(description) = &category.description {
        ctx.output.kv("Deskripsi", description);
    }
    if let Some(parent) = category
        .parent_id
        .as_ref()
        .and_then(|id| categories.iter().find(|c| &c.id == id))
    {
        ctx.output.kv("Induk", &parent.name);
    }
    for child in children {
        ctx.output.list_item(&format!("{} ({})", child.name, child.slug));
    }
    Ok(())
}

fn print_tree(categories: &[CategoryRecord], ctx: &Context) {
    ctx.output.header("Kategori");
    for root in top_level(categories) {
        ctx.output.list_item(&format!("{} ({})", root.name, root.id));
        for child in children_of(categories, &root.id) {
            ctx.output
                .info(&format!("    {} ({})", child.name, child.id));
        }
    }

    // Children whose parent is not in the list would otherwise be hidden.
    for orphan in orphans(categories) {
        ctx.output.list_item(&format!("{} ({})", orphan.name, orphan.id));
    }
}

