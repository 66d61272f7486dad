//! Serve the catalog over HTTP.

use anyhow::{Context as _, Result};

use super::ServeArgs;
use crate::context::Context;

/// Run the serve command until Ctrl-C.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let bind = args.bind.as_deref().unwrap_or(&ctx.config.server.bind);
    let catalog = ctx.catalog(args.data.as_deref())?;

    ctx.output.success(&format!(
        "Serving {} products and {} categories on http://{}",
        catalog.products.len(),
        catalog.categories.len(),
        bind
    ));
    ctx.output.info("Press Ctrl-C to stop");

    shop_server::serve(catalog, bind, ctx.shutdown.clone())
        .await
        .with_context(|| format!("Failed to serve on {bind}"))?;

    ctx.output.success("Server stopped");
    Ok(())
}
