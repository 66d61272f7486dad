//! CLI command implementations.

pub mod categories;
pub mod config;
pub mod product;
pub mod products;
pub mod serve;

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (default: `server.bind`).
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Catalog JSON file (default: `server.data`, then the demo catalog).
    #[arg(short, long)]
    pub data: Option<PathBuf>,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Case-insensitive text to match against name and summary.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category id to filter by.
    #[arg(long)]
    pub category: Option<String>,

    /// Sort order: newest, price_asc or price_desc.
    #[arg(long)]
    pub sort: Option<String>,

    /// Page number, starting at 1.
    #[arg(short, long)]
    pub page: Option<String>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    /// Product slug.
    pub slug: String,

    /// Variant id to price instead of the default variant.
    #[arg(long)]
    pub variant: Option<String>,
}

/// Arguments for the categories command.
#[derive(Args)]
pub struct CategoriesArgs {
    /// Show one category and its children.
    pub slug: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
