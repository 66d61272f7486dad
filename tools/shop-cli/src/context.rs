//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use shop_catalog::catalog::Catalog;
use shop_service::RemoteCatalog;
use tokio_util::sync::CancellationToken;

use crate::config::{CliConfig, CONFIG_FILE_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Where the configuration was read from, if anywhere.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Cancelled on Ctrl-C.
    pub shutdown: CancellationToken,
}

impl Context {
    /// Load context from an explicit config file, or the nearest one found
    /// walking up from the working directory.
    pub fn load(
        config_path: Option<&Path>,
        base_url: Option<String>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None => find_config(&cwd),
        };
        let config = match &config_path {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        Ok(Self {
            config: config.with_base_url_override(base_url),
            config_path,
            output,
            cwd,
            shutdown: CancellationToken::new(),
        })
    }

    /// Facade over the configured catalog API.
    pub fn remote(&self) -> RemoteCatalog {
        RemoteCatalog::new(self.config.fetch_client())
    }

    /// The catalog to serve: the configured data file, or the demo catalog.
    pub fn catalog(&self, data: Option<&Path>) -> Result<Arc<Catalog>> {
        let catalog = match data.or(self.config.server.data.as_deref()) {
            Some(path) => {
                let path = self.resolve_path(path);
                Catalog::load(&path)
                    .with_context(|| format!("Failed to load catalog: {}", path.display()))?
            }
            None => Catalog::demo().context("Failed to load the bundled demo catalog")?,
        };
        Ok(Arc::new(catalog))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find the nearest config file in the directory tree.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}
