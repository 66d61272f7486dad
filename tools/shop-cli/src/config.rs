//! CLI configuration.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shop_fetch::FetchClient;
use shop_observability::LogConfig;

/// Environment variable that overrides `[api].base_url`.
pub const API_BASE_URL_ENV: &str = "SHOP_API_BASE_URL";

/// File names searched for, in order, in each directory.
pub const CONFIG_FILE_NAMES: [&str; 3] = ["shop.toml", ".shop.toml", "shop.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Catalog API the browsing commands talk to.
    #[serde(default)]
    pub api: ApiConfig,

    /// Settings for `shop serve`.
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl CliConfig {
    /// Load config from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Replace the API base URL when an override is present.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        self
    }

    /// Check the config. Returns `(errors, warnings)`.
    pub fn validate(&self) -> (Vec<String>, Vec<String>) {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match url::Url::parse(&self.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                if self.api.base_url.ends_with('/') {
                    warnings.push("api.base_url has a trailing '/'".to_string());
                }
            }
            Ok(url) => errors.push(format!(
                "api.base_url must use http or https, not '{}'",
                url.scheme()
            )),
            Err(err) => errors.push(format!("api.base_url is not a valid URL: {err}")),
        }

        if self.api.timeout_ms == 0 {
            errors.push("api.timeout_ms must be greater than 0".to_string());
        } else if self.api.timeout_ms > 120_000 {
            warnings.push(format!(
                "api.timeout_ms of {}ms is unusually long",
                self.api.timeout_ms
            ));
        }

        for name in self.api.headers.keys() {
            if name.trim().is_empty() || name.contains(char::is_whitespace) {
                errors.push(format!("api.headers has an invalid header name '{name}'"));
            }
        }

        if self.server.bind.parse::<SocketAddr>().is_err() {
            errors.push(format!(
                "server.bind '{}' is not a socket address",
                self.server.bind
            ));
        }

        if let Some(data) = &self.server.data {
            if !data.exists() {
                errors.push(format!("server.data '{}' does not exist", data.display()));
            }
        }

        (errors, warnings)
    }

    /// Build a request client from the `[api]` section.
    pub fn fetch_client(&self) -> FetchClient {
        self.api
            .headers
            .iter()
            .fold(
                FetchClient::new()
                    .with_base_url(self.api.base_url.clone())
                    .with_timeout(self.api.timeout()),
                |client, (name, value)| client.with_default_header(name, value.clone()),
            )
            .with_default_header("x-shop-client", concat!("shop-cli/", env!("CARGO_PKG_VERSION")))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// API client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog API, including any path prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request deadline in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Headers sent with every request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_timeout_ms() -> u64 {
    shop_fetch::DEFAULT_TIMEOUT.as_millis() as u64
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            headers: BTreeMap::new(),
        }
    }
}

/// Server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Catalog JSON file. The bundled demo catalog is served when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data: None,
        }
    }
}

/// Generate a default shop.toml config file.
pub fn generate_default_config() -> String {
    r#"# Storefront catalog configuration

[api]
base_url = "http://127.0.0.1:3000"
timeout_ms = 12000

# [api.headers]
# x-api-key = "..."

[server]
bind = "127.0.0.1:3000"
# data = "catalog.json"

[logging]
level = "info"
format = "human"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_observability::{LogFormat, LogLevel};

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.api.timeout_ms, 12_000);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_load_toml_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://shop.example.com/api"

[api.headers]
x-api-key = "secret"

[logging]
format = "json"
"#,
        )
        .unwrap();

        let config = CliConfig::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://shop.example.com/api");
        assert_eq!(config.api.timeout_ms, 12_000);
        assert_eq!(config.api.headers["x-api-key"], "secret");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.json");

        let mut config = CliConfig::default();
        config.api.timeout_ms = 500;
        config.server.data = Some(PathBuf::from("catalog.json"));
        config.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.trim_start().starts_with('{'));
        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_save_toml_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");

        let mut config = CliConfig::default();
        config
            .api
            .headers
            .insert("x-api-key".to_string(), "secret".to_string());
        config.save(&path).unwrap();

        assert_eq!(CliConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");
        std::fs::write(&path, "[api\nbase_url = 1").unwrap();

        let err = CliConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_base_url_override() {
        let config = CliConfig::default()
            .with_base_url_override(Some(" https://api.example.com ".to_string()));
        assert_eq!(config.api.base_url, "https://api.example.com");

        let config = CliConfig::default().with_base_url_override(Some(String::new()));
        assert_eq!(config.api.base_url, "http://127.0.0.1:3000");
    }

    #[test]
    fn test_validate_default_is_clean() {
        let (errors, warnings) = CliConfig::default().validate();
        assert!(errors.is_empty(), "{errors:?}");
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn test_validate_reports_errors() {
        let mut config = CliConfig::default();
        config.api.base_url = "ftp://example.com".to_string();
        config.api.timeout_ms = 0;
        config.server.bind = "localhost".to_string();
        config.server.data = Some(PathBuf::from("/definitely/not/here.json"));

        let (errors, _) = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
    }

    #[test]
    fn test_validate_warns_on_trailing_slash() {
        let config = CliConfig::default()
            .with_base_url_override(Some("http://127.0.0.1:3000/api/".to_string()));
        let (errors, warnings) = config.validate();
        assert!(errors.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_fetch_client_uses_api_section() {
        let mut config = CliConfig::default();
        config.api.timeout_ms = 750;
        let client = config.fetch_client();
        assert_eq!(client.base_url(), Some("http://127.0.0.1:3000"));
        assert_eq!(client.default_timeout(), Duration::from_millis(750));
    }
}
