//! Typed HTTP client for the storefront.
//!
//! Every call is bounded by a deadline, honours an optional caller
//! cancellation signal, negotiates JSON, and decodes the body into the
//! requested type. Failures surface as [`FetchError`] values. No retries
//! are made here; retry policy belongs to the caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use shop_fetch::{FetchClient, RequestOptions};
//! use serde::Deserialize;
//! use std::time::Duration;
//!
//! #[derive(Deserialize)]
//! struct Category {
//!     id: String,
//!     name: String,
//! }
//!
//! # async fn demo() -> Result<(), shop_fetch::FetchError> {
//! let client = FetchClient::new()
//!     .with_base_url("http://localhost:3000/api")
//!     .with_default_header("x-shop-client", "cli");
//!
//! // Relative paths resolve against the base URL.
//! let categories: Vec<Category> = client.get("/categories").send().await?;
//!
//! // Per-call options.
//! let opts = RequestOptions::get().timeout(Duration::from_secs(2));
//! let raw = client.send_payload("/products?page=2", opts).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod request;
mod response;
mod scope;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

pub use error::FetchError;
pub use request::{Body, Method, RequestOptions};
pub use response::{Payload, Response};
pub use scope::{CancelScope, ScopeExit};

/// Default per-call deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(12_000);

/// HTTP client for making outbound requests.
///
/// Holds only static configuration; one instance can be shared across
/// concurrent calls.
#[derive(Debug, Clone)]
pub struct FetchClient {
    base_url: Option<String>,
    default_timeout: Duration,
    default_headers: HashMap<String, String>,
    http: reqwest::Client,
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a new HTTP client.
    pub fn new() -> Self {
        Self::with_http_client(reqwest::Client::new())
    }

    /// Create a client over an existing `reqwest` client.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            base_url: None,
            default_timeout: DEFAULT_TIMEOUT,
            default_headers: HashMap::new(),
            http,
        }
    }

    /// Create a client with a base URL that relative targets resolve against.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the deadline used when a call does not give its own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Add a default header that will be included in all requests.
    pub fn with_default_header(
        mut self,
        key: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Self {
        self.default_headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Resolve a target against the base URL.
    ///
    /// Absolute `http(s)` URLs are used as-is. Relative targets are joined
    /// by concatenation so a base path prefix such as `/api` survives.
    pub fn resolve(&self, target: &str) -> Result<String, FetchError> {
        let joined = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            let base = self
                .base_url
                .as_deref()
                .ok_or_else(|| FetchError::InvalidUrl(target.to_string()))?;
            let separator = if target.starts_with('/') { "" } else { "/" };
            format!("{}{}{}", base.trim_end_matches('/'), separator, target)
        };

        url::Url::parse(&joined)
            .map(String::from)
            .map_err(|e| FetchError::InvalidUrl(format!("{joined}: {e}")))
    }

    /// Create a GET request.
    pub fn get(&self, target: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Get, target)
    }

    /// Create a POST request.
    pub fn post(&self, target: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Post, target)
    }

    /// Create a PUT request.
    pub fn put(&self, target: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Put, target)
    }

    /// Create a DELETE request.
    pub fn delete(&self, target: impl Into<String>) -> ClientRequestBuilder<'_> {
        self.request(Method::Delete, target)
    }

    /// Create a request with a custom method.
    pub fn request(&self, method: Method, target: impl Into<String>) -> ClientRequestBuilder<'_> {
        ClientRequestBuilder {
            client: self,
            target: target.into(),
            options: RequestOptions::new(method),
        }
    }

    /// Send a request and decode the body into `T`.
    ///
    /// The target type is the response schema: a payload that does not
    /// deserialize into `T` fails with [`FetchError::ShapeInvalid`]. A
    /// `204` decodes as JSON `null`, so `Option<T>` or `()` accept it.
    pub async fn send<T: DeserializeOwned>(
        &self,
        target: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        let response = self.execute(target, options).await?;
        let url = response.url.clone();
        let value = response.payload()?.into_value();

        serde_json::from_value(value).map_err(|e| FetchError::ShapeInvalid {
            url,
            reason: e.to_string(),
        })
    }

    /// Send a request and return the decoded payload without typing it.
    pub async fn send_payload(
        &self,
        target: &str,
        options: RequestOptions,
    ) -> Result<Payload, FetchError> {
        self.execute(target, options).await?.payload()
    }

    /// Send a request and return the successful response with its body read.
    #[instrument(name = "fetch", skip_all, fields(method = %options.method, target = %target))]
    pub async fn execute(
        &self,
        target: &str,
        options: RequestOptions,
    ) -> Result<Response, FetchError> {
        let url = self.resolve(target)?;
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        let scope = CancelScope::new(options.signal.as_ref(), timeout);

        if scope.is_cancelled() {
            debug!(url = %url, "signal already cancelled, not sending");
            return Err(FetchError::Aborted { url });
        }

        let request = self.prepare(&url, options)?;
        let started = Instant::now();

        let outcome = scope.run(self.round_trip(&url, request)).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(url = %url, elapsed_ms, error = %err, "request failed");
                return Err(err);
            }
            Err(ScopeExit::TimedOut(timeout)) => {
                warn!(url = %url, elapsed_ms, "request timed out");
                return Err(FetchError::Timeout { url, timeout });
            }
            Err(ScopeExit::Cancelled) => {
                debug!(url = %url, elapsed_ms, "request aborted");
                return Err(FetchError::Aborted { url });
            }
        };

        debug!(url = %url, status = response.status, elapsed_ms, "response received");
        response.error_for_status()
    }

    fn prepare(&self, url: &str, options: RequestOptions) -> Result<reqwest::RequestBuilder, FetchError> {
        let mut headers = self.default_headers.clone();
        headers.extend(options.headers);
        headers
            .entry("accept".to_string())
            .or_insert_with(|| "application/json".to_string());

        let mut builder = self.http.request(options.method.into(), url);

        if let Some(body) = options.body {
            if let Some(content_type) = body.default_content_type() {
                headers
                    .entry("content-type".to_string())
                    .or_insert_with(|| content_type.to_string());
            }
            builder = builder.body(body.into_bytes()?);
        }

        for (key, value) in &headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        Ok(builder)
    }

    async fn round_trip(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Response, FetchError> {
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.bytes().await.map_err(transport)?;

        Ok(Response::new(url, status, headers, body.to_vec()))
    }
}

/// A request builder bound to a client.
pub struct ClientRequestBuilder<'a> {
    client: &'a FetchClient,
    target: String,
    options: RequestOptions,
}

impl<'a> ClientRequestBuilder<'a> {
    /// Add a header to the request.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.options = self.options.header(key, value);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.options = self.options.body(body);
        self
    }

    /// Set the request body as a string.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.options = self.options.text(text);
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.options = self.options.json(value)?;
        Ok(self)
    }

    /// Override the client's default timeout for this call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.timeout(timeout);
        self
    }

    /// Attach an external cancellation signal.
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.options = self.options.signal(signal);
        self
    }

    /// Send and decode into `T`.
    pub async fn send<T: DeserializeOwned>(self) -> Result<T, FetchError> {
        self.client.send(&self.target, self.options).await
    }

    /// Send and return the untyped payload.
    pub async fn send_payload(self) -> Result<Payload, FetchError> {
        self.client.send_payload(&self.target, self.options).await
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Body, FetchClient, FetchError, Method, Payload, RequestOptions, Response};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FetchClient {
        FetchClient::new().with_base_url("http://localhost:3000/api/")
    }

    #[test]
    fn test_resolve_relative_keeps_base_path() {
        assert_eq!(
            client().resolve("/products?page=2").unwrap(),
            "http://localhost:3000/api/products?page=2"
        );
        assert_eq!(
            client().resolve("categories").unwrap(),
            "http://localhost:3000/api/categories"
        );
    }

    #[test]
    fn test_resolve_absolute_ignores_base() {
        assert_eq!(
            client().resolve("https://cdn.example.com/x.json").unwrap(),
            "https://cdn.example.com/x.json"
        );
    }

    #[test]
    fn test_resolve_relative_without_base_fails() {
        let err = FetchClient::new().resolve("/products").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_resolve_invalid_base_fails() {
        let client = FetchClient::new().with_base_url("not a url");
        assert!(matches!(client.resolve("/x"), Err(FetchError::InvalidUrl(_))));
    }

    #[test]
    fn test_defaults() {
        let client = FetchClient::new();
        assert_eq!(client.default_timeout(), Duration::from_secs(12));
        assert_eq!(client.base_url(), None);
    }

    #[tokio::test]
    async fn test_cancelled_signal_never_sends() {
        let signal = CancellationToken::new();
        signal.cancel();
        // Nothing listens on port 9; an attempted connection would fail
        // with a transport error instead.
        let err = FetchClient::new()
            .with_base_url("http://127.0.0.1:9")
            .get("/products")
            .signal(signal)
            .send_payload()
            .await
            .unwrap_err();
        assert!(err.is_aborted());
    }
}
