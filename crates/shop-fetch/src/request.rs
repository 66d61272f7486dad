//! Per-call request options.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::FetchError;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
        }
    }
}

/// A request body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Sent as-is, no content type implied.
    Raw(Vec<u8>),
    /// Sent as `text/plain` unless a content type is set.
    Text(String),
    /// Serialized to JSON and sent as `application/json` unless a content
    /// type is set.
    Json(serde_json::Value),
}

impl Body {
    /// The content type implied by this body kind.
    pub fn default_content_type(&self) -> Option<&'static str> {
        match self {
            Body::Raw(_) => None,
            Body::Text(_) => Some("text/plain; charset=utf-8"),
            Body::Json(_) => Some("application/json"),
        }
    }

    /// Encode to bytes.
    pub fn into_bytes(self) -> Result<Vec<u8>, FetchError> {
        match self {
            Body::Raw(bytes) => Ok(bytes),
            Body::Text(text) => Ok(text.into_bytes()),
            Body::Json(value) => Ok(serde_json::to_vec(&value)?),
        }
    }
}

/// Options for a single call: method, headers, body, deadline and an
/// optional external cancellation signal.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    /// Header names are stored lowercased.
    pub headers: HashMap<String, String>,
    pub body: Option<Body>,
    /// Overrides the client-wide default timeout.
    pub timeout: Option<Duration>,
    pub signal: Option<CancellationToken>,
}

impl RequestOptions {
    /// Create options for a method.
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Options for a GET request.
    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    /// Add a header to the request.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Add multiple headers to the request.
    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        for (key, value) in headers {
            self = self.header(key, value);
        }
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(Body::Raw(body.into()));
        self
    }

    /// Set the request body as a string.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.body = Some(Body::Text(text.into()));
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self, FetchError> {
        self.body = Some(Body::Json(serde_json::to_value(value)?));
        Ok(self)
    }

    /// Set a per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach an external cancellation signal.
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }

    /// Set the Accept header.
    pub fn accept(self, content_type: impl Into<String>) -> Self {
        self.header("accept", content_type)
    }

    /// Look up a header, case-insensitively.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headers_are_case_insensitive() {
        let opts = RequestOptions::get()
            .header("X-Shop-Client", "cli")
            .header("x-shop-client", "web");
        assert_eq!(opts.headers.len(), 1);
        assert_eq!(opts.get_header("X-SHOP-CLIENT"), Some("web"));
    }

    #[test]
    fn test_json_body() {
        #[derive(Serialize)]
        struct Note {
            text: &'static str,
        }
        let opts = RequestOptions::new(Method::Post)
            .json(&Note { text: "halo" })
            .unwrap();
        let body = opts.body.unwrap();
        assert_eq!(body.default_content_type(), Some("application/json"));
        assert_eq!(body, Body::Json(json!({"text": "halo"})));
        assert_eq!(body.into_bytes().unwrap(), br#"{"text":"halo"}"#.to_vec());
    }

    #[test]
    fn test_raw_body_has_no_implied_content_type() {
        let opts = RequestOptions::new(Method::Put).body(vec![1, 2, 3]);
        assert_eq!(opts.body.as_ref().unwrap().default_content_type(), None);
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(Method::Patch), reqwest::Method::PATCH);
        assert_eq!(Method::default().to_string(), "GET");
    }
}
