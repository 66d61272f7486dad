//! HTTP response handling.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::FetchError;

/// A decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Body declared as JSON.
    Json(serde_json::Value),
    /// Any other body, as text.
    Text(String),
    /// `204 No Content`.
    Empty,
}

impl Payload {
    /// The value handed to typed decoding: `null` for an empty body and a
    /// JSON string for text.
    pub fn into_value(self) -> serde_json::Value {
        match self {
            Payload::Json(value) => value,
            Payload::Text(text) => serde_json::Value::String(text),
            Payload::Empty => serde_json::Value::Null,
        }
    }

    /// The `message` field of a JSON object body.
    pub fn message(&self) -> Option<&str> {
        match self {
            Payload::Json(value) => value.get("message").and_then(|m| m.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }
}

/// An HTTP response with its body fully read.
#[derive(Debug, Clone)]
pub struct Response {
    /// The resolved request URL.
    pub url: String,
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(
        url: impl Into<String>,
        status: u16,
        headers: HashMap<String, String>,
        body: Vec<u8>,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            url: url.into(),
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the response was a client error (4xx status).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Check if the response was a server error (5xx status).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::ShapeInvalid {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Whether the declared content type is JSON (`application/json` or a
    /// `+json` suffix type).
    pub fn is_json(&self) -> bool {
        self.content_type().is_some_and(|ct| {
            let mime = ct
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
    }

    /// Decode the body by status and declared content type.
    pub fn payload(&self) -> Result<Payload, FetchError> {
        if self.status == 204 {
            return Ok(Payload::Empty);
        }
        if self.is_json() {
            return self.json().map(Payload::Json);
        }
        Ok(Payload::Text(self.text()))
    }

    /// Convert to a Result, returning an error for non-2xx status codes.
    ///
    /// The error carries the decoded body; a body that claims JSON but
    /// does not parse is kept as text.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            return Ok(self);
        }

        let body = self
            .payload()
            .unwrap_or_else(|_| Payload::Text(self.text()));
        let message = body
            .message()
            .map(str::to_string)
            .or_else(|| {
                reqwest::StatusCode::from_u16(self.status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Request failed".to_string());

        Err(FetchError::Failed {
            status: self.status,
            message,
            body,
            url: self.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new("http://localhost/t", status, HashMap::new(), body.to_vec())
    }

    fn make_response_with_headers(
        status: u16,
        headers: Vec<(&str, &str)>,
        body: &[u8],
    ) -> Response {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Response::new("http://localhost/t", status, headers, body.to_vec())
    }

    // === Status Check Tests ===

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(make_response(299, b"").is_success());
        assert!(!make_response(199, b"").is_success());
        assert!(!make_response(404, b"").is_success());
    }

    #[test]
    fn test_response_error_classes() {
        assert!(make_response(404, b"").is_client_error());
        assert!(make_response(503, b"").is_server_error());
        assert!(!make_response(200, b"").is_client_error());
    }

    // === Header Tests ===

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let resp = make_response_with_headers(200, vec![("Content-Type", "text/html")], b"");
        assert_eq!(resp.header("content-type"), Some("text/html"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/html"));
        assert_eq!(resp.content_type(), Some("text/html"));
        assert_eq!(resp.header("x-missing"), None);
    }

    // === Payload Tests ===

    #[test]
    fn test_payload_json() {
        let resp = make_response_with_headers(
            200,
            vec![("content-type", "application/json; charset=utf-8")],
            br#"{"ok":true}"#,
        );
        assert_eq!(resp.payload().unwrap(), Payload::Json(json!({"ok": true})));
    }

    #[test]
    fn test_payload_text_for_other_types() {
        let resp = make_response_with_headers(200, vec![("content-type", "text/plain")], b"{\"ok\":1}");
        assert_eq!(resp.payload().unwrap(), Payload::Text("{\"ok\":1}".to_string()));

        let resp = make_response(200, b"no content type");
        assert_eq!(resp.payload().unwrap(), Payload::Text("no content type".to_string()));
    }

    #[test]
    fn test_payload_204_is_empty() {
        let resp = make_response_with_headers(204, vec![("content-type", "application/json")], b"");
        assert!(resp.payload().unwrap().is_empty());
    }

    #[test]
    fn test_payload_invalid_json_is_shape_error() {
        let resp = make_response_with_headers(200, vec![("content-type", "application/json")], b"{oops");
        assert!(matches!(resp.payload(), Err(FetchError::ShapeInvalid { .. })));
    }

    #[test]
    fn test_problem_json_counts_as_json() {
        let resp = make_response_with_headers(
            400,
            vec![("content-type", "application/problem+json")],
            br#"{"message":"bad"}"#,
        );
        assert!(resp.is_json());
    }

    // === Error Conversion Tests ===

    #[test]
    fn test_error_for_status_success() {
        assert!(make_response(200, b"ok").error_for_status().is_ok());
    }

    #[test]
    fn test_error_for_status_uses_body_message() {
        let resp = make_response_with_headers(
            404,
            vec![("content-type", "application/json")],
            br#"{"message":"Produk tidak ditemukan"}"#,
        );
        match resp.error_for_status() {
            Err(FetchError::Failed { status, message, body, url }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Produk tidak ditemukan");
                assert_eq!(body.message(), Some("Produk tidak ditemukan"));
                assert_eq!(url, "http://localhost/t");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_error_for_status_falls_back_to_reason() {
        match make_response(503, b"down").error_for_status() {
            Err(FetchError::Failed { message, body, .. }) => {
                assert_eq!(message, "Service Unavailable");
                assert_eq!(body, Payload::Text("down".to_string()));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_error_for_status_keeps_unparseable_json_as_text() {
        let resp = make_response_with_headers(500, vec![("content-type", "application/json")], b"<html>");
        match resp.error_for_status() {
            Err(FetchError::Failed { body, message, .. }) => {
                assert_eq!(body, Payload::Text("<html>".to_string()));
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }
}
