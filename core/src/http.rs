//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe the single GET the client issues and the response it
//! gets back as plain data. `FredClient` builds `HttpRequest` values and
//! parses `HttpResponse` values without touching the network; a `Transport`
//! executes the round-trip in between.

use url::Url;

use crate::error::{FredError, Result};

/// A GET request described as plain data.
///
/// `url` is the endpoint URL without a query string; `query` holds the
/// already-serialized parameters in the order they will be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// The full request URL with the query string percent-encoded.
    pub fn full_url(&self) -> Result<Url> {
        Url::parse_with_params(&self.url, &self.query)
            .map_err(|e| FredError::Config(format!("bad request url {}: {e}", self.url)))
    }

    /// Value of a query parameter, if present.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the transport after executing an `HttpRequest`, then passed
/// to `FredClient::parse_response`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Canonical reason phrase for the status code, e.g. `Not Found`.
    pub fn reason(&self) -> String {
        http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string()
    }
}
