//! Stateless HTTP request builder and response parser for the FRED API.
//!
//! # Design
//! `FredClient` holds only its configuration and carries no mutable state
//! between calls. Every endpoint goes through the same two steps:
//! `build_request` produces an `HttpRequest` and `parse_response` consumes an
//! `HttpResponse`. Executing the round-trip in between is left to a
//! `Transport`, keeping this half deterministic and free of I/O.

use crate::config::FredConfig;
use crate::endpoint::Endpoint;
use crate::error::{FredError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::params::{FileType, Params};
use crate::types::Body;

/// Synchronous, stateless request builder and response parser.
#[derive(Debug, Clone)]
pub struct FredClient {
    config: FredConfig,
}

impl FredClient {
    pub fn new(config: FredConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FredConfig {
        &self.config
    }

    /// The format a call with `params` will ask for.
    pub fn file_type(&self, params: &Params) -> Result<FileType> {
        Ok(params.file_type()?.unwrap_or(self.config.file_type))
    }

    /// Build the GET for `endpoint`.
    ///
    /// Caller-supplied `api_key` and `file_type` entries are replaced by the
    /// configured key and the resolved format, which are appended last.
    pub fn build_request(&self, endpoint: Endpoint, params: &Params) -> Result<HttpRequest> {
        let file_type = self.file_type(params)?;
        let mut query: Vec<(String, String)> = params
            .iter()
            .filter(|(k, _)| *k != "api_key" && *k != "file_type")
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        query.push(("api_key".to_string(), self.config.api_key.expose().to_string()));
        query.push(("file_type".to_string(), file_type.to_string()));

        Ok(HttpRequest {
            url: format!("{}/{}", self.config.base_url, endpoint.path()),
            query,
            headers: vec![("accept".to_string(), file_type.mime().to_string())],
        })
    }

    /// Interpret a response to a request made in `file_type`.
    ///
    /// 2xx: XML bodies come back as text, JSON bodies parsed. Anything else
    /// becomes `FredError::Api`; a JSON `error_message` supplies the message
    /// when present, otherwise the status' reason phrase does.
    pub fn parse_response(&self, file_type: FileType, response: HttpResponse) -> Result<Body> {
        if response.is_success() {
            return match file_type {
                FileType::Xml => Ok(Body::Xml(response.body)),
                FileType::Json => serde_json::from_str(&response.body)
                    .map(Body::Json)
                    .map_err(|e| FredError::Decode(e.to_string())),
            };
        }

        let reason = response.reason();
        let (message, body) = match file_type {
            FileType::Json => match serde_json::from_str::<serde_json::Value>(&response.body) {
                Ok(value) => {
                    let message = value
                        .get("error_message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string)
                        .unwrap_or(reason);
                    (message, Body::Json(value))
                }
                Err(_) => (reason, Body::Text(response.body)),
            },
            FileType::Xml if looks_like_xml(&response.body) => (reason, Body::Xml(response.body)),
            FileType::Xml => (reason, Body::Text(response.body)),
        };
        Err(FredError::Api {
            status: response.status,
            message,
            body: if body_is_empty(&body) { None } else { Some(body) },
        })
    }
}

fn looks_like_xml(body: &str) -> bool {
    body.trim_start().starts_with('<')
}

fn body_is_empty(body: &Body) -> bool {
    matches!(body, Body::Text(text) if text.is_empty())
}
