//! Error types for the FRED client.
//!
//! # Design
//! Local validation failures and non-2xx responses share the `Api` variant so
//! callers see one `{status, message}` shape whether the 400 was synthesized
//! before dispatch or returned by the remote. Status is always numeric.

use thiserror::Error;

use crate::types::Body;

/// Errors returned by `FredClient` and `Fred`.
#[derive(Error, Debug)]
pub enum FredError {
    /// A non-2xx response, or a request rejected before it was sent.
    #[error("HTTP {status}: {message}")]
    Api {
        status: u16,
        message: String,
        body: Option<Body>,
    },

    /// The request could not be completed at the transport level.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A response body could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Client configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FredError {
    /// A synthesized 400 worded the way the remote words its own rejections.
    pub fn bad_request(detail: impl AsRef<str>) -> Self {
        FredError::Api {
            status: 400,
            message: format!("Bad Request.  {}", detail.as_ref()),
            body: None,
        }
    }

    pub fn not_found() -> Self {
        FredError::Api {
            status: 404,
            message: "Not Found".to_string(),
            body: None,
        }
    }

    /// HTTP status of an `Api` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            FredError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            FredError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Body attached to an `Api` error, if the remote sent one.
    pub fn body(&self) -> Option<&Body> {
        match self {
            FredError::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FredError>;
