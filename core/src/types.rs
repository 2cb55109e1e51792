//! Response bodies and typed FRED models.
//!
//! # Design
//! The dispatcher hands back a `Body` rather than a typed value: XML is
//! returned as raw text and JSON as a `serde_json::Value`, so every endpoint
//! shares one return type. The models below are defined independently from
//! the mock-server's fixtures; integration tests catch schema drift.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{FredError, Result};

/// A response body in the format it was requested in.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Xml(String),
    /// A body that did not match the requested format (only seen on errors).
    Text(String),
}

impl Body {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Body::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Raw text of an XML or unrecognised body.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Body::Xml(text) | Body::Text(text) => Some(text),
            Body::Json(_) => None,
        }
    }

    /// Length of the top-level collection `field` in a JSON body.
    pub fn collection_len(&self, field: &str) -> Option<usize> {
        self.as_json()?.get(field)?.as_array().map(Vec::len)
    }

    /// Deserialize a JSON body into one of the typed envelopes.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Body::Json(value) => T::deserialize(value).map_err(|e| FredError::Decode(e.to_string())),
            _ => Err(FredError::Decode("only JSON bodies can be decoded".to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Release {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
    #[serde(default)]
    pub press_release: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseDate {
    pub release_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_name: Option<String>,
    pub date: String,
}

/// A series as returned by `series`, `category/series` and the search
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
    #[serde(default)]
    pub observation_start: String,
    #[serde(default)]
    pub observation_end: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default)]
    pub frequency_short: String,
    #[serde(default)]
    pub units: String,
    #[serde(default)]
    pub units_short: String,
    #[serde(default)]
    pub seasonal_adjustment: String,
    #[serde(default)]
    pub seasonal_adjustment_short: String,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One data point. FRED encodes values as strings, with `.` for missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub date: String,
    pub value: String,
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
}

impl Observation {
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Source {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub realtime_start: String,
    #[serde(default)]
    pub realtime_end: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub popularity: i64,
    #[serde(default)]
    pub series_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Categories {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Releases {
    pub releases: Vec<Release>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReleaseDates {
    pub release_dates: Vec<ReleaseDate>,
}

/// FRED pluralises "series" as "seriess".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seriess {
    pub seriess: Vec<Series>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observations {
    pub observations: Vec<Observation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sources {
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tags {
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VintageDates {
    pub vintage_dates: Vec<String>,
}
