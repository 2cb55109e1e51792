//! Local stand-in for the FRED API.
//!
//! Serves `GET /fred/{*path}` over the fixed dataset in `fixtures`, with
//! FRED's parameter checks, error wording and JSON/XML response shapes.

pub mod fixtures;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::debug;

pub use fixtures::{Dataset, Failure, Listing};

pub type Db = Arc<Dataset>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Xml,
}

pub fn app() -> Router {
    let db: Db = Arc::new(Dataset::fixture());
    Router::new()
        .route("/fred/{*path}", get(dispatch))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn dispatch(
    State(db): State<Db>,
    Path(path): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    debug!(%path, "mock request");
    let format = match query.get("file_type").map(String::as_str) {
        None | Some("json") => Format::Json,
        Some("xml") => Format::Xml,
        Some(_) => {
            return error(
                Format::Json,
                StatusCode::BAD_REQUEST,
                "Bad Request.  Variable file_type is not one of the following: 'json', 'xml'.",
            )
        }
    };
    if query.get("api_key").map_or(true, |k| k.trim().is_empty()) {
        // Unknown paths are 404 even without a key.
        if let Err(Failure::NotFound) = db.query(&path, &query) {
            return not_found();
        }
        return error(
            format,
            StatusCode::BAD_REQUEST,
            "Bad Request.  Variable api_key is not set.",
        );
    }

    let limit_max = if path.trim_matches('/') == "series/observations" { 100_000 } else { 1000 };
    let (offset, limit) = match paging(&query, limit_max) {
        Ok(paging) => paging,
        Err(message) => return error(format, StatusCode::BAD_REQUEST, &message),
    };

    match db.query(&path, &query) {
        Ok(listing) => render(format, listing, offset, limit),
        Err(Failure::NotFound) => not_found(),
        Err(Failure::BadRequest(message)) => error(format, StatusCode::BAD_REQUEST, &message),
    }
}

fn paging(query: &HashMap<String, String>, limit_max: i64) -> Result<(usize, usize), String> {
    let limit = match query.get("limit") {
        None => limit_max,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if (1..=limit_max).contains(&n) => n,
            _ => {
                return Err(format!(
                    "Bad Request.  Variable limit is not between 1 and {limit_max}."
                ))
            }
        },
    };
    let offset = match query.get("offset") {
        None => 0,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if n >= 0 => n,
            _ => return Err("Bad Request.  Variable offset is not a non-negative integer.".to_string()),
        },
    };
    Ok((offset as usize, limit as usize))
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn error(format: Format, status: StatusCode, message: &str) -> Response {
    match format {
        Format::Json => (
            status,
            Json(json!({ "error_code": status.as_u16(), "error_message": message })),
        )
            .into_response(),
        Format::Xml => xml_response(
            status,
            format!(
                "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<error code=\"{}\" message=\"{}\"/>\n",
                status.as_u16(),
                escape(message)
            ),
        ),
    }
}

fn render(format: Format, listing: Listing, offset: usize, limit: usize) -> Response {
    let count = listing.items.len();
    let page: Vec<Value> = listing.items.into_iter().skip(offset).take(limit).collect();
    match format {
        Format::Json => {
            let mut body = Map::new();
            body.insert("count".to_string(), json!(count));
            body.insert("offset".to_string(), json!(offset));
            body.insert("limit".to_string(), json!(limit));
            body.insert(listing.root.to_string(), Value::Array(page));
            (StatusCode::OK, Json(Value::Object(body))).into_response()
        }
        Format::Xml => {
            let element = singular(listing.root);
            let mut xml = format!(
                "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<{} count=\"{count}\" offset=\"{offset}\" limit=\"{limit}\">\n",
                listing.root
            );
            for item in &page {
                xml.push_str(&xml_element(element, item));
            }
            xml.push_str(&format!("</{}>\n", listing.root));
            xml_response(StatusCode::OK, xml)
        }
    }
}

fn xml_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/xml; charset=UTF-8")],
        body,
    )
        .into_response()
}

/// One item as an element: object fields become attributes, bare strings
/// become text content.
fn xml_element(name: &str, item: &Value) -> String {
    match item {
        Value::Object(fields) => {
            let attrs: String = fields
                .iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    format!(" {k}=\"{}\"", escape(&v))
                })
                .collect();
            format!("  <{name}{attrs}/>\n")
        }
        Value::String(s) => format!("  <{name}>{}</{name}>\n", escape(s)),
        other => format!("  <{name}>{}</{name}>\n", escape(&other.to_string())),
    }
}

fn singular(root: &str) -> &str {
    match root {
        "categories" => "category",
        "seriess" => "series",
        "release_dates" => "release_date",
        "vintage_dates" => "vintage_date",
        other => other.strip_suffix('s').unwrap_or(other),
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_element_renders_attributes() {
        let item = json!({"id": 125, "name": "Trade & Balance"});
        assert_eq!(
            xml_element("category", &item),
            "  <category id=\"125\" name=\"Trade &amp; Balance\"/>\n"
        );
    }

    #[test]
    fn xml_element_renders_text_items() {
        assert_eq!(
            xml_element("vintage_date", &json!("2024-05-07")),
            "  <vintage_date>2024-05-07</vintage_date>\n"
        );
    }

    #[test]
    fn singular_names() {
        assert_eq!(singular("seriess"), "series");
        assert_eq!(singular("tags"), "tag");
        assert_eq!(singular("observations"), "observation");
        assert_eq!(singular("categories"), "category");
    }

    #[test]
    fn paging_defaults_and_bounds() {
        let q = |pairs: &[(&str, &str)]| -> HashMap<String, String> {
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
        };
        assert_eq!(paging(&q(&[]), 1000), Ok((0, 1000)));
        assert_eq!(paging(&q(&[("limit", "5"), ("offset", "2")]), 1000), Ok((2, 5)));
        assert!(paging(&q(&[("limit", "-1000")]), 1000).is_err());
        assert!(paging(&q(&[("limit", "5000")]), 1000).is_err());
        assert!(paging(&q(&[("limit", "5000")]), 100_000).is_ok());
        assert!(paging(&q(&[("offset", "-1")]), 1000).is_err());
    }
}
