//! Blocking client for the FRED (Federal Reserve Economic Data) API.
//!
//! # Overview
//! Every FRED endpoint is the same shape: attach identifying parameters plus
//! `api_key` and `file_type`, issue one GET, interpret the status. The crate
//! splits that into a deterministic half (`FredClient`: build an
//! `HttpRequest`, parse an `HttpResponse`) and a `Transport` that performs
//! the round-trip, with `Fred` tying the two together.
//!
//! # Design
//! - `FredClient` is stateless and does no I/O; `UreqTransport` is the
//!   default network backend.
//! - `Fred::get` dispatches any endpoint by path; the `get_*` methods check
//!   identifying parameters first and fail fast with a 400.
//! - Results are `Body::Json` or `Body::Xml`; typed models decode from JSON.
//!
//! ```no_run
//! use fred_core::{Fred, Params};
//!
//! let fred = Fred::from_env()?;
//! let body = fred.get_category_children(&Params::new().with("category_id", 13))?;
//! println!("{} children", body.collection_len("categories").unwrap_or(0));
//! # Ok::<(), fred_core::FredError>(())
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fred;
pub mod http;
pub mod params;
pub mod transport;
pub mod types;

pub use client::FredClient;
pub use config::{ApiKey, FredConfig};
pub use endpoint::Endpoint;
pub use error::{FredError, Result};
pub use fred::Fred;
pub use http::{HttpRequest, HttpResponse};
pub use params::{FileType, ParamValue, Params};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Body, Categories, Category, Observation, Observations, Release, ReleaseDate, ReleaseDates,
    Releases, Series, Seriess, Source, Sources, Tag, Tags, VintageDates,
};
