//! High-level client: validate, build, execute, parse.
//!
//! # Design
//! `Fred` pairs the stateless `FredClient` with a `Transport`. The generic
//! `get` dispatches any endpoint by name; the `get_*` convenience methods
//! validate their identifying parameters first and never reach the transport
//! when validation fails. Every call resolves to exactly one `Result`.

use tracing::debug;

use crate::client::FredClient;
use crate::config::FredConfig;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::params::Params;
use crate::transport::{Transport, UreqTransport};
use crate::types::Body;

/// FRED API client.
#[derive(Debug, Clone)]
pub struct Fred<T = UreqTransport> {
    client: FredClient,
    transport: T,
}

impl Fred<UreqTransport> {
    /// Client for the production API with the default JSON format.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::from_config(FredConfig::new(api_key)?))
    }

    pub fn from_config(config: FredConfig) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Client configured from `FRED_API_KEY`, `FRED_BASE_URL`, `FRED_FILE_TYPE`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_config(FredConfig::from_env()?))
    }
}

impl<T: Transport> Fred<T> {
    pub fn with_transport(config: FredConfig, transport: T) -> Self {
        Self {
            client: FredClient::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &FredConfig {
        self.client.config()
    }

    /// Issue one GET to the endpoint named `endpoint` (its path form, e.g.
    /// `category/children`). Names outside the known set resolve to a 404
    /// without touching the network.
    pub fn get(&self, endpoint: &str, params: Option<&Params>) -> Result<Body> {
        let endpoint: Endpoint = endpoint.parse()?;
        match params {
            Some(params) => self.request(endpoint, params),
            None => self.request(endpoint, &Params::new()),
        }
    }

    /// Issue one GET to `endpoint` without local parameter checks.
    pub fn request(&self, endpoint: Endpoint, params: &Params) -> Result<Body> {
        let file_type = self.client.file_type(params)?;
        let request = self.client.build_request(endpoint, params)?;
        debug!(%endpoint, %file_type, "dispatching FRED request");
        let response = self.transport.execute(&request)?;
        debug!(%endpoint, status = response.status, "FRED response");
        self.client.parse_response(file_type, response)
    }

    /// Validate `params` for `endpoint`, then dispatch.
    pub fn fetch(&self, endpoint: Endpoint, params: &Params) -> Result<Body> {
        endpoint.validate(params)?;
        self.request(endpoint, params)
    }

    // Categories

    pub fn get_category(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::Category, params)
    }

    pub fn get_category_children(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::CategoryChildren, params)
    }

    pub fn get_category_related(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::CategoryRelated, params)
    }

    pub fn get_category_series(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::CategorySeries, params)
    }

    pub fn get_category_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::CategoryTags, params)
    }

    pub fn get_category_related_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::CategoryRelatedTags, params)
    }

    // Releases

    pub fn get_releases(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::Releases, params)
    }

    pub fn get_releases_dates(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::ReleasesDates, params)
    }

    pub fn get_release(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::Release, params)
    }

    pub fn get_release_dates(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::ReleaseDates, params)
    }

    pub fn get_release_series(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::ReleaseSeries, params)
    }

    pub fn get_release_sources(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::ReleaseSources, params)
    }

    pub fn get_release_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::ReleaseTags, params)
    }

    pub fn get_release_related_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::ReleaseRelatedTags, params)
    }

    pub fn get_release_tables(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::ReleaseTables, params)
    }

    // Series

    pub fn get_series(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::Series, params)
    }

    pub fn get_series_categories(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesCategories, params)
    }

    pub fn get_series_observations(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesObservations, params)
    }

    pub fn get_series_release(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesRelease, params)
    }

    pub fn get_series_search(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesSearch, params)
    }

    pub fn get_series_search_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesSearchTags, params)
    }

    pub fn get_series_search_related_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesSearchRelatedTags, params)
    }

    pub fn get_series_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesTags, params)
    }

    pub fn get_series_updates(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesUpdates, params)
    }

    pub fn get_series_vintage_dates(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SeriesVintageDates, params)
    }

    // Sources

    pub fn get_sources(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::Sources, params)
    }

    pub fn get_source(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::Source, params)
    }

    pub fn get_source_releases(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::SourceReleases, params)
    }

    // Tags

    pub fn get_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::Tags, params)
    }

    pub fn get_related_tags(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::RelatedTags, params)
    }

    pub fn get_tags_series(&self, params: &Params) -> Result<Body> {
        self.fetch(Endpoint::TagsSeries, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FredError;
    use crate::http::{HttpRequest, HttpResponse};
    use std::sync::Mutex;

    /// Records every request and answers each with the same canned response.
    struct Recorder {
        status: u16,
        body: String,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Recorder {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body: self.body.clone(),
            })
        }
    }

    /// A convenience method on a client borrowing a specific recorder.
    type Call<'r> = fn(&Fred<&'r Recorder>, &Params) -> Result<Body>;

    fn fred(recorder: &Recorder) -> Fred<&Recorder> {
        let config = FredConfig::new("testkey")
            .unwrap()
            .with_base_url("http://mock/fred");
        Fred::with_transport(config, recorder)
    }

    #[test]
    fn get_without_params_sends_key_and_format_only() {
        let recorder = Recorder::answering(200, r#"{"releases":[{"id":9}]}"#);
        let body = fred(&recorder).get("releases", None).unwrap();
        assert_eq!(body.collection_len("releases"), Some(1));

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "http://mock/fred/releases");
        assert_eq!(seen[0].query_value("api_key"), Some("testkey"));
        assert_eq!(seen[0].query_value("file_type"), Some("json"));
    }

    #[test]
    fn get_unknown_endpoint_is_404_without_network() {
        let recorder = Recorder::answering(200, "{}");
        let err = fred(&recorder).get("nonexistent", None).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Not Found");
        assert_eq!(recorder.calls(), 0);
    }

    #[test]
    fn get_xml_returns_text() {
        let recorder = Recorder::answering(200, "<releases><release id=\"9\"/></releases>");
        let params = Params::new().with("file_type", "xml");
        let body = fred(&recorder).get("releases", Some(&params)).unwrap();
        assert!(body.as_text().unwrap().contains("releases"));
    }

    #[test]
    fn validation_failure_skips_transport() {
        let recorder = Recorder::answering(200, "{}");
        let fred = fred(&recorder);
        let bad = Params::new().with("category_id", "cat");
        let calls: [Call<'_>; 6] = [
            Fred::get_category,
            Fred::get_category_children,
            Fred::get_category_related,
            Fred::get_category_series,
            Fred::get_category_tags,
            Fred::get_category_related_tags,
        ];
        for call in calls {
            let err = call(&fred, &bad).unwrap_err();
            assert_eq!(err.status(), Some(400));
            assert!(err.message().contains("Bad Request"));
        }

        let bad_release = Params::new().with("release_id", "cat");
        let calls: [Call<'_>; 7] = [
            Fred::get_release,
            Fred::get_release_dates,
            Fred::get_release_series,
            Fred::get_release_sources,
            Fred::get_release_tags,
            Fred::get_release_related_tags,
            Fred::get_release_tables,
        ];
        for call in calls {
            assert_eq!(call(&fred, &bad_release).unwrap_err().status(), Some(400));
        }
        assert_eq!(recorder.calls(), 0);
    }

    #[test]
    fn remote_rejection_passes_through() {
        let recorder = Recorder::answering(
            400,
            r#"{"error_code":400,"error_message":"Bad Request.  Variable limit is not between 1 and 1000."}"#,
        );
        // 5000 passes local checks; the remote enforces the upper bound.
        let err = fred(&recorder)
            .get_releases(&Params::new().with("limit", 5000))
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert!(err.message().contains("between 1 and 1000"));
        assert_eq!(recorder.calls(), 1);
    }

    #[test]
    fn identical_requests_are_identical() {
        let recorder = Recorder::answering(200, r#"{"categories":[{"id":125,"name":"Trade Balance"}]}"#);
        let fred = fred(&recorder);
        let params = Params::new().with("category_id", 125);
        let first = fred.get_category(&params).unwrap();
        let second = fred.get_category(&params).unwrap();
        assert_eq!(first, second);

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen[0], seen[1]);
    }

    #[test]
    fn transport_errors_surface_unchanged() {
        struct Down;
        impl Transport for Down {
            fn execute(&self, _: &HttpRequest) -> Result<HttpResponse> {
                Err(FredError::Transport("connection refused".to_string()))
            }
        }
        let config = FredConfig::new("testkey").unwrap();
        let err = Fred::with_transport(config, Down)
            .get_releases(&Params::new())
            .unwrap_err();
        assert!(matches!(err, FredError::Transport(_)));
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Fred>();
    }
}
