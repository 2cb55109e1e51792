//! Every endpoint method against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then calls each `Fred` method
//! over real HTTP through the ureq transport: once with valid parameters
//! (expecting the endpoint's collection to be non-empty) and once with a
//! malformed identifier (expecting a 400 "Bad Request").

use fred_core::{
    Body, Categories, Endpoint, FileType, Fred, FredConfig, FredError, Observations, Params,
    Releases, Seriess, Tags,
};

type Method = fn(&Fred, &Params) -> fred_core::Result<Body>;

/// Start the mock server on a random port and return its FRED base URL.
fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}/fred")
}

fn fred(base_url: &str) -> Fred {
    let config = FredConfig::new("abcdef0123456789abcdef0123456789")
        .unwrap()
        .with_base_url(base_url);
    Fred::from_config(config)
}

fn assert_non_empty(body: &Body, field: &str, name: &str) {
    let len = body
        .collection_len(field)
        .unwrap_or_else(|| panic!("{name}: no `{field}` array in {body:?}"));
    assert!(len > 0, "{name}: `{field}` is empty");
}

fn assert_bad_request(result: fred_core::Result<Body>, name: &str) {
    let err = result.expect_err(name);
    assert_eq!(err.status(), Some(400), "{name}: {err}");
    assert!(err.message().contains("Bad Request"), "{name}: {err}");
}

#[test]
fn generic_get() {
    let fred = fred(&start_mock_server());

    // With and without params.
    let body = fred.get("releases", Some(&Params::new())).unwrap();
    assert_non_empty(&body, "releases", "releases with params");
    let body = fred.get("releases", None).unwrap();
    assert_non_empty(&body, "releases", "releases without params");

    // XML success is raw text containing the root element.
    let xml = Params::new().with("file_type", "xml");
    let body = fred.get("releases", Some(&xml)).unwrap();
    assert!(matches!(body, Body::Xml(_)));
    assert!(body.as_text().unwrap().contains("<releases"));

    // Unknown endpoints are 404 "Not Found" in both formats.
    let err = fred.get("nonexistent", Some(&xml)).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "Not Found");
    let err = fred.get("nonexistent", None).unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "Not Found");
}

#[test]
fn remote_errors_pass_through() {
    let fred = fred(&start_mock_server());

    // Passes local checks, rejected by the remote's upper bound.
    let err = fred
        .get_releases(&Params::new().with("limit", 5000))
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.message(),
        "Bad Request.  Variable limit is not between 1 and 1000."
    );
    assert!(matches!(err.body(), Some(Body::Json(_))));

    // XML error: message is the reason phrase, body is the XML error element.
    let err = fred
        .request(
            Endpoint::Category,
            &Params::new().with("category_id", 999999).with("file_type", "xml"),
        )
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.message(), "Bad Request");
    assert!(err.body().and_then(Body::as_text).unwrap().contains("<error"));

    // Skipping local validation lets the remote answer a malformed id.
    let err = fred
        .request(Endpoint::Category, &Params::new().with("category_id", "cat"))
        .unwrap_err();
    assert_eq!(
        err.message(),
        "Bad Request.  Variable category_id is not an integer."
    );
}

#[test]
fn category_methods() {
    let fred = fred(&start_mock_server());
    let cases: [(&str, Method, Params, &str); 6] = [
        ("get_category", Fred::get_category, Params::new().with("category_id", 125), "categories"),
        ("get_category_children", Fred::get_category_children, Params::new().with("category_id", 13), "categories"),
        ("get_category_related", Fred::get_category_related, Params::new().with("category_id", 32073), "categories"),
        ("get_category_series", Fred::get_category_series, Params::new().with("category_id", 125), "seriess"),
        ("get_category_tags", Fred::get_category_tags, Params::new().with("category_id", 125), "tags"),
        (
            "get_category_related_tags",
            Fred::get_category_related_tags,
            Params::new().with("category_id", 125).with("tag_names", "services;quarterly"),
            "tags",
        ),
    ];

    for (name, method, params, field) in &cases {
        let body = method(&fred, params).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_non_empty(&body, field, name);

        let bad = Params::new().with("category_id", "cat");
        assert_bad_request(method(&fred, &bad), name);
    }

    let body = fred
        .get_category(&Params::new().with("category_id", 125))
        .unwrap();
    let categories: Categories = body.decode().unwrap();
    assert_eq!(categories.categories.len(), 1);
    assert_eq!(categories.categories[0].name, "Trade Balance");
}

#[test]
fn release_methods() {
    let fred = fred(&start_mock_server());
    let cases: [(&str, Method, Params, &str); 9] = [
        ("get_releases", Fred::get_releases, Params::new(), "releases"),
        ("get_releases_dates", Fred::get_releases_dates, Params::new(), "release_dates"),
        ("get_release", Fred::get_release, Params::new().with("release_id", 53), "releases"),
        ("get_release_dates", Fred::get_release_dates, Params::new().with("release_id", 82), "release_dates"),
        ("get_release_series", Fred::get_release_series, Params::new().with("release_id", 51), "seriess"),
        ("get_release_sources", Fred::get_release_sources, Params::new().with("release_id", 51), "sources"),
        ("get_release_tags", Fred::get_release_tags, Params::new().with("release_id", 86), "tags"),
        (
            "get_release_related_tags",
            Fred::get_release_related_tags,
            Params::new().with("release_id", 86).with("tag_names", "sa;foreign"),
            "tags",
        ),
        ("get_release_tables", Fred::get_release_tables, Params::new().with("release_id", 53), "elements"),
    ];

    for (name, method, params, field) in &cases {
        let body = method(&fred, params).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_non_empty(&body, field, name);
    }

    // Collection endpoints have no identifier; a bad limit is the invalid case.
    let bad_limit = Params::new().with("limit", -1000);
    assert_bad_request(fred.get_releases(&bad_limit), "get_releases");
    assert_bad_request(fred.get_releases_dates(&bad_limit), "get_releases_dates");

    let bad_id = Params::new().with("release_id", "cat");
    for (name, method, _, _) in &cases[2..] {
        assert_bad_request(method(&fred, &bad_id), name);
    }

    let releases: Releases = fred
        .get_release(&Params::new().with("release_id", 53))
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(releases.releases[0].name, "Gross Domestic Product");
}

#[test]
fn series_methods() {
    let fred = fred(&start_mock_server());
    let gdp = || Params::new().with("series_id", "GDP");
    let cases: [(&str, Method, Params, &str); 10] = [
        ("get_series", Fred::get_series, gdp(), "seriess"),
        ("get_series_categories", Fred::get_series_categories, gdp(), "categories"),
        ("get_series_observations", Fred::get_series_observations, gdp(), "observations"),
        ("get_series_release", Fred::get_series_release, gdp(), "releases"),
        ("get_series_search", Fred::get_series_search, Params::new().with("search_text", "trade balance"), "seriess"),
        (
            "get_series_search_tags",
            Fred::get_series_search_tags,
            Params::new().with("series_search_text", "gross"),
            "tags",
        ),
        (
            "get_series_search_related_tags",
            Fred::get_series_search_related_tags,
            Params::new().with("series_search_text", "gross").with("tag_names", "usa"),
            "tags",
        ),
        ("get_series_tags", Fred::get_series_tags, gdp(), "tags"),
        ("get_series_updates", Fred::get_series_updates, Params::new(), "seriess"),
        ("get_series_vintage_dates", Fred::get_series_vintage_dates, gdp(), "vintage_dates"),
    ];

    for (name, method, params, field) in &cases {
        let body = method(&fred, params).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_non_empty(&body, field, name);
    }

    let missing = Params::new();
    for (name, method, _, _) in cases.iter().filter(|c| c.0 != "get_series_updates") {
        assert_bad_request(method(&fred, &missing), name);
    }

    let blank = Params::new().with("series_id", "  ");
    for (name, method, params, _) in &cases {
        if params.get("series_id").is_some() {
            assert_bad_request(method(&fred, &blank), name);
        }
    }
    // A numeric id passes local checks and is judged by the server.
    let numeric = fred
        .get_series(&Params::new().with("series_id", 5))
        .expect_err("unknown numeric series id");
    assert_eq!(numeric.message(), "Bad Request.  The series does not exist.");

    let observations: Observations = fred
        .get_series_observations(&Params::new().with("series_id", "GNPCA"))
        .unwrap()
        .decode()
        .unwrap();
    assert!(observations.observations.iter().any(|o| o.numeric_value().is_none()));

    let seriess: Seriess = fred.get_series(&gdp()).unwrap().decode().unwrap();
    assert_eq!(seriess.seriess[0].frequency_short, "Q");
}

#[test]
fn source_and_tag_methods() {
    let fred = fred(&start_mock_server());
    let cases: [(&str, Method, Params, &str); 6] = [
        ("get_sources", Fred::get_sources, Params::new(), "sources"),
        ("get_source", Fred::get_source, Params::new().with("source_id", 1), "sources"),
        ("get_source_releases", Fred::get_source_releases, Params::new().with("source_id", 18), "releases"),
        ("get_tags", Fred::get_tags, Params::new(), "tags"),
        ("get_related_tags", Fred::get_related_tags, Params::new().with("tag_names", "monthly;sa"), "tags"),
        ("get_tags_series", Fred::get_tags_series, Params::new().with("tag_names", "gdp"), "seriess"),
    ];

    for (name, method, params, field) in &cases {
        let body = method(&fred, params).unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_non_empty(&body, field, name);
    }

    assert_bad_request(fred.get_source(&Params::new().with("source_id", "cat")), "get_source");
    assert_bad_request(
        fred.get_source_releases(&Params::new().with("source_id", "cat")),
        "get_source_releases",
    );
    assert_bad_request(fred.get_related_tags(&Params::new()), "get_related_tags");
    assert_bad_request(fred.get_tags_series(&Params::new()), "get_tags_series");

    let tags: Tags = fred.get_tags(&Params::new()).unwrap().decode().unwrap();
    assert!(tags.tags.iter().any(|t| t.name == "gdp" && t.series_count == 1));
}

#[test]
fn xml_for_every_endpoint() {
    let base_url = start_mock_server();
    let config = FredConfig::new("abcdef0123456789abcdef0123456789")
        .unwrap()
        .with_base_url(&base_url)
        .with_file_type(FileType::Xml);
    let fred = Fred::from_config(config);

    let params = Params::new()
        .with("category_id", 125)
        .with("release_id", 51)
        .with("series_id", "BOPGSTB")
        .with("search_text", "trade")
        .with("series_search_text", "trade")
        .with("source_id", 18)
        .with("tag_names", "usa");

    for endpoint in Endpoint::ALL {
        let body = fred
            .fetch(endpoint, &params)
            .unwrap_or_else(|e| panic!("{endpoint}: {e}"));
        let text = body.as_text().unwrap();
        assert!(
            text.contains(&format!("<{}", endpoint.root_field())),
            "{endpoint}: {text}"
        );
    }
}

#[test]
fn repeated_calls_are_identical() {
    let fred = fred(&start_mock_server());
    let params = Params::new().with("category_id", 13);
    let first = fred.get_category_children(&params).unwrap();
    let second = fred.get_category_children(&params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unreachable_backend_is_transport_error() {
    // Bind then drop so nothing is listening on the port.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let fred = fred(&format!("http://127.0.0.1:{port}/fred"));
    let err = fred.get_releases(&Params::new()).unwrap_err();
    assert!(matches!(err, FredError::Transport(_)), "{err:?}");
}
