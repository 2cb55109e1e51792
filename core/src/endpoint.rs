//! The fixed set of FRED endpoints and their parameter requirements.
//!
//! # Design
//! Each endpoint is one variant with a static row: URL path, the top-level
//! collection field of its response, and the identifying parameters that
//! must be present and well-typed. Validation only fast-fails what the
//! remote would reject anyway; anything it cannot judge locally (upper
//! bounds, date formats, tag existence) is left to the remote.

use std::fmt;
use std::str::FromStr;

use crate::error::{FredError, Result};
use crate::params::Params;

/// Expected type of an identifying parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Integer,
    Text,
}

/// One identifying parameter an endpoint checks before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

const fn required(name: &'static str, kind: Kind) -> Requirement {
    Requirement { name, kind, required: true }
}

const fn optional(name: &'static str, kind: Kind) -> Requirement {
    Requirement { name, kind, required: false }
}

const CATEGORY_ID_OPT: &[Requirement] = &[optional("category_id", Kind::Integer)];
const CATEGORY_ID: &[Requirement] = &[required("category_id", Kind::Integer)];
const CATEGORY_TAGS: &[Requirement] = &[
    required("category_id", Kind::Integer),
    required("tag_names", Kind::Text),
];
const RELEASE_ID: &[Requirement] = &[required("release_id", Kind::Integer)];
const RELEASE_TAGS: &[Requirement] = &[
    required("release_id", Kind::Integer),
    required("tag_names", Kind::Text),
];
const RELEASE_TABLES: &[Requirement] = &[
    required("release_id", Kind::Integer),
    optional("element_id", Kind::Integer),
];
const SERIES_ID: &[Requirement] = &[required("series_id", Kind::Text)];
const SEARCH_TEXT: &[Requirement] = &[required("search_text", Kind::Text)];
const SERIES_SEARCH_TEXT: &[Requirement] = &[required("series_search_text", Kind::Text)];
const SERIES_SEARCH_TAGS: &[Requirement] = &[
    required("series_search_text", Kind::Text),
    required("tag_names", Kind::Text),
];
const SOURCE_ID: &[Requirement] = &[required("source_id", Kind::Integer)];
const TAG_NAMES: &[Requirement] = &[required("tag_names", Kind::Text)];
const NONE: &[Requirement] = &[];

/// A FRED endpoint, addressed relative to the API base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Category,
    CategoryChildren,
    CategoryRelated,
    CategorySeries,
    CategoryTags,
    CategoryRelatedTags,
    Releases,
    ReleasesDates,
    Release,
    ReleaseDates,
    ReleaseSeries,
    ReleaseSources,
    ReleaseTags,
    ReleaseRelatedTags,
    ReleaseTables,
    Series,
    SeriesCategories,
    SeriesObservations,
    SeriesRelease,
    SeriesSearch,
    SeriesSearchTags,
    SeriesSearchRelatedTags,
    SeriesTags,
    SeriesUpdates,
    SeriesVintageDates,
    Sources,
    Source,
    SourceReleases,
    Tags,
    RelatedTags,
    TagsSeries,
}

impl Endpoint {
    pub const ALL: [Endpoint; 31] = [
        Endpoint::Category,
        Endpoint::CategoryChildren,
        Endpoint::CategoryRelated,
        Endpoint::CategorySeries,
        Endpoint::CategoryTags,
        Endpoint::CategoryRelatedTags,
        Endpoint::Releases,
        Endpoint::ReleasesDates,
        Endpoint::Release,
        Endpoint::ReleaseDates,
        Endpoint::ReleaseSeries,
        Endpoint::ReleaseSources,
        Endpoint::ReleaseTags,
        Endpoint::ReleaseRelatedTags,
        Endpoint::ReleaseTables,
        Endpoint::Series,
        Endpoint::SeriesCategories,
        Endpoint::SeriesObservations,
        Endpoint::SeriesRelease,
        Endpoint::SeriesSearch,
        Endpoint::SeriesSearchTags,
        Endpoint::SeriesSearchRelatedTags,
        Endpoint::SeriesTags,
        Endpoint::SeriesUpdates,
        Endpoint::SeriesVintageDates,
        Endpoint::Sources,
        Endpoint::Source,
        Endpoint::SourceReleases,
        Endpoint::Tags,
        Endpoint::RelatedTags,
        Endpoint::TagsSeries,
    ];

    /// Path relative to the API base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Category => "category",
            Endpoint::CategoryChildren => "category/children",
            Endpoint::CategoryRelated => "category/related",
            Endpoint::CategorySeries => "category/series",
            Endpoint::CategoryTags => "category/tags",
            Endpoint::CategoryRelatedTags => "category/related_tags",
            Endpoint::Releases => "releases",
            Endpoint::ReleasesDates => "releases/dates",
            Endpoint::Release => "release",
            Endpoint::ReleaseDates => "release/dates",
            Endpoint::ReleaseSeries => "release/series",
            Endpoint::ReleaseSources => "release/sources",
            Endpoint::ReleaseTags => "release/tags",
            Endpoint::ReleaseRelatedTags => "release/related_tags",
            Endpoint::ReleaseTables => "release/tables",
            Endpoint::Series => "series",
            Endpoint::SeriesCategories => "series/categories",
            Endpoint::SeriesObservations => "series/observations",
            Endpoint::SeriesRelease => "series/release",
            Endpoint::SeriesSearch => "series/search",
            Endpoint::SeriesSearchTags => "series/search/tags",
            Endpoint::SeriesSearchRelatedTags => "series/search/related_tags",
            Endpoint::SeriesTags => "series/tags",
            Endpoint::SeriesUpdates => "series/updates",
            Endpoint::SeriesVintageDates => "series/vintagedates",
            Endpoint::Sources => "sources",
            Endpoint::Source => "source",
            Endpoint::SourceReleases => "source/releases",
            Endpoint::Tags => "tags",
            Endpoint::RelatedTags => "related_tags",
            Endpoint::TagsSeries => "tags/series",
        }
    }

    /// Top-level collection field of a successful response. Also the root
    /// element name of the XML form.
    pub fn root_field(self) -> &'static str {
        match self {
            Endpoint::Category
            | Endpoint::CategoryChildren
            | Endpoint::CategoryRelated
            | Endpoint::SeriesCategories => "categories",
            Endpoint::CategorySeries
            | Endpoint::ReleaseSeries
            | Endpoint::Series
            | Endpoint::SeriesSearch
            | Endpoint::SeriesUpdates
            | Endpoint::TagsSeries => "seriess",
            Endpoint::CategoryTags
            | Endpoint::CategoryRelatedTags
            | Endpoint::ReleaseTags
            | Endpoint::ReleaseRelatedTags
            | Endpoint::SeriesSearchTags
            | Endpoint::SeriesSearchRelatedTags
            | Endpoint::SeriesTags
            | Endpoint::Tags
            | Endpoint::RelatedTags => "tags",
            Endpoint::Releases
            | Endpoint::Release
            | Endpoint::SeriesRelease
            | Endpoint::SourceReleases => "releases",
            Endpoint::ReleasesDates | Endpoint::ReleaseDates => "release_dates",
            Endpoint::ReleaseSources | Endpoint::Sources | Endpoint::Source => "sources",
            Endpoint::ReleaseTables => "elements",
            Endpoint::SeriesObservations => "observations",
            Endpoint::SeriesVintageDates => "vintage_dates",
        }
    }

    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            Endpoint::Category | Endpoint::CategoryChildren => CATEGORY_ID_OPT,
            Endpoint::CategoryRelated | Endpoint::CategorySeries | Endpoint::CategoryTags => {
                CATEGORY_ID
            }
            Endpoint::CategoryRelatedTags => CATEGORY_TAGS,
            Endpoint::Releases | Endpoint::ReleasesDates => NONE,
            Endpoint::Release
            | Endpoint::ReleaseDates
            | Endpoint::ReleaseSeries
            | Endpoint::ReleaseSources
            | Endpoint::ReleaseTags => RELEASE_ID,
            Endpoint::ReleaseRelatedTags => RELEASE_TAGS,
            Endpoint::ReleaseTables => RELEASE_TABLES,
            Endpoint::Series
            | Endpoint::SeriesCategories
            | Endpoint::SeriesObservations
            | Endpoint::SeriesRelease
            | Endpoint::SeriesTags
            | Endpoint::SeriesVintageDates => SERIES_ID,
            Endpoint::SeriesSearch => SEARCH_TEXT,
            Endpoint::SeriesSearchTags => SERIES_SEARCH_TEXT,
            Endpoint::SeriesSearchRelatedTags => SERIES_SEARCH_TAGS,
            Endpoint::SeriesUpdates => NONE,
            Endpoint::Sources => NONE,
            Endpoint::Source | Endpoint::SourceReleases => SOURCE_ID,
            Endpoint::Tags => NONE,
            Endpoint::RelatedTags | Endpoint::TagsSeries => TAG_NAMES,
        }
    }

    /// Check identifying and paging parameters before anything is sent.
    ///
    /// Failures are 400s worded like the remote's own.
    pub fn validate(self, params: &Params) -> Result<()> {
        for req in self.requirements() {
            let Some(value) = params.get(req.name) else {
                if req.required {
                    return Err(FredError::bad_request(format!(
                        "Variable {} is not set.",
                        req.name
                    )));
                }
                continue;
            };
            let ok = match req.kind {
                Kind::Integer => value.as_int().is_some(),
                Kind::Text => !value.to_string().trim().is_empty(),
            };
            if !ok {
                let expected = match req.kind {
                    Kind::Integer => "an integer",
                    Kind::Text => "a non-empty string",
                };
                return Err(FredError::bad_request(format!(
                    "Variable {} is not {expected}.",
                    req.name
                )));
            }
        }

        if let Some(limit) = params.get("limit") {
            if !limit.as_int().is_some_and(|n| n >= 1) {
                return Err(FredError::bad_request(
                    "Variable limit is not a positive integer.",
                ));
            }
        }
        if let Some(offset) = params.get("offset") {
            if !offset.as_int().is_some_and(|n| n >= 0) {
                return Err(FredError::bad_request(
                    "Variable offset is not a non-negative integer.",
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Endpoint {
    type Err = FredError;

    /// Accepts the path form, with or without surrounding slashes.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let path = s.trim_matches('/');
        Endpoint::ALL
            .into_iter()
            .find(|e| e.path() == path)
            .ok_or_else(FredError::not_found)
    }
}
