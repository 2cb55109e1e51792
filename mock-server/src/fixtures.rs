//! In-memory FRED dataset and the per-endpoint queries over it.
//!
//! The records are a small, internally consistent slice of FRED: every
//! series points at categories, a release and tags that exist here, so the
//! relational endpoints (`category/series`, `release/related_tags`, ...) all
//! have something to return.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

const REALTIME: &str = "2024-06-14";

#[derive(Clone, Debug, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
    #[serde(skip)]
    pub related: Vec<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Release {
    pub id: i64,
    pub realtime_start: String,
    pub realtime_end: String,
    pub name: String,
    pub press_release: bool,
    #[serde(skip)]
    pub source_ids: Vec<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReleaseDate {
    pub release_id: i64,
    pub release_name: String,
    pub date: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Series {
    pub id: String,
    pub realtime_start: String,
    pub realtime_end: String,
    pub title: String,
    pub observation_start: String,
    pub observation_end: String,
    pub frequency: String,
    pub frequency_short: String,
    pub units: String,
    pub units_short: String,
    pub seasonal_adjustment: String,
    pub seasonal_adjustment_short: String,
    pub last_updated: String,
    pub popularity: i64,
    #[serde(skip)]
    pub category_ids: Vec<i64>,
    #[serde(skip)]
    pub release_id: i64,
    #[serde(skip)]
    pub tags: Vec<&'static str>,
    #[serde(skip)]
    pub observations: Vec<(&'static str, &'static str)>,
    #[serde(skip)]
    pub vintage_dates: Vec<&'static str>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Observation {
    pub realtime_start: String,
    pub realtime_end: String,
    pub date: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Source {
    pub id: i64,
    pub realtime_start: String,
    pub realtime_end: String,
    pub name: String,
    pub link: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Tag {
    pub name: String,
    pub group_id: String,
    pub created: String,
    pub popularity: i64,
    pub series_count: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct Element {
    pub element_id: i64,
    pub release_id: i64,
    pub series_id: String,
    pub name: String,
    pub level: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Why a query produced no listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    NotFound,
    BadRequest(String),
}

impl Failure {
    fn bad(detail: impl AsRef<str>) -> Self {
        Failure::BadRequest(format!("Bad Request.  {}", detail.as_ref()))
    }
}

/// Items of one successful response plus the name of their collection.
#[derive(Debug, Clone)]
pub struct Listing {
    pub root: &'static str,
    pub items: Vec<Value>,
}

type Query = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct Dataset {
    pub categories: Vec<Category>,
    pub releases: Vec<Release>,
    pub release_dates: Vec<ReleaseDate>,
    pub series: Vec<Series>,
    pub sources: Vec<Source>,
    pub tags: Vec<Tag>,
}

fn category(id: i64, name: &str, parent_id: i64, related: &[i64]) -> Category {
    Category {
        id,
        name: name.to_string(),
        parent_id,
        related: related.to_vec(),
    }
}

fn release(id: i64, name: &str, press_release: bool, source_ids: &[i64]) -> Release {
    Release {
        id,
        realtime_start: REALTIME.to_string(),
        realtime_end: REALTIME.to_string(),
        name: name.to_string(),
        press_release,
        source_ids: source_ids.to_vec(),
    }
}

fn source(id: i64, name: &str, link: &str) -> Source {
    Source {
        id,
        realtime_start: REALTIME.to_string(),
        realtime_end: REALTIME.to_string(),
        name: name.to_string(),
        link: link.to_string(),
    }
}

struct SeriesSeed {
    id: &'static str,
    title: &'static str,
    frequency: (&'static str, &'static str),
    units: (&'static str, &'static str),
    adjustment: (&'static str, &'static str),
    popularity: i64,
    category_ids: &'static [i64],
    release_id: i64,
    tags: &'static [&'static str],
    observations: &'static [(&'static str, &'static str)],
    vintage_dates: &'static [&'static str],
}

fn series(seed: SeriesSeed) -> Series {
    let first = seed.observations.first().map(|o| o.0).unwrap_or(REALTIME);
    let last = seed.observations.last().map(|o| o.0).unwrap_or(REALTIME);
    Series {
        id: seed.id.to_string(),
        realtime_start: REALTIME.to_string(),
        realtime_end: REALTIME.to_string(),
        title: seed.title.to_string(),
        observation_start: first.to_string(),
        observation_end: last.to_string(),
        frequency: seed.frequency.0.to_string(),
        frequency_short: seed.frequency.1.to_string(),
        units: seed.units.0.to_string(),
        units_short: seed.units.1.to_string(),
        seasonal_adjustment: seed.adjustment.0.to_string(),
        seasonal_adjustment_short: seed.adjustment.1.to_string(),
        last_updated: seed.vintage_dates.last().copied().unwrap_or(REALTIME).to_string(),
        popularity: seed.popularity,
        category_ids: seed.category_ids.to_vec(),
        release_id: seed.release_id,
        tags: seed.tags.to_vec(),
        observations: seed.observations.to_vec(),
        vintage_dates: seed.vintage_dates.to_vec(),
    }
}

const MONTHLY: (&str, &str) = ("Monthly", "M");
const QUARTERLY: (&str, &str) = ("Quarterly", "Q");
const ANNUAL: (&str, &str) = ("Annual", "A");
const WEEKLY: (&str, &str) = ("Weekly, Ending Wednesday", "W");
const SA: (&str, &str) = ("Seasonally Adjusted", "SA");
const SAAR: (&str, &str) = ("Seasonally Adjusted Annual Rate", "SAAR");
const NSA: (&str, &str) = ("Not Seasonally Adjusted", "NSA");

const TAG_GROUPS: &[(&str, &str)] = &[
    ("annual", "freq"),
    ("balance", "gen"),
    ("bea", "src"),
    ("census", "src"),
    ("commercial paper", "gen"),
    ("debt", "gen"),
    ("exports", "gen"),
    ("foreign", "gen"),
    ("gdp", "gen"),
    ("gnp", "gen"),
    ("goods", "gen"),
    ("monthly", "freq"),
    ("mortgage", "gen"),
    ("nation", "geot"),
    ("nsa", "seas"),
    ("quarterly", "freq"),
    ("sa", "seas"),
    ("services", "gen"),
    ("trade", "gen"),
    ("usa", "geo"),
    ("weekly", "freq"),
];

impl Dataset {
    pub fn fixture() -> Self {
        let categories = vec![
            category(0, "Categories", 0, &[]),
            category(32991, "Money, Banking, & Finance", 0, &[]),
            category(32992, "National Accounts", 0, &[]),
            category(27281, "U.S. Regional Data", 0, &[]),
            category(13, "U.S. Trade & International Transactions", 32992, &[]),
            category(18, "National Income & Product Accounts", 32992, &[]),
            category(106, "GDP/GNP", 18, &[]),
            category(125, "Trade Balance", 13, &[]),
            category(120, "Commercial Paper", 32991, &[]),
            category(32073, "Alabama", 27281, &[149, 150]),
            category(149, "Georgia", 27281, &[32073]),
            category(150, "Mississippi", 27281, &[32073]),
        ];

        let releases = vec![
            release(51, "U.S. International Trade in Goods and Services", true, &[18, 19]),
            release(53, "Gross Domestic Product", true, &[18]),
            release(82, "Mortgage Debt Outstanding", false, &[1]),
            release(86, "Commercial Paper", true, &[1]),
        ];

        let release_dates = [
            (51, "2024-05-07"),
            (51, "2024-06-06"),
            (53, "2024-04-25"),
            (53, "2024-05-30"),
            (82, "2024-03-08"),
            (82, "2024-06-07"),
            (86, "2024-06-12"),
            (86, "2024-06-13"),
        ]
        .into_iter()
        .map(|(release_id, date)| ReleaseDate {
            release_id,
            release_name: releases
                .iter()
                .find(|r| r.id == release_id)
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            date: date.to_string(),
        })
        .collect();

        let series = vec![
            series(SeriesSeed {
                id: "BOPGSTB",
                title: "Trade Balance: Goods and Services, Balance of Payments Basis",
                frequency: MONTHLY,
                units: ("Millions of Dollars", "Mil. of $"),
                adjustment: SA,
                popularity: 78,
                category_ids: &[125],
                release_id: 51,
                tags: &["balance", "bea", "census", "goods", "monthly", "nation", "sa", "services", "trade", "usa"],
                observations: &[("2024-02-01", "-68588"), ("2024-03-01", "-74550"), ("2024-04-01", "-75089")],
                vintage_dates: &["2024-05-07", "2024-06-06"],
            }),
            series(SeriesSeed {
                id: "IEABCS",
                title: "Balance on Current Account: Services",
                frequency: QUARTERLY,
                units: ("Millions of Dollars", "Mil. of $"),
                adjustment: SA,
                popularity: 31,
                category_ids: &[125],
                release_id: 51,
                tags: &["balance", "bea", "nation", "quarterly", "sa", "services", "trade", "usa"],
                observations: &[("2023-07-01", "70431"), ("2023-10-01", "73285"), ("2024-01-01", "72946")],
                vintage_dates: &["2024-03-21", "2024-06-20"],
            }),
            series(SeriesSeed {
                id: "BOPTEXP",
                title: "Exports of Goods and Services: Balance of Payments Basis",
                frequency: MONTHLY,
                units: ("Millions of Dollars", "Mil. of $"),
                adjustment: SA,
                popularity: 54,
                category_ids: &[125],
                release_id: 51,
                tags: &["bea", "census", "exports", "goods", "monthly", "nation", "sa", "services", "usa"],
                observations: &[("2024-02-01", "262743"), ("2024-03-01", "257614"), ("2024-04-01", "263697")],
                vintage_dates: &["2024-05-07", "2024-06-06"],
            }),
            series(SeriesSeed {
                id: "GDP",
                title: "Gross Domestic Product",
                frequency: QUARTERLY,
                units: ("Billions of Dollars", "Bil. of $"),
                adjustment: SAAR,
                popularity: 92,
                category_ids: &[106],
                release_id: 53,
                tags: &["bea", "gdp", "nation", "quarterly", "sa", "usa"],
                observations: &[("2023-07-01", "27967.697"), ("2023-10-01", "28296.967"), ("2024-01-01", "28255.928")],
                vintage_dates: &["2024-04-25", "2024-05-30"],
            }),
            series(SeriesSeed {
                id: "GNPCA",
                title: "Real Gross National Product",
                frequency: ANNUAL,
                units: ("Billions of Chained 2017 Dollars", "Bil. of Chn. 2017 $"),
                adjustment: NSA,
                popularity: 12,
                category_ids: &[106],
                release_id: 53,
                tags: &["annual", "bea", "gnp", "nation", "nsa", "usa"],
                observations: &[("2021-01-01", "20651.012"), ("2022-01-01", "21038.383"), ("2023-01-01", "."), ("2024-01-01", "22011.524")],
                vintage_dates: &["2024-03-28", "2024-05-30"],
            }),
            series(SeriesSeed {
                id: "MDOAH",
                title: "Mortgage Debt Outstanding, All Holders",
                frequency: QUARTERLY,
                units: ("Millions of Dollars", "Mil. of $"),
                adjustment: NSA,
                popularity: 40,
                category_ids: &[32991],
                release_id: 82,
                tags: &["debt", "mortgage", "nation", "nsa", "quarterly", "usa"],
                observations: &[("2023-07-01", "20231450"), ("2023-10-01", "20392517")],
                vintage_dates: &["2024-03-08", "2024-06-07"],
            }),
            series(SeriesSeed {
                id: "COMPOUT",
                title: "Commercial Paper Outstanding",
                frequency: WEEKLY,
                units: ("Billions of Dollars", "Bil. of $"),
                adjustment: SA,
                popularity: 27,
                category_ids: &[120],
                release_id: 86,
                tags: &["commercial paper", "foreign", "nation", "sa", "usa", "weekly"],
                observations: &[("2024-05-29", "1258.1"), ("2024-06-05", "1262.4"), ("2024-06-12", "1270.9")],
                vintage_dates: &["2024-06-06", "2024-06-13"],
            }),
        ];

        let sources = vec![
            source(1, "Board of Governors of the Federal Reserve System (US)", "http://www.federalreserve.gov/"),
            source(18, "U.S. Bureau of Economic Analysis", "http://www.bea.gov/"),
            source(19, "U.S. Census Bureau", "http://www.census.gov/"),
        ];

        let tags = TAG_GROUPS
            .iter()
            .map(|(name, group)| {
                let count = series.iter().filter(|s| s.tags.contains(name)).count() as i64;
                Tag {
                    name: name.to_string(),
                    group_id: group.to_string(),
                    created: "2012-02-27 10:18:19-06".to_string(),
                    popularity: count * 10,
                    series_count: count,
                }
            })
            .collect();

        Self {
            categories,
            releases,
            release_dates,
            series,
            sources,
            tags,
        }
    }

    /// Answer one endpoint call. `path` is relative to `/fred/`.
    pub fn query(&self, path: &str, q: &Query) -> Result<Listing, Failure> {
        let path = path.trim_matches('/');
        match path {
            "category" => {
                let id = int_param(q, "category_id")?.unwrap_or(0);
                Ok(listing("categories", vec![self.category(id)?]))
            }
            "category/children" => {
                let id = int_param(q, "category_id")?.unwrap_or(0);
                self.category(id)?;
                let children = self
                    .categories
                    .iter()
                    .filter(|c| c.parent_id == id && c.id != id);
                Ok(listing("categories", children))
            }
            "category/related" => {
                let category = self.category(required_int(q, "category_id")?)?;
                let related = self
                    .categories
                    .iter()
                    .filter(|c| category.related.contains(&c.id));
                Ok(listing("categories", related))
            }
            "category/series" => {
                let id = self.category(required_int(q, "category_id")?)?.id;
                Ok(listing("seriess", self.series_in_category(id)))
            }
            "category/tags" => {
                let id = self.category(required_int(q, "category_id")?)?.id;
                Ok(listing("tags", self.tags_of(self.series_in_category(id))))
            }
            "category/related_tags" => {
                let id = self.category(required_int(q, "category_id")?)?.id;
                let names = tag_names(q)?;
                Ok(listing("tags", self.related_tags(self.series_in_category(id), &names)))
            }
            "releases" => Ok(listing("releases", &self.releases)),
            "releases/dates" => Ok(listing("release_dates", &self.release_dates)),
            "release" => {
                let release = self.release(required_int(q, "release_id")?)?;
                Ok(listing("releases", vec![release]))
            }
            "release/dates" => {
                let id = self.release(required_int(q, "release_id")?)?.id;
                let dates = self.release_dates.iter().filter(|d| d.release_id == id);
                Ok(listing("release_dates", dates))
            }
            "release/series" => {
                let id = self.release(required_int(q, "release_id")?)?.id;
                Ok(listing("seriess", self.series_in_release(id)))
            }
            "release/sources" => {
                let release = self.release(required_int(q, "release_id")?)?;
                let sources = self
                    .sources
                    .iter()
                    .filter(|s| release.source_ids.contains(&s.id));
                Ok(listing("sources", sources))
            }
            "release/tags" => {
                let id = self.release(required_int(q, "release_id")?)?.id;
                Ok(listing("tags", self.tags_of(self.series_in_release(id))))
            }
            "release/related_tags" => {
                let id = self.release(required_int(q, "release_id")?)?.id;
                let names = tag_names(q)?;
                Ok(listing("tags", self.related_tags(self.series_in_release(id), &names)))
            }
            "release/tables" => {
                let id = self.release(required_int(q, "release_id")?)?.id;
                let element_id = int_param(q, "element_id")?;
                let elements = self
                    .series_in_release(id)
                    .enumerate()
                    .map(|(i, s)| Element {
                        element_id: id * 1000 + i as i64,
                        release_id: id,
                        series_id: s.id.clone(),
                        name: s.title.clone(),
                        level: "0".to_string(),
                        kind: "series".to_string(),
                    })
                    .filter(|e| element_id.map_or(true, |wanted| wanted == e.element_id))
                    .collect::<Vec<_>>();
                Ok(listing("elements", elements))
            }
            "series" => Ok(listing("seriess", vec![self.one_series(q)?])),
            "series/categories" => {
                let series = self.one_series(q)?;
                let categories = self
                    .categories
                    .iter()
                    .filter(|c| series.category_ids.contains(&c.id));
                Ok(listing("categories", categories))
            }
            "series/observations" => {
                let series = self.one_series(q)?;
                let observations = series.observations.iter().map(|(date, value)| Observation {
                    realtime_start: REALTIME.to_string(),
                    realtime_end: REALTIME.to_string(),
                    date: date.to_string(),
                    value: value.to_string(),
                });
                Ok(listing("observations", observations))
            }
            "series/release" => {
                let series = self.one_series(q)?;
                Ok(listing("releases", vec![self.release(series.release_id)?]))
            }
            "series/search" => {
                let text = required_text(q, "search_text")?;
                Ok(listing("seriess", self.search(&text)))
            }
            "series/search/tags" => {
                let text = required_text(q, "series_search_text")?;
                Ok(listing("tags", self.tags_of(self.search(&text))))
            }
            "series/search/related_tags" => {
                let text = required_text(q, "series_search_text")?;
                let names = tag_names(q)?;
                Ok(listing("tags", self.related_tags(self.search(&text), &names)))
            }
            "series/tags" => {
                let series = self.one_series(q)?;
                Ok(listing("tags", self.tags_of(std::iter::once(series))))
            }
            "series/updates" => {
                let mut updated: Vec<&Series> = self.series.iter().collect();
                updated.sort_by(|a, b| b.last_updated.cmp(&a.last_updated));
                Ok(listing("seriess", updated))
            }
            "series/vintagedates" => {
                let series = self.one_series(q)?;
                Ok(listing("vintage_dates", &series.vintage_dates))
            }
            "sources" => Ok(listing("sources", &self.sources)),
            "source" => Ok(listing("sources", vec![self.source(q)?])),
            "source/releases" => {
                let id = self.source(q)?.id;
                let releases = self.releases.iter().filter(|r| r.source_ids.contains(&id));
                Ok(listing("releases", releases))
            }
            "tags" => Ok(listing("tags", &self.tags)),
            "related_tags" => {
                let names = tag_names(q)?;
                Ok(listing("tags", self.related_tags(self.series.iter(), &names)))
            }
            "tags/series" => {
                let names = tag_names(q)?;
                let tagged = self
                    .series
                    .iter()
                    .filter(|s| names.iter().all(|n| s.tags.contains(&n.as_str())));
                Ok(listing("seriess", tagged))
            }
            _ => Err(Failure::NotFound),
        }
    }

    fn category(&self, id: i64) -> Result<&Category, Failure> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Failure::bad("The category does not exist."))
    }

    fn release(&self, id: i64) -> Result<&Release, Failure> {
        self.releases
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| Failure::bad("The release does not exist."))
    }

    fn one_series(&self, q: &Query) -> Result<&Series, Failure> {
        let id = required_text(q, "series_id")?;
        self.series
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Failure::bad("The series does not exist."))
    }

    fn source(&self, q: &Query) -> Result<&Source, Failure> {
        let id = required_int(q, "source_id")?;
        self.sources
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Failure::bad("The source does not exist."))
    }

    fn series_in_category(&self, id: i64) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(move |s| s.category_ids.contains(&id))
    }

    fn series_in_release(&self, id: i64) -> impl Iterator<Item = &Series> {
        self.series.iter().filter(move |s| s.release_id == id)
    }

    /// Series whose id or title contains every word of `text`.
    fn search<'a>(&'a self, text: &str) -> impl Iterator<Item = &'a Series> {
        let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        self.series.iter().filter(move |s| {
            let haystack = format!("{} {}", s.id, s.title).to_lowercase();
            words.iter().all(|w| haystack.contains(w.as_str()))
        })
    }

    /// Tags used by any of `series`, in tag-table order.
    fn tags_of<'a>(&'a self, series: impl Iterator<Item = &'a Series>) -> Vec<&'a Tag> {
        let used: Vec<&str> = series.flat_map(|s| s.tags.iter().copied()).collect();
        self.tags
            .iter()
            .filter(|t| used.contains(&t.name.as_str()))
            .collect()
    }

    /// Tags that co-occur with all of `names` on some series, minus `names`.
    fn related_tags<'a>(
        &'a self,
        series: impl Iterator<Item = &'a Series>,
        names: &[String],
    ) -> Vec<&'a Tag> {
        let matching = series.filter(|s| names.iter().all(|n| s.tags.contains(&n.as_str())));
        self.tags_of(matching)
            .into_iter()
            .filter(|t| !names.contains(&t.name))
            .collect()
    }
}

fn listing<T: Serialize>(root: &'static str, items: impl IntoIterator<Item = T>) -> Listing {
    Listing {
        root,
        items: items
            .into_iter()
            .filter_map(|item| serde_json::to_value(item).ok())
            .collect(),
    }
}

fn int_param(q: &Query, name: &str) -> Result<Option<i64>, Failure> {
    match q.get(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Failure::bad(format!("Variable {name} is not an integer."))),
    }
}

fn required_int(q: &Query, name: &str) -> Result<i64, Failure> {
    int_param(q, name)?.ok_or_else(|| Failure::bad(format!("Variable {name} is not set.")))
}

fn required_text(q: &Query, name: &str) -> Result<String, Failure> {
    match q.get(name).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(Failure::bad(format!("Variable {name} is not set."))),
    }
}

fn tag_names(q: &Query) -> Result<Vec<String>, Failure> {
    Ok(required_text(q, "tag_names")?
        .split(';')
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .collect())
}
