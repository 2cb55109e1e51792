//! Client configuration.

use std::fmt;

use crate::error::{FredError, Result};
use crate::params::FileType;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

pub const ENV_API_KEY: &str = "FRED_API_KEY";
pub const ENV_BASE_URL: &str = "FRED_BASE_URL";
pub const ENV_FILE_TYPE: &str = "FRED_FILE_TYPE";

/// API key wrapper that never reveals its contents in `Debug`/`Display`.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(FredError::Config("api key must not be empty".to_string()));
        }
        Ok(Self(key))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{head}...{tail}")
        }
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({})", self.masked())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Where to send requests, with which key, and in which default format.
#[derive(Debug, Clone)]
pub struct FredConfig {
    pub base_url: String,
    pub api_key: ApiKey,
    pub file_type: FileType,
}

impl FredConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: ApiKey::new(api_key)?,
            file_type: FileType::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    /// Read `FRED_API_KEY` (required), `FRED_BASE_URL` and `FRED_FILE_TYPE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key = lookup(ENV_API_KEY)
            .ok_or_else(|| FredError::Config(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(key)?;
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url);
        }
        if let Some(file_type) = lookup(ENV_FILE_TYPE) {
            let file_type: FileType = file_type
                .parse()
                .map_err(|_| FredError::Config(format!("{ENV_FILE_TYPE}={file_type} is not json or xml")))?;
            config = config.with_file_type(file_type);
        }
        Ok(config)
    }
}
