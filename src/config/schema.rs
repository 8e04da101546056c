//! Configuration schema for `.modpin.yml`.
//!
//! Every field has a default, so an empty or missing file is a valid config.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::catalog::{curseforge, modrinth, HttpSettings};
use crate::error::{ModpinError, Result};

/// Root configuration structure for `.modpin.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModpinConfig {
    /// Catalog endpoints
    pub catalogs: CatalogsConfig,

    /// HTTP transport settings
    pub http: HttpConfig,

    /// Resolution defaults
    pub resolve: ResolveConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogsConfig {
    pub modrinth: ModrinthConfig,
    pub curseforge: CurseForgeConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModrinthConfig {
    /// API root, e.g. `https://api.modrinth.com/v2`
    pub api_url: String,
}

impl Default for ModrinthConfig {
    fn default() -> Self {
        Self {
            api_url: modrinth::DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurseForgeConfig {
    /// API root of a CurseForge-compatible proxy
    pub api_url: String,

    /// Files requested per project listing
    pub page_size: u32,
}

impl Default for CurseForgeConfig {
    fn default() -> Self {
        Self {
            api_url: curseforge::DEFAULT_API_URL.to_string(),
            page_size: curseforge::DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure
    pub retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        let defaults = HttpSettings::default();
        Self {
            user_agent: defaults.user_agent,
            timeout_secs: defaults.timeout.as_secs(),
            retries: defaults.retries,
            retry_backoff_ms: defaults.retry_backoff.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Concurrent catalog lookups
    pub workers: usize,

    /// Stop at the first failing dependency
    pub fail_fast: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            fail_fast: true,
        }
    }
}

impl ModpinConfig {
    /// Transport settings for the catalog client.
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            user_agent: self.http.user_agent.clone(),
            timeout: Duration::from_secs(self.http.timeout_secs),
            retries: self.http.retries,
            retry_backoff: Duration::from_millis(self.http.retry_backoff_ms),
        }
    }

    pub fn modrinth_url(&self) -> Result<Url> {
        parse_api_url("catalogs.modrinth.api_url", &self.catalogs.modrinth.api_url)
    }

    pub fn curseforge_url(&self) -> Result<Url> {
        parse_api_url(
            "catalogs.curseforge.api_url",
            &self.catalogs.curseforge.api_url,
        )
    }
}

pub(crate) fn parse_api_url(field: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value).map_err(|e| ModpinError::ConfigValidationError {
        message: format!("{} '{}' is not a valid URL: {}", field, value, e),
    })?;
    if url.cannot_be_a_base() {
        return Err(ModpinError::ConfigValidationError {
            message: format!("{} '{}' cannot be used as an API root", field, value),
        });
    }
    Ok(url)
}
