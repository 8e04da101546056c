//! Blocking JSON transport for catalog APIs.
//!
//! Requests carry a User-Agent (both catalogs ask for one) and a fixed
//! per-request timeout. Transient failures (connect errors, timeouts, HTTP 429
//! and 5xx) are retried a bounded number of times with exponential backoff;
//! anything else fails on the first attempt.

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

/// Transport settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
    /// Extra attempts after a transient failure.
    pub retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_backoff: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: format!("modpin/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(60),
            retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Fetches JSON documents over HTTP.
pub struct JsonClient {
    client: Client,
    settings: HttpSettings,
}

enum Attempt {
    Done(Value),
    Transient(anyhow::Error),
}

impl JsonClient {
    /// Create a client with the given settings.
    pub fn new(settings: HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, settings })
    }

    /// GET `url` and decode the body as JSON.
    pub fn get_json(&self, url: &Url) -> Result<Value> {
        let mut backoff = self.settings.retry_backoff;
        let mut attempt = 0;

        loop {
            tracing::debug!("GET {}", url);
            match self.try_get(url)? {
                Attempt::Done(value) => return Ok(value),
                Attempt::Transient(err) if attempt < self.settings.retries => {
                    attempt += 1;
                    tracing::warn!(
                        "{:#}; retrying in {:?} ({}/{})",
                        err,
                        backoff,
                        attempt,
                        self.settings.retries
                    );
                    std::thread::sleep(backoff);
                    backoff = backoff.saturating_mul(2);
                }
                Attempt::Transient(err) => return Err(err),
            }
        }
    }

    fn try_get(&self, url: &Url) -> Result<Attempt> {
        let response = match self.client.get(url.clone()).send() {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => {
                return Ok(Attempt::Transient(
                    anyhow!(e).context(format!("Failed to fetch {}", url)),
                ));
            }
            Err(e) => return Err(anyhow!(e).context(format!("Failed to fetch {}", url))),
        };

        let status = response.status();
        if is_transient(status) {
            return Ok(Attempt::Transient(anyhow!("HTTP {} fetching {}", status, url)));
        }
        if !status.is_success() {
            return Err(anyhow!("HTTP {} fetching {}", status, url));
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response from {}", url))?;
        let value = serde_json::from_str(&body)
            .with_context(|| format!("Response from {} is not valid JSON", url))?;
        Ok(Attempt::Done(value))
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
