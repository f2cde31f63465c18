//! Client configuration.

use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::{MarathonError, Result};

pub const DEFAULT_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const URL_ENV: &str = "MARATHON_URL";
pub const REQUEST_TIMEOUT_ENV: &str = "MARATHON_REQUEST_TIMEOUT_SECS";

/// Settings used to build a [`MarathonClient`](crate::MarathonClient).
#[derive(Debug, Clone)]
pub struct MarathonConfig {
    /// API root, e.g. `http://marathon.mesos:8080`.
    pub url: String,
    /// Upper bound for one request/response round trip.
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for MarathonConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: concat!("marathon-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl MarathonConfig {
    /// Read `MARATHON_URL` and `MARATHON_REQUEST_TIMEOUT_SECS`, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(URL_ENV) {
            config.url = url;
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.request_timeout = Duration::from_secs(secs),
                Err(e) => warn!(
                    value = %raw,
                    error = %e,
                    "ignoring invalid {}, using {}s",
                    REQUEST_TIMEOUT_ENV,
                    DEFAULT_REQUEST_TIMEOUT.as_secs()
                ),
            }
        }

        config
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validated API root without a trailing `/`.
    pub(crate) fn base_url(&self) -> Result<String> {
        let parsed = Url::parse(&self.url)
            .map_err(|e| MarathonError::InvalidUrl(format!("{}: {}", self.url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(MarathonError::InvalidUrl(format!(
                "{}: expected an absolute http(s) URL",
                self.url
            )));
        }

        Ok(self.url.trim_end_matches('/').to_string())
    }
}
