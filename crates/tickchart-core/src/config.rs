//! Dataset source configuration.

use std::fmt::{Debug, Formatter};

use tracing::warn;

use crate::request::DEFAULT_BASE_URL;
use crate::retry::RetryConfig;

pub const ENV_BASE_URL: &str = "TICKCHART_BASE_URL";
pub const ENV_API_KEY: &str = "TICKCHART_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "TICKCHART_TIMEOUT_MS";

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_SOURCE_LABEL: &str = "Quandl";

/// Where and how the dataset is fetched.
#[derive(Clone, PartialEq)]
pub struct SourceConfig {
    pub base_url: String,
    /// Appended as `api_key=` at fetch time; never logged.
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    /// Name used in the start-year reconciliation note.
    pub source_label: String,
    pub retry: RetryConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_BASE_URL),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            source_label: String::from(DEFAULT_SOURCE_LABEL),
            retry: RetryConfig::default(),
        }
    }
}

impl Debug for SourceConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("source_label", &self.source_label)
            .field("retry", &self.retry)
            .finish()
    }
}

impl SourceConfig {
    /// Defaults overlaid with `TICKCHART_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_lookup(|name| std::env::var(name).ok())
    }

    /// Overlay values from an arbitrary lookup; unusable values are skipped.
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = non_blank(lookup(ENV_BASE_URL)) {
            self.base_url = base_url;
        }

        if let Some(api_key) = non_blank(lookup(ENV_API_KEY)) {
            self.api_key = Some(api_key);
        }

        if let Some(raw) = non_blank(lookup(ENV_TIMEOUT_MS)) {
            match raw.parse::<u64>() {
                Ok(timeout_ms) if timeout_ms > 0 => self.timeout_ms = timeout_ms,
                _ => warn!(value = %raw, "ignoring invalid {ENV_TIMEOUT_MS}"),
            }
        }

        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}
