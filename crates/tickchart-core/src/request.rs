//! Remote dataset request construction.
//!
//! Nothing here performs I/O: a [`RemoteRequestSpec`] is a pure function of
//! the [`UserQuery`] and the configured dataset base path, so it can be
//! inspected and compared in tests without a live endpoint.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Ticker, UserQuery};

/// Default dataset namespace (Quandl WIKI prices).
pub const DEFAULT_BASE_URL: &str = "https://www.quandl.com/api/v3/datasets/WIKI/";

/// Temporal aggregation applied by the source before returning rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collapse {
    Weekly,
}

impl Collapse {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
        }
    }
}

impl Display for Collapse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of one dataset GET request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteRequestSpec {
    pub base_path: String,
    pub ticker: Ticker,
    pub collapse: Collapse,
    /// `{YYYY}-01-01`, present exactly when the query has a start year.
    pub start_date: Option<String>,
}

impl RemoteRequestSpec {
    /// Ordered query parameters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("collapse", self.collapse.as_str().to_owned())];
        if let Some(start_date) = &self.start_date {
            pairs.push(("start_date", start_date.clone()));
        }
        pairs
    }

    /// `{base_path}{TICKER}.json?collapse=weekly[&start_date=YYYY-01-01]`.
    pub fn url(&self) -> String {
        let query = self
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}{}.json?{query}",
            self.base_path,
            urlencoding::encode(self.ticker.as_str())
        )
    }
}

/// Builds [`RemoteRequestSpec`] values against a fixed dataset base path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequestBuilder {
    base_path: String,
}

impl Default for SourceRequestBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl SourceRequestBuilder {
    /// A trailing `/` is added to the base path when missing.
    pub fn new(base_path: impl Into<String>) -> Self {
        let mut base_path = base_path.into();
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn build(&self, query: &UserQuery) -> RemoteRequestSpec {
        RemoteRequestSpec {
            base_path: self.base_path.clone(),
            ticker: query.ticker.clone(),
            collapse: Collapse::Weekly,
            start_date: query.start_year.map(|year| format!("{year:04}-01-01")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    const NO_FEATURES: [&str; 0] = [];

    #[test]
    fn builds_weekly_url_without_start_date() {
        let query = normalize("aapl", "", NO_FEATURES).expect("valid");
        let spec = SourceRequestBuilder::default().build(&query);

        assert_eq!(spec.start_date, None);
        assert_eq!(
            spec.url(),
            "https://www.quandl.com/api/v3/datasets/WIKI/AAPL.json?collapse=weekly"
        );
    }

    #[test]
    fn appends_start_date_when_year_present() {
        let query = normalize("msft", "2012", NO_FEATURES).expect("valid");
        let spec = SourceRequestBuilder::default().build(&query);

        assert_eq!(spec.start_date.as_deref(), Some("2012-01-01"));
        assert!(spec.url().ends_with("MSFT.json?collapse=weekly&start_date=2012-01-01"));
    }

    #[test]
    fn pads_start_date_to_four_digit_year() {
        let query = normalize("aapl", "0099", NO_FEATURES).expect("valid");
        let spec = SourceRequestBuilder::default().build(&query);

        assert_eq!(spec.start_date.as_deref(), Some("0099-01-01"));
    }

    #[test]
    fn normalizes_base_path_separator() {
        let builder = SourceRequestBuilder::new("http://localhost:9000/datasets/WIKI");
        let query = normalize("ibm", "", NO_FEATURES).expect("valid");
        assert_eq!(
            builder.build(&query).url(),
            "http://localhost:9000/datasets/WIKI/IBM.json?collapse=weekly"
        );
    }

    #[test]
    fn encodes_ticker_path_segment() {
        let query = normalize("a/b", "", NO_FEATURES).expect("valid");
        let url = SourceRequestBuilder::default().build(&query).url();
        assert!(url.contains("/WIKI/A%2FB.json"), "{url}");
    }
}
