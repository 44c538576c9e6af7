//! Request-local chart pipeline.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chart::{ChartSpec, ChartSpecBuilder, ChartStyle};
use crate::config::SourceConfig;
use crate::normalize::{normalize, parse_start_year};
use crate::parser;
use crate::request::SourceRequestBuilder;
use crate::series::SeriesDeriver;
use crate::source::DatasetSource;
use crate::{ChartError, ResultMeta, TimeSeriesTable, UserQuery};

/// Raw form values exactly as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartForm {
    pub ticker: String,
    pub year: String,
    #[serde(default)]
    pub features: Vec<String>,
}

impl ChartForm {
    pub fn new(
        ticker: impl Into<String>,
        year: impl Into<String>,
        features: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            year: year.into(),
            features: features.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything a successful request produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutcome {
    pub query: UserQuery,
    pub table: TimeSeriesTable,
    pub chart: ChartSpec,
    pub meta: ResultMeta,
    pub latency_ms: u64,
}

impl ChartOutcome {
    pub fn payload(&self) -> RenderPayload {
        RenderPayload {
            ticker: self.query.ticker.to_string(),
            description: self.meta.resolved_description.clone(),
            year_diagnostic: self.meta.year_diagnostic.clone(),
            chart: self.chart.clone(),
        }
    }
}

/// Data handed to a renderer on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub ticker: String,
    pub description: String,
    pub year_diagnostic: String,
    pub chart: ChartSpec,
}

/// A failed request with the last-known form context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("chart request for '{ticker}' failed: {error}")]
pub struct ChartFailure {
    /// Trimmed, upper-cased ticker as submitted.
    pub ticker: String,
    /// Recognised start year, or empty.
    pub year: String,
    #[source]
    pub error: ChartError,
}

impl ChartFailure {
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            ticker: self.ticker.clone(),
            year: self.year.clone(),
            code: self.error.code().to_owned(),
            message: self.error.to_string(),
        }
    }
}

/// Data handed to a renderer on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub ticker: String,
    pub year: String,
    pub code: String,
    pub message: String,
}

/// Stateless pipeline: holds only immutable collaborators, so one instance
/// can serve concurrent requests behind an `Arc`.
#[derive(Clone)]
pub struct ChartPipeline {
    requests: SourceRequestBuilder,
    source: DatasetSource,
    deriver: SeriesDeriver,
    charts: ChartSpecBuilder,
}

impl ChartPipeline {
    pub fn new(source: DatasetSource) -> Self {
        Self::with_style(source, ChartStyle::default())
    }

    pub fn with_style(source: DatasetSource, style: ChartStyle) -> Self {
        let config = source.config();
        Self {
            requests: SourceRequestBuilder::new(config.base_url.as_str()),
            deriver: SeriesDeriver::new(style.clone()),
            charts: ChartSpecBuilder::new(style, config.source_label.as_str()),
            source,
        }
    }

    /// Pipeline over the live reqwest transport.
    pub fn from_config(config: SourceConfig) -> Self {
        Self::new(DatasetSource::live(config))
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub async fn run(&self, form: &ChartForm) -> Result<ChartOutcome, ChartFailure> {
        let started = Instant::now();

        let query = normalize(&form.ticker, &form.year, &form.features).map_err(|error| {
            debug!(%error, "rejected chart form");
            ChartFailure {
                ticker: form.ticker.trim().to_uppercase(),
                year: parse_start_year(&form.year)
                    .map(|year| year.to_string())
                    .unwrap_or_default(),
                error: error.into(),
            }
        })?;

        let fail = |error: ChartError| {
            warn!(ticker = %query.ticker, code = error.code(), %error, "chart request failed");
            ChartFailure {
                ticker: query.ticker.to_string(),
                year: query.start_year.map(|year| format!("{year:04}")).unwrap_or_default(),
                error,
            }
        };

        let spec = self.requests.build(&query);
        let payload = self.source.fetch(&spec).await.map_err(fail)?;
        let parsed = parser::parse(&payload).map_err(fail)?;

        let series = self.deriver.derive(&parsed.table, &query.features);
        let meta = ResultMeta::new(parsed.description, &query);
        let (chart, meta) = self.charts.build(&parsed.table, series, &query, meta);

        let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            ticker = %query.ticker,
            rows = parsed.table.len(),
            series = chart.series.len(),
            latency_ms,
            "chart request completed"
        );

        Ok(ChartOutcome {
            query,
            table: parsed.table,
            chart,
            meta,
            latency_ms,
        })
    }
}
