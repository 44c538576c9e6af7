//! # Tickchart Core
//!
//! Chart pipeline for weekly stock price history.
//!
//! ## Overview
//!
//! A request flows through five stages, each a plain function of the
//! previous stage's output:
//!
//! - **Input normalization** of the raw ticker, start year and feature labels
//! - **Request building** for the remote time-series dataset
//! - **Parsing** of the dataset payload into typed weekly rows
//! - **Series derivation** of opening/closing lines and the high/low band
//! - **Chart spec assembly** with axis bounds and the start-year note
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`chart`] | Chart styling and renderer-neutral chart spec |
//! | [`config`] | Source configuration and environment overlay |
//! | [`domain`] | Request-scoped value types |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Error taxonomy |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalize`] | Form input normalization |
//! | [`parser`] | Dataset payload parsing |
//! | [`pipeline`] | Request-local end-to-end pipeline |
//! | [`request`] | Remote request construction |
//! | [`retry`] | Opt-in retry policy for the fetch stage |
//! | [`series`] | Plot series derivation |
//! | [`source`] | Dataset fetch stage |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tickchart_core::{ChartForm, ChartPipeline, SourceConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let pipeline = ChartPipeline::from_config(SourceConfig::from_env());
//!     let form = ChartForm::new("aapl", "2016", ["Open", "Range"]);
//!
//!     match pipeline.run(&form).await {
//!         Ok(outcome) => println!("{} series", outcome.chart.series.len()),
//!         Err(failure) => eprintln!("{failure}"),
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ChartForm ─▶ normalize ─▶ UserQuery ─▶ SourceRequestBuilder ─▶ RemoteRequestSpec
//!                                                                     │
//!                                                                     ▼
//! ChartSpec ◀─ ChartSpecBuilder ◀─ SeriesDeriver ◀─ parser ◀─ DatasetSource
//! ```

pub mod chart;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod request;
pub mod retry;
pub mod series;
pub mod source;

pub use chart::{AxisBounds, AxisSpec, ChartSpec, ChartSpecBuilder, ChartStyle, LegendPosition};
pub use config::SourceConfig;
pub use domain::*;
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CellFailure, ChartError, ChartErrorKind, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};
pub use normalize::normalize;
pub use pipeline::{ChartFailure, ChartForm, ChartOutcome, ChartPipeline, ErrorPayload, RenderPayload};
pub use request::{Collapse, RemoteRequestSpec, SourceRequestBuilder};
pub use retry::{Backoff, RetryConfig};
pub use series::{BandSeries, DerivedSeries, LineSeries, SeriesDeriver};
pub use source::DatasetSource;
