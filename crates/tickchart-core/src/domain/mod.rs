//! # Domain Models
//!
//! Request-scoped value types that flow through the chart pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Upper-cased dataset code |
//! | [`Feature`] / [`FeatureSet`] | Requested plot features in chart order |
//! | [`UserQuery`] | Normalized form submission |
//! | [`ResultMeta`] | Display name and start-year note |
//! | [`PriceRow`] / [`TimeSeriesTable`] | Typed weekly price rows |
//! | [`SessionDate`] | Row calendar date |
//! | [`UtcDateTime`] | Envelope generation timestamp |
//!
//! None of these types hold shared or interior-mutable state; each request
//! builds its own values and drops them when the response is rendered.

mod date;
mod feature;
mod query;
mod table;
mod ticker;
mod timestamp;

pub use date::SessionDate;
pub use feature::{Feature, FeatureSet};
pub use query::{ResultMeta, UserQuery};
pub use table::{PriceRow, TimeSeriesTable};
pub use ticker::Ticker;
pub use timestamp::UtcDateTime;
