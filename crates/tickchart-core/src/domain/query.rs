use serde::{Deserialize, Serialize};

use crate::{FeatureSet, Ticker};

/// Normalized, immutable description of one chart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub ticker: Ticker,
    pub start_year: Option<i32>,
    pub features: FeatureSet,
    /// Human-readable note on how the start year was interpreted.
    pub year_diagnostic: String,
}

impl UserQuery {
    pub fn new(ticker: Ticker, start_year: Option<i32>, features: FeatureSet) -> Self {
        let year_diagnostic = match start_year {
            Some(year) => format!("Start year specified as {year:04}"),
            None => String::from("Start year not specified/recognized"),
        };

        Self {
            ticker,
            start_year,
            features,
            year_diagnostic,
        }
    }
}

/// Display-only facts about a resolved chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMeta {
    /// Dataset display name up to the first comma.
    pub resolved_description: String,
    pub year_diagnostic: String,
}

impl ResultMeta {
    pub fn new(resolved_description: impl Into<String>, query: &UserQuery) -> Self {
        Self {
            resolved_description: resolved_description.into(),
            year_diagnostic: query.year_diagnostic.clone(),
        }
    }
}
