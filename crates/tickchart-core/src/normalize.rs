//! Form input normalization.

use std::str::FromStr;

use tracing::debug;

use crate::{Feature, FeatureSet, Ticker, UserQuery, ValidationError};

/// Build a [`UserQuery`] from raw form values.
///
/// Only the ticker can fail. A year that does not parse as an integer
/// (including an empty one) falls back to "no start year" with a note in
/// [`UserQuery::year_diagnostic`]. Feature labels that are not one of
/// Open, Close or Range are ignored.
pub fn normalize<I, S>(
    raw_ticker: &str,
    raw_year: &str,
    raw_features: I,
) -> Result<UserQuery, ValidationError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ticker = Ticker::parse(raw_ticker)?;
    let start_year = parse_start_year(raw_year);
    let features = select_features(raw_features);

    let query = UserQuery::new(ticker, start_year, features);
    debug!(
        ticker = %query.ticker,
        start_year = ?query.start_year,
        features = query.features.len(),
        "normalized chart query"
    );
    Ok(query)
}

/// Four-digit start year, or `None` when the text is not an integer in `0..=9999`.
pub fn parse_start_year(raw_year: &str) -> Option<i32> {
    raw_year
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (0..=9999).contains(year))
}

/// Intersect submitted labels with the fixed feature list.
pub fn select_features<I, S>(raw_features: I) -> FeatureSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_features
        .into_iter()
        .filter_map(|raw| match Feature::from_str(raw.as_ref()) {
            Ok(feature) => Some(feature),
            Err(error) => {
                debug!(%error, "ignoring unrecognized feature selection");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FEATURES: [&str; 0] = [];

    #[test]
    fn upper_cases_mixed_case_ticker() {
        let query = normalize("gOoG", "", NO_FEATURES).expect("valid query");
        assert_eq!(query.ticker.as_str(), "GOOG");
    }

    #[test]
    fn empty_ticker_is_invalid_input() {
        let err = normalize("  ", "2015", ["Open"]).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyTicker);
    }

    #[test]
    fn numeric_year_is_recorded() {
        let query = normalize("AAPL", "2015", NO_FEATURES).expect("valid query");
        assert_eq!(query.start_year, Some(2015));
        assert_eq!(query.year_diagnostic, "Start year specified as 2015");
    }

    #[test]
    fn unusable_year_falls_back_to_absent() {
        for raw in ["", "   ", "twenty", "2015.5", "15a", "-5", "12345"] {
            let query = normalize("AAPL", raw, NO_FEATURES).expect("valid query");
            assert_eq!(query.start_year, None, "raw year {raw:?}");
            assert_eq!(query.year_diagnostic, "Start year not specified/recognized");
        }
    }

    #[test]
    fn feature_selection_follows_fixed_order() {
        let query = normalize("AAPL", "", ["Range", "AAPL", "Open"]).expect("valid query");
        assert_eq!(
            query.features.iter().collect::<Vec<_>>(),
            vec![Feature::Open, Feature::Range]
        );
    }
}
