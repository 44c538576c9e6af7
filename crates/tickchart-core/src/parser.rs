//! Dataset payload parsing.
//!
//! Expected payload shape:
//!
//! ```json
//! {
//!   "dataset": {
//!     "name": "Apple Inc (AAPL) Prices, Dividends, Splits and Trading Volume",
//!     "column_names": ["Date", "Open", "High", "Low", "Close", "Volume", "..."],
//!     "data": [["2018-03-27", 173.68, 175.15, 166.92, 168.34, 38962839.0, "..."]]
//!   }
//! }
//! ```
//!
//! Only the first five columns are used and they must be, in order, Date,
//! Open, High, Low and Close. Every cell of those columns must coerce; the
//! parser reports all failing cells rather than dropping rows.

use serde_json::Value;
use tracing::{debug, warn};

use crate::{CellFailure, ChartError, PriceRow, SessionDate, TimeSeriesTable};

/// Leading columns consumed from the dataset, in position order.
pub const EXPECTED_COLUMNS: [&str; 5] = ["Date", "Open", "High", "Low", "Close"];

/// Parsed dataset: typed rows plus the display description.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDataset {
    pub table: TimeSeriesTable,
    /// Dataset name up to the first comma.
    pub description: String,
}

/// Parse a raw dataset payload into a [`TimeSeriesTable`].
pub fn parse(payload: &Value) -> Result<ParsedDataset, ChartError> {
    let dataset = payload
        .get("dataset")
        .and_then(Value::as_object)
        .ok_or_else(|| ChartError::malformed("missing `dataset` object"))?;

    let columns = dataset
        .get("column_names")
        .and_then(Value::as_array)
        .ok_or_else(|| ChartError::malformed("missing `dataset.column_names` array"))?;
    check_columns(columns)?;

    let data = dataset
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| ChartError::malformed("missing `dataset.data` array"))?;
    if data.is_empty() {
        return Err(ChartError::malformed("dataset contains no rows"));
    }

    let mut rows = Vec::with_capacity(data.len());
    let mut failures = Vec::new();
    for (index, raw_row) in data.iter().enumerate() {
        let cells = raw_row.as_array().ok_or_else(|| {
            ChartError::malformed(format!("row {index} is not an array"))
        })?;
        if cells.len() != columns.len() {
            return Err(ChartError::malformed(format!(
                "row {index} has {} cells, expected {} to match column_names",
                cells.len(),
                columns.len()
            )));
        }

        if let Some(row) = coerce_row(index, cells, &mut failures) {
            rows.push(row);
        }
    }

    if !failures.is_empty() {
        return Err(ChartError::DataCoercion { failures });
    }

    let description = description(dataset.get("name"));
    debug!(rows = rows.len(), %description, "parsed dataset");

    Ok(ParsedDataset {
        table: TimeSeriesTable::new(rows),
        description,
    })
}

/// Display name up to the first comma, or the whole name without one.
pub fn short_description(name: &str) -> &str {
    name.split(',').next().unwrap_or(name)
}

fn description(name: Option<&Value>) -> String {
    match name.and_then(Value::as_str) {
        Some(name) => short_description(name).to_owned(),
        None => {
            warn!("dataset has no string `name`; using an empty description");
            String::new()
        }
    }
}

fn check_columns(columns: &[Value]) -> Result<(), ChartError> {
    if columns.len() < EXPECTED_COLUMNS.len() {
        return Err(ChartError::malformed(format!(
            "expected at least {} column names, found {}",
            EXPECTED_COLUMNS.len(),
            columns.len()
        )));
    }

    for (position, (actual, expected)) in columns.iter().zip(EXPECTED_COLUMNS).enumerate() {
        let matches = actual
            .as_str()
            .is_some_and(|name| name.trim().eq_ignore_ascii_case(expected));
        if !matches {
            return Err(ChartError::malformed(format!(
                "expected column `{expected}` at position {position}, found {actual}"
            )));
        }
    }

    Ok(())
}

fn coerce_row(index: usize, cells: &[Value], failures: &mut Vec<CellFailure>) -> Option<PriceRow> {
    let date = coerce_date(index, &cells[0], failures);
    let open = coerce_price(index, EXPECTED_COLUMNS[1], &cells[1], failures);
    let high = coerce_price(index, EXPECTED_COLUMNS[2], &cells[2], failures);
    let low = coerce_price(index, EXPECTED_COLUMNS[3], &cells[3], failures);
    let close = coerce_price(index, EXPECTED_COLUMNS[4], &cells[4], failures);

    Some(PriceRow {
        date: date?,
        open: open?,
        high: high?,
        low: low?,
        close: close?,
    })
}

fn coerce_date(index: usize, cell: &Value, failures: &mut Vec<CellFailure>) -> Option<SessionDate> {
    let result = match cell.as_str() {
        Some(text) => SessionDate::parse(text).map_err(|error| error.to_string()),
        None => Err(String::from("expected a YYYY-MM-DD string")),
    };

    result
        .map_err(|reason| failures.push(cell_failure(index, EXPECTED_COLUMNS[0], cell, reason)))
        .ok()
}

fn coerce_price(
    index: usize,
    column: &'static str,
    cell: &Value,
    failures: &mut Vec<CellFailure>,
) -> Option<f64> {
    let parsed = match cell {
        Value::Number(number) => number
            .as_f64()
            .ok_or_else(|| String::from("number is not representable as f64")),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| String::from("not a number")),
        Value::Null => Err(String::from("missing value")),
        _ => Err(String::from("expected a number")),
    };

    let result = parsed.and_then(|value| {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(String::from("value is not finite"))
        }
    });

    result
        .map_err(|reason| failures.push(cell_failure(index, column, cell, reason)))
        .ok()
}

fn cell_failure(row: usize, column: &'static str, cell: &Value, reason: String) -> CellFailure {
    CellFailure {
        row,
        column,
        value: cell.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ChartErrorKind;

    fn payload(data: Value) -> Value {
        json!({
            "dataset": {
                "name": "Apple Inc (AAPL) Prices, Dividends, Splits and Trading Volume",
                "column_names": ["Date", "Open", "High", "Low", "Close", "Volume"],
                "data": data,
            }
        })
    }

    #[test]
    fn parses_rows_in_source_order() {
        let parsed = parse(&payload(json!([
            ["2020-01-13", 102.0, 108.0, 101.0, 106.0, 1000.0],
            ["2020-01-06", "100", 105, 98, 102.0, 900.0],
        ])))
        .expect("valid payload");

        assert_eq!(parsed.description, "Apple Inc (AAPL) Prices");
        assert_eq!(parsed.table.len(), 2);
        let first = parsed.table.first().expect("row");
        assert_eq!(first.date.to_string(), "2020-01-13");
        assert_eq!(first.close, 106.0);
        let last = parsed.table.last().expect("row");
        assert_eq!(last.open, 100.0);
        assert_eq!(last.high, 105.0);
    }

    #[test]
    fn missing_column_names_is_malformed() {
        let error = parse(&json!({"dataset": {"name": "X", "data": []}})).expect_err("must fail");
        assert_eq!(error.kind(), ChartErrorKind::MalformedSourceData);
        assert!(error.to_string().contains("column_names"), "{error}");
    }

    #[test]
    fn missing_dataset_is_malformed() {
        let error = parse(&json!({"quandl_error": {}})).expect_err("must fail");
        assert_eq!(error.kind(), ChartErrorKind::MalformedSourceData);
    }

    #[test]
    fn unexpected_column_order_is_malformed() {
        let error = parse(&json!({
            "dataset": {
                "name": "X",
                "column_names": ["Date", "Close", "High", "Low", "Open"],
                "data": [["2020-01-06", 1, 2, 0.5, 1]],
            }
        }))
        .expect_err("must fail");
        assert!(error.to_string().contains("`Open` at position 1"), "{error}");
    }

    #[test]
    fn ragged_row_is_malformed() {
        let error = parse(&payload(json!([
            ["2020-01-06", 100.0, 105.0, 98.0, 102.0, 1.0],
            ["2020-01-13", 102.0, 108.0, 101.0, 106.0],
        ])))
        .expect_err("must fail");
        assert!(error.to_string().contains("row 1 has 5 cells"), "{error}");
    }

    #[test]
    fn empty_data_is_malformed() {
        let error = parse(&payload(json!([]))).expect_err("must fail");
        assert_eq!(error.kind(), ChartErrorKind::MalformedSourceData);
    }

    #[test]
    fn collects_every_failing_cell() {
        let error = parse(&payload(json!([
            ["2020-01-06", 100.0, null, 98.0, 102.0, 1.0],
            ["not-a-date", 102.0, 108.0, "n/a", 106.0, 1.0],
        ])))
        .expect_err("must fail");

        let ChartError::DataCoercion { failures } = error else {
            panic!("expected coercion error");
        };
        let located: Vec<(usize, &str)> = failures.iter().map(|f| (f.row, f.column)).collect();
        assert_eq!(located, vec![(0, "High"), (1, "Date"), (1, "Low")]);
    }

    #[test]
    fn description_is_text_before_first_comma() {
        assert_eq!(short_description("WTI Crude"), "WTI Crude");
        assert_eq!(short_description("A, B, C"), "A");
        assert_eq!(
            short_description("  Apple Inc (AAPL) Prices , Dividends"),
            "  Apple Inc (AAPL) Prices "
        );
    }

    #[test]
    fn missing_name_yields_empty_description() {
        let parsed = parse(&json!({
            "dataset": {
                "column_names": ["Date", "Open", "High", "Low", "Close"],
                "data": [["2020-01-06", 1, 2, 0.5, 1]],
            }
        }))
        .expect("valid payload");
        assert_eq!(parsed.description, "");
    }
}
