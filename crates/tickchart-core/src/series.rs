//! Plot series derivation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::ChartStyle;
use crate::{Feature, FeatureSet, PriceRow, SessionDate, TimeSeriesTable};

pub const OPEN_LABEL: &str = "Opening price";
pub const CLOSE_LABEL: &str = "Closing price";
pub const RANGE_LABEL: &str = "Range (High/Low)";

/// Price line over the table's dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub label: String,
    pub x: Vec<SessionDate>,
    pub y: Vec<f64>,
    pub line_width: f64,
    pub color: String,
}

/// Closed polygon between the high and low envelopes.
///
/// `x` is the dates forward then reversed; `y` is the highs forward then
/// the lows reversed, so point `i` and point `2n - 1 - i` share a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandSeries {
    pub label: String,
    pub x: Vec<SessionDate>,
    pub y: Vec<f64>,
    pub fill_alpha: f64,
    pub color: String,
}

/// One drawable series of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DerivedSeries {
    Line(LineSeries),
    Band(BandSeries),
}

impl DerivedSeries {
    pub fn label(&self) -> &str {
        match self {
            Self::Line(line) => &line.label,
            Self::Band(band) => &band.label,
        }
    }

    pub fn y(&self) -> &[f64] {
        match self {
            Self::Line(line) => &line.y,
            Self::Band(band) => &band.y,
        }
    }

    pub fn as_line(&self) -> Option<&LineSeries> {
        match self {
            Self::Line(line) => Some(line),
            Self::Band(_) => None,
        }
    }

    pub fn as_band(&self) -> Option<&BandSeries> {
        match self {
            Self::Band(band) => Some(band),
            Self::Line(_) => None,
        }
    }
}

/// Turns a typed table into the series for the selected features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesDeriver {
    style: ChartStyle,
}

impl SeriesDeriver {
    pub fn new(style: ChartStyle) -> Self {
        Self { style }
    }

    /// Series in Open, Close, Range order; unselected features are omitted.
    pub fn derive(&self, table: &TimeSeriesTable, features: &FeatureSet) -> Vec<DerivedSeries> {
        let series: Vec<DerivedSeries> = features
            .iter()
            .map(|feature| match feature {
                Feature::Open => DerivedSeries::Line(self.line(
                    table,
                    OPEN_LABEL,
                    |row| row.open,
                    &self.style.open_color,
                )),
                Feature::Close => DerivedSeries::Line(self.line(
                    table,
                    CLOSE_LABEL,
                    |row| row.close,
                    &self.style.close_color,
                )),
                Feature::Range => DerivedSeries::Band(self.band(table)),
            })
            .collect();

        debug!(rows = table.len(), series = series.len(), "derived plot series");
        series
    }

    fn line(
        &self,
        table: &TimeSeriesTable,
        label: &str,
        pick: fn(&PriceRow) -> f64,
        color: &str,
    ) -> LineSeries {
        LineSeries {
            label: label.to_owned(),
            x: table.dates().collect(),
            y: table.column(pick).collect(),
            line_width: self.style.line_width,
            color: color.to_owned(),
        }
    }

    fn band(&self, table: &TimeSeriesTable) -> BandSeries {
        let x = table.dates().chain(table.dates().rev()).collect();
        let y = table
            .column(|row| row.high)
            .chain(table.column(|row| row.low).rev())
            .collect();

        BandSeries {
            label: RANGE_LABEL.to_owned(),
            x,
            y,
            fill_alpha: self.style.band_alpha,
            color: self.style.range_color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TimeSeriesTable {
        [
            ("2020-01-20", 106.0, 110.0, 104.0, 109.0),
            ("2020-01-13", 102.0, 108.0, 101.0, 106.0),
            ("2020-01-06", 100.0, 105.0, 98.0, 102.0),
        ]
        .into_iter()
        .map(|(date, open, high, low, close)| PriceRow {
            date: SessionDate::parse(date).expect("date"),
            open,
            high,
            low,
            close,
        })
        .collect()
    }

    #[test]
    fn empty_selection_yields_no_series() {
        let series = SeriesDeriver::default().derive(&table(), &FeatureSet::empty());
        assert!(series.is_empty());
    }

    #[test]
    fn close_line_is_distinct_from_open_line() {
        let series = SeriesDeriver::default().derive(&table(), &FeatureSet::all());

        let open = series[0].as_line().expect("open line");
        let close = series[1].as_line().expect("close line");
        assert_eq!(open.label, OPEN_LABEL);
        assert_eq!(close.label, CLOSE_LABEL);
        assert_ne!(open.color, close.color);
        assert_eq!(close.y, vec![109.0, 106.0, 102.0]);
    }

    #[test]
    fn band_closes_polygon_over_reversed_lows() {
        let features: FeatureSet = [Feature::Range].into_iter().collect();
        let series = SeriesDeriver::default().derive(&table(), &features);

        let band = series[0].as_band().expect("band");
        assert_eq!(band.y, vec![110.0, 108.0, 105.0, 98.0, 101.0, 104.0]);
        let dates: Vec<String> = band.x.iter().map(ToString::to_string).collect();
        assert_eq!(
            dates,
            vec![
                "2020-01-20", "2020-01-13", "2020-01-06", "2020-01-06", "2020-01-13",
                "2020-01-20"
            ]
        );
        assert_eq!(band.fill_alpha, 0.3);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let features: FeatureSet = [Feature::Open].into_iter().collect();
        let series = SeriesDeriver::default().derive(&table(), &features);
        let value = serde_json::to_value(&series[0]).expect("serializes");
        assert_eq!(value["kind"], "line");
        assert_eq!(value["x"][0], "2020-01-20");
    }
}
