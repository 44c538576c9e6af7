//! Chart spec assembly.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::DEFAULT_SOURCE_LABEL;
use crate::series::DerivedSeries;
use crate::{ResultMeta, SessionDate, TimeSeriesTable, UserQuery};

/// Corner the legend is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Fixed presentation constants for every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub x_label: String,
    pub y_label: String,
    pub axis_label_font_pt: u32,
    pub x_tick_font_pt: u32,
    pub y_tick_font_pt: u32,
    pub x_tick_rotation_deg: f64,
    pub line_width: f64,
    pub band_alpha: f64,
    pub open_color: String,
    pub close_color: String,
    pub range_color: String,
    pub legend_position: LegendPosition,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 450,
            height: 450,
            x_label: String::from("Date"),
            y_label: String::from("Price ($)"),
            axis_label_font_pt: 16,
            x_tick_font_pt: 14,
            y_tick_font_pt: 12,
            x_tick_rotation_deg: 45.0,
            line_width: 2.0,
            band_alpha: 0.3,
            open_color: String::from("#1F77B4"),
            close_color: String::from("#FB8072"),
            range_color: String::from("#808080"),
            legend_position: LegendPosition::TopLeft,
        }
    }
}

/// Date span of the x axis as `(start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub start: SessionDate,
    pub end: SessionDate,
}

impl AxisBounds {
    /// Bounds ordered earliest to latest.
    pub fn ordered(self) -> (SessionDate, SessionDate) {
        if self.start <= self.end {
            (self.start, self.end)
        } else {
            (self.end, self.start)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub label: String,
    pub label_bold: bool,
    pub label_font_pt: u32,
    pub tick_font_pt: u32,
    pub tick_rotation_deg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<AxisBounds>,
}

/// Renderer-neutral chart description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub series: Vec<DerivedSeries>,
    pub legend_position: LegendPosition,
}

/// Assembles [`ChartSpec`]s and reconciles the start-year note with the
/// history the source actually returned.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpecBuilder {
    style: ChartStyle,
    source_label: String,
}

impl Default for ChartSpecBuilder {
    fn default() -> Self {
        Self::new(ChartStyle::default(), DEFAULT_SOURCE_LABEL)
    }
}

impl ChartSpecBuilder {
    pub fn new(style: ChartStyle, source_label: impl Into<String>) -> Self {
        Self {
            style,
            source_label: source_label.into(),
        }
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn build(
        &self,
        table: &TimeSeriesTable,
        series: Vec<DerivedSeries>,
        query: &UserQuery,
        mut meta: ResultMeta,
    ) -> (ChartSpec, ResultMeta) {
        // Bounds follow source order: (last row, first row).
        let bounds = match (table.last(), table.first()) {
            (Some(last), Some(first)) => Some(AxisBounds {
                start: last.date,
                end: first.date,
            }),
            _ => None,
        };

        if let (Some(requested), Some(earliest)) = (query.start_year, table.earliest_date()) {
            if earliest.year() > requested {
                warn!(
                    ticker = %query.ticker,
                    requested,
                    available = earliest.year(),
                    "source history starts after requested year"
                );
                meta.year_diagnostic = format!(
                    "{}, but {} record begins in {}",
                    meta.year_diagnostic,
                    self.source_label,
                    earliest.year()
                );
            }
        }

        let style = &self.style;
        let spec = ChartSpec {
            title: query.ticker.to_string(),
            width: style.width,
            height: style.height,
            x_axis: AxisSpec {
                label: style.x_label.clone(),
                label_bold: true,
                label_font_pt: style.axis_label_font_pt,
                tick_font_pt: style.x_tick_font_pt,
                tick_rotation_deg: style.x_tick_rotation_deg,
                bounds,
            },
            y_axis: AxisSpec {
                label: style.y_label.clone(),
                label_bold: true,
                label_font_pt: style.axis_label_font_pt,
                tick_font_pt: style.y_tick_font_pt,
                tick_rotation_deg: 0.0,
                bounds: None,
            },
            series,
            legend_position: style.legend_position,
        };

        (spec, meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::PriceRow;

    fn table(dates: &[&str]) -> TimeSeriesTable {
        dates
            .iter()
            .map(|date| PriceRow {
                date: SessionDate::parse(date).expect("date"),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: 1.5,
            })
            .collect()
    }

    #[test]
    fn title_is_ticker_and_bounds_follow_source_order() {
        let query = normalize("aapl", "", ["Open"]).expect("valid");
        let meta = ResultMeta::new("Apple Inc", &query);
        let table = table(&["2020-01-13", "2020-01-06"]);

        let (spec, meta) = ChartSpecBuilder::default().build(&table, Vec::new(), &query, meta);

        assert_eq!(spec.title, "AAPL");
        let bounds = spec.x_axis.bounds.expect("bounds");
        assert_eq!(bounds.start.to_string(), "2020-01-06");
        assert_eq!(bounds.end.to_string(), "2020-01-13");
        assert_eq!(spec.legend_position, LegendPosition::TopLeft);
        assert!(spec.x_axis.label_bold && spec.y_axis.label_bold);
        assert_eq!(meta.year_diagnostic, "Start year not specified/recognized");
    }

    #[test]
    fn appends_note_when_history_starts_later() {
        let query = normalize("snap", "2015", Vec::<String>::new()).expect("valid");
        let meta = ResultMeta::new("Snap Inc", &query);
        let table = table(&["2018-03-19", "2017-03-06"]);

        let (_, meta) = ChartSpecBuilder::default().build(&table, Vec::new(), &query, meta);

        assert_eq!(
            meta.year_diagnostic,
            "Start year specified as 2015, but Quandl record begins in 2017"
        );
    }

    #[test]
    fn keeps_note_when_history_covers_request() {
        let query = normalize("ibm", "2017", Vec::<String>::new()).expect("valid");
        let meta = ResultMeta::new("IBM", &query);
        let table = table(&["2017-12-25", "2017-01-02"]);

        let (_, meta) = ChartSpecBuilder::default().build(&table, Vec::new(), &query, meta);

        assert_eq!(meta.year_diagnostic, "Start year specified as 2017");
    }
}
