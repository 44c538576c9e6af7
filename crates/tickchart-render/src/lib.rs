//! # Tickchart Render
//!
//! Draws a [`ChartSpec`] as an SVG document with plotters.
//!
//! Dates are plotted as Julian day numbers and formatted back to
//! `YYYY-MM-DD` tick labels. Plotters only rotates text in quarter turns,
//! so the x tick rotation carried by the `ChartSpec` is not applied here.

use std::ops::Range;

use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};
use thiserror::Error;
use tickchart_core::series::DerivedSeries;
use tickchart_core::{AxisSpec, ChartSpec, LegendPosition, SessionDate};
use tracing::debug;

const TITLE_FONT_PT: f64 = 20.0;
const LEGEND_SWATCH_PX: i32 = 20;

/// Errors produced while drawing a chart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("invalid color '{value}' for series '{series}', expected #RRGGBB")]
    InvalidColor { series: String, value: String },

    #[error("drawing failed: {0}")]
    Drawing(String),
}

/// Render `spec` to a standalone SVG document.
pub fn render_svg(spec: &ChartSpec) -> Result<String, RenderError> {
    let colors = spec
        .series
        .iter()
        .map(series_color)
        .collect::<Result<Vec<_>, _>>()?;
    let x_range = x_range(spec);
    let y_range = y_range(&spec.series);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (spec.width, spec.height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                spec.title.as_str(),
                FontDesc::new(FontFamily::SansSerif, TITLE_FONT_PT, FontStyle::Normal),
            )
            .margin(10)
            .x_label_area_size(70)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_axis.label.as_str())
            .y_desc(spec.y_axis.label.as_str())
            .axis_desc_style(axis_label_font(&spec.x_axis))
            .x_label_style(tick_font(&spec.x_axis))
            .y_label_style(tick_font(&spec.y_axis))
            .x_labels(5)
            .x_label_formatter(&format_julian_day)
            .draw()
            .map_err(draw_error)?;

        for (series, color) in spec.series.iter().zip(&colors) {
            match series {
                DerivedSeries::Line(line) => {
                    let style = color.stroke_width(stroke_px(line.line_width));
                    chart
                        .draw_series(LineSeries::new(points(&line.x, &line.y), style))
                        .map_err(draw_error)?
                        .label(line.label.as_str())
                        .legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + LEGEND_SWATCH_PX, y)], style)
                        });
                }
                DerivedSeries::Band(band) => {
                    let fill = color.mix(band.fill_alpha).filled();
                    chart
                        .draw_series(std::iter::once(Polygon::new(
                            points(&band.x, &band.y),
                            fill,
                        )))
                        .map_err(draw_error)?
                        .label(band.label.as_str())
                        .legend(move |(x, y)| {
                            Rectangle::new([(x, y - 5), (x + LEGEND_SWATCH_PX, y + 5)], fill)
                        });
                }
            }
        }

        if !spec.series.is_empty() {
            chart
                .configure_series_labels()
                .position(legend_position(spec.legend_position))
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
    }

    debug!(
        title = %spec.title,
        series = spec.series.len(),
        bytes = svg.len(),
        "rendered chart svg"
    );
    Ok(svg)
}

fn draw_error(error: impl std::fmt::Display) -> RenderError {
    RenderError::Drawing(error.to_string())
}

fn series_color(series: &DerivedSeries) -> Result<RGBColor, RenderError> {
    let value = match series {
        DerivedSeries::Line(line) => &line.color,
        DerivedSeries::Band(band) => &band.color,
    };
    parse_hex_color(value).ok_or_else(|| RenderError::InvalidColor {
        series: series.label().to_owned(),
        value: value.clone(),
    })
}

/// `#RRGGBB` to an RGB color.
pub fn parse_hex_color(value: &str) -> Option<RGBColor> {
    let hex = value
        .trim()
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.chars().all(|ch| ch.is_ascii_hexdigit()))?;
    let channel = |range: Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

    Some(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn points(x: &[SessionDate], y: &[f64]) -> Vec<(i32, f64)> {
    x.iter()
        .zip(y)
        .map(|(date, value)| (date.julian_day(), *value))
        .collect()
}

fn x_range(spec: &ChartSpec) -> Range<i32> {
    let (start, end) = match spec.x_axis.bounds {
        Some(bounds) => {
            let (start, end) = bounds.ordered();
            (start.julian_day(), end.julian_day())
        }
        None => {
            let days = spec.series.iter().flat_map(|series| match series {
                DerivedSeries::Line(line) => line.x.iter(),
                DerivedSeries::Band(band) => band.x.iter(),
            });
            let (min, max) = days.fold((i32::MAX, i32::MIN), |(min, max), date| {
                (min.min(date.julian_day()), max.max(date.julian_day()))
            });
            if min > max {
                (0, 1)
            } else {
                (min, max)
            }
        }
    };

    if start == end {
        start - 3..end + 3
    } else {
        start..end
    }
}

fn y_range(series: &[DerivedSeries]) -> Range<f64> {
    let (min, max) = series
        .iter()
        .flat_map(|series| series.y().iter().copied())
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        });

    if min > max {
        return 0.0..1.0;
    }

    let padding = match (max - min) * 0.05 {
        pad if pad > 0.0 => pad,
        _ => (max.abs() * 0.05).max(1.0),
    };
    (min - padding)..(max + padding)
}

fn format_julian_day(day: &i32) -> String {
    SessionDate::from_julian_day(*day)
        .map(SessionDate::format_iso)
        .unwrap_or_default()
}

fn axis_label_font(axis: &AxisSpec) -> FontDesc<'static> {
    let style = if axis.label_bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    FontDesc::new(FontFamily::SansSerif, f64::from(axis.label_font_pt), style)
}

fn tick_font(axis: &AxisSpec) -> FontDesc<'static> {
    FontDesc::new(
        FontFamily::SansSerif,
        f64::from(axis.tick_font_pt),
        FontStyle::Normal,
    )
}

fn stroke_px(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

fn legend_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::TopLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::TopRight => SeriesLabelPosition::UpperRight,
        LegendPosition::BottomLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::BottomRight => SeriesLabelPosition::LowerRight,
    }
}
