//! HTML pages for the form, chart and error views.
//!
//! Every piece of user-supplied or source-supplied text goes through
//! [`escape`]. The chart SVG is embedded as an `<img>` data URI, so markup
//! inside it is never parsed as part of the page.

use std::fmt::Write as _;

use tickchart_core::{ChartForm, ErrorPayload, Feature, RenderPayload};

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n</head>\n<body>\n{body}</body>\n</html>\n",
        escape(title)
    )
}

/// Ticker/year form with one checkbox per feature.
pub fn index_page(message: Option<&str>, form: &ChartForm) -> String {
    let mut body = String::from("<h1>Stock Ticker Chart</h1>\n");
    if let Some(message) = message {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", escape(message));
    }

    body.push_str("<form id=\"input\" method=\"post\" action=\"/index\">\n");
    let _ = writeln!(
        body,
        "<p>Ticker symbol: <input type=\"text\" name=\"ticker\" value=\"{}\"></p>",
        escape(&form.ticker)
    );
    let _ = writeln!(
        body,
        "<p>Start year (optional): <input type=\"text\" name=\"year\" value=\"{}\"></p>",
        escape(&form.year)
    );

    for feature in Feature::ALL {
        let checked = form
            .features
            .iter()
            .any(|selected| selected.trim().eq_ignore_ascii_case(feature.as_str()));
        let _ = writeln!(
            body,
            "<label><input type=\"checkbox\" name=\"features\" value=\"{0}\"{1}> {0}</label>",
            feature.as_str(),
            if checked { " checked" } else { "" }
        );
    }

    body.push_str("<p><input type=\"submit\" value=\"Submit\"></p>\n</form>\n");
    layout("Stock Ticker Chart", &body)
}

/// Chart view: ticker, dataset description, start-year note and the chart.
pub fn graph_page(payload: &RenderPayload, svg: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&payload.ticker));
    let _ = writeln!(body, "<h2>{}</h2>", escape(&payload.description));
    let _ = writeln!(body, "<p>{}</p>", escape(&payload.year_diagnostic));
    let _ = writeln!(
        body,
        "<img alt=\"{} weekly prices\" src=\"data:image/svg+xml;charset=utf-8,{}\">",
        escape(&payload.ticker),
        urlencoding::encode(svg)
    );
    body.push_str("<p><a href=\"/index\">New chart</a></p>\n");
    layout(&payload.ticker, &body)
}

/// Failure view with the submitted ticker and year.
pub fn error_page(payload: &ErrorPayload) -> String {
    let year = if payload.year.is_empty() {
        String::from("all available years")
    } else {
        format!("start year {}", payload.year)
    };

    let mut body = String::from("<h1>Something went wrong</h1>\n");
    let _ = writeln!(
        body,
        "<p>Could not build a chart for ticker <strong>{}</strong> ({}).</p>",
        escape(&payload.ticker),
        escape(&year)
    );
    let _ = writeln!(body, "<p class=\"detail\">{}</p>", escape(&payload.message));
    body.push_str("<p><a href=\"/index\">Try again</a></p>\n");
    layout("Error", &body)
}
