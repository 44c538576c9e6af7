//! Behavior-driven tests for the end-to-end chart pipeline.
//!
//! These tests drive `ChartPipeline::run` against a canned transport and
//! check what a user of the chart form would see.

use serde_json::json;
use tickchart_core::series::{CLOSE_LABEL, OPEN_LABEL, RANGE_LABEL};
use tickchart_tests::*;

fn dataset(rows: serde_json::Value) -> String {
    json!({
        "dataset": {
            "name": "Apple Inc (AAPL) Prices, Dividends, Splits and Trading Volume",
            "column_names": ["Date", "Open", "High", "Low", "Close", "Volume"],
            "data": rows,
        }
    })
    .to_string()
}

fn pipeline_over(body: String) -> (ChartPipeline, Arc<StaticHttpClient>) {
    canned_pipeline(StaticHttpClient::json(body))
}

// =============================================================================
// Pipeline: Successful Charts
// =============================================================================

#[tokio::test]
async fn when_open_and_close_are_selected_two_lines_are_charted_with_source_bounds() {
    // Given: A two-week table as the source returns it
    let (pipeline, _) = pipeline_over(dataset(json!([
        ["2020-01-06", 100.0, 105.0, 98.0, 102.0, 10.0],
        ["2020-01-13", 102.0, 108.0, 101.0, 106.0, 12.0],
    ])));

    // When: The user asks for opening and closing prices
    let outcome = pipeline
        .run(&ChartForm::new("aapl", "", ["Open", "Close"]))
        .await
        .expect("chart should build");

    // Then: Two lines in Open, Close order with the source's values
    let series = &outcome.chart.series;
    assert_eq!(series.len(), 2);

    let open = series[0].as_line().expect("open is a line");
    assert_eq!(open.label, OPEN_LABEL);
    assert_eq!(open.y, vec![100.0, 102.0]);

    let close = series[1].as_line().expect("close is a line");
    assert_eq!(close.label, CLOSE_LABEL);
    assert_eq!(close.y, vec![102.0, 106.0]);

    // And: The x-axis spans (last row date, first row date)
    let bounds = outcome.chart.x_axis.bounds.expect("bounds are set");
    assert_eq!(bounds.start.to_string(), "2020-01-13");
    assert_eq!(bounds.end.to_string(), "2020-01-06");
}

#[tokio::test]
async fn when_form_succeeds_payload_carries_display_facts() {
    // Given: A dataset with a multi-part display name
    let (pipeline, client) = pipeline_over(dataset(json!([
        ["2017-01-02", 116.0, 118.0, 115.0, 117.0, 10.0],
    ])));

    // When: The user submits a padded lower-case ticker and a start year
    let outcome = pipeline
        .run(&ChartForm::new("  aapl ", " 2017 ", ["Range"]))
        .await
        .expect("chart should build");
    let payload = outcome.payload();

    // Then: The payload shows the canonical ticker, short name and year note
    assert_eq!(payload.ticker, "AAPL");
    assert_eq!(payload.description, "Apple Inc (AAPL) Prices");
    assert_eq!(payload.year_diagnostic, "Start year specified as 2017");
    assert_eq!(payload.chart.title, "AAPL");
    assert_eq!(payload.chart.series[0].label(), RANGE_LABEL);

    // And: The request asked for weekly data from the start of that year
    let url = &client.requests()[0].url;
    assert!(url.ends_with("AAPL.json?collapse=weekly&start_date=2017-01-01"), "{url}");
}

#[tokio::test]
async fn when_no_features_are_selected_chart_has_axes_only() {
    // Given: A valid dataset
    let (pipeline, _) = pipeline_over(dataset(json!([
        ["2020-01-06", 100.0, 105.0, 98.0, 102.0, 10.0],
    ])));

    // When: The user submits no feature checkboxes
    let outcome = pipeline
        .run(&ChartForm::new("aapl", "", Vec::<String>::new()))
        .await
        .expect("empty selection is valid");

    // Then: The chart has no series but still has a title and bounds
    assert!(outcome.chart.series.is_empty());
    assert_eq!(outcome.chart.title, "AAPL");
    assert!(outcome.chart.x_axis.bounds.is_some());
}

// =============================================================================
// Pipeline: Start Year Reconciliation
// =============================================================================

#[tokio::test]
async fn when_history_starts_after_requested_year_chart_still_renders_with_note() {
    // Given: The source only has history from 2022
    let (pipeline, _) = pipeline_over(dataset(json!([
        ["2022-03-15", 10.0, 12.0, 9.0, 11.0, 1.0],
        ["2022-03-08", 10.0, 12.0, 9.0, 11.0, 1.0],
        ["2022-03-01", 10.0, 12.0, 9.0, 11.0, 1.0],
    ])));

    // When: The user asks for history from 2021
    let outcome = pipeline
        .run(&ChartForm::new("snap", "2021", ["Close"]))
        .await
        .expect("later history degrades gracefully");

    // Then: The note names both years and the full history is charted
    let note = &outcome.meta.year_diagnostic;
    assert!(note.contains("2021"), "{note}");
    assert!(note.contains("2022"), "{note}");
    assert_eq!(
        note,
        "Start year specified as 2021, but Quandl record begins in 2022"
    );
    assert_eq!(outcome.table.len(), 3);
}

#[tokio::test]
async fn when_unrecognized_year_is_submitted_full_history_is_requested() {
    // Given: A valid dataset
    let (pipeline, client) = pipeline_over(dataset(json!([
        ["2020-01-06", 100.0, 105.0, 98.0, 102.0, 10.0],
    ])));

    // When: The year field holds text
    let outcome = pipeline
        .run(&ChartForm::new("aapl", "last year", ["Open"]))
        .await
        .expect("chart should build");

    // Then: No start date is sent and the note says so
    assert_eq!(outcome.query.start_year, None);
    assert_eq!(
        outcome.meta.year_diagnostic,
        "Start year not specified/recognized"
    );
    assert!(!client.requests()[0].url.contains("start_date"));
}

// =============================================================================
// Pipeline: Concurrency
// =============================================================================

#[tokio::test]
async fn when_requests_run_concurrently_results_do_not_interfere() {
    // Given: One shared pipeline
    let (pipeline, _) = pipeline_over(dataset(json!([
        ["2020-01-06", 100.0, 105.0, 98.0, 102.0, 10.0],
    ])));
    let pipeline = Arc::new(pipeline);

    // When: Two different forms run at the same time
    let first = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move { pipeline.run(&ChartForm::new("aapl", "2019", ["Open"])).await })
    };
    let second = {
        let pipeline = Arc::clone(&pipeline);
        tokio::spawn(async move { pipeline.run(&ChartForm::new("msft", "", ["Range"])).await })
    };

    let first = first.await.expect("task").expect("chart");
    let second = second.await.expect("task").expect("chart");

    // Then: Each outcome reflects only its own form
    assert_eq!(first.chart.title, "AAPL");
    assert_eq!(first.query.start_year, Some(2019));
    assert_eq!(first.chart.series[0].label(), OPEN_LABEL);

    assert_eq!(second.chart.title, "MSFT");
    assert_eq!(second.query.start_year, None);
    assert_eq!(second.chart.series[0].label(), RANGE_LABEL);
}

#[tokio::test]
async fn when_source_returns_not_found_pipeline_reports_fetch_failure() {
    // Given: The source does not know the ticker
    let client = Arc::new(StaticHttpClient::always(Ok(HttpResponse::with_status(
        404,
        r#"{"quandl_error":{"code":"QECx02","message":"You have submitted an incorrect Quandl code."}}"#,
    ))));
    let pipeline = ChartPipeline::new(DatasetSource::new(client, SourceConfig::default()));

    // When: The user charts it
    let failure = pipeline
        .run(&ChartForm::new("nope", "2015", ["Open"]))
        .await
        .expect_err("unknown ticker fails");

    // Then: The failure keeps the form context for the error page
    let payload = failure.payload();
    assert_eq!(payload.ticker, "NOPE");
    assert_eq!(payload.year, "2015");
    assert_eq!(payload.code, "source.fetch_failed");
    assert!(payload.message.contains("incorrect Quandl code"), "{}", payload.message);
}
