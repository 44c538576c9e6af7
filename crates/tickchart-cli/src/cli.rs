//! CLI argument definitions for tickchart.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `chart` | Fetch weekly prices and build a chart |
//! | `request` | Show the dataset request a chart would send |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--base-url` | Quandl WIKI | Dataset base path |
//! | `--timeout-ms` | `5000` | Per-request timeout in ms |
//! | `--retries` | `0` | Bounded retries for transient failures |
//!
//! # Examples
//!
//! ```bash
//! tickchart chart aapl --year 2016 --feature open --feature range --svg aapl.svg
//! tickchart request goog --year 2015
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Weekly stock price charts from a remote time-series dataset.
#[derive(Debug, Parser)]
#[command(name = "tickchart", author, version, about)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Dataset base path; the ticker and `.json` are appended.
    #[arg(long, global = true, env = "TICKCHART_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = "TICKCHART_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Retries on timeouts, connection errors, 408, 429 and 5xx.
    #[arg(long, global = true, default_value_t = 0)]
    pub retries: u32,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch weekly prices and build a chart.
    ///
    /// Prints the chart spec with the dataset description and start-year
    /// note; `--svg` also writes the rendered chart.
    Chart(ChartArgs),

    /// Show the dataset request a chart would send, without sending it.
    Request(QueryArgs),
}

#[derive(Debug, Clone, Args)]
pub struct QueryArgs {
    /// Ticker symbol, case-insensitive.
    pub ticker: String,

    /// First year of history; anything that is not an integer means all.
    #[arg(long, default_value = "")]
    pub year: String,

    /// Feature to plot: open, close or range. Repeatable.
    #[arg(long = "feature", short = 'f', value_name = "FEATURE")]
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ChartArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Write the rendered SVG chart to this path.
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,
}
