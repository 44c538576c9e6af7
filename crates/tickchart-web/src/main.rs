use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tickchart_core::{ChartPipeline, RetryConfig, SourceConfig};
use tickchart_web::{serve, AppState};
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "tickchart_core=info,tickchart_web=info,tower_http=warn";

/// Serve the ticker form and chart pages.
#[derive(Debug, Parser)]
#[command(name = "tickchart-web", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "TICKCHART_BIND", default_value = "127.0.0.1:33507")]
    bind: SocketAddr,

    /// Dataset base path; the ticker and `.json` are appended.
    #[arg(long, env = "TICKCHART_BASE_URL")]
    base_url: Option<String>,

    /// Per-request timeout in milliseconds.
    #[arg(long, env = "TICKCHART_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Retries on timeouts, connection errors, 408, 429 and 5xx.
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

impl Args {
    fn source_config(&self) -> SourceConfig {
        let mut config = SourceConfig::from_env();
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout_ms(timeout_ms);
        }
        if self.retries > 0 {
            config = config.with_retry(RetryConfig::exponential(self.retries));
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();
    let pipeline = ChartPipeline::from_config(args.source_config());

    match serve(args.bind, AppState::new(Arc::new(pipeline))).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "tickchart-web stopped");
            ExitCode::FAILURE
        }
    }
}
