use serde_json::{json, Value};
use tickchart_core::{
    normalize, ChartForm, ChartPipeline, Envelope, EnvelopeError, EnvelopeMeta, RetryConfig,
    SourceConfig, SourceRequestBuilder,
};
use tickchart_render::render_svg;
use tracing::info;

use crate::cli::{ChartArgs, Cli, Command, QueryArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn into_envelope(self) -> Result<Envelope<Value>, CliError> {
        let mut meta = EnvelopeMeta::generate(self.latency_ms);
        for warning in self.warnings {
            meta.push_warning(warning);
        }

        Ok(Envelope::with_errors(meta, self.data, self.errors)?)
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let config = source_config(cli);

    let result = match &cli.command {
        Command::Chart(args) => chart(args, &ChartPipeline::from_config(config)).await?,
        Command::Request(args) => request(args, &config)?,
    };

    result.into_envelope()
}

/// Environment first, then explicit flags.
pub fn source_config(cli: &Cli) -> SourceConfig {
    let mut config = SourceConfig::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }
    if cli.retries > 0 {
        config = config.with_retry(RetryConfig::exponential(cli.retries));
    }
    config
}

pub async fn chart(args: &ChartArgs, pipeline: &ChartPipeline) -> Result<CommandResult, CliError> {
    let form = ChartForm {
        ticker: args.query.ticker.clone(),
        year: args.query.year.clone(),
        features: args.query.features.clone(),
    };

    let outcome = match pipeline.run(&form).await {
        Ok(outcome) => outcome,
        Err(failure) => {
            let error = EnvelopeError::new(failure.error.code(), failure.error.to_string())?
                .with_retryable(failure.error.retryable());
            return Ok(CommandResult::ok(serde_json::to_value(failure.payload())?)
                .with_errors(vec![error]));
        }
    };

    let mut result =
        CommandResult::ok(serde_json::to_value(outcome.payload())?).with_latency(outcome.latency_ms);
    if outcome.chart.series.is_empty() {
        result = result.with_warning("no features selected; chart shows axes only");
    }

    if let Some(path) = &args.svg {
        let svg = render_svg(&outcome.chart)?;
        output::write_svg(path, &svg)?;
        info!(path = %path.display(), bytes = svg.len(), "wrote chart svg");
    }

    Ok(result)
}

pub fn request(args: &QueryArgs, config: &SourceConfig) -> Result<CommandResult, CliError> {
    let query = normalize(&args.ticker, &args.year, &args.features)?;
    let spec = SourceRequestBuilder::new(config.base_url.as_str()).build(&query);

    Ok(CommandResult::ok(json!({
        "url": spec.url(),
        "request": spec,
        "query": query,
    })))
}
