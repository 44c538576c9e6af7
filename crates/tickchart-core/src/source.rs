//! Dataset fetch stage.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::http_client::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient};
use crate::request::RemoteRequestSpec;
use crate::ChartError;

/// Executes [`RemoteRequestSpec`]s against the configured transport.
#[derive(Clone)]
pub struct DatasetSource {
    http_client: Arc<dyn HttpClient>,
    config: SourceConfig,
}

impl DatasetSource {
    pub fn new(http_client: Arc<dyn HttpClient>, config: SourceConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Reqwest-backed source.
    pub fn live(config: SourceConfig) -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Fetch the raw dataset payload. One suspension point per attempt;
    /// each attempt is bounded by the configured timeout.
    pub async fn fetch(&self, spec: &RemoteRequestSpec) -> Result<Value, ChartError> {
        let url = spec.url();
        debug!(%url, "requesting dataset");

        let retry = &self.config.retry;
        let max_attempts = retry.max_attempts();
        let mut attempt = 0;

        let response = loop {
            let outcome = self.http_client.execute(self.http_request(&url)).await;
            let retry_reason = match &outcome {
                Err(error) if retry.should_retry_error(error) => Some(error.to_string()),
                Ok(response) if retry.should_retry_status(response.status) => {
                    Some(format!("status {}", response.status))
                }
                _ => None,
            };

            attempt += 1;
            match retry_reason {
                Some(reason) if attempt < max_attempts => {
                    let delay = retry.delay_for_attempt(attempt - 1);
                    warn!(
                        ticker = %spec.ticker,
                        attempt,
                        max_attempts,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        %reason,
                        "retrying dataset fetch"
                    );
                    tokio::time::sleep(delay).await;
                }
                _ => break outcome,
            }
        };

        let response = response.map_err(|error| {
            warn!(ticker = %spec.ticker, %error, "dataset transport failed");
            ChartError::transport(
                format!("transport error for {}: {}", spec.ticker, error.message()),
                error.retryable(),
            )
        })?;

        if !response.is_success() {
            return Err(upstream_failure(spec, &response));
        }

        serde_json::from_str(&response.body)
            .map_err(|error| ChartError::malformed(format!("response is not JSON: {error}")))
    }

    fn http_request(&self, url: &str) -> HttpRequest {
        let url = match &self.config.api_key {
            Some(api_key) => format!("{url}&api_key={}", urlencoding::encode(api_key)),
            None => url.to_owned(),
        };

        HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorBody {
    quandl_error: Option<UpstreamErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct UpstreamErrorDetail {
    code: Option<String>,
    message: Option<String>,
}

fn upstream_failure(spec: &RemoteRequestSpec, response: &HttpResponse) -> ChartError {
    let detail = serde_json::from_str::<UpstreamErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.quandl_error)
        .and_then(|detail| match (detail.code, detail.message) {
            (Some(code), Some(message)) => Some(format!("{message} ({code})")),
            (None, Some(message)) => Some(message),
            (Some(code), None) => Some(code),
            (None, None) => None,
        });

    warn!(
        ticker = %spec.ticker,
        status = response.status,
        "dataset source returned non-success status"
    );

    let message = match detail {
        Some(detail) => format!(
            "source returned status {} for {}: {detail}",
            response.status, spec.ticker
        ),
        None => format!("source returned status {} for {}", response.status, spec.ticker),
    };
    let retryable = response.status == 429 || response.status >= 500;
    ChartError::upstream_status(response.status, message, retryable)
}
