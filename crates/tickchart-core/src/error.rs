use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation and contract errors exposed by `tickchart-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,

    #[error("invalid feature '{value}', expected one of Open, Close, Range")]
    InvalidFeature { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Pipeline error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartErrorKind {
    InvalidInput,
    RemoteFetch,
    MalformedSourceData,
    DataCoercion,
}

/// One dataset cell that could not be coerced to its column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellFailure {
    pub row: usize,
    pub column: &'static str,
    pub value: String,
    pub reason: String,
}

impl Display for CellFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} column '{}' value {}: {}",
            self.row, self.column, self.value, self.reason
        )
    }
}

/// Fatal per-request pipeline error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChartError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("dataset fetch failed: {message}")]
    RemoteFetch {
        message: String,
        status: Option<u16>,
        retryable: bool,
    },

    #[error("malformed dataset: {message}")]
    MalformedSourceData { message: String },

    #[error("{} dataset cell(s) failed coercion; first: {}", .failures.len(), first_failure(.failures))]
    DataCoercion { failures: Vec<CellFailure> },
}

fn first_failure(failures: &[CellFailure]) -> String {
    failures
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| String::from("<none>"))
}

impl ChartError {
    pub fn transport(message: impl Into<String>, retryable: bool) -> Self {
        Self::RemoteFetch {
            message: message.into(),
            status: None,
            retryable,
        }
    }

    pub fn upstream_status(status: u16, message: impl Into<String>, retryable: bool) -> Self {
        Self::RemoteFetch {
            message: message.into(),
            status: Some(status),
            retryable,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedSourceData {
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ChartErrorKind {
        match self {
            Self::InvalidInput(_) => ChartErrorKind::InvalidInput,
            Self::RemoteFetch { .. } => ChartErrorKind::RemoteFetch,
            Self::MalformedSourceData { .. } => ChartErrorKind::MalformedSourceData,
            Self::DataCoercion { .. } => ChartErrorKind::DataCoercion,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "input.invalid",
            Self::RemoteFetch { .. } => "source.fetch_failed",
            Self::MalformedSourceData { .. } => "source.malformed",
            Self::DataCoercion { .. } => "source.coercion_failed",
        }
    }

    pub const fn retryable(&self) -> bool {
        match self {
            Self::RemoteFetch { retryable, .. } => *retryable,
            _ => false,
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteFetch { status, .. } => *status,
            _ => None,
        }
    }
}
