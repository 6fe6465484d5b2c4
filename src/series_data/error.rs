use crate::types::schema::SeriesSchema;
use crate::types::station_result::NO_VALID_START_REASON;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a failed or skipped station pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Non-success status or transport failure.
    Network,
    /// Malformed body.
    Parse,
    /// No reading at or after the install date.
    NoValidStart,
    /// The cleaned series could not be persisted.
    Write,
}

/// The series has no reading at or after the station's install date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", NO_VALID_START_REASON)]
pub struct NoValidStart;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed CSV body: {0}")]
    Csv(#[source] PolarsError),

    #[error("expected {expected} columns for the {schema} schema, found {found}")]
    SchemaMismatch {
        schema: SeriesSchema,
        expected: usize,
        found: usize,
    },

    #[error("column conversion failed: {0}")]
    Column(#[from] PolarsError),

    #[error("timestamp {0} cannot be represented as a calendar date")]
    TimestampOutOfRange(i64),
}

#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("request to {0} failed: {1}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("server returned non-success status {}", .status.as_u16())]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed reading response body from {url}: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    NoValidStart(#[from] NoValidStart),

    #[error("I/O error writing station file '{0}': {1}")]
    WriteIo(PathBuf, #[source] std::io::Error),

    #[error("encoding error writing station file '{0}': {1}")]
    WriteCsv(PathBuf, #[source] PolarsError),

    #[error("background write task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl SeriesError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SeriesError::NetworkRequest(..)
            | SeriesError::HttpStatus { .. }
            | SeriesError::BodyRead { .. } => FailureKind::Network,
            SeriesError::Parse(_) => FailureKind::Parse,
            SeriesError::NoValidStart(_) => FailureKind::NoValidStart,
            SeriesError::WriteIo(..) | SeriesError::WriteCsv(..) | SeriesError::TaskJoin(_) => {
                FailureKind::Write
            }
        }
    }
}
