use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed reading roster body from {0}")]
    DownloadIo(String, #[source] std::io::Error),

    #[error("Failed to parse roster document")]
    CsvRead(#[source] PolarsError),

    #[error("Roster is missing required column '{0}'")]
    MissingColumn(String),

    #[error("Failed processing roster columns")]
    ColumnOperation(#[from] PolarsError),
}
