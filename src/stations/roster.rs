//! Retrieval and parsing of the station roster (`sn_meta.txt`).

use crate::stations::error::RosterError;
use crate::types::station::StationDescriptor;
use futures_util::TryStreamExt;
use log::{debug, info};
use polars::prelude::*;
use reqwest::Client;
use std::io::{self, Cursor};
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

/// Roster column holding the station code.
pub const ID_COLUMN: &str = "id";

/// Downloads and parses the roster at `url`.
pub async fn fetch_roster(
    client: &Client,
    url: &str,
    install_column: &str,
) -> Result<Vec<StationDescriptor>, RosterError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| RosterError::NetworkRequest(url.to_string(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(RosterError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    let stream = response
        .bytes_stream()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
    let mut reader = StreamReader::new(stream);
    let mut body = Vec::new();
    reader
        .read_to_end(&mut body)
        .await
        .map_err(|e| RosterError::DownloadIo(url.to_string(), e))?;
    debug!("Downloaded roster ({} bytes) from {}", body.len(), url);

    let stations = parse_roster(body, install_column)?;
    info!("Roster lists {} stations", stations.len());
    Ok(stations)
}

/// Parses a roster CSV document.
///
/// Only the `id` column and `install_column` are read. Rows without an id are
/// dropped; install cells that are empty or not numeric count as `0`, which
/// excludes the station from the run.
pub fn parse_roster(
    body: Vec<u8>,
    install_column: &str,
) -> Result<Vec<StationDescriptor>, RosterError> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(RosterError::CsvRead)?;

    for required in [ID_COLUMN, install_column] {
        if df.column(required).is_err() {
            return Err(RosterError::MissingColumn(required.to_string()));
        }
    }

    let roster = df
        .lazy()
        .select([
            col(ID_COLUMN),
            col(install_column)
                .cast(DataType::Float64)
                .cast(DataType::Int64)
                .fill_null(lit(0i64))
                .alias("install"),
        ])
        .filter(col(ID_COLUMN).is_not_null())
        .collect()?;

    let ids = roster.column(ID_COLUMN)?.str()?;
    let installs = roster.column("install")?.i64()?;

    Ok(ids
        .into_iter()
        .zip(installs)
        .filter_map(|(id, install)| {
            let id = id?.trim();
            (!id.is_empty()).then(|| StationDescriptor::new(id, install.unwrap_or(0)))
        })
        .collect())
}
