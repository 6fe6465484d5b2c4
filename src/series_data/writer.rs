use crate::series_data::error::SeriesError;
use crate::types::reading::CleanedReading;
use crate::types::schema::{SeriesSchema, TIME_COLUMN};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::task;

/// How the missing marker is spelled in station files.
pub const MISSING_MARKER: &str = "NaN";

/// Builds the output frame: `time` followed by the schema's channels.
pub fn readings_to_dataframe(
    readings: &[CleanedReading],
    schema: SeriesSchema,
) -> PolarsResult<DataFrame> {
    let times: Vec<String> = readings.iter().map(CleanedReading::formatted_time).collect();
    let mut columns = vec![Column::new(TIME_COLUMN.into(), times)];

    for (idx, channel) in schema.channels().iter().enumerate() {
        let values: Vec<Option<f64>> = readings
            .iter()
            .map(|r| r.channels.get(idx).copied().flatten())
            .collect();
        columns.push(Column::new(channel.name.into(), values));
    }

    DataFrame::new(columns)
}

/// Writes the cleaned series to `path`, replacing any existing file.
///
/// The frame is written to a temporary file next to `path` and renamed over
/// it, so a failed write never leaves a truncated station file behind.
pub async fn write_station_file(
    readings: Vec<CleanedReading>,
    schema: SeriesSchema,
    path: &Path,
) -> Result<usize, SeriesError> {
    let path_buf = path.to_path_buf();
    task::spawn_blocking(move || write_blocking(&readings, schema, path_buf)).await?
}

fn write_blocking(
    readings: &[CleanedReading],
    schema: SeriesSchema,
    path: PathBuf,
) -> Result<usize, SeriesError> {
    let mut df =
        readings_to_dataframe(readings, schema).map_err(|e| SeriesError::WriteCsv(path.clone(), e))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| SeriesError::WriteIo(path.clone(), e))?;

    CsvWriter::new(temp_file.as_file_mut())
        .include_header(true)
        .with_null_value(MISSING_MARKER.to_string())
        .finish(&mut df)
        .map_err(|e| SeriesError::WriteCsv(path.clone(), e))?;

    temp_file
        .persist(&path)
        .map_err(|e| SeriesError::WriteIo(path.clone(), e.error))?;

    Ok(df.height())
}
