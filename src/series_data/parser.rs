use crate::series_data::error::ParseError;
use crate::types::reading::RawReading;
use crate::types::schema::{SeriesSchema, TIME_COLUMN};
use log::debug;
use polars::prelude::*;
use std::io::Cursor;

/// Parses a station body into raw readings.
///
/// The body must have one header row and exactly as many columns as the
/// schema; the header names themselves are ignored and replaced
/// positionally. Every cell is read as text and cast afterwards, so a bad
/// row never fails the whole body:
/// * rows with more fields than the header are dropped,
/// * rows whose timestamp is absent or not numeric are dropped,
/// * channel cells that are short, empty or not numeric become missing.
pub fn parse_series(
    body: Vec<u8>,
    station: &str,
    schema: SeriesSchema,
) -> Result<Vec<RawReading>, ParseError> {
    let schema_names = schema.wire_column_names();

    let (body, overwide) = drop_overwide_rows(&body);
    if overwide > 0 {
        debug!(
            "Dropped {} rows with extra fields for station {}",
            overwide, station
        );
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(body))
        .finish()
        .map_err(ParseError::Csv)?;

    if df.width() != schema_names.len() {
        return Err(ParseError::SchemaMismatch {
            schema,
            expected: schema_names.len(),
            found: df.width(),
        });
    }
    df.set_column_names(schema_names.iter().copied())?;

    let received = df.height();
    let typed = df
        .lazy()
        .select(typed_columns(schema))
        .filter(col(TIME_COLUMN).is_not_null())
        .collect()?;

    if typed.height() < received {
        debug!(
            "Dropped {} malformed rows for station {}",
            received - typed.height(),
            station
        );
    }

    extract_readings(&typed, schema)
}

/// Removes records with more fields than the header. Their columns are
/// shifted, so no cell of them can be trusted. Returns the remaining body and
/// the number of removed records.
fn drop_overwide_rows(body: &[u8]) -> (Vec<u8>, usize) {
    let mut lines = body.split_inclusive(|&b| b == b'\n');
    let Some(header) = lines.next() else {
        return (Vec::new(), 0);
    };
    let width = field_count(header);

    let mut kept = Vec::with_capacity(body.len());
    kept.extend_from_slice(header);
    let mut dropped = 0;
    for line in lines {
        if field_count(line) > width {
            dropped += 1;
        } else {
            kept.extend_from_slice(line);
        }
    }
    (kept, dropped)
}

fn field_count(line: &[u8]) -> usize {
    line.iter().filter(|&&b| b == b',').count() + 1
}

/// Casts the time column to whole epoch seconds and every channel to `f64`.
/// Casts are non-strict: unparseable cells become null.
fn typed_columns(schema: SeriesSchema) -> Vec<Expr> {
    std::iter::once(
        col(TIME_COLUMN)
            .cast(DataType::Float64)
            .cast(DataType::Int64),
    )
    .chain(
        schema
            .channels()
            .iter()
            .map(|c| col(c.name).cast(DataType::Float64)),
    )
    .collect()
}

fn extract_readings(df: &DataFrame, schema: SeriesSchema) -> Result<Vec<RawReading>, ParseError> {
    let time = df.column(TIME_COLUMN)?.i64()?;
    let channels = schema
        .channels()
        .iter()
        .map(|c| df.column(c.name).and_then(|column| column.f64()))
        .collect::<PolarsResult<Vec<_>>>()?;

    let readings = (0..df.height())
        .filter_map(|idx| {
            time.get(idx).map(|timestamp| RawReading {
                timestamp,
                channels: channels.iter().map(|ca| ca.get(idx)).collect(),
            })
        })
        .collect();
    Ok(readings)
}
