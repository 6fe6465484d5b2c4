//! Row-wise cleaning of a trimmed station series.
//!
//! Out-of-range channel values become the missing marker (`None`) and the raw
//! epoch timestamp becomes a UTC calendar date-time. Rows are never dropped.

use crate::series_data::error::ParseError;
use crate::types::reading::{CleanedReading, RawReading};
use crate::types::schema::SeriesSchema;
use chrono::{DateTime, NaiveDateTime};

/// Converts epoch seconds to a UTC date-time.
///
/// Returns `None` for negative epochs and for values chrono cannot
/// represent; callers treat that as a malformed body.
pub fn epoch_to_datetime(seconds: i64) -> Option<NaiveDateTime> {
    if seconds < 0 {
        return None;
    }
    DateTime::from_timestamp(seconds, 0).map(|dt| dt.naive_utc())
}

/// Cleans one reading against the channel ranges of `schema`.
pub fn clean_reading(raw: RawReading, schema: SeriesSchema) -> Result<CleanedReading, ParseError> {
    let time = epoch_to_datetime(raw.timestamp)
        .ok_or(ParseError::TimestampOutOfRange(raw.timestamp))?;

    let channels = raw
        .channels
        .into_iter()
        .zip(schema.channels())
        .map(|(value, channel)| match channel.range {
            Some(range) => value.and_then(|v| range.clean(v)),
            None => value,
        })
        .collect();

    Ok(CleanedReading { time, channels })
}

/// Cleans every reading, preserving count and order.
pub fn clean_series(
    readings: Vec<RawReading>,
    schema: SeriesSchema,
) -> Result<Vec<CleanedReading>, ParseError> {
    readings
        .into_iter()
        .map(|raw| clean_reading(raw, schema))
        .collect()
}
