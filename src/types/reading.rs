use chrono::NaiveDateTime;

/// Format of the `time` column in cleaned output files.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One parsed row of a station's series, as it came off the wire.
///
/// `channels` follows the order of [`crate::SeriesSchema::channels`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    /// Epoch seconds (fractional parts already truncated).
    pub timestamp: i64,
    pub channels: Vec<Option<f64>>,
}

/// A [`RawReading`] after timestamp conversion and range cleaning.
///
/// A `None` channel is the missing marker: either the value was absent on
/// the wire or it fell outside the channel's valid range.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedReading {
    /// UTC, whole-second precision.
    pub time: NaiveDateTime,
    pub channels: Vec<Option<f64>>,
}

impl CleanedReading {
    pub fn formatted_time(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}
