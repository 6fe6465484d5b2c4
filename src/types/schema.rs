//! Defines the column layouts a station series can arrive in and the valid
//! physical range used to clean each channel.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Name of the timestamp column, both on the wire (after renaming) and in
/// the cleaned output files.
pub const TIME_COLUMN: &str = "time";

/// Inclusive range of physically plausible values for a channel.
///
/// Values outside the range are replaced with the missing marker by the
/// cleaner; they are never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRange {
    pub low: f64,
    pub high: f64,
}

/// Raw soil-moisture counts reported by the `m0..m4` probes.
pub const MOISTURE_RANGE: ChannelRange = ChannelRange {
    low: 900.0,
    high: 2200.0,
};

impl ChannelRange {
    /// Returns `Some(value)` if `low <= value <= high`, `None` otherwise.
    /// `NaN` is never in range.
    pub fn clean(&self, value: f64) -> Option<f64> {
        (self.low <= value && value <= self.high).then_some(value)
    }
}

/// One measurement column of a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub name: &'static str,
    /// `None` for auxiliary channels that are passed through untouched.
    pub range: Option<ChannelRange>,
}

const fn ranged(name: &'static str) -> Channel {
    Channel {
        name,
        range: Some(MOISTURE_RANGE),
    }
}

const fn passthrough(name: &'static str) -> Channel {
    Channel { name, range: None }
}

const MOISTURE_CHANNELS: [Channel; 5] = [
    ranged("m0"),
    ranged("m1"),
    ranged("m2"),
    ranged("m3"),
    ranged("m4"),
];

const VOLTAGE_CHANNELS: [Channel; 8] = [
    ranged("m0"),
    ranged("m1"),
    ranged("m2"),
    ranged("m3"),
    ranged("m4"),
    passthrough("solar_voltage"),
    passthrough("battery_voltage"),
    passthrough("clock_voltage"),
];

const LEGACY_CHANNELS: [Channel; 13] = [
    passthrough("t0"),
    passthrough("t1"),
    passthrough("t2"),
    passthrough("t3"),
    passthrough("t4"),
    passthrough("solar_voltage"),
    passthrough("battery_voltage"),
    passthrough("clock_voltage"),
    ranged("m0"),
    ranged("m1"),
    ranged("m2"),
    ranged("m3"),
    ranged("m4"),
];

/// The layout of a station's series, selected by the run mode.
///
/// Every body carries one header row. Columns are matched by position, so a
/// body with the right number of columns is accepted whatever its header
/// says; the header names below are the ones used after renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeriesSchema {
    /// `time, m0, m1, m2, m3, m4`.
    #[default]
    Moisture,
    /// `time, m0..m4, solar_voltage, battery_voltage, clock_voltage`.
    /// Attaches the station's power telemetry to the moisture series.
    Voltage,
    /// The unlabeled 15-column export: a leading row index, five
    /// temperature probes, three voltages, five moisture probes and the
    /// collection time last. The row index is discarded.
    Legacy,
}

impl SeriesSchema {
    pub(crate) fn mode_name(&self) -> &'static str {
        match self {
            SeriesSchema::Moisture => "moisture",
            SeriesSchema::Voltage => "voltage",
            SeriesSchema::Legacy => "legacy",
        }
    }

    /// Column names assigned positionally to the wire body.
    pub(crate) fn wire_column_names(&self) -> Vec<&'static str> {
        match self {
            SeriesSchema::Moisture | SeriesSchema::Voltage => std::iter::once(TIME_COLUMN)
                .chain(self.channels().iter().map(|c| c.name))
                .collect(),
            SeriesSchema::Legacy => std::iter::once("index")
                .chain(self.channels().iter().map(|c| c.name))
                .chain(std::iter::once(TIME_COLUMN))
                .collect(),
        }
    }

    /// The channels kept in the cleaned output, in output order.
    pub fn channels(&self) -> &'static [Channel] {
        match self {
            SeriesSchema::Moisture => &MOISTURE_CHANNELS,
            SeriesSchema::Voltage => &VOLTAGE_CHANNELS,
            SeriesSchema::Legacy => &LEGACY_CHANNELS,
        }
    }
}

impl fmt::Display for SeriesSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mode_name())
    }
}

#[derive(Debug, Error)]
#[error("unknown run mode '{0}', expected one of: moisture, voltage, legacy")]
pub struct UnknownSchema(pub String);

impl FromStr for SeriesSchema {
    type Err = UnknownSchema;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moisture" => Ok(SeriesSchema::Moisture),
            "voltage" => Ok(SeriesSchema::Voltage),
            "legacy" => Ok(SeriesSchema::Legacy),
            _ => Err(UnknownSchema(s.to_string())),
        }
    }
}
