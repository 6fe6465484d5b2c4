mod config;
mod error;
mod reporting;
mod series_data;
mod stations;
mod stemmnet;
mod types;
mod utils;

#[cfg(test)]
mod test_support;

pub use config::*;
pub use error::StemmnetError;
pub use stemmnet::*;
pub use utils::{absolute_path, ensure_dir_exists};

pub use reporting::failure_log::{FailureSink, FileFailureLog, MemoryFailureLog};
pub use reporting::progress::{NoProgress, ProgressSink};

pub use series_data::cleaner::{clean_reading, clean_series, epoch_to_datetime};
pub use series_data::error::{FailureKind, NoValidStart, ParseError, SeriesError};
pub use series_data::fetcher::StationFetcher;
pub use series_data::parser::parse_series;
pub use series_data::trimmer::{trim_series, trim_start};
pub use series_data::writer::{readings_to_dataframe, write_station_file, MISSING_MARKER};

pub use stations::error::RosterError;
pub use stations::roster::{fetch_roster, parse_roster, ID_COLUMN};

pub use types::reading::{CleanedReading, RawReading, TIME_FORMAT};
pub use types::schema::{
    Channel, ChannelRange, SeriesSchema, UnknownSchema, MOISTURE_RANGE, TIME_COLUMN,
};
pub use types::station::StationDescriptor;
pub use types::station_result::{BatchSummary, StationResult, NO_VALID_START_REASON};
