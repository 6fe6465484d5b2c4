//! Outcome types for a single station pull and for a whole batch.

use crate::series_data::error::FailureKind;
use std::fmt;
use std::path::PathBuf;

/// Reason recorded when a station has no reading at or after its install date.
pub const NO_VALID_START_REASON: &str = "no reading at/after install date";

/// How one station's pull ended. Every fetch resolves to exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum StationResult {
    /// The cleaned series was written to `path`.
    Success {
        station: String,
        path: PathBuf,
        rows: usize,
    },
    /// The station has no data worth writing yet. Not a fault.
    Skipped { station: String, reason: String },
    /// The pull failed; no file was written for this station.
    Failed {
        station: String,
        kind: FailureKind,
        message: String,
    },
}

impl StationResult {
    pub fn station(&self) -> &str {
        match self {
            StationResult::Success { station, .. }
            | StationResult::Skipped { station, .. }
            | StationResult::Failed { station, .. } => station,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StationResult::Success { .. })
    }

    /// The failure-log entry for this outcome, without a timestamp.
    /// `None` for successes, which are never logged.
    pub fn log_entry(&self) -> Option<String> {
        match self {
            StationResult::Success { .. } => None,
            StationResult::Skipped { station, reason } => {
                Some(format!("SKIPPED {station}: {reason}"))
            }
            StationResult::Failed {
                station, message, ..
            } => Some(format!("FAILED {station}: {message}")),
        }
    }
}

/// Counts folded over every [`StationResult`] of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub eligible: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub rows_written: usize,
}

impl BatchSummary {
    pub(crate) fn record(mut self, result: &StationResult) -> Self {
        self.eligible += 1;
        match result {
            StationResult::Success { rows, .. } => {
                self.succeeded += 1;
                self.rows_written += rows;
            }
            StationResult::Skipped { .. } => self.skipped += 1,
            StationResult::Failed { .. } => self.failed += 1,
        }
        self
    }
}

impl<'a> FromIterator<&'a StationResult> for BatchSummary {
    fn from_iter<I: IntoIterator<Item = &'a StationResult>>(iter: I) -> Self {
        iter.into_iter()
            .fold(BatchSummary::default(), BatchSummary::record)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} stations pulled: {} written ({} rows), {} skipped, {} failed",
            self.eligible, self.succeeded, self.rows_written, self.skipped, self.failed
        )
    }
}
