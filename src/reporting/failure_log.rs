//! Operator-facing record of every skipped or failed station.
//!
//! Separate from the `log` diagnostics: this is the file an operator reads
//! after a run to find out which stations have no fresh output.

use crate::types::station_result::StationResult;
use chrono::{SecondsFormat, Utc};
use log::error;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Destination for skipped/failed station entries.
///
/// Shared by every station of a batch; each call must land as one intact
/// entry even when stations report concurrently.
pub trait FailureSink: Send + Sync {
    /// Records `result` if it is a skip or a failure. Successes are ignored.
    fn record(&self, result: &StationResult);
}

/// Appends one line per entry to a file:
/// `<rfc3339 utc> <SKIPPED|FAILED> <station>: <reason>`.
///
/// Entries are handed to a dedicated writer thread, so `record` never waits
/// on the disk. Dropping the log (or calling [`FileFailureLog::close`]) waits
/// until every recorded entry has been written.
#[derive(Debug)]
pub struct FileFailureLog {
    path: PathBuf,
    sender: Option<Sender<String>>,
    writer: Option<JoinHandle<()>>,
}

impl FileFailureLog {
    /// Opens `path` for appending, creating it if needed. The parent
    /// directory must already exist.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let (sender, receiver) = mpsc::channel();
        let writer_path = path.clone();
        let writer = thread::Builder::new()
            .name("failure-log".to_string())
            .spawn(move || write_entries(file, &writer_path, receiver))?;

        Ok(Self {
            path,
            sender: Some(sender),
            writer: Some(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waits for every recorded entry to reach the file.
    pub fn close(self) {
        drop(self);
    }
}

/// One `write_all` per entry keeps lines whole.
fn write_entries(mut file: File, path: &Path, entries: Receiver<String>) {
    for line in entries {
        if let Err(e) = file.write_all(line.as_bytes()) {
            error!(
                "Could not append to failure log {}: {} (entry was: {})",
                path.display(),
                e,
                line.trim_end()
            );
        }
    }
}

impl FailureSink for FileFailureLog {
    fn record(&self, result: &StationResult) {
        let Some(entry) = result.log_entry() else {
            return;
        };
        let line = format!(
            "{} {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            entry
        );

        let sent = self
            .sender
            .as_ref()
            .is_some_and(|sender| sender.send(line).is_ok());
        if !sent {
            error!(
                "Failure log writer for {} has stopped (entry was: {})",
                self.path.display(),
                entry
            );
        }
    }
}

impl Drop for FileFailureLog {
    fn drop(&mut self) {
        // Closing the channel ends the writer loop once it has drained.
        drop(self.sender.take());
        if let Some(writer) = self.writer.take() {
            if writer.join().is_err() {
                error!("Failure log writer for {} panicked", self.path.display());
            }
        }
    }
}

/// Keeps entries in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryFailureLog {
    entries: Mutex<Vec<String>>,
}

impl MemoryFailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FailureSink for MemoryFailureLog {
    fn record(&self, result: &StationResult) {
        if let Some(entry) = result.log_entry() {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(entry);
        }
    }
}
