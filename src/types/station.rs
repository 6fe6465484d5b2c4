//! Defines the roster entry describing a single STEMMNET station.

/// One row of the station roster.
///
/// Built once per run from the roster document and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StationDescriptor {
    /// The unique station code (e.g., "SN000001").
    pub id: String,
    /// Epoch seconds at which the station went into the ground. Readings
    /// recorded before this instant are discarded. Zero or a negative value
    /// means the station is not installed yet.
    pub install_timestamp: i64,
}

impl StationDescriptor {
    pub fn new(id: impl Into<String>, install_timestamp: i64) -> Self {
        Self {
            id: id.into(),
            install_timestamp,
        }
    }

    /// Whether the station has a usable install date.
    pub fn is_installed(&self) -> bool {
        self.install_timestamp > 0
    }

    /// File name of this station's series, both remotely and on disk.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.id)
    }
}
