//! Run configuration for a batch pull.

use crate::types::schema::SeriesSchema;
use bon::Builder;
use std::path::PathBuf;

pub const DEFAULT_ROSTER_URL: &str = "https://data.alclimate.com/stemmnet/sn_meta.txt";
pub const DEFAULT_ENDPOINT_BASE: &str = "https://data.alclimate.com/stemmnet/stations/";
pub const DEFAULT_INSTALL_COLUMN: &str = "install";
/// The bench station that reports into the network but is not deployed.
pub const TEST_STATION_ID: &str = "SN000000";

/// Settings for one run of the puller.
///
/// # Examples
///
/// ```
/// use stemmnet::{PullConfig, SeriesSchema};
///
/// let config = PullConfig::builder()
///     .output_dir("data")
///     .schema(SeriesSchema::Voltage)
///     .max_concurrent(16)
///     .build();
///
/// assert_eq!(config.excluded_stations, ["SN000000"]);
/// assert!(config.accept_invalid_certs);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PullConfig {
    /// Directory receiving one `<station>.csv` per successful pull.
    #[builder(into)]
    pub output_dir: PathBuf,

    #[builder(into, default = DEFAULT_ROSTER_URL.to_string())]
    pub roster_url: String,

    /// Prefix of every station URL; the station's file name is appended.
    #[builder(into, default = DEFAULT_ENDPOINT_BASE.to_string())]
    pub endpoint_base: String,

    #[builder(default)]
    pub schema: SeriesSchema,

    /// Name of the roster column holding install epoch seconds.
    #[builder(into, default = DEFAULT_INSTALL_COLUMN.to_string())]
    pub install_column: String,

    /// Station ids never pulled, whatever their install date.
    #[builder(default = vec![TEST_STATION_ID.to_string()])]
    pub excluded_stations: Vec<String>,

    /// Cap on in-flight station pulls. `None` starts every station at once.
    pub max_concurrent: Option<usize>,

    /// The station server presents a self-signed certificate.
    #[builder(default = true)]
    pub accept_invalid_certs: bool,
}
