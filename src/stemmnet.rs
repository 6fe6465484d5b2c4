//! This module provides the main entry point of the crate: a client that
//! fetches the STEMMNET station roster and pulls every installed station's
//! series into cleaned per-station files.

use crate::config::PullConfig;
use crate::error::StemmnetError;
use crate::reporting::failure_log::FailureSink;
use crate::reporting::progress::{NoProgress, ProgressSink};
use crate::series_data::fetcher::StationFetcher;
use crate::stations::roster::fetch_roster;
use crate::types::station::StationDescriptor;
use crate::types::station_result::{BatchSummary, StationResult};
use crate::utils::ensure_dir_exists;
use bon::bon;
use futures_util::future::join_all;
use futures_util::{stream, StreamExt};
use log::info;
use reqwest::Client;

/// The batch client.
///
/// Owns the HTTP connection pool shared by every station pull and the run
/// configuration. Create one per run with [`Stemmnet::new`].
///
/// # Examples
///
/// ```no_run
/// # use stemmnet::{MemoryFailureLog, PullConfig, Stemmnet, StemmnetError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), StemmnetError> {
/// let client = Stemmnet::new(PullConfig::builder().output_dir("data").build()).await?;
/// let roster = client.roster().await?;
///
/// let failures = MemoryFailureLog::new();
/// let summary = client.pull().roster(&roster).failures(&failures).call().await;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
pub struct Stemmnet {
    client: Client,
    config: PullConfig,
    fetcher: StationFetcher,
}

#[bon]
impl Stemmnet {
    /// Creates a client for `config`, creating the output directory if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StemmnetError::DirCreation`] or [`StemmnetError::NotADirectory`]
    /// if the output directory cannot be prepared, and
    /// [`StemmnetError::ClientBuild`] if the TLS backend cannot be initialised.
    pub async fn new(config: PullConfig) -> Result<Self, StemmnetError> {
        ensure_dir_exists(&config.output_dir).await?;

        let client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(StemmnetError::ClientBuild)?;
        let fetcher = StationFetcher::new(
            client.clone(),
            config.endpoint_base.clone(),
            &config.output_dir,
            config.schema,
        );

        Ok(Self {
            client,
            config,
            fetcher,
        })
    }

    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    /// Downloads and parses the station roster from the configured URL.
    pub async fn roster(&self) -> Result<Vec<StationDescriptor>, StemmnetError> {
        Ok(fetch_roster(
            &self.client,
            &self.config.roster_url,
            &self.config.install_column,
        )
        .await?)
    }

    /// The stations of `roster` a pull would fetch: installed (positive
    /// install timestamp) and not on the exclusion list. Roster order is kept.
    pub fn eligible<'a>(&self, roster: &'a [StationDescriptor]) -> Vec<&'a StationDescriptor> {
        roster
            .iter()
            .filter(|s| s.is_installed() && !self.config.excluded_stations.contains(&s.id))
            .collect()
    }

    /// Pulls every eligible station of `roster` concurrently and waits for
    /// all of them to settle.
    ///
    /// Each station ends as a written file, a skip or a failure; skips and
    /// failures go to `failures`. One station's failure never affects
    /// another's, and the batch itself cannot fail.
    ///
    /// # Arguments
    ///
    /// * `.roster(&[StationDescriptor])`: **Required.** The stations to consider.
    /// * `.failures(&dyn FailureSink)`: **Required.** Receives one entry per skipped or failed station.
    /// * `.progress(&dyn ProgressSink)`: Optional. Receives per-station milestones.
    #[builder]
    pub async fn pull(
        &self,
        roster: &[StationDescriptor],
        failures: &dyn FailureSink,
        progress: Option<&dyn ProgressSink>,
    ) -> BatchSummary {
        let progress = progress.unwrap_or(&NoProgress);
        let stations = self.eligible(roster);
        info!(
            "Pulling {} of {} roster stations ({} schema)",
            stations.len(),
            roster.len(),
            self.config.schema
        );

        let pulls = stations
            .into_iter()
            .map(|station| self.fetcher.fetch(station, progress, failures));

        let results: Vec<StationResult> = match self.config.max_concurrent {
            Some(limit) => {
                stream::iter(pulls)
                    .buffer_unordered(limit.max(1))
                    .collect()
                    .await
            }
            None => join_all(pulls).await,
        };

        let summary: BatchSummary = results.iter().collect();
        info!("{}", summary);
        summary
    }
}
