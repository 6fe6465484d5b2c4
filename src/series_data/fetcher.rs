use crate::reporting::failure_log::FailureSink;
use crate::reporting::progress::ProgressSink;
use crate::series_data::cleaner::clean_series;
use crate::series_data::error::SeriesError;
use crate::series_data::parser::parse_series;
use crate::series_data::trimmer::trim_series;
use crate::series_data::writer::write_station_file;
use crate::types::schema::SeriesSchema;
use crate::types::station::StationDescriptor;
use crate::types::station_result::StationResult;
use futures_util::TryStreamExt;
use log::{debug, info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tokio_util::io::StreamReader;

/// Runs the request → parse → trim → clean → write pipeline for one station.
///
/// Holds only shared, read-only state so a single instance can serve every
/// station of a batch concurrently.
#[derive(Debug, Clone)]
pub struct StationFetcher {
    client: Client,
    endpoint_base: String,
    output_dir: PathBuf,
    schema: SeriesSchema,
}

impl StationFetcher {
    pub fn new(
        client: Client,
        endpoint_base: impl Into<String>,
        output_dir: &Path,
        schema: SeriesSchema,
    ) -> Self {
        Self {
            client,
            endpoint_base: endpoint_base.into(),
            output_dir: output_dir.to_path_buf(),
            schema,
        }
    }

    pub fn station_url(&self, station: &StationDescriptor) -> String {
        format!("{}{}", self.endpoint_base, station.file_name())
    }

    pub fn output_path(&self, station: &StationDescriptor) -> PathBuf {
        self.output_dir.join(station.file_name())
    }

    /// Pulls one station. Never returns an error: every outcome, including
    /// failures, is a [`StationResult`]. Skips and failures are also
    /// recorded in `failures`.
    pub async fn fetch(
        &self,
        station: &StationDescriptor,
        progress: &dyn ProgressSink,
        failures: &dyn FailureSink,
    ) -> StationResult {
        let result = match self.pull(station, progress).await {
            Ok((path, rows)) => {
                progress.pipeline_completed(&station.id);
                info!("Wrote {} rows for station {} to {:?}", rows, station.id, path);
                StationResult::Success {
                    station: station.id.clone(),
                    path,
                    rows,
                }
            }
            Err(SeriesError::NoValidStart(reason)) => {
                info!("Skipping station {}: {}", station.id, reason);
                StationResult::Skipped {
                    station: station.id.clone(),
                    reason: reason.to_string(),
                }
            }
            Err(e) => {
                warn!("Station {} failed: {:?}", station.id, e);
                StationResult::Failed {
                    station: station.id.clone(),
                    kind: e.kind(),
                    message: format!("{} pull failed: {}", station.id, e),
                }
            }
        };

        failures.record(&result);
        result
    }

    async fn pull(
        &self,
        station: &StationDescriptor,
        progress: &dyn ProgressSink,
    ) -> Result<(PathBuf, usize), SeriesError> {
        let body = self.download(station).await?;
        progress.request_completed(&station.id);

        let raw = parse_series(body, &station.id, self.schema)?;
        let received = raw.len();
        let trimmed = trim_series(raw, station.install_timestamp)?;
        debug!(
            "Station {}: kept {} of {} readings at/after {}",
            station.id,
            trimmed.len(),
            received,
            station.install_timestamp
        );
        let cleaned = clean_series(trimmed, self.schema)?;

        let path = self.output_path(station);
        let rows = write_station_file(cleaned, self.schema, &path).await?;
        Ok((path, rows))
    }

    async fn download(&self, station: &StationDescriptor) -> Result<Vec<u8>, SeriesError> {
        let url = self.station_url(station);
        debug!("Downloading series from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SeriesError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeriesError::HttpStatus { url, status });
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let mut reader = StreamReader::new(stream);
        let mut body = Vec::new();
        reader
            .read_to_end(&mut body)
            .await
            .map_err(|source| SeriesError::BodyRead {
                url: url.clone(),
                source,
            })?;
        debug!("Received {} bytes for station {}", body.len(), station.id);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::failure_log::MemoryFailureLog;
    use crate::reporting::progress::NoProgress;
    use crate::series_data::error::FailureKind;
    use crate::test_support::{CountingProgress, StationServer};
    use tempfile::TempDir;

    const BODY: &str = "time,m0,m1,m2,m3,m4\n\
                        500,950,950,950,950,950\n\
                        999,950,950,950,950,950\n\
                        1000,950,950,950,950,950\n\
                        1500,950,2500,950,950,950\n";

    fn fetcher(server: &StationServer, dir: &TempDir) -> StationFetcher {
        StationFetcher::new(
            Client::new(),
            server.endpoint_base(),
            dir.path(),
            SeriesSchema::Moisture,
        )
    }

    #[tokio::test]
    async fn test_fetch_success_writes_trimmed_file() {
        let server = StationServer::start([("SN000001", BODY)]).await;
        let dir = TempDir::new().unwrap();
        let progress = CountingProgress::default();
        let failures = MemoryFailureLog::new();

        let station = StationDescriptor::new("SN000001", 1000);
        let result = fetcher(&server, &dir)
            .fetch(&station, &progress, &failures)
            .await;

        let expected_path = dir.path().join("SN000001.csv");
        assert_eq!(
            result,
            StationResult::Success {
                station: "SN000001".into(),
                path: expected_path.clone(),
                rows: 2,
            }
        );
        let written = std::fs::read_to_string(expected_path).unwrap();
        assert_eq!(
            written.lines().collect::<Vec<_>>(),
            [
                "time,m0,m1,m2,m3,m4",
                "1970-01-01 00:16:40,950.0,950.0,950.0,950.0,950.0",
                "1970-01-01 00:25:00,950.0,NaN,950.0,950.0,950.0",
            ]
        );
        assert!(failures.entries().is_empty());
        assert_eq!(progress.requests(), 1);
        assert_eq!(progress.pipelines(), 1);
    }

    #[tokio::test]
    async fn test_fetch_skips_when_install_is_after_series() {
        let server = StationServer::start([("SN000002", BODY)]).await;
        let dir = TempDir::new().unwrap();
        let progress = CountingProgress::default();
        let failures = MemoryFailureLog::new();

        let station = StationDescriptor::new("SN000002", 5000);
        let result = fetcher(&server, &dir)
            .fetch(&station, &progress, &failures)
            .await;

        assert!(matches!(result, StationResult::Skipped { .. }));
        assert!(!dir.path().join("SN000002.csv").exists());
        assert_eq!(
            failures.entries(),
            ["SKIPPED SN000002: no reading at/after install date"]
        );
        assert_eq!(progress.requests(), 1);
        assert_eq!(progress.pipelines(), 0);
    }

    #[tokio::test]
    async fn test_fetch_reports_http_status() {
        let server = StationServer::start([("SN000001", BODY)]).await;
        let dir = TempDir::new().unwrap();
        let failures = MemoryFailureLog::new();

        let station = StationDescriptor::new("SN000404", 1000);
        let result = fetcher(&server, &dir)
            .fetch(&station, &NoProgress, &failures)
            .await;

        match result {
            StationResult::Failed { kind, message, .. } => {
                assert_eq!(kind, FailureKind::Network);
                assert_eq!(
                    message,
                    "SN000404 pull failed: server returned non-success status 404"
                );
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(failures.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_reports_parse_error() {
        let server = StationServer::start([("SN000005", "time,m0\n1000,950\n")]).await;
        let dir = TempDir::new().unwrap();
        let failures = MemoryFailureLog::new();

        let station = StationDescriptor::new("SN000005", 1000);
        let result = fetcher(&server, &dir)
            .fetch(&station, &NoProgress, &failures)
            .await;

        match result {
            StationResult::Failed { kind, message, .. } => {
                assert_eq!(kind, FailureKind::Parse);
                assert!(message.starts_with("SN000005 pull failed: parse error: "));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!dir.path().join("SN000005.csv").exists());
    }

    #[tokio::test]
    async fn test_fetch_reports_transport_error() {
        let dir = TempDir::new().unwrap();
        let failures = MemoryFailureLog::new();
        // Nothing listens on port 9 of the loopback interface.
        let fetcher = StationFetcher::new(
            Client::new(),
            "http://127.0.0.1:9/stations/",
            dir.path(),
            SeriesSchema::Moisture,
        );

        let result = fetcher
            .fetch(&StationDescriptor::new("SN000001", 1000), &NoProgress, &failures)
            .await;

        assert!(matches!(
            result,
            StationResult::Failed {
                kind: FailureKind::Network,
                ..
            }
        ));
    }
}
