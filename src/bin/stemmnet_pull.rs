use clap::Parser;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use stemmnet::{
    absolute_path, ensure_dir_exists, FileFailureLog, ProgressSink, PullConfig, SeriesSchema, Stemmnet,
    StemmnetError, DEFAULT_ENDPOINT_BASE, DEFAULT_INSTALL_COLUMN, DEFAULT_ROSTER_URL,
};

/// Pull every installed STEMMNET station, trim it to its install date and
/// write one cleaned CSV per station.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Series layout served by the endpoint: moisture, voltage or legacy.
    #[arg(short, long, default_value_t = SeriesSchema::Moisture)]
    mode: SeriesSchema,

    /// Directory receiving one <station>.csv per station.
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// Append-only log of skipped and failed stations.
    #[arg(long, default_value = "logs/pull_errors.log")]
    log_file: PathBuf,

    #[arg(long, default_value = DEFAULT_ROSTER_URL)]
    roster_url: String,

    /// Prefix every station file name is appended to.
    #[arg(long, default_value = DEFAULT_ENDPOINT_BASE)]
    endpoint: String,

    /// Roster column holding install epoch seconds.
    #[arg(long, default_value = DEFAULT_INSTALL_COLUMN)]
    install_column: String,

    /// Cap on stations pulled at once. Unbounded when omitted.
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Hide the per-station progress bars.
    #[arg(long)]
    no_progress: bool,
}

/// One two-step bar per station: download, then trim/clean/write.
struct StationBars {
    _multi: MultiProgress,
    bars: HashMap<String, ProgressBar>,
}

impl StationBars {
    fn new<'a>(stations: impl IntoIterator<Item = &'a str>) -> Self {
        let multi = MultiProgress::new();
        let style = ProgressStyle::with_template("{prefix:>10} [{bar:20}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");

        let bars = stations
            .into_iter()
            .map(|station| {
                let bar = multi.add(ProgressBar::new(2));
                bar.set_style(style.clone());
                bar.set_prefix(station.to_string());
                bar.set_message("downloading");
                (station.to_string(), bar)
            })
            .collect();
        Self {
            _multi: multi,
            bars,
        }
    }

    fn finish(&self) {
        for bar in self.bars.values().filter(|bar| !bar.is_finished()) {
            bar.abandon_with_message("not written");
        }
    }
}

impl ProgressSink for StationBars {
    fn request_completed(&self, station: &str) {
        if let Some(bar) = self.bars.get(station) {
            bar.inc(1);
            bar.set_message("cleaning");
        }
    }

    fn pipeline_completed(&self, station: &str) {
        if let Some(bar) = self.bars.get(station) {
            bar.inc(1);
            bar.finish_with_message("written");
        }
    }
}

async fn open_failure_log(path: &Path) -> Result<FileFailureLog, StemmnetError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent).await?;
    }
    FileFailureLog::open(path).map_err(|e| StemmnetError::FailureLogOpen(path.to_path_buf(), e))
}

async fn run(cli: Cli) -> Result<(), StemmnetError> {
    let config = PullConfig::builder()
        .output_dir(cli.output)
        .roster_url(cli.roster_url)
        .endpoint_base(cli.endpoint)
        .schema(cli.mode)
        .install_column(cli.install_column)
        .maybe_max_concurrent(cli.max_concurrent)
        .build();

    let client = Stemmnet::new(config).await?;
    let failures = open_failure_log(&cli.log_file).await?;
    let roster = client.roster().await?;

    let bars = (!cli.no_progress).then(|| {
        StationBars::new(client.eligible(&roster).into_iter().map(|s| s.id.as_str()))
    });

    let summary = client
        .pull()
        .roster(&roster)
        .failures(&failures)
        .maybe_progress(bars.as_ref().map(|b| b as &dyn ProgressSink))
        .call()
        .await;

    if let Some(bars) = &bars {
        bars.finish();
    }

    let log_path = absolute_path(failures.path());
    failures.close();

    println!(
        "All data stored at: {}",
        absolute_path(&client.config().output_dir).display()
    );
    println!("{summary}");
    if summary.skipped + summary.failed > 0 {
        println!("Skips and failures logged to: {}", log_path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
