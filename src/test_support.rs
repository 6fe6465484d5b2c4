//! In-process stand-ins for the remote station endpoint and the progress display.

use crate::reporting::progress::ProgressSink;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
struct ServerState {
    roster: Option<String>,
    bodies: Arc<HashMap<String, String>>,
    requested: Arc<Mutex<Vec<String>>>,
}

/// Serves `/sn_meta.txt` and `/stations/<id>.csv` on a random loopback port.
/// Unknown stations get a 404.
pub struct StationServer {
    address: String,
    requested: Arc<Mutex<Vec<String>>>,
}

impl StationServer {
    pub async fn start<'a>(stations: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::start_with_roster(None, stations).await
    }

    pub async fn start_with_roster<'a>(
        roster: Option<&str>,
        stations: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let bodies = stations
            .into_iter()
            .map(|(id, body)| (format!("{id}.csv"), body.to_string()))
            .collect();
        let requested = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            roster: roster.map(str::to_string),
            bodies: Arc::new(bodies),
            requested: Arc::clone(&requested),
        };

        let app = Router::new()
            .route("/sn_meta.txt", get(serve_roster))
            .route("/stations/{file}", get(serve_station))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to start test server");
        });

        StationServer { address, requested }
    }

    pub fn endpoint_base(&self) -> String {
        format!("{}/stations/", self.address)
    }

    pub fn roster_url(&self) -> String {
        format!("{}/sn_meta.txt", self.address)
    }

    /// File names requested so far, in arrival order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

async fn serve_roster(State(state): State<ServerState>) -> (StatusCode, String) {
    match state.roster {
        Some(roster) => (StatusCode::OK, roster),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn serve_station(
    State(state): State<ServerState>,
    Path(file): Path<String>,
) -> (StatusCode, String) {
    state.requested.lock().unwrap().push(file.clone());
    match state.bodies.get(&file) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

#[derive(Debug, Default)]
pub struct CountingProgress {
    requests: AtomicUsize,
    pipelines: AtomicUsize,
}

impl CountingProgress {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn pipelines(&self) -> usize {
        self.pipelines.load(Ordering::SeqCst)
    }
}

impl ProgressSink for CountingProgress {
    fn request_completed(&self, _station: &str) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn pipeline_completed(&self, _station: &str) {
        self.pipelines.fetch_add(1, Ordering::SeqCst);
    }
}
