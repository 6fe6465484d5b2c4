/// Receives per-station milestones while a batch runs.
///
/// Implementations are shared by every in-flight station, so they must
/// synchronize internally.
pub trait ProgressSink: Send + Sync {
    /// The station's body has been received.
    fn request_completed(&self, station: &str);

    /// The station's cleaned file has been written.
    fn pipeline_completed(&self, station: &str);
}

/// A sink that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn request_completed(&self, _station: &str) {}

    fn pipeline_completed(&self, _station: &str) {}
}
