//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{BatchCounts, BatchEntry, Log};

/// Create a Logger backed by an isolated per-thread tracing subscriber
/// with a [`FileLayer`](subscriber::FileLayer) writing into a temp dir.
///
/// Keep the returned guard alive for the duration of the test; dropping it
/// restores the previous thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("test.log");
    let file_layer = subscriber::FileLayer::at(&path).expect("failed to create file layer");
    let log = Logger::with_log_file(Some(path));
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (log, tmp, guard)
}

/// In-memory [`Log`] implementation that records warnings and batches.
///
/// Used by unit tests to assert on warnings emitted by batch operations.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingLog {
    pub(crate) warnings: std::sync::Mutex<Vec<String>>,
    pub(crate) batches: std::sync::Mutex<Vec<BatchEntry>>,
}

#[cfg(test)]
impl RecordingLog {
    pub(crate) fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .map_or_else(|_| vec![], |g| g.clone())
    }
}

#[cfg(test)]
impl Log for RecordingLog {
    fn stage(&self, _msg: &str) {}

    fn info(&self, _msg: &str) {}

    fn debug(&self, _msg: &str) {}

    fn warn(&self, msg: &str) {
        if let Ok(mut g) = self.warnings.lock() {
            g.push(msg.to_string());
        }
    }

    fn error(&self, msg: &str) {
        self.warn(msg);
    }

    fn record_batch(&self, name: &str, counts: BatchCounts) {
        if let Ok(mut g) = self.batches.lock() {
            g.push(BatchEntry {
                name: name.to_string(),
                counts,
            });
        }
    }
}
