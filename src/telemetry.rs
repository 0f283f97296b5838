//! Publish telemetry events and sinks.
//!
//! The publish workflow reports each remote side effect it causes. A branch
//! that was created but never received a pull request is only visible through
//! these events, so they carry enough detail to find and clean it up by hand.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted while publishing generated tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// A new branch now exists on the remote.
    BranchCreated {
        /// `owner/name` of the target repository.
        repository: String,
        /// Name of the created branch.
        branch: String,
        /// Branch it was created from.
        base_branch: String,
    },
    /// A file was committed to the working branch.
    FileWritten {
        /// Name of the working branch.
        branch: String,
        /// Repository-relative path.
        path: String,
        /// Attempts the write took, including the successful one.
        attempts: u32,
    },
    /// The pull request was opened.
    PullRequestOpened {
        /// `owner/name` of the target repository.
        repository: String,
        /// Repository-scoped pull request number.
        number: u64,
        /// Browser URL, when GitHub returned one.
        url: Option<String>,
    },
    /// The workflow stopped early.
    PublishFailed {
        /// `owner/name` of the target repository.
        repository: String,
        /// Step that failed, such as `write_files`.
        step: String,
        /// Stable failure tag, such as `sha_conflict`.
        cause: String,
        /// Attempts made on the failing step.
        attempts: u32,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// In-memory sink for asserting on emitted events.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::Mutex;

    use super::{TelemetryEvent, TelemetrySink};

    /// Sink that keeps every recorded event.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Removes and returns the events recorded so far.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .map(|mut events| events.drain(..).collect())
                .unwrap_or_default()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            if let Ok(mut events) = self.events.lock() {
                events.push(event);
            }
        }
    }
}
