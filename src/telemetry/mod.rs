//! Shared telemetry state.
//!
//! [`Telemetry`] is the single writer handle, owned by the poller.
//! [`TelemetryReader`] is the cloneable read-only view handed to the HTTP
//! layer. Stats and history live behind one lock so a reader never sees
//! one updated without the other.

mod history;
mod stats;

pub use history::*;
pub use stats::*;

use parking_lot::RwLock;
use std::sync::Arc;

/// Consistent copy of everything one tick publishes.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    pub stats: Stats,
    pub history: HistorySnapshot,
}

#[derive(Debug)]
struct State {
    stats: Stats,
    history: History,
}

/// Write handle to the shared stats record and history.
pub struct Telemetry {
    state: Arc<RwLock<State>>,
}

/// Read-only view of the shared stats record and history.
#[derive(Clone)]
pub struct TelemetryReader {
    state: Arc<RwLock<State>>,
}

impl Telemetry {
    pub fn new(history_len: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                stats: Stats::default(),
                history: History::new(history_len),
            })),
        }
    }

    pub fn reader(&self) -> TelemetryReader {
        TelemetryReader {
            state: self.state.clone(),
        }
    }

    /// Publish a successful tick. Returns the status that was current before.
    pub fn record_success(&self, stats: Stats) -> StatusText {
        let mut state = self.state.write();
        state.history.push(stats.down_mbps, stats.up_mbps);
        std::mem::replace(&mut state.stats, stats).status_text
    }

    /// Publish a failed tick. Only `online` and `status_text` change; the
    /// chart gets a zero sample. Returns the status that was current before.
    pub fn record_failure(&self) -> StatusText {
        let mut state = self.state.write();
        let previous = state.stats.status_text;
        state.stats.online = false;
        state.stats.status_text = StatusText::Disconnected;
        state.history.push(0.0, 0.0);
        previous
    }
}

impl TelemetryReader {
    pub fn snapshot(&self) -> TelemetrySnapshot {
        let state = self.state.read();
        TelemetrySnapshot {
            stats: state.stats.clone(),
            history: state.history.snapshot(),
        }
    }
}
