//! Fixed-capacity throughput history for charting.

use serde::Serialize;
use std::collections::VecDeque;

/// Two aligned rolling series of download/upload samples in Mbps.
///
/// Both series always hold exactly `capacity` samples; index `i` of each
/// belongs to the same tick. Pushing beyond capacity evicts the oldest pair.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    capacity: usize,
    down: VecDeque<f64>,
    up: VecDeque<f64>,
}

/// Chronological copy of both series, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySnapshot {
    pub download: Vec<f64>,
    pub upload: Vec<f64>,
}

impl History {
    /// Create a history of `capacity` zero samples (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            down: std::iter::repeat(0.0).take(capacity).collect(),
            up: std::iter::repeat(0.0).take(capacity).collect(),
        }
    }

    pub fn push(&mut self, down: f64, up: f64) {
        while self.down.len() >= self.capacity {
            self.down.pop_front();
            self.up.pop_front();
        }
        self.down.push_back(down);
        self.up.push_back(up);
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            download: self.down.iter().copied().collect(),
            upload: self.up.iter().copied().collect(),
        }
    }
}
