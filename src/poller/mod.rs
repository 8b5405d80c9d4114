//! Poller module: fetches the dish status on a fixed cadence and publishes
//! normalized telemetry.

use crate::dish::{DishError, StatusClient, StatusSnapshot};
use crate::telemetry::{normalize, StatusText, Telemetry};

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Periodic fetch-normalize-publish loop. Sole writer of the telemetry.
pub struct Poller<C> {
    client: C,
    telemetry: Telemetry,
    interval: Duration,
    timeout: Duration,
}

/// Handle to a running poller task.
pub struct PollerHandle {
    stop_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl<C: StatusClient> Poller<C> {
    pub fn new(client: C, telemetry: Telemetry, interval: Duration, timeout: Duration) -> Self {
        Self {
            client,
            telemetry,
            interval,
            timeout,
        }
    }

    /// Start the poll loop on the runtime.
    pub fn spawn(self) -> PollerHandle {
        let (stop_tx, stop_rx) = broadcast::channel(1);
        let task = tokio::spawn(self.run(stop_rx));
        PollerHandle { stop_tx, task }
    }

    /// Run until a stop signal arrives. Failures never end the loop.
    pub async fn run(mut self, mut stop_rx: broadcast::Receiver<()>) {
        tracing::info!("Poller: starting, interval {:?}", self.interval);

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = stop_rx.recv() => break,
                _ = interval.tick() => {}
            }

            // A stop while fetching drops the in-flight request before
            // anything is published.
            tokio::select! {
                biased;
                _ = stop_rx.recv() => break,
                _ = self.tick() => {}
            }
        }

        tracing::info!("Poller: stopped");
    }

    /// One fetch-normalize-publish cycle.
    pub async fn tick(&mut self) {
        match self.fetch().await {
            Ok(snapshot) => {
                let stats = normalize(&snapshot);
                let (status, down, up) = (stats.status_text, stats.down_mbps, stats.up_mbps);
                let previous = self.telemetry.record_success(stats);

                if previous == StatusText::Disconnected {
                    tracing::warn!("Dish connection restored");
                }
                tracing::info!("Polled: {} - {:.1}/{:.1} Mbps", status, down, up);
            }
            Err(e) => {
                self.telemetry.record_failure();
                tracing::error!("Poll error: {}", e);
            }
        }
    }

    async fn fetch(&self) -> Result<StatusSnapshot, DishError> {
        match tokio::time::timeout(self.timeout, self.client.fetch()).await {
            Ok(result) => result,
            Err(_) => Err(DishError::Timeout(self.timeout)),
        }
    }
}

impl PollerHandle {
    /// Stop the loop and wait for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(());
        if let Err(e) = self.task.await {
            tracing::error!("Poller task ended abnormally: {}", e);
        }
    }
}
