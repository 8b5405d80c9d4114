//! Configuration module for dishwatch.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Capacity of the in-memory diagnostic log ring.
pub const LOG_CAPACITY: usize = 200;

/// Shortest accepted poll interval.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Dish diagnostic endpoint as host:port (default: "192.168.100.1:9200")
    pub dish_addr: String,
    /// Seconds between polls (default: 2)
    pub poll_interval_secs: f64,
    /// Number of samples kept for the throughput chart (default: 30)
    pub history_len: usize,
    /// Address the HTTP API binds to (default: "127.0.0.1")
    pub http_host: String,
    /// HTTP port for the API server (default: 8000)
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dish_addr: "192.168.100.1:9200".to_string(),
            poll_interval_secs: 2.0,
            history_len: 30,
            http_host: "127.0.0.1".to_string(),
            http_port: 8000,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DISHWATCH_DISH_ADDR`: dish gRPC endpoint (default: "192.168.100.1:9200")
    /// - `DISHWATCH_POLL_INTERVAL`: poll interval in seconds (default: 2)
    /// - `DISHWATCH_HISTORY_LEN`: history length in samples (default: 30)
    /// - `DISHWATCH_HTTP_HOST`: HTTP bind address (default: "127.0.0.1")
    /// - `DISHWATCH_HTTP_PORT`: HTTP port (default: 8000)
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("DISHWATCH_DISH_ADDR") {
            if !addr.trim().is_empty() {
                cfg.dish_addr = addr.trim().to_string();
            }
        }

        if let Some(secs) = parse_var::<f64, _>(&lookup, "DISHWATCH_POLL_INTERVAL") {
            match Duration::try_from_secs_f64(secs) {
                Ok(period) if period >= MIN_POLL_INTERVAL => cfg.poll_interval_secs = secs,
                _ => tracing::warn!("Ignoring out-of-range DISHWATCH_POLL_INTERVAL={}", secs),
            }
        }

        if let Some(len) = parse_var::<usize, _>(&lookup, "DISHWATCH_HISTORY_LEN") {
            if len > 0 {
                cfg.history_len = len;
            } else {
                tracing::warn!("Ignoring DISHWATCH_HISTORY_LEN=0");
            }
        }

        if let Some(host) = lookup("DISHWATCH_HTTP_HOST") {
            if !host.trim().is_empty() {
                cfg.http_host = host.trim().to_string();
            }
        }

        if let Some(port) = parse_var(&lookup, "DISHWATCH_HTTP_PORT") {
            cfg.http_port = port;
        }

        cfg
    }

    /// Interval between two ticks of the poller.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.poll_interval_secs)
    }

    /// Upper bound for one dish round trip. Equal to the poll interval so
    /// that ticks never overlap.
    pub fn fetch_timeout(&self) -> Duration {
        self.poll_interval()
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
            None
        }
    }
}
