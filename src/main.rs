//! dishwatch - satellite dish status monitor
//!
//! Polls the dish's local diagnostic endpoint, keeps a short throughput
//! history and serves both over a small HTTP API.

mod config;
mod dish;
mod logs;
mod poller;
mod telemetry;
mod web;

use config::{ServerConfig, LOG_CAPACITY};
use dish::GrpcClient;
use logs::{LogBuffer, LogCaptureLayer};
use poller::Poller;
use telemetry::Telemetry;
use web::Server;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging; everything that passes the filter also lands in
    // the ring served by /api/logs.
    let logs = LogBuffer::new(LOG_CAPACITY);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("dishwatch=info".parse()?))
        .with(LogCaptureLayer::new(logs.clone()))
        .init();

    // Load configuration
    let cfg = ServerConfig::load();
    tracing::info!("Starting dishwatch on {}:{}...", cfg.http_host, cfg.http_port);
    tracing::info!(
        "Polling dish at {} every {:?} ({} samples of history)",
        cfg.dish_addr,
        cfg.poll_interval(),
        cfg.history_len
    );

    let client = GrpcClient::new(&cfg.dish_addr, cfg.fetch_timeout())?;
    tracing::debug!("Dish RPC endpoint: {}", client.url());
    let telemetry = Telemetry::new(cfg.history_len);
    let reader = telemetry.reader();

    // Start poller
    let poller = Poller::new(client, telemetry, cfg.poll_interval(), cfg.fetch_timeout()).spawn();

    // Start web server
    let server = Server::new(cfg, reader, logs);
    let result = server.start(shutdown_signal()).await;

    poller.shutdown().await;
    tracing::info!("dishwatch stopped");

    result
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
