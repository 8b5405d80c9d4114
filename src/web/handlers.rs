//! HTTP request handlers.

use super::AppState;
use crate::logs::LogEntry;
use crate::telemetry::{format_uptime, HistorySnapshot, Indicator, Stats};

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use serde::Serialize;

// ============================================================================
// API: Status
// ============================================================================

/// Current stats plus fields derived for display.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub stats: Stats,
    pub indicator: Indicator,
    pub uptime_display: String,
}

impl From<Stats> for StatusResponse {
    fn from(stats: Stats) -> Self {
        Self {
            indicator: stats.status_text.indicator(),
            uptime_display: format_uptime(stats.uptime_s),
            stats,
        }
    }
}

pub async fn handle_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(StatusResponse::from(state.telemetry.snapshot().stats))
}

// ============================================================================
// API: History
// ============================================================================

pub async fn handle_history(State(state): State<AppState>) -> Json<HistorySnapshot> {
    Json(state.telemetry.snapshot().history)
}

// ============================================================================
// API: Logs
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub logs: Vec<LogEntry>,
}

pub async fn handle_logs(State(state): State<AppState>) -> impl IntoResponse {
    Json(LogsResponse {
        logs: state.logs.entries(),
    })
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub status: &'static str,
}

pub async fn handle_clear_logs(State(state): State<AppState>) -> impl IntoResponse {
    let removed = state.logs.clear();
    tracing::debug!("Cleared {} log entries", removed);
    Json(ActionResponse { status: "cleared" })
}

// ============================================================================
// Health
// ============================================================================

pub async fn handle_health() -> impl IntoResponse {
    Json(ActionResponse { status: "ok" })
}

#[cfg(test)]
mod tests {
    use super::super::routes;
    use super::*;
    use crate::dish::StatusSnapshot;
    use crate::logs::LogBuffer;
    use crate::telemetry::{normalize, Telemetry};

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(telemetry: &Telemetry, logs: LogBuffer) -> axum::Router {
        routes(AppState {
            telemetry: telemetry.reader(),
            logs,
        })
    }

    async fn call(router: axum::Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn log_entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: "2024-06-01 12:00:00".to_string(),
            level: "INFO".to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let telemetry = Telemetry::new(3);
        let (status, body) = call(app(&telemetry, LogBuffer::new(10)), Method::GET, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_status_before_first_tick() {
        let telemetry = Telemetry::new(3);
        let (status, body) = call(app(&telemetry, LogBuffer::new(10)), Method::GET, "/api/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["online"], false);
        assert_eq!(body["status_text"], "Connecting...");
        assert_eq!(body["hardware"], "--");
        assert_eq!(body["indicator"], "gray");
        assert_eq!(body["uptime_display"], "0:00:00");
    }

    #[tokio::test]
    async fn test_status_uses_flat_field_names() {
        let telemetry = Telemetry::new(3);
        telemetry.record_success(normalize(&StatusSnapshot {
            downlink_throughput_bps: Some(50_000_000.0),
            uplink_throughput_bps: Some(10_000_000.0),
            pop_ping_latency_ms: Some(25.0),
            fraction_obstructed: Some(0.10),
            uptime_s: Some(3_725),
            eth_speed_mbps: Some(1000),
            ..Default::default()
        }));

        let router = app(&telemetry, LogBuffer::new(10));
        let (_, first) = call(router.clone(), Method::GET, "/api/status").await;
        let (_, second) = call(router, Method::GET, "/api/status").await;
        assert_eq!(first, second);

        assert_eq!(first["online"], true);
        assert_eq!(first["status_text"], "Online (Obstructed)");
        assert_eq!(first["indicator"], "yellow");
        assert_eq!(first["down"], 50.0);
        assert_eq!(first["up"], 10.0);
        assert_eq!(first["ping"], 25.0);
        assert_eq!(first["eth_speed"], 1000);
        assert_eq!(first["heater"], "UNKNOWN");
        assert_eq!(first["uptime_display"], "1:02:05");
        for key in ["gps_sats", "azimuth", "elevation", "tilt", "software", "obstructed_pct"] {
            assert!(first.get(key).is_some(), "missing {}", key);
        }
    }

    #[tokio::test]
    async fn test_history_after_failures() {
        let telemetry = Telemetry::new(3);
        for _ in 0..3 {
            telemetry.record_failure();
        }
        let (status, body) = call(app(&telemetry, LogBuffer::new(10)), Method::GET, "/api/history").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "download": [0.0, 0.0, 0.0], "upload": [0.0, 0.0, 0.0] }));
    }

    #[tokio::test]
    async fn test_logs_and_clear() {
        let telemetry = Telemetry::new(3);
        let logs = LogBuffer::new(10);
        logs.push(log_entry("INFO - dishwatch - Polled: Idle - 0.0/0.0 Mbps"));
        let router = app(&telemetry, logs.clone());

        let (_, body) = call(router.clone(), Method::GET, "/api/logs").await;
        assert_eq!(body["logs"].as_array().unwrap().len(), 1);
        assert_eq!(body["logs"][0]["level"], "INFO");
        assert_eq!(body["logs"][0]["timestamp"], "2024-06-01 12:00:00");

        let (status, body) = call(router.clone(), Method::POST, "/api/logs/clear").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "cleared" }));

        let (_, body) = call(router, Method::GET, "/api/logs").await;
        assert_eq!(body, json!({ "logs": [] }));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let telemetry = Telemetry::new(3);
        let response = app(&telemetry, LogBuffer::new(10))
            .oneshot(
                Request::builder()
                    .uri("/api/status")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_post_with_custom_headers() {
        let telemetry = Telemetry::new(3);
        let response = app(&telemetry, LogBuffer::new(10))
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/logs/clear")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-dashboard-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap(), "*");
        assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(), "*");
    }
}
