//! Dish client module.
//!
//! Talks to the terminal's local diagnostic service and turns its status
//! response into a [`StatusSnapshot`] with explicit optional fields.

mod grpc;
pub mod proto;

pub use grpc::*;

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Dish client error types.
#[derive(Error, Debug)]
pub enum DishError {
    #[error("dish request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("grpc status {code}: {message}")]
    Status { code: i32, message: String },
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("failed to decode response: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error("response carried no dish status")]
    MissingStatus,
}

/// One raw status response from the dish.
///
/// Every field is optional; absence means the dish did not report it and
/// the normalizer falls back to its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusSnapshot {
    pub downlink_throughput_bps: Option<f64>,
    pub uplink_throughput_bps: Option<f64>,
    pub pop_ping_latency_ms: Option<f64>,
    pub fraction_obstructed: Option<f64>,
    pub obstruction_valid_s: Option<f64>,
    pub uptime_s: Option<u64>,
    pub hardware_version: Option<String>,
    pub software_version: Option<String>,
    pub country_code: Option<String>,
    pub gps_valid: Option<bool>,
    pub gps_sats: Option<u32>,
    pub boresight_azimuth_deg: Option<f64>,
    pub boresight_elevation_deg: Option<f64>,
    pub tilt_angle_deg: Option<f64>,
    pub snow_melt_mode: Option<String>,
    pub eth_speed_mbps: Option<i32>,
    pub is_snr_above_noise_floor: Option<bool>,
}

impl From<proto::DishGetStatusResponse> for StatusSnapshot {
    fn from(status: proto::DishGetStatusResponse) -> Self {
        let info = status.device_info.unwrap_or_default();
        let obstruction = status.obstruction_stats.unwrap_or_default();
        let gps = status.gps_stats.unwrap_or_default();

        Self {
            downlink_throughput_bps: status.downlink_throughput_bps.map(f64::from),
            uplink_throughput_bps: status.uplink_throughput_bps.map(f64::from),
            pop_ping_latency_ms: status.pop_ping_latency_ms.map(f64::from),
            fraction_obstructed: obstruction.fraction_obstructed.map(f64::from),
            obstruction_valid_s: obstruction.valid_s.map(f64::from),
            uptime_s: status.device_state.and_then(|s| s.uptime_s),
            hardware_version: info.hardware_version,
            software_version: info.software_version,
            country_code: info.country_code,
            gps_valid: gps.gps_valid,
            gps_sats: gps.gps_sats,
            boresight_azimuth_deg: status.boresight_azimuth_deg.map(f64::from),
            boresight_elevation_deg: status.boresight_elevation_deg.map(f64::from),
            tilt_angle_deg: status
                .alignment_stats
                .and_then(|a| a.tilt_angle_deg)
                .map(f64::from),
            snow_melt_mode: status
                .config
                .and_then(|c| c.snow_melt_mode)
                .map(proto::snow_melt_mode_name),
            eth_speed_mbps: status.eth_speed_mbps,
            is_snr_above_noise_floor: status.is_snr_above_noise_floor,
        }
    }
}

/// Anything that can fetch one status snapshot from the dish.
pub trait StatusClient: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<StatusSnapshot, DishError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_empty_response() {
        let snapshot = StatusSnapshot::from(proto::DishGetStatusResponse::default());
        assert_eq!(snapshot, StatusSnapshot::default());
    }

    #[test]
    fn test_snapshot_from_nested_messages() {
        let status = proto::DishGetStatusResponse {
            device_info: Some(proto::DeviceInfo {
                hardware_version: Some("rev3_proto2".to_string()),
                software_version: Some("2024.01.01.mr1".to_string()),
                country_code: Some("US".to_string()),
            }),
            device_state: Some(proto::DeviceState { uptime_s: Some(3600) }),
            obstruction_stats: Some(proto::DishObstructionStats {
                fraction_obstructed: Some(0.25),
                valid_s: Some(120.0),
                currently_obstructed: Some(false),
            }),
            alignment_stats: Some(proto::AlignmentStats {
                tilt_angle_deg: Some(12.5),
            }),
            config: Some(proto::DishConfig {
                snow_melt_mode: Some(proto::SnowMeltMode::AlwaysOff as i32),
            }),
            eth_speed_mbps: Some(1000),
            ..Default::default()
        };

        let snapshot = StatusSnapshot::from(status);
        assert_eq!(snapshot.hardware_version.as_deref(), Some("rev3_proto2"));
        assert_eq!(snapshot.country_code.as_deref(), Some("US"));
        assert_eq!(snapshot.uptime_s, Some(3600));
        assert_eq!(snapshot.fraction_obstructed, Some(0.25));
        assert_eq!(snapshot.obstruction_valid_s, Some(120.0));
        assert_eq!(snapshot.tilt_angle_deg, Some(12.5));
        assert_eq!(snapshot.snow_melt_mode.as_deref(), Some("ALWAYS_OFF"));
        assert_eq!(snapshot.eth_speed_mbps, Some(1000));
        assert_eq!(snapshot.downlink_throughput_bps, None);
    }
}
