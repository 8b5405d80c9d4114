//! Protobuf messages for the dish's `SpaceX.API.Device.Device/Handle` RPC.
//!
//! Only the fields this service reads are declared; prost skips unknown
//! tags when decoding. Scalars are `optional` so that a field the dish did
//! not send decodes as `None` instead of a zero value.

/// Fully qualified path of the unary handle RPC.
pub const HANDLE_PATH: &str = "/SpaceX.API.Device.Device/Handle";

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Request {
    #[prost(message, optional, tag = "1004")]
    pub get_status: Option<GetStatusRequest>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetStatusRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(message, optional, tag = "2004")]
    pub dish_get_status: Option<DishGetStatusResponse>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DishGetStatusResponse {
    #[prost(message, optional, tag = "1")]
    pub device_info: Option<DeviceInfo>,
    #[prost(message, optional, tag = "2")]
    pub device_state: Option<DeviceState>,
    #[prost(message, optional, tag = "1004")]
    pub obstruction_stats: Option<DishObstructionStats>,
    #[prost(float, optional, tag = "1007")]
    pub downlink_throughput_bps: Option<f32>,
    #[prost(float, optional, tag = "1008")]
    pub uplink_throughput_bps: Option<f32>,
    #[prost(float, optional, tag = "1009")]
    pub pop_ping_latency_ms: Option<f32>,
    #[prost(float, optional, tag = "1011")]
    pub boresight_azimuth_deg: Option<f32>,
    #[prost(float, optional, tag = "1012")]
    pub boresight_elevation_deg: Option<f32>,
    #[prost(message, optional, tag = "1015")]
    pub gps_stats: Option<DishGpsStats>,
    #[prost(int32, optional, tag = "1016")]
    pub eth_speed_mbps: Option<i32>,
    #[prost(bool, optional, tag = "1018")]
    pub is_snr_above_noise_floor: Option<bool>,
    #[prost(message, optional, tag = "1027")]
    pub alignment_stats: Option<AlignmentStats>,
    #[prost(message, optional, tag = "2000")]
    pub config: Option<DishConfig>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceInfo {
    #[prost(string, optional, tag = "2")]
    pub hardware_version: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub software_version: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub country_code: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceState {
    #[prost(uint64, optional, tag = "1")]
    pub uptime_s: Option<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DishObstructionStats {
    #[prost(float, optional, tag = "1")]
    pub fraction_obstructed: Option<f32>,
    #[prost(float, optional, tag = "4")]
    pub valid_s: Option<f32>,
    #[prost(bool, optional, tag = "5")]
    pub currently_obstructed: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DishGpsStats {
    #[prost(bool, optional, tag = "1")]
    pub gps_valid: Option<bool>,
    #[prost(uint32, optional, tag = "2")]
    pub gps_sats: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AlignmentStats {
    #[prost(float, optional, tag = "3")]
    pub tilt_angle_deg: Option<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DishConfig {
    #[prost(enumeration = "SnowMeltMode", optional, tag = "1")]
    pub snow_melt_mode: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum SnowMeltMode {
    Auto = 0,
    AlwaysOn = 1,
    AlwaysOff = 2,
}

/// Name of a heater mode as the dish spells it, `UNKNOWN` for values this
/// build does not know.
pub fn snow_melt_mode_name(value: i32) -> String {
    match SnowMeltMode::from_i32(value) {
        Some(SnowMeltMode::Auto) => "AUTO",
        Some(SnowMeltMode::AlwaysOn) => "ALWAYS_ON",
        Some(SnowMeltMode::AlwaysOff) => "ALWAYS_OFF",
        None => "UNKNOWN",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_get_status_request_encoding() {
        let request = Request {
            get_status: Some(GetStatusRequest {}),
        };
        // Field 1004, wire type 2 => varint key 8034 = [0xe2, 0x3e], then zero length.
        assert_eq!(request.encode_to_vec(), vec![0xe2, 0x3e, 0x00]);
    }

    #[test]
    fn test_snow_melt_mode_names() {
        assert_eq!(snow_melt_mode_name(0), "AUTO");
        assert_eq!(snow_melt_mode_name(1), "ALWAYS_ON");
        assert_eq!(snow_melt_mode_name(2), "ALWAYS_OFF");
        assert_eq!(snow_melt_mode_name(42), "UNKNOWN");
    }
}
