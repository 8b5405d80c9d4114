//! Normalized dish statistics and status classification.

use crate::dish::StatusSnapshot;

use serde::Serialize;
use std::fmt;

/// Obstruction percentage above which an online link is flagged.
pub const OBSTRUCTED_THRESHOLD_PCT: f64 = 5.0;

const BITS_PER_MEGABIT: f64 = 1_000_000.0;
const PLACEHOLDER: &str = "--";
const UNKNOWN_VERSION: &str = "Unknown";
const UNKNOWN_HEATER: &str = "UNKNOWN";

/// Link status as shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusText {
    #[serde(rename = "Connecting...")]
    Connecting,
    #[serde(rename = "Online")]
    Online,
    #[serde(rename = "Online (Obstructed)")]
    OnlineObstructed,
    #[serde(rename = "Obstructed")]
    Obstructed,
    #[serde(rename = "Idle")]
    Idle,
    #[serde(rename = "Disconnected")]
    Disconnected,
}

impl StatusText {
    pub fn label(&self) -> &'static str {
        match self {
            StatusText::Connecting => "Connecting...",
            StatusText::Online => "Online",
            StatusText::OnlineObstructed => "Online (Obstructed)",
            StatusText::Obstructed => "Obstructed",
            StatusText::Idle => "Idle",
            StatusText::Disconnected => "Disconnected",
        }
    }

    pub fn indicator(&self) -> Indicator {
        match self {
            StatusText::Connecting => Indicator::Gray,
            StatusText::Online | StatusText::Idle => Indicator::Green,
            StatusText::OnlineObstructed | StatusText::Obstructed => Indicator::Yellow,
            StatusText::Disconnected => Indicator::Red,
        }
    }
}

impl fmt::Display for StatusText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour class a status surface uses for its indicator dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    Gray,
    Green,
    Yellow,
    Red,
}

/// The normalized statistics record.
///
/// Serialized field names match the JSON keys the companion UI reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub online: bool,
    pub status_text: StatusText,
    #[serde(rename = "down")]
    pub down_mbps: f64,
    #[serde(rename = "up")]
    pub up_mbps: f64,
    #[serde(rename = "ping")]
    pub ping_ms: f64,
    pub obstructed_pct: f64,
    pub obstruction_valid_s: f64,
    pub uptime_s: f64,
    pub hardware: String,
    pub software: String,
    pub country_code: String,
    pub gps_valid: bool,
    pub gps_sats: u32,
    #[serde(rename = "azimuth")]
    pub azimuth_deg: f64,
    #[serde(rename = "elevation")]
    pub elevation_deg: f64,
    #[serde(rename = "tilt")]
    pub tilt_deg: f64,
    #[serde(rename = "heater")]
    pub heater_mode: String,
    #[serde(rename = "eth_speed")]
    pub eth_speed_mbps: u32,
    pub snr_good: bool,
}

impl Default for Stats {
    /// State before the first tick.
    fn default() -> Self {
        Self {
            online: false,
            status_text: StatusText::Connecting,
            down_mbps: 0.0,
            up_mbps: 0.0,
            ping_ms: 0.0,
            obstructed_pct: 0.0,
            obstruction_valid_s: 0.0,
            uptime_s: 0.0,
            hardware: PLACEHOLDER.to_string(),
            software: PLACEHOLDER.to_string(),
            country_code: PLACEHOLDER.to_string(),
            gps_valid: false,
            gps_sats: 0,
            azimuth_deg: 0.0,
            elevation_deg: 0.0,
            tilt_deg: 0.0,
            heater_mode: PLACEHOLDER.to_string(),
            eth_speed_mbps: 0,
            snr_good: false,
        }
    }
}

/// Map one successfully fetched snapshot into a fully populated record.
pub fn normalize(snapshot: &StatusSnapshot) -> Stats {
    let down_mbps = non_negative(snapshot.downlink_throughput_bps.unwrap_or(0.0)) / BITS_PER_MEGABIT;
    let up_mbps = non_negative(snapshot.uplink_throughput_bps.unwrap_or(0.0)) / BITS_PER_MEGABIT;
    let ping_ms = non_negative(snapshot.pop_ping_latency_ms.unwrap_or(0.0));
    let obstructed_pct = (non_negative(snapshot.fraction_obstructed.unwrap_or(0.0)) * 100.0).min(100.0);

    Stats {
        online: true,
        status_text: classify(down_mbps, ping_ms, obstructed_pct),
        down_mbps,
        up_mbps,
        ping_ms,
        obstructed_pct,
        obstruction_valid_s: non_negative(snapshot.obstruction_valid_s.unwrap_or(0.0)),
        uptime_s: snapshot.uptime_s.unwrap_or(0) as f64,
        hardware: text_or(&snapshot.hardware_version, UNKNOWN_VERSION),
        software: text_or(&snapshot.software_version, UNKNOWN_VERSION),
        country_code: text_or(&snapshot.country_code, PLACEHOLDER),
        gps_valid: snapshot.gps_valid.unwrap_or(false),
        gps_sats: snapshot.gps_sats.unwrap_or(0),
        azimuth_deg: finite_or_zero(snapshot.boresight_azimuth_deg.unwrap_or(0.0)),
        elevation_deg: finite_or_zero(snapshot.boresight_elevation_deg.unwrap_or(0.0)),
        tilt_deg: finite_or_zero(snapshot.tilt_angle_deg.unwrap_or(0.0)),
        heater_mode: text_or(&snapshot.snow_melt_mode, UNKNOWN_HEATER),
        eth_speed_mbps: snapshot.eth_speed_mbps.unwrap_or(0).max(0) as u32,
        snr_good: snapshot.is_snr_above_noise_floor.unwrap_or(false),
    }
}

/// Classify a reachable dish. First match wins: traffic or latency means
/// online, otherwise any obstruction, otherwise idle.
pub fn classify(down_mbps: f64, ping_ms: f64, obstructed_pct: f64) -> StatusText {
    if down_mbps > 0.0 || ping_ms > 0.0 {
        if obstructed_pct > OBSTRUCTED_THRESHOLD_PCT {
            StatusText::OnlineObstructed
        } else {
            StatusText::Online
        }
    } else if obstructed_pct > 0.0 {
        StatusText::Obstructed
    } else {
        StatusText::Idle
    }
}

/// Render uptime as `H:MM:SS`, prefixed with whole days once over a day.
pub fn format_uptime(seconds: f64) -> String {
    let total = non_negative(seconds) as u64;
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let secs = total % 60;

    match days {
        0 => format!("{}:{:02}:{:02}", hours, minutes, secs),
        1 => format!("1 day, {}:{:02}:{:02}", hours, minutes, secs),
        n => format!("{} days, {}:{:02}:{:02}", n, hours, minutes, secs),
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn text_or(value: &Option<String>, default: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s.clone(),
        _ => default.to_string(),
    }
}
