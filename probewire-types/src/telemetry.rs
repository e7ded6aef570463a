//! DTOs for the probe-thermometer cloud API.
//!
//! Only the fields the relay reads are typed; everything is defaulted so that
//! partial payloads still deserialize.
#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cloud-connected thermometer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Device {
    pub uuid: String,
    pub id: u64,
    pub title: String,
    pub hardware_id: String,
    pub created: Option<DateTime<Utc>>,
    pub model: Option<String>,
    pub channels: Vec<Channel>,
    pub latest_temps: Vec<ChannelTemperature>,
    pub device_log: Option<DeviceLog>,
    pub last_templog: Option<DateTime<Utc>>,
}

impl Device {
    /// True when the device reported at least one temperature recently.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.latest_temps.is_empty()
    }
}

/// One probe port on a device.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: u64,
    pub channel: u32,
    pub channel_label: String,
    pub color_hex: String,
    pub enabled: bool,
    pub sessionid: Option<u64>,
    pub created: Option<DateTime<Utc>>,
}

/// Health details a device reports about itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceLog {
    pub v_batt: Option<f64>,
    pub v_batt_per: Option<f64>,
    pub onboard_temp: Option<f64>,
    pub signallevel: Option<i32>,
    pub version: Option<String>,
    pub model: Option<String>,
}

/// Current temperature of one channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelTemperature {
    pub channel: u32,
    pub temp: f64,
    /// 1 = Celsius, 2 = Fahrenheit.
    pub degreetype: u8,
    pub created: Option<DateTime<Utc>>,
}

/// A recorded cook session on the remote service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySession {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub device_ids: Vec<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub devices: Vec<Device>,
}

/// Historical chart of one channel in a session: parallel timestamp/value arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartData {
    pub label: String,
    pub channel_id: u64,
    pub device: String,
    pub degreetype: u8,
    pub color: String,
    /// Absent in older payloads, where every charted channel is live.
    pub enabled: bool,
    /// Sample timestamps, ascending.
    pub x: Vec<i64>,
    /// Sample values, aligned with `x`.
    pub y: Vec<f64>,
}

impl Default for ChartData {
    fn default() -> Self {
        Self {
            label: String::new(),
            channel_id: 0,
            device: String::new(),
            degreetype: 0,
            color: String::new(),
            enabled: true,
            x: Vec::new(),
            y: Vec::new(),
        }
    }
}
