use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One sensor reading as exposed to API consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub record_id: String,
    pub device_id: String,
    pub degrees_celsius: f64,
    pub humidity_percent: f64,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub diagnostics: Value,
}

/// Payload posted by a sensor to record a reading.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TelemetryIngestRequest {
    pub device_id: String,
    pub degrees_celsius: f64,
    pub humidity_percent: f64,
    #[serde(default)]
    pub diagnostics: Value,
}

/// Windowed telemetry for one device.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeviceTelemetry {
    pub device_id: String,
    pub data: Vec<SensorReading>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeResult {
    pub deleted: u64,
}
