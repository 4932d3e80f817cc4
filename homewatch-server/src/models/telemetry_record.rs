use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use homewatch_api::models::SensorReading;

use super::Table;

/// One appended sensor reading. Immutable; the logical "latest per
/// device" is derived by query, never stored separately.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct TelemetryRecord {
    pub record_id: String,
    pub device_id: String,
    pub degrees_celsius: f64,
    pub humidity_percent: f64,
    /// Unix seconds.
    pub timestamp: i64,
    pub diagnostics: Value,
}

impl TelemetryRecord {
    pub fn new(device_id: &str, degrees_celsius: f64, humidity_percent: f64, diagnostics: Value) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            device_id: device_id.to_string(),
            degrees_celsius,
            humidity_percent,
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
            diagnostics,
        }
    }
}

impl From<TelemetryRecord> for SensorReading {
    fn from(record: TelemetryRecord) -> Self {
        SensorReading {
            record_id: record.record_id,
            device_id: record.device_id,
            degrees_celsius: record.degrees_celsius,
            humidity_percent: record.humidity_percent,
            timestamp: record.timestamp,
            diagnostics: record.diagnostics,
        }
    }
}

#[derive(Clone)]
pub struct TelemetryRecordTable;

impl Table for TelemetryRecordTable {
    fn name(&self) -> &'static str {
        "telemetry_records"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS telemetry_records (
                record_id TEXT PRIMARY KEY,
                device_id TEXT NOT NULL,
                degrees_celsius REAL NOT NULL,
                humidity_percent REAL NOT NULL,
                timestamp INTEGER NOT NULL,
                diagnostics JSON NOT NULL DEFAULT '{}',
                FOREIGN KEY (device_id) REFERENCES devices (device_id) ON DELETE CASCADE
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS telemetry_records;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["devices"]
    }
}
