use std::fmt;

use serde::{Deserialize, Serialize};

use super::telemetry::SensorReading;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Health verdict derived from telemetry recency. Computed fresh on every
/// evaluation, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorHealthStats {
    pub status: HealthStatus,
    /// Unix seconds of the latest telemetry record, 0 when none exists.
    pub last_contact: i64,
    /// Seconds between now and the latest record, 0 when none exists.
    pub seconds_elapsed: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SensorHealth {
    pub device_id: String,
    pub device_name: String,
    pub health: SensorHealthStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<SensorReading>,
}
