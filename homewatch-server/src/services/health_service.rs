use homewatch_api::models::{HealthStatus, SensorHealthStats};

use crate::models::TelemetryRecord;

/// Classifies device health from telemetry recency. Pure; callers supply
/// the clock so verdicts stay deterministic under test.
#[derive(Clone, Copy, Debug)]
pub struct HealthEvaluator {
    unhealthy_after_seconds: i64,
}

impl HealthEvaluator {
    pub fn new(unhealthy_after_seconds: i64) -> Self {
        Self {
            unhealthy_after_seconds,
        }
    }

    /// A device with no telemetry at all is unhealthy with zeroed stats.
    /// Otherwise the verdict is unhealthy iff the elapsed silence has
    /// reached the threshold (boundary counts as unhealthy).
    pub fn evaluate(&self, latest: Option<&TelemetryRecord>, now: i64) -> SensorHealthStats {
        let Some(record) = latest else {
            return SensorHealthStats {
                status: HealthStatus::Unhealthy,
                last_contact: 0,
                seconds_elapsed: 0,
            };
        };

        let seconds_elapsed = now - record.timestamp;

        let status = if seconds_elapsed >= self.unhealthy_after_seconds {
            HealthStatus::Unhealthy
        } else {
            HealthStatus::Healthy
        };

        SensorHealthStats {
            status,
            last_contact: record.timestamp,
            seconds_elapsed,
        }
    }
}
