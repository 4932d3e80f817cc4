use std::sync::Arc;

use time::OffsetDateTime;

use homewatch_api::models::{
    DeviceTelemetry, IntegrationEventType, PollResult, PurgeResult, SensorHealth,
    SensorHealthStats, SensorReading,
};

use crate::configs::Storage;
use crate::errors::ApiError;
use crate::models::Device;
use crate::repositories::TelemetryRecordRepository;
use crate::services::alert_service::AlertService;
use crate::services::device_service::DeviceService;
use crate::services::feature_service::{FeatureFlags, FEATURE_SENSOR_ALERT_EMAILS};
use crate::services::health_service::HealthEvaluator;
use crate::services::integration_service::IntegrationService;

const SECONDS_PER_DAY: i64 = 86_400;

/// Fleet-wide sweep over the device registry: evaluates health per device,
/// triggers remedial integrations for the unhealthy ones, and dispatches
/// alerts when enabled.
pub struct PollService {
    devices: Arc<DeviceService>,
    telemetry: Arc<TelemetryRecordRepository>,
    evaluator: HealthEvaluator,
    integration: Arc<IntegrationService>,
    alerts: Arc<AlertService>,
    flags: Arc<dyn FeatureFlags>,
    storage: Arc<Storage>,
}

impl PollService {
    pub fn new(
        devices: Arc<DeviceService>,
        telemetry: Arc<TelemetryRecordRepository>,
        evaluator: HealthEvaluator,
        integration: Arc<IntegrationService>,
        alerts: Arc<AlertService>,
        flags: Arc<dyn FeatureFlags>,
        storage: Arc<Storage>,
    ) -> Self {
        Self {
            devices,
            telemetry,
            evaluator,
            integration,
            alerts,
            flags,
            storage,
        }
    }

    /// A lookup failure for one device must not sink the sweep, so it
    /// degrades to an unhealthy verdict with zeroed stats.
    async fn evaluate_device(&self, device: &Device, now: i64) -> SensorHealthStats {
        match self.telemetry.find_latest_by_device(&device.device_id).await {
            Ok(latest) => self.evaluator.evaluate(latest.as_ref(), now),
            Err(e) => {
                tracing::warn!(
                    "telemetry lookup failed for '{}', treating as unhealthy: {}",
                    device.device_id,
                    e
                );
                self.evaluator.evaluate(None, now)
            }
        }
    }

    /// Health verdicts for the whole registry, sorted by device name.
    pub async fn sensor_health(&self) -> Result<Vec<SensorHealth>, ApiError> {
        let devices = self.devices.get_devices().await?;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let verdicts = futures::future::join_all(
            devices
                .iter()
                .map(|device| self.evaluate_device(device, now)),
        )
        .await;

        let mut health: Vec<SensorHealth> = devices
            .into_iter()
            .zip(verdicts)
            .map(|(device, verdict)| SensorHealth {
                device_id: device.device_id,
                device_name: device.device_name,
                health: verdict,
                data: None,
            })
            .collect();

        health.sort_by(|a, b| a.device_name.cmp(&b.device_name));

        Ok(health)
    }

    /// Health verdicts with the latest reading attached, sorted by name.
    pub async fn sensor_info(&self) -> Result<Vec<SensorHealth>, ApiError> {
        let devices = self.devices.get_devices().await?;
        let now = OffsetDateTime::now_utc().unix_timestamp();

        let mut info = Vec::with_capacity(devices.len());

        for device in devices {
            let latest = self.telemetry.find_latest_by_device(&device.device_id).await?;
            let verdict = self.evaluator.evaluate(latest.as_ref(), now);

            info.push(SensorHealth {
                device_id: device.device_id,
                device_name: device.device_name,
                health: verdict,
                data: latest.map(SensorReading::from),
            });
        }

        info.sort_by(|a, b| a.device_name.cmp(&b.device_name));

        Ok(info)
    }

    /// Windowed readings per device, oldest first within each device.
    pub async fn sensor_data(&self, days_back: i64) -> Result<Vec<DeviceTelemetry>, ApiError> {
        let devices = self.devices.get_devices().await?;
        let since = OffsetDateTime::now_utc().unix_timestamp() - days_back * SECONDS_PER_DAY;

        let mut telemetry = Vec::with_capacity(devices.len());

        for device in devices {
            let records = self
                .telemetry
                .find_by_device_since(&device.device_id, since)
                .await?;

            telemetry.push(DeviceTelemetry {
                device_id: device.device_id,
                data: records.into_iter().map(SensorReading::from).collect(),
            });
        }

        Ok(telemetry)
    }

    /// One full sweep. Healthy devices produce no result; each unhealthy
    /// device with a configured integration gets one power-cycle attempt,
    /// and the orchestrator's own throttle keeps repeat sweeps from
    /// hammering the actuator. Alerting is gated per device so a flag
    /// flip mid-sweep takes effect immediately. A failure in one device's
    /// attempt never aborts the sweep over the rest.
    pub async fn poll_sensor_status(&self) -> Result<Vec<PollResult>, ApiError> {
        let health = self.sensor_health().await?;

        tracing::info!("polling {} devices", health.len());

        let mut results = Vec::new();

        for sensor in health {
            if sensor.health.status.is_healthy() {
                continue;
            }

            tracing::info!(
                "device '{}' is unhealthy, {} seconds since last contact",
                sensor.device_name,
                sensor.health.seconds_elapsed
            );

            let mut integration = None;

            if self.integration.supports(&sensor.device_id) {
                match self
                    .integration
                    .handle_integration_event(&sensor.device_id, IntegrationEventType::PowerCycle)
                    .await
                {
                    Ok(outcome) => integration = Some(outcome),
                    Err(e) => {
                        tracing::error!(
                            "integration attempt failed for '{}': {}",
                            sensor.device_id,
                            e
                        );
                    }
                }
            }

            if self.flags.is_enabled(FEATURE_SENSOR_ALERT_EMAILS).await {
                let body = AlertService::sensor_failure_body(
                    &sensor.device_name,
                    sensor.health.seconds_elapsed,
                );

                if let Err(e) = self.alerts.send_alert("Sensor Failure", &body).await {
                    tracing::error!(
                        "alert dispatch failed for '{}': {}",
                        sensor.device_name,
                        e
                    );
                }
            }

            results.push(PollResult {
                device_id: sensor.device_id,
                is_healthy: false,
                integration,
            });
        }

        results.sort_by(|a, b| a.device_id.cmp(&b.device_id));

        Ok(results)
    }

    /// Deletes readings older than the retention window and reports the
    /// outcome by email. A failed summary email does not fail the purge.
    pub async fn purge_telemetry(&self, retention_days: i64) -> Result<PurgeResult, ApiError> {
        let cutoff = OffsetDateTime::now_utc().unix_timestamp() - retention_days * SECONDS_PER_DAY;

        let mut tx = self.storage.get_pool().begin().await?;
        let deleted = self.telemetry.delete_before(cutoff, &mut tx).await?;
        tx.commit().await?;

        tracing::info!("purged {} telemetry records older than {}", deleted, cutoff);

        let body = AlertService::purge_summary_body(cutoff, deleted);
        if let Err(e) = self.alerts.send_alert("Telemetry Purge", &body).await {
            tracing::error!("purge summary dispatch failed: {}", e);
        }

        Ok(PurgeResult { deleted })
    }
}
