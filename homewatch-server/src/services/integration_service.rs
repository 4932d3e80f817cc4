use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};

use homewatch_api::models::{
    IntegrationDeviceType, IntegrationEventResult, IntegrationEventType, IntegrationEventView,
    IntegrationOutcome, SceneKind,
};

use crate::configs::{DeviceIntegrationConfig, Integration, Storage};
use crate::errors::{ApiError, IntegrationError};
use crate::models::IntegrationEvent;
use crate::repositories::IntegrationEventRepository;
use crate::services::device_service::DeviceService;
use crate::services::actuator_service::SceneRunner;

const SECONDS_PER_DAY: i64 = 86_400;

/// Orchestrates automated remedial actions against unhealthy devices:
/// throttle check, capability check, the two-phase power-cycle, and
/// persistence of the terminal outcome.
pub struct IntegrationService {
    minimum_interval_minutes: i64,
    power_cycle_delay: Duration,
    /// Immutable per-device config, built once at construction.
    integrations: HashMap<String, DeviceIntegrationConfig>,
    events: Arc<IntegrationEventRepository>,
    devices: Arc<DeviceService>,
    actuator: Arc<dyn SceneRunner>,
    storage: Arc<Storage>,
    // Per-device advisory locks serializing check-then-act within this
    // process. Overlapping pollers in separate processes can still race
    // the throttle check; closing that needs a storage-level guard.
    device_locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl IntegrationService {
    pub fn new(
        integration: &Integration,
        storage: Arc<Storage>,
        events: Arc<IntegrationEventRepository>,
        devices: Arc<DeviceService>,
        actuator: Arc<dyn SceneRunner>,
    ) -> Self {
        let integrations = integration
            .devices
            .iter()
            .map(|config| (config.device_id.clone(), config.clone()))
            .collect::<HashMap<_, _>>();

        tracing::info!("{} device integration configs loaded", integrations.len());

        Self {
            minimum_interval_minutes: integration.minimum_interval_minutes,
            power_cycle_delay: Duration::from_secs(integration.power_cycle_seconds),
            integrations,
            events,
            devices,
            actuator,
            storage,
            device_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Whether any integration is configured for the device. Callers must
    /// check this before invoking the orchestrator.
    pub fn supports(&self, device_id: &str) -> bool {
        self.integrations.contains_key(device_id)
    }

    async fn lock_for(&self, device_id: &str) -> Arc<Mutex<()>> {
        {
            let locks = self.device_locks.read().await;
            if let Some(lock) = locks.get(device_id) {
                return Arc::clone(lock);
            }
        }

        let mut locks = self.device_locks.write().await;
        Arc::clone(
            locks
                .entry(device_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    pub async fn handle_integration_event(
        &self,
        device_id: &str,
        event_type: IntegrationEventType,
    ) -> Result<IntegrationOutcome, ApiError> {
        let config = self
            .integrations
            .get(device_id)
            .ok_or_else(|| IntegrationError::MissingConfig(device_id.to_string()))?;

        let lock = self.lock_for(device_id).await;
        let _guard = lock.lock().await;

        // Verify the minimum interval has passed since the last event
        if let Some(latest) = self.events.find_latest_by_device(device_id).await? {
            let now = OffsetDateTime::now_utc().unix_timestamp();

            if now - latest.timestamp < self.minimum_interval_minutes * 60 {
                tracing::info!(
                    "minimum interval of {} minutes has not passed since the last event for '{}'",
                    self.minimum_interval_minutes,
                    device_id
                );

                return Ok(IntegrationOutcome::new(
                    event_type,
                    IntegrationEventResult::MinimumInterval,
                    "The minimum interval has not passed since the last event",
                ));
            }
        }

        match event_type {
            IntegrationEventType::PowerCycle => self.cycle_power(device_id, config).await,
        }
    }

    /// Two-phase power-cycle: off, settle delay, on. Either phase failing
    /// is terminal for the attempt; no partial retry.
    async fn cycle_power(
        &self,
        device_id: &str,
        config: &DeviceIntegrationConfig,
    ) -> Result<IntegrationOutcome, ApiError> {
        let event_type = IntegrationEventType::PowerCycle;

        if !config.is_supported(IntegrationDeviceType::Plug) {
            tracing::info!(
                "device '{}' does not support the '{}' integration type",
                device_id,
                IntegrationDeviceType::Plug
            );

            return Ok(IntegrationOutcome::new(
                event_type,
                IntegrationEventResult::NotSupported,
                "The device does not support the integration type",
            ));
        }

        let power_off = config.scene(IntegrationDeviceType::Plug, SceneKind::PowerOff);
        let power_on = config.scene(IntegrationDeviceType::Plug, SceneKind::PowerOn);

        let (Some(power_off), Some(power_on)) = (power_off, power_on) else {
            // A malformed config must never start a partial action
            return Ok(IntegrationOutcome::new(
                event_type,
                IntegrationEventResult::InvalidConfiguration,
                "No scene is configured for one or both power-cycle phases",
            ));
        };

        if let Err(message) = self.run_phase(power_off, "power-off").await {
            self.record_event(device_id, event_type, IntegrationEventResult::Error)
                .await?;

            return Ok(IntegrationOutcome::new(
                event_type,
                IntegrationEventResult::Error,
                message,
            ));
        }

        // Hard lower bound on the physical settle time between phases
        tokio::time::sleep(self.power_cycle_delay).await;

        if let Err(message) = self.run_phase(power_on, "power-on").await {
            self.record_event(device_id, event_type, IntegrationEventResult::Error)
                .await?;

            return Ok(IntegrationOutcome::new(
                event_type,
                IntegrationEventResult::Error,
                message,
            ));
        }

        self.record_event(device_id, event_type, IntegrationEventResult::Success)
            .await?;

        Ok(IntegrationOutcome::new(
            event_type,
            IntegrationEventResult::Success,
            "Power cycle completed",
        ))
    }

    async fn run_phase(&self, scene_id: &str, phase: &str) -> Result<(), String> {
        match self.actuator.run_scene(scene_id).await {
            Ok(response) if response.is_success() => Ok(()),
            Ok(response) => Err(format!(
                "{phase} scene '{scene_id}' returned status {}",
                response.status
            )),
            Err(e) => Err(format!("{phase} scene '{scene_id}' failed: {e}")),
        }
    }

    /// Terminal outcomes (success and remote failure) are persisted so
    /// they are auditable and feed the throttle check; an unhealthy plug
    /// is not hammered on every sweep.
    async fn record_event(
        &self,
        device_id: &str,
        event_type: IntegrationEventType,
        result: IntegrationEventResult,
    ) -> Result<(), ApiError> {
        let event = IntegrationEvent::new(device_id, event_type, result);

        let mut tx = self.storage.get_pool().begin().await?;
        self.events.create(&event, &mut tx).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Time-windowed event history merged with device names for display.
    pub async fn get_integration_events(
        &self,
        days_back: i64,
        device_id: Option<&str>,
    ) -> Result<Vec<IntegrationEventView>, ApiError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let start = now - days_back * SECONDS_PER_DAY;

        let events = self.events.find_in_range(start, now, device_id).await?;

        let names: HashMap<String, String> = self
            .devices
            .get_devices()
            .await?
            .into_iter()
            .map(|device| (device.device_id, device.device_name))
            .collect();

        let views = events
            .into_iter()
            .filter_map(|event| {
                let event_type = match event.event_type.parse() {
                    Ok(event_type) => event_type,
                    Err(e) => {
                        tracing::warn!("skipping event '{}': {}", event.event_id, e);
                        return None;
                    }
                };
                let result = match event.result.parse() {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::warn!("skipping event '{}': {}", event.event_id, e);
                        return None;
                    }
                };

                let device_name = names
                    .get(&event.device_id)
                    .cloned()
                    .unwrap_or_else(|| event.device_id.clone());

                Some(IntegrationEventView {
                    event_id: event.event_id,
                    device_id: event.device_id,
                    device_name,
                    event_type,
                    result,
                    timestamp: event.timestamp,
                })
            })
            .collect();

        Ok(views)
    }
}
