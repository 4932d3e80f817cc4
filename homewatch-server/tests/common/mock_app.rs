use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use tokio::sync::Mutex;

use homewatch_api::models::{IntegrationDeviceType, IntegrationEventResult, IntegrationEventType, SceneKind};
use homewatch_server::configs::{
    Database, DeviceIntegrationConfig, Integration, IntegrationBinding, SchemaManager, Storage,
};
use homewatch_server::handles::{
    device_router, health_router, integration_router, sensor_router, DeviceState,
    IntegrationState, SensorState,
};
use homewatch_server::models::{Device, IntegrationEvent, TelemetryRecord};
use homewatch_server::repositories::{
    DeviceRepository, IntegrationEventRepository, TelemetryRecordRepository,
};
use homewatch_server::services::{
    AlertGateway, AlertService, CacheService, DeviceService, HealthEvaluator, IntegrationService,
    PollService, SceneResponse, SceneRunner, StaticFeatureFlags, FEATURE_TELEMETRY_INGESTION,
};

/// Scene runner that records every invocation and answers with scripted
/// statuses (200 unless overridden).
pub struct MockSceneRunner {
    calls: Mutex<Vec<String>>,
    statuses: Mutex<HashMap<String, u16>>,
}

impl MockSceneRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub async fn set_status(&self, scene_id: &str, status: u16) {
        self.statuses
            .lock()
            .await
            .insert(scene_id.to_string(), status);
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl SceneRunner for MockSceneRunner {
    async fn run_scene(&self, scene_id: &str) -> anyhow::Result<SceneResponse> {
        self.calls.lock().await.push(scene_id.to_string());

        let status = self
            .statuses
            .lock()
            .await
            .get(scene_id)
            .copied()
            .unwrap_or(200);

        Ok(SceneResponse {
            status,
            body: json!({}),
        })
    }
}

/// Gateway that captures alerts instead of sending them.
pub struct MockAlertGateway {
    sent: Mutex<Vec<(String, String, String)>>,
}

impl MockAlertGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub async fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl AlertGateway for MockAlertGateway {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        self.sent.lock().await.push((
            recipient.to_string(),
            subject.to_string(),
            body.to_string(),
        ));

        Ok(())
    }
}

pub struct MockOptions {
    pub minimum_interval_minutes: i64,
    pub power_cycle_seconds: u64,
    pub unhealthy_after_seconds: i64,
    pub purge_days: i64,
    pub devices: Vec<DeviceIntegrationConfig>,
    pub flags: HashMap<String, bool>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            minimum_interval_minutes: 60,
            power_cycle_seconds: 0,
            unhealthy_after_seconds: 5_400,
            purge_days: 30,
            devices: Vec::new(),
            flags: HashMap::from([(FEATURE_TELEMETRY_INGESTION.to_string(), true)]),
        }
    }
}

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub router: Router,
    pub device_service: Arc<DeviceService>,
    pub integration_service: Arc<IntegrationService>,
    pub poll_service: Arc<PollService>,
    pub event_repository: Arc<IntegrationEventRepository>,
    pub telemetry_repository: Arc<TelemetryRecordRepository>,
    pub scene_runner: Arc<MockSceneRunner>,
    pub alert_gateway: Arc<MockAlertGateway>,
}

impl MockApp {
    pub async fn new() -> Self {
        Self::with_options(MockOptions::default()).await
    }

    pub async fn with_options(options: MockOptions) -> Self {
        let storage = Arc::new(
            Storage::new(
                Database {
                    clean_start: true,
                    url: String::from("sqlite::memory:"),
                },
                SchemaManager::default(),
            )
            .await
            .unwrap(),
        );

        let cache_service = Arc::new(CacheService::new(None));

        let device_repository = Arc::new(DeviceRepository::new(storage.clone()));
        let telemetry_repository = Arc::new(TelemetryRecordRepository::new(storage.clone()));
        let event_repository = Arc::new(IntegrationEventRepository::new(storage.clone()));

        let device_service = Arc::new(DeviceService::new(
            device_repository.clone(),
            cache_service.clone(),
        ));

        let scene_runner = Arc::new(MockSceneRunner::new());
        let alert_gateway = Arc::new(MockAlertGateway::new());
        let alert_service = Arc::new(AlertService::new(
            alert_gateway.clone(),
            String::from("ops@test.com"),
        ));
        let feature_flags = Arc::new(StaticFeatureFlags::new(options.flags));

        let integration = Integration {
            minimum_interval_minutes: options.minimum_interval_minutes,
            power_cycle_seconds: options.power_cycle_seconds,
            unhealthy_after_seconds: options.unhealthy_after_seconds,
            purge_days: options.purge_days,
            devices: options.devices,
        };

        let integration_service = Arc::new(IntegrationService::new(
            &integration,
            storage.clone(),
            event_repository.clone(),
            device_service.clone(),
            scene_runner.clone(),
        ));

        let evaluator = HealthEvaluator::new(integration.unhealthy_after_seconds);

        let poll_service = Arc::new(PollService::new(
            device_service.clone(),
            telemetry_repository.clone(),
            evaluator,
            integration_service.clone(),
            alert_service.clone(),
            feature_flags.clone(),
            storage.clone(),
        ));

        let router = Router::new()
            .merge(sensor_router(SensorState {
                storage: storage.clone(),
                device_service: device_service.clone(),
                telemetry_repository: telemetry_repository.clone(),
                poll_service: poll_service.clone(),
                feature_flags: feature_flags.clone(),
                purge_days: integration.purge_days,
            }))
            .merge(integration_router(IntegrationState {
                integration_service: integration_service.clone(),
            }))
            .merge(device_router(DeviceState {
                device_service: device_service.clone(),
            }))
            .merge(health_router());

        Self {
            storage,
            router,
            device_service,
            integration_service,
            poll_service,
            event_repository,
            telemetry_repository,
            scene_runner,
            alert_gateway,
        }
    }

    pub async fn create_test_device(&self, device_id: &str, device_name: &str) -> Device {
        sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (device_id, device_name, created_date)
                VALUES ($1, $2, 1700000000)
                RETURNING *;
            "#,
        )
        .bind(device_id)
        .bind(device_name)
        .fetch_one(self.storage.get_pool())
        .await
        .unwrap()
    }

    pub async fn insert_telemetry(&self, device_id: &str, timestamp: i64) -> TelemetryRecord {
        let mut record = TelemetryRecord::new(device_id, 21.5, 40.0, json!({}));
        record.timestamp = timestamp;

        let mut tx = self.storage.get_pool().begin().await.unwrap();
        self.telemetry_repository
            .create(&record, &mut tx)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        record
    }

    pub async fn insert_event_at(
        &self,
        device_id: &str,
        result: IntegrationEventResult,
        timestamp: i64,
    ) -> IntegrationEvent {
        let mut event = IntegrationEvent::new(device_id, IntegrationEventType::PowerCycle, result);
        event.timestamp = timestamp;

        let mut tx = self.storage.get_pool().begin().await.unwrap();
        self.event_repository.create(&event, &mut tx).await.unwrap();
        tx.commit().await.unwrap();

        event
    }
}

/// Config granting a device a plug integration with both scenes bound.
pub fn plug_config(device_id: &str, off_scene: &str, on_scene: &str) -> DeviceIntegrationConfig {
    DeviceIntegrationConfig {
        device_id: device_id.to_string(),
        integrations: vec![IntegrationBinding {
            device_type: IntegrationDeviceType::Plug,
            scenes: HashMap::from([
                (SceneKind::PowerOff, off_scene.to_string()),
                (SceneKind::PowerOn, on_scene.to_string()),
            ]),
        }],
    }
}
