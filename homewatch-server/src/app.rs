use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::handles::*;
use crate::services::{
    feature_flags_from, AlertService, CacheService, DeviceService, EmailGatewayClient,
    HealthEvaluator, IntegrationService, PlugClient, PollService,
};
use crate::repositories::{
    DeviceRepository, IntegrationEventRepository, TelemetryRecordRepository,
};

pub async fn create_app(settings: &Arc<Settings>) -> Router {
    let storage = Arc::new(
        Storage::new(settings.database.clone(), SchemaManager::default())
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

    let plug_client = Arc::new(PlugClient::new(settings.plug.clone()).unwrap());
    let email_gateway = Arc::new(EmailGatewayClient::new(&settings.alert).unwrap());
    let alert_service = Arc::new(AlertService::new(
        email_gateway,
        settings.alert.recipient.clone(),
    ));
    let feature_flags = feature_flags_from(&settings.features).unwrap();

    let integration_service = Arc::new(IntegrationService::new(
        &settings.integration,
        storage.clone(),
        event_repository.clone(),
        device_service.clone(),
        plug_client,
    ));

    let evaluator = HealthEvaluator::new(settings.integration.unhealthy_after_seconds);

    let poll_service = Arc::new(PollService::new(
        device_service.clone(),
        telemetry_repository.clone(),
        evaluator,
        integration_service.clone(),
        alert_service.clone(),
        feature_flags.clone(),
        storage.clone(),
    ));

    let sensors = sensor_router(SensorState {
        storage: storage.clone(),
        device_service: device_service.clone(),
        telemetry_repository: telemetry_repository.clone(),
        poll_service: poll_service.clone(),
        feature_flags: feature_flags.clone(),
        purge_days: settings.integration.purge_days,
    });

    let integrations = integration_router(IntegrationState {
        integration_service: integration_service.clone(),
    });

    let devices = device_router(DeviceState {
        device_service: device_service.clone(),
    });

    Router::new()
        .merge(sensors)
        .merge(integrations)
        .merge(devices)
        .merge(health_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
