use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use homewatch_api::models::{
    DeviceTelemetry, PollResult, PurgeResult, SensorHealth, SensorReading, TelemetryIngestRequest,
};

use crate::configs::Storage;
use crate::errors::{ApiError, SensorError};
use crate::models::TelemetryRecord;
use crate::repositories::TelemetryRecordRepository;
use crate::services::{
    DeviceService, FeatureFlags, PollService, FEATURE_TELEMETRY_INGESTION,
};

const DEFAULT_DATA_DAYS: i64 = 7;

#[derive(Clone, Deserialize)]
pub struct WindowQuery {
    days_back: Option<i64>,
}

#[derive(Clone)]
pub struct SensorState {
    pub storage: Arc<Storage>,
    pub device_service: Arc<DeviceService>,
    pub telemetry_repository: Arc<TelemetryRecordRepository>,
    pub poll_service: Arc<PollService>,
    pub feature_flags: Arc<dyn FeatureFlags>,
    pub purge_days: i64,
}

pub fn sensor_router(sensor_state: SensorState) -> Router {
    Router::new()
        .route(
            "/api/sensors/data",
            get(get_sensor_data).post(ingest_telemetry),
        )
        .route("/api/sensors/health", get(get_sensor_health))
        .route("/api/sensors/info", get(get_sensor_info))
        .route("/api/sensors/poll", post(poll_sensor_status))
        .route("/api/sensors/purge", post(purge_telemetry))
        .with_state(sensor_state)
}

pub async fn ingest_telemetry(
    State(state): State<SensorState>,
    Json(body): Json<TelemetryIngestRequest>,
) -> Result<Json<SensorReading>, ApiError> {
    if !state.feature_flags.is_enabled(FEATURE_TELEMETRY_INGESTION).await {
        return Err(SensorError::IngestionDisabled.into());
    }

    // Unknown devices are rejected rather than auto-registered
    let device = state.device_service.get_device(&body.device_id).await?;

    let record = TelemetryRecord::new(
        &device.device_id,
        body.degrees_celsius,
        body.humidity_percent,
        body.diagnostics,
    );

    let mut tx = state.storage.get_pool().begin().await?;
    state.telemetry_repository.create(&record, &mut tx).await?;
    tx.commit().await?;

    tracing::debug!("recorded telemetry for '{}'", device.device_name);

    Ok(Json(SensorReading::from(record)))
}

pub async fn get_sensor_data(
    Query(window): Query<WindowQuery>,
    State(state): State<SensorState>,
) -> Result<Json<Vec<DeviceTelemetry>>, ApiError> {
    let days_back = window.days_back.unwrap_or(DEFAULT_DATA_DAYS);

    let telemetry = state.poll_service.sensor_data(days_back).await?;

    Ok(Json(telemetry))
}

pub async fn get_sensor_health(
    State(state): State<SensorState>,
) -> Result<Json<Vec<SensorHealth>>, ApiError> {
    let health = state.poll_service.sensor_health().await?;

    Ok(Json(health))
}

pub async fn get_sensor_info(
    State(state): State<SensorState>,
) -> Result<Json<Vec<SensorHealth>>, ApiError> {
    let info = state.poll_service.sensor_info().await?;

    Ok(Json(info))
}

pub async fn poll_sensor_status(
    State(state): State<SensorState>,
) -> Result<Json<Vec<PollResult>>, ApiError> {
    let results = state.poll_service.poll_sensor_status().await?;

    Ok(Json(results))
}

pub async fn purge_telemetry(
    State(state): State<SensorState>,
) -> Result<Json<PurgeResult>, ApiError> {
    let result = state.poll_service.purge_telemetry(state.purge_days).await?;

    Ok(Json(result))
}
