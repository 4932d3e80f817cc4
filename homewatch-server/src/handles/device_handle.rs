use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use homewatch_api::models::DeviceInfo;

use crate::errors::{ApiError, DeviceError};
use crate::models::Device;
use crate::services::DeviceService;

#[derive(Clone, Deserialize)]
pub struct CreateDeviceRequest {
    pub device_name: String,
}

#[derive(Clone)]
pub struct DeviceState {
    pub device_service: Arc<DeviceService>,
}

pub fn device_router(device_state: DeviceState) -> Router {
    Router::new()
        .route("/api/devices", get(get_devices).post(create_device))
        .with_state(device_state)
}

pub async fn get_devices(
    State(state): State<DeviceState>,
) -> Result<Json<Vec<DeviceInfo>>, ApiError> {
    let devices = state.device_service.get_devices().await?;

    Ok(Json(devices.into_iter().map(DeviceInfo::from).collect()))
}

pub async fn create_device(
    State(state): State<DeviceState>,
    Json(body): Json<CreateDeviceRequest>,
) -> Result<(StatusCode, Json<DeviceInfo>), ApiError> {
    if body.device_name.trim().is_empty() {
        return Err(DeviceError::InvalidRequest.into());
    }

    let device = Device {
        device_id: Uuid::new_v4().to_string(),
        device_name: body.device_name,
        created_date: OffsetDateTime::now_utc().unix_timestamp(),
    };

    state.device_service.create_device(&device).await?;

    Ok((StatusCode::CREATED, Json(DeviceInfo::from(device))))
}
