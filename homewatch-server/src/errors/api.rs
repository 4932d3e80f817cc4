use super::{DeviceError, IntegrationError, SensorError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Device error: {0}")]
    DeviceError(#[from] DeviceError),

    #[error("Sensor error: {0}")]
    SensorError(#[from] SensorError),

    #[error("Integration error: {0}")]
    IntegrationError(#[from] IntegrationError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
