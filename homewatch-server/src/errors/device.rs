use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Device not found")]
    DeviceNotFound,

    #[error("Device name already exists")]
    DeviceNameExists,

    #[error("Invalid request parameters")]
    InvalidRequest,
}

impl DeviceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeviceError::DeviceNotFound => StatusCode::NOT_FOUND,
            DeviceError::DeviceNameExists => StatusCode::CONFLICT,
            DeviceError::InvalidRequest => StatusCode::BAD_REQUEST,
        }
    }
}
