use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Telemetry ingestion is disabled")]
    IngestionDisabled,
}

impl SensorError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SensorError::IngestionDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
