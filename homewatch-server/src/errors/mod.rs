pub mod api;
pub mod device;
pub mod integration;
pub mod sensor;

pub use api::ApiError;
pub use device::DeviceError;
pub use integration::IntegrationError;
pub use sensor::SensorError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use uuid::Uuid;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Extract status code and error message from the specific error type
        let (status, error_message, error_id) = match self {
            ApiError::DeviceError(e) => (e.status_code(), e.to_string(), None),
            ApiError::SensorError(e) => (e.status_code(), e.to_string(), None),
            ApiError::IntegrationError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Integration error: {}", e);
                (e.status_code(), e.to_string(), Some(error_id.to_string()))
            }
            ApiError::DatabaseError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
            ApiError::InternalError(e) => {
                let error_id = Uuid::new_v4();
                tracing::error!(error_id = ?error_id, "Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    Some(error_id.to_string()),
                )
            }
        };

        let mut error_obj = json!({
            "code": status.as_u16(),
            "message": error_message
        });

        if let Some(error_id) = error_id {
            error_obj["error_id"] = json!(error_id);
        }

        let body = Json(json!({
            "error": error_obj
        }));

        (status, body).into_response()
    }
}
