use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    /// Raised when the orchestrator is invoked for a device without an
    /// integration config. Callers must probe support first; reaching
    /// this is an upstream invariant violation, not a runtime state.
    #[error("No integration config is defined for device '{0}'")]
    MissingConfig(String),
}

impl IntegrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntegrationError::MissingConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
