use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Liveness and readiness probes for deploy orchestration.
pub fn health_router() -> Router {
    Router::new()
        .route("/api/health/alive", get(alive))
        .route("/api/health/ready", get(ready))
}

pub async fn alive() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn ready() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
