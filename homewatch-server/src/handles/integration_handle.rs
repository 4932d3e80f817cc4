use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use homewatch_api::models::IntegrationEventView;

use crate::errors::ApiError;
use crate::services::IntegrationService;

const DEFAULT_EVENT_DAYS: i64 = 1;

#[derive(Clone, Deserialize)]
pub struct EventQuery {
    days_back: Option<i64>,
    device_id: Option<String>,
}

#[derive(Clone)]
pub struct IntegrationState {
    pub integration_service: Arc<IntegrationService>,
}

pub fn integration_router(integration_state: IntegrationState) -> Router {
    Router::new()
        .route("/api/integrations/events", get(get_integration_events))
        .with_state(integration_state)
}

pub async fn get_integration_events(
    Query(query): Query<EventQuery>,
    State(state): State<IntegrationState>,
) -> Result<Json<Vec<IntegrationEventView>>, ApiError> {
    let days_back = query.days_back.unwrap_or(DEFAULT_EVENT_DAYS);

    let events = state
        .integration_service
        .get_integration_events(days_back, query.device_id.as_deref())
        .await?;

    Ok(Json(events))
}
