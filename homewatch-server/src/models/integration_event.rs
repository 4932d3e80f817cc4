use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use homewatch_api::models::{IntegrationEventResult, IntegrationEventType};

use super::Table;

/// A persisted integration attempt. Appended only when an attempt reaches
/// a terminal state (success or remote failure); throttled, unsupported,
/// and misconfigured attempts are never recorded.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct IntegrationEvent {
    pub event_id: String,
    pub device_id: String,
    pub event_type: String,
    pub result: String,
    /// Unix seconds.
    pub timestamp: i64,
}

impl IntegrationEvent {
    pub fn new(
        device_id: &str,
        event_type: IntegrationEventType,
        result: IntegrationEventResult,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            device_id: device_id.to_string(),
            event_type: event_type.as_str().to_string(),
            result: result.as_str().to_string(),
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
        }
    }
}

#[derive(Clone)]
pub struct IntegrationEventTable;

impl Table for IntegrationEventTable {
    fn name(&self) -> &'static str {
        "integration_events"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS integration_events (
                event_id TEXT PRIMARY KEY,
                device_id TEXT NOT NULL,
                event_type TEXT NOT NULL,
                result TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                FOREIGN KEY (device_id) REFERENCES devices (device_id) ON DELETE CASCADE
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS integration_events;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec!["devices"]
    }
}
