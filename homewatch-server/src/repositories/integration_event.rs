use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::IntegrationEvent;

pub struct IntegrationEventRepository {
    storage: Arc<Storage>,
}

impl IntegrationEventRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl IntegrationEventRepository {
    pub async fn create(
        &self,
        item: &IntegrationEvent,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO integration_events (event_id, device_id, event_type, result, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&item.event_id)
        .bind(&item.device_id)
        .bind(&item.event_type)
        .bind(&item.result)
        .bind(item.timestamp)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    // The single newest event per device feeds the throttle check
    pub async fn find_latest_by_device(
        &self,
        device_id: &str,
    ) -> Result<Option<IntegrationEvent>, Error> {
        let event: Option<IntegrationEvent> = sqlx::query_as(
            r#"
            SELECT * FROM integration_events
            WHERE device_id = $1
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(self.storage.get_pool())
        .await?;

        Ok(event)
    }

    pub async fn find_in_range(
        &self,
        start_timestamp: i64,
        end_timestamp: i64,
        device_id: Option<&str>,
    ) -> Result<Vec<IntegrationEvent>, Error> {
        let events: Vec<IntegrationEvent> = match device_id {
            Some(device_id) => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM integration_events
                    WHERE timestamp > $1 AND timestamp <= $2 AND device_id = $3
                    ORDER BY timestamp DESC
                    "#,
                )
                .bind(start_timestamp)
                .bind(end_timestamp)
                .bind(device_id)
                .fetch_all(self.storage.get_pool())
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"
                    SELECT * FROM integration_events
                    WHERE timestamp > $1 AND timestamp <= $2
                    ORDER BY timestamp DESC
                    "#,
                )
                .bind(start_timestamp)
                .bind(end_timestamp)
                .fetch_all(self.storage.get_pool())
                .await?
            }
        };

        Ok(events)
    }
}
