use std::sync::Arc;

use sqlx::{Error, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::TelemetryRecord;

pub struct TelemetryRecordRepository {
    storage: Arc<Storage>,
}

impl TelemetryRecordRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl TelemetryRecordRepository {
    pub async fn create(
        &self,
        item: &TelemetryRecord,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO telemetry_records (record_id, device_id, degrees_celsius, humidity_percent, timestamp, diagnostics)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&item.record_id)
        .bind(&item.device_id)
        .bind(item.degrees_celsius)
        .bind(item.humidity_percent)
        .bind(item.timestamp)
        .bind(&item.diagnostics)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    // The logical "latest reading" per device, derived by sort
    pub async fn find_latest_by_device(
        &self,
        device_id: &str,
    ) -> Result<Option<TelemetryRecord>, Error> {
        let record: Option<TelemetryRecord> = sqlx::query_as(
            r#"
            SELECT * FROM telemetry_records
            WHERE device_id = $1
            ORDER BY timestamp DESC
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .fetch_optional(self.storage.get_pool())
        .await?;

        Ok(record)
    }

    pub async fn find_by_device_since(
        &self,
        device_id: &str,
        start_timestamp: i64,
    ) -> Result<Vec<TelemetryRecord>, Error> {
        let records: Vec<TelemetryRecord> = sqlx::query_as(
            r#"
            SELECT * FROM telemetry_records
            WHERE device_id = $1 AND timestamp >= $2
            ORDER BY timestamp ASC
            "#,
        )
        .bind(device_id)
        .bind(start_timestamp)
        .fetch_all(self.storage.get_pool())
        .await?;

        Ok(records)
    }

    // Retention cleanup
    pub async fn delete_before(
        &self,
        cutoff_timestamp: i64,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM telemetry_records WHERE timestamp <= $1")
            .bind(cutoff_timestamp)
            .execute(&mut **transaction)
            .await?;

        Ok(result.rows_affected())
    }
}
