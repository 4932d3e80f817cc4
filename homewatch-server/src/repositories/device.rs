use std::sync::Arc;

use sqlx::{Error, Pool, Sqlite, Transaction};

use crate::configs::Storage;
use crate::models::Device;

pub struct DeviceRepository {
    storage: Arc<Storage>,
}

impl DeviceRepository {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn get_pool(&self) -> &Pool<Sqlite> {
        self.storage.get_pool()
    }
}

impl DeviceRepository {
    pub async fn create(
        &self,
        item: &Device,
        transaction: &mut Transaction<'_, Sqlite>,
    ) -> Result<(), Error> {
        sqlx::query(
            r#"
            INSERT INTO devices (device_id, device_name, created_date)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&item.device_id)
        .bind(&item.device_name)
        .bind(item.created_date)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, device_id: &str) -> Result<Option<Device>, Error> {
        let device: Option<Device> = sqlx::query_as("SELECT * FROM devices WHERE device_id = $1")
            .bind(device_id)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(device)
    }

    pub async fn find_by_name(&self, device_name: &str) -> Result<Option<Device>, Error> {
        let device: Option<Device> = sqlx::query_as("SELECT * FROM devices WHERE device_name = $1")
            .bind(device_name)
            .fetch_optional(self.storage.get_pool())
            .await?;

        Ok(device)
    }

    pub async fn find_all(&self) -> Result<Vec<Device>, Error> {
        let devices: Vec<Device> = sqlx::query_as("SELECT * FROM devices ORDER BY device_name")
            .fetch_all(self.storage.get_pool())
            .await?;

        Ok(devices)
    }
}
