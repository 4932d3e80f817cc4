use serde::{Deserialize, Serialize};

use homewatch_api::models::DeviceInfo;

use super::Table;

/// A registered sensor endpoint. Identity is stable; names are updated
/// out-of-band only.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Device {
    pub device_id: String,
    pub device_name: String,
    /// Unix seconds.
    pub created_date: i64,
}

impl From<Device> for DeviceInfo {
    fn from(device: Device) -> Self {
        DeviceInfo {
            device_id: device.device_id,
            device_name: device.device_name,
            created_date: device.created_date,
        }
    }
}

#[derive(Clone)]
pub struct DeviceTable;

impl Table for DeviceTable {
    fn name(&self) -> &'static str {
        "devices"
    }

    fn create(&self) -> String {
        String::from(
            r#"
            CREATE TABLE IF NOT EXISTS devices (
                device_id TEXT PRIMARY KEY,
                device_name TEXT NOT NULL UNIQUE,
                created_date INTEGER NOT NULL
            );
            "#,
        )
    }

    fn dispose(&self) -> String {
        String::from("DROP TABLE IF EXISTS devices;")
    }

    fn dependencies(&self) -> Vec<&'static str> {
        vec![]
    }
}
