use serde::{Deserialize, Serialize};

/// A registered sensor endpoint as exposed to API consumers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub device_id: String,
    pub device_name: String,
    /// Unix seconds at which the device was registered.
    pub created_date: i64,
}
