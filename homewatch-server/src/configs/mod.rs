mod schema;
mod settings;
mod storage;

pub use schema::SchemaManager;
pub use settings::{
    Alert, Database, DeviceIntegrationConfig, Features, Integration, IntegrationBinding, Plug,
    Settings,
};
pub use storage::Storage;
