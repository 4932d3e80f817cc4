pub mod device_handle;
pub mod health_handle;
pub mod integration_handle;
pub mod sensor_handle;

pub use device_handle::{device_router, DeviceState};
pub use health_handle::health_router;
pub use integration_handle::{integration_router, IntegrationState};
pub use sensor_handle::{sensor_router, SensorState};
