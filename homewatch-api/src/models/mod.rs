mod device;
mod health;
mod integration;
mod poll;
mod telemetry;

pub use device::DeviceInfo;
pub use health::{HealthStatus, SensorHealth, SensorHealthStats};
pub use integration::{
    IntegrationDeviceType, IntegrationEventResult, IntegrationEventType, IntegrationEventView,
    SceneKind, UnknownVariant,
};
pub use poll::{IntegrationOutcome, PollResult};
pub use telemetry::{DeviceTelemetry, PurgeResult, SensorReading, TelemetryIngestRequest};
