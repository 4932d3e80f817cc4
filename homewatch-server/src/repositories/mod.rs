mod device;
mod integration_event;
mod telemetry_record;

pub use device::DeviceRepository;
pub use integration_event::IntegrationEventRepository;
pub use telemetry_record::TelemetryRecordRepository;
