pub mod actuator_service;
pub mod alert_service;
pub mod cache_service;
pub mod device_service;
pub mod feature_service;
pub mod health_service;
pub mod integration_service;
pub mod poll_service;

pub use actuator_service::{PlugClient, SceneResponse, SceneRunner};
pub use alert_service::{AlertGateway, AlertService, EmailGatewayClient};
pub use cache_service::CacheService;
pub use device_service::DeviceService;
pub use feature_service::{
    feature_flags_from, FeatureFlags, HttpFeatureClient, StaticFeatureFlags,
    FEATURE_SENSOR_ALERT_EMAILS, FEATURE_TELEMETRY_INGESTION,
};
pub use health_service::HealthEvaluator;
pub use integration_service::IntegrationService;
pub use poll_service::PollService;
