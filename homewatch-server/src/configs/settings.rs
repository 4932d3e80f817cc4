use std::collections::HashMap;
use std::env;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use homewatch_api::models::{IntegrationDeviceType, SceneKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logger {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    pub clean_start: bool,
    pub url: String,
}

/// Smart-plug cloud API the power-cycle scenes run against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plug {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub gateway_url: String,
    pub api_token: Option<String>,
    pub recipient: String,
    pub timeout_secs: u64,
}

/// Feature flag source. When `base_url` is unset the static `defaults`
/// map answers every lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Features {
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    #[serde(default)]
    pub defaults: HashMap<String, bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integration {
    /// Minimum minutes between integration attempts for one device.
    pub minimum_interval_minutes: i64,
    /// Settle time between the power-off and power-on phases.
    pub power_cycle_seconds: u64,
    /// Telemetry silence after which a device is unhealthy.
    pub unhealthy_after_seconds: i64,
    /// Telemetry retention window for the purge operation.
    pub purge_days: i64,
    #[serde(default)]
    pub devices: Vec<DeviceIntegrationConfig>,
}

/// Static per-device integration configuration, loaded once at startup
/// and read-only for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceIntegrationConfig {
    pub device_id: String,
    #[serde(default)]
    pub integrations: Vec<IntegrationBinding>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationBinding {
    pub device_type: IntegrationDeviceType,
    #[serde(default)]
    pub scenes: HashMap<SceneKind, String>,
}

impl DeviceIntegrationConfig {
    pub fn is_supported(&self, device_type: IntegrationDeviceType) -> bool {
        self.integrations
            .iter()
            .any(|binding| binding.device_type == device_type)
    }

    /// Scene id for the given device type and phase. Blank ids count as
    /// missing so a malformed config can never start a partial action.
    pub fn scene(&self, device_type: IntegrationDeviceType, kind: SceneKind) -> Option<&str> {
        self.integrations
            .iter()
            .find(|binding| binding.device_type == device_type)
            .and_then(|binding| binding.scenes.get(&kind))
            .map(|scene| scene.trim())
            .filter(|scene| !scene.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub logger: Logger,
    pub database: Database,
    pub plug: Plug,
    pub alert: Alert,
    pub features: Features,
    pub integration: Integration,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or("development".into());

        Config::builder()
            .add_source(File::with_name("configs/default"))
            .add_source(File::with_name(&format!("configs/{run_mode}")).required(false))
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
