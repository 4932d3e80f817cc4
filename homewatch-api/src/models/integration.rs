use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a stored enum string no longer maps to a variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Kind of remote device an integration can act through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationDeviceType {
    Plug,
    Fan,
}

impl fmt::Display for IntegrationDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationDeviceType::Plug => write!(f, "plug"),
            IntegrationDeviceType::Fan => write!(f, "fan"),
        }
    }
}

/// Named remote action recognized by the plug platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneKind {
    #[serde(rename = "on")]
    PowerOn,
    #[serde(rename = "off")]
    PowerOff,
}

/// Closed set of automated actions. Adding a kind forces every dispatch
/// site to handle it at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationEventType {
    PowerCycle,
}

impl IntegrationEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationEventType::PowerCycle => "power-cycle",
        }
    }
}

impl fmt::Display for IntegrationEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationEventType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "power-cycle" => Ok(IntegrationEventType::PowerCycle),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Terminal classification of one integration attempt.
///
/// The variants are not mutually exclusive in cause; each one is produced
/// at a distinct step of the orchestration:
/// - `MinimumInterval`: the throttle window since the latest persisted
///   event has not elapsed. Expected, frequent, nothing persisted.
/// - `NotSupported`: the device's configuration lists no integration of
///   the required kind. Nothing persisted.
/// - `InvalidConfiguration`: a required scene id is missing or blank; no
///   remote call is made for any phase. Nothing persisted.
/// - `Error`: a remote phase returned a non-success status or failed in
///   transport; the attempt is terminal and an `Error` event is persisted.
/// - `Success`: both phases completed; a `Success` event is persisted.
/// - `NoAction`: the event kind maps to no action. Unreachable while
///   `IntegrationEventType` has a single variant; kept for wire
///   compatibility with historical events.
/// - `Failure`: reserved; not produced by the current orchestration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntegrationEventResult {
    Success,
    Failure,
    NotSupported,
    MinimumInterval,
    NoAction,
    InvalidConfiguration,
    Error,
}

impl IntegrationEventResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationEventResult::Success => "success",
            IntegrationEventResult::Failure => "failure",
            IntegrationEventResult::NotSupported => "not-supported",
            IntegrationEventResult::MinimumInterval => "minimum-interval",
            IntegrationEventResult::NoAction => "no-action",
            IntegrationEventResult::InvalidConfiguration => "invalid-configuration",
            IntegrationEventResult::Error => "error",
        }
    }
}

impl fmt::Display for IntegrationEventResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationEventResult {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(IntegrationEventResult::Success),
            "failure" => Ok(IntegrationEventResult::Failure),
            "not-supported" => Ok(IntegrationEventResult::NotSupported),
            "minimum-interval" => Ok(IntegrationEventResult::MinimumInterval),
            "no-action" => Ok(IntegrationEventResult::NoAction),
            "invalid-configuration" => Ok(IntegrationEventResult::InvalidConfiguration),
            "error" => Ok(IntegrationEventResult::Error),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A past integration event merged with the device name for display.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntegrationEventView {
    pub event_id: String,
    pub device_id: String,
    pub device_name: String,
    pub event_type: IntegrationEventType,
    pub result: IntegrationEventResult,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_result_round_trips_through_strings() {
        for result in [
            IntegrationEventResult::Success,
            IntegrationEventResult::Failure,
            IntegrationEventResult::NotSupported,
            IntegrationEventResult::MinimumInterval,
            IntegrationEventResult::NoAction,
            IntegrationEventResult::InvalidConfiguration,
            IntegrationEventResult::Error,
        ] {
            assert_eq!(result.as_str().parse::<IntegrationEventResult>(), Ok(result));
        }
    }

    #[test]
    fn unknown_event_result_is_rejected() {
        assert_eq!(
            "warp-core-breach".parse::<IntegrationEventResult>(),
            Err(UnknownVariant("warp-core-breach".to_string()))
        );
    }

    #[test]
    fn scene_kind_uses_short_wire_names() {
        assert_eq!(serde_json::to_string(&SceneKind::PowerOn).unwrap(), "\"on\"");
        assert_eq!(serde_json::to_string(&SceneKind::PowerOff).unwrap(), "\"off\"");
    }
}
