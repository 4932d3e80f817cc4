use serde::{Deserialize, Serialize};

use super::integration::{IntegrationEventResult, IntegrationEventType};

/// Structured outcome of one integration attempt, attached to a poll
/// result regardless of whether the attempt acted, was throttled, or
/// failed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntegrationOutcome {
    pub event_type: IntegrationEventType,
    pub result: IntegrationEventResult,
    pub message: String,
}

impl IntegrationOutcome {
    pub fn new(
        event_type: IntegrationEventType,
        result: IntegrationEventResult,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_type,
            result,
            message: message.into(),
        }
    }
}

/// Per-device outcome of a poll sweep. Emitted only for unhealthy
/// devices; the integration outcome is present only when an attempt was
/// made and reached a terminal classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PollResult {
    pub device_id: String,
    pub is_healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration: Option<IntegrationOutcome>,
}
