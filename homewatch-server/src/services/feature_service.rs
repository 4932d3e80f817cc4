use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::configs::Features;

/// Gates telemetry ingestion.
pub const FEATURE_TELEMETRY_INGESTION: &str = "telemetry-ingestion";
/// Gates alert emails for unhealthy sensors during a poll sweep.
pub const FEATURE_SENSOR_ALERT_EMAILS: &str = "sensor-alert-emails";

/// Seam over the feature flag source. Lookups fail closed: an unknown
/// key or an unreachable flag service reads as disabled.
#[async_trait]
pub trait FeatureFlags: Send + Sync {
    async fn is_enabled(&self, key: &str) -> bool;
}

/// Flags resolved from static configuration.
pub struct StaticFeatureFlags {
    defaults: HashMap<String, bool>,
}

impl StaticFeatureFlags {
    pub fn new(defaults: HashMap<String, bool>) -> Self {
        Self { defaults }
    }
}

#[async_trait]
impl FeatureFlags for StaticFeatureFlags {
    async fn is_enabled(&self, key: &str) -> bool {
        self.defaults.get(key).copied().unwrap_or(false)
    }
}

#[derive(Deserialize)]
struct FeatureEvaluation {
    enabled: bool,
}

/// Flags resolved from a remote flag service.
pub struct HttpFeatureClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFeatureClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl FeatureFlags for HttpFeatureClient {
    async fn is_enabled(&self, key: &str) -> bool {
        let endpoint = format!("{}/api/feature/evaluate/{}", self.base_url, key);

        let result = async {
            let response = self.http.get(&endpoint).send().await?;
            response.json::<FeatureEvaluation>().await
        }
        .await;

        match result {
            Ok(evaluation) => evaluation.enabled,
            Err(e) => {
                tracing::warn!("feature flag '{}' evaluation failed, treating as disabled: {}", key, e);
                false
            }
        }
    }
}

/// Picks the flag source from settings: remote service when configured,
/// static defaults otherwise. A hung flag service must never stall a
/// sweep, so the remote client carries the configured request timeout.
pub fn feature_flags_from(features: &Features) -> Result<Arc<dyn FeatureFlags>, reqwest::Error> {
    let flags: Arc<dyn FeatureFlags> = match &features.base_url {
        Some(base_url) => Arc::new(HttpFeatureClient::new(
            base_url.clone(),
            Duration::from_secs(features.timeout_secs),
        )?),
        None => Arc::new(StaticFeatureFlags::new(features.defaults.clone())),
    };

    Ok(flags)
}
