use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::configs::Alert;

/// Seam over the notification infrastructure. Delivery is best-effort;
/// callers log failures and keep going.
#[async_trait]
pub trait AlertGateway: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// HTTP client for the email gateway service.
pub struct EmailGatewayClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl EmailGatewayClient {
    pub fn new(alert: &Alert) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(alert.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: alert.gateway_url.clone(),
            api_token: alert.api_token.clone(),
        })
    }
}

#[async_trait]
impl AlertGateway for EmailGatewayClient {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let endpoint = format!("{}/api/email/send", self.base_url);

        let mut request = self.http.post(&endpoint).json(&json!({
            "recipient": recipient,
            "subject": subject,
            "body": body,
        }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            anyhow::bail!("email gateway returned status {}", response.status());
        }

        Ok(())
    }
}

/// Formats and dispatches operational alerts to the configured recipient.
pub struct AlertService {
    gateway: Arc<dyn AlertGateway>,
    recipient: String,
}

impl AlertService {
    pub fn new(gateway: Arc<dyn AlertGateway>, recipient: String) -> Self {
        Self { gateway, recipient }
    }

    pub async fn send_alert(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        tracing::info!("dispatching alert '{}' to {}", subject, self.recipient);

        self.gateway.send(&self.recipient, subject, body).await
    }

    pub fn sensor_failure_body(device_name: &str, seconds_elapsed: i64) -> String {
        format!("Sensor '{device_name}' is unhealthy ({seconds_elapsed} seconds since last contact)")
    }

    pub fn purge_summary_body(cutoff_timestamp: i64, deleted: u64) -> String {
        format!("Telemetry purge complete\n\nCutoff Timestamp: {cutoff_timestamp}\nCount: {deleted}\n")
    }
}
