use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::configs::Plug;

/// Raw result of one scene invocation against the plug platform.
#[derive(Debug, Clone)]
pub struct SceneResponse {
    pub status: u16,
    pub body: Value,
}

impl SceneResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam over the plug platform so the orchestrator can be exercised
/// without a remote device.
#[async_trait]
pub trait SceneRunner: Send + Sync {
    async fn run_scene(&self, scene_id: &str) -> anyhow::Result<SceneResponse>;
}

/// HTTP client for the smart-plug cloud API.
pub struct PlugClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl PlugClient {
    pub fn new(plug: Plug) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(plug.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: plug.base_url,
            api_token: plug.api_token,
        })
    }
}

#[async_trait]
impl SceneRunner for PlugClient {
    async fn run_scene(&self, scene_id: &str) -> anyhow::Result<SceneResponse> {
        let endpoint = format!("{}/scene/{}/run", self.base_url, scene_id);

        tracing::info!("running scene '{}': {}", scene_id, endpoint);

        let mut request = self.http.post(&endpoint);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);

        tracing::info!("scene '{}' returned status {}", scene_id, status);

        Ok(SceneResponse { status, body })
    }
}
