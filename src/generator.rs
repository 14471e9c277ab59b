use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::GeneratorConfig;
use crate::error::{EngineError, Result};
use crate::model::ScriptData;

/// Client for the external script/media generation pipeline. The call is
/// long-running and bounded by its own timeout; it is always made outside
/// any lock held by the scoring engine.
#[derive(Clone)]
pub struct GeneratorClient {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub niche: String,
    pub inspiration_url: Option<String>,
    pub tone: String,
    pub voice: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationResponse {
    pub title: String,
    pub hook: String,
    pub script: String,
    pub hashtags: Vec<String>,
    pub description: String,
    pub duration_seconds: u32,
    pub media_url: Option<String>,
}

impl GenerationResponse {
    pub fn into_script(self) -> ScriptData {
        ScriptData {
            title: self.title,
            hook: self.hook,
            script: self.script,
            hashtags: self.hashtags,
            description: self.description,
            duration_seconds: self.duration_seconds,
        }
    }
}

impl GeneratorClient {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        GeneratorClient::new(config.endpoint.clone(), timeout)
    }

    pub fn new(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                EngineError::Dependency(format!("failed to build generator client: {}", err))
            })?;
        Ok(Self { endpoint, client })
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let url = format!("{}/generate", self.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| EngineError::Dependency(format!("generator request failed: {}", err)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::Dependency(format!(
                "generator error {}: {}",
                status, body
            )));
        }

        response.json::<GenerationResponse>().await.map_err(|err| {
            EngineError::Dependency(format!("generator response parse failed: {}", err))
        })
    }
}
