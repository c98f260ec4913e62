use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::AUTHORIZATION;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::domain::repositories::actuator::NetworkActuator;

#[derive(Debug, Clone)]
pub struct HttpActuatorConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Network gateway client. The gateway exposes two idempotent session
/// endpoints; repeated grants or revokes for the same device are accepted.
pub struct HttpActuator {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpActuator {
    pub fn new(config: HttpActuatorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    async fn post_session(&self, path: &str, body: serde_json::Value) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(sanitize_reqwest_error)?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(anyhow!(
            "actuator returned non-success status {} for {}",
            response.status(),
            path
        ))
    }
}

#[async_trait]
impl NetworkActuator for HttpActuator {
    async fn grant_access(&self, device_id: &str, expires_at: DateTime<Utc>) -> Result<()> {
        debug!(device_id, %expires_at, "actuator: granting access");
        self.post_session(
            "/v1/sessions/grant",
            json!({
                "device_id": device_id,
                "expires_at": expires_at.to_rfc3339(),
            }),
        )
        .await
    }

    async fn revoke_access(&self, device_id: &str) -> Result<()> {
        debug!(device_id, "actuator: revoking access");
        self.post_session(
            "/v1/sessions/revoke",
            json!({
                "device_id": device_id,
            }),
        )
        .await
    }
}

fn sanitize_reqwest_error(error: reqwest::Error) -> anyhow::Error {
    if error.is_timeout() {
        return anyhow!("actuator request timed out");
    }
    if error.is_connect() {
        return anyhow!("actuator connection failed");
    }
    anyhow!("actuator request failed")
}
