use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

/// The external system that actually opens or blocks device traffic.
/// Both calls are at-least-once; the actuator is expected to tolerate
/// repeated grants and revokes for the same device.
#[async_trait]
#[automock]
pub trait NetworkActuator {
    async fn grant_access(&self, device_id: &str, expires_at: DateTime<Utc>) -> Result<()>;

    async fn revoke_access(&self, device_id: &str) -> Result<()>;
}
