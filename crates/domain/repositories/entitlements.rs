use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::entitlements::{EntitlementEntity, InsertEntitlementEntity};
use crate::domain::value_objects::enums::entitlement_statuses::EntitlementStatus;

#[async_trait]
#[automock]
pub trait EntitlementRepository {
    /// Creates the entitlement for a successfully charged payment and marks
    /// that payment `completed` (with its provider reference and the link to
    /// the new row) in a single transaction. Returns the entitlement id.
    async fn create_granted(
        &self,
        payment_id: i64,
        provider_reference: &str,
        entitlement: InsertEntitlementEntity,
    ) -> Result<i64>;

    /// The current grant for a device: the `active` row with the latest
    /// `expires_at` still in the future, if any.
    async fn find_current(&self, device_id: &str) -> Result<Option<EntitlementEntity>>;

    async fn find_by_id(&self, entitlement_id: i64) -> Result<Option<EntitlementEntity>>;

    /// Guarded `active -> status` transition. Returns false when the row was
    /// no longer active, which makes expiry and cancellation idempotent.
    async fn transition_from_active(
        &self,
        entitlement_id: i64,
        status: EntitlementStatus,
    ) -> Result<bool>;

    async fn list_active_expiring_before(
        &self,
        deadline: DateTime<Utc>,
    ) -> Result<Vec<EntitlementEntity>>;
}
