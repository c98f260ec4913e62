use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::payments::{InsertPaymentEntity, PaymentEntity};

#[async_trait]
#[automock]
pub trait PaymentRepository {
    /// Records a charge attempt in `pending` before the gateway is called,
    /// so every attempt is auditable even if the process dies mid-charge.
    async fn create_attempt(&self, payment: InsertPaymentEntity) -> Result<i64>;

    /// Terminal `pending -> failed` transition. The failure reason is kept
    /// on the row for the admin ledger view.
    async fn mark_failed(&self, payment_id: i64, reason: &str) -> Result<()>;

    /// Completed payments with no linked entitlement. With the grant
    /// transaction in place this should stay empty; it remains as a
    /// defensive audit query.
    async fn list_completed_unlinked(&self) -> Result<Vec<PaymentEntity>>;

    /// Attempts still `pending` after the gateway window has long passed:
    /// a crash or timeout between charge and commit. Reconciled manually.
    async fn list_pending_older_than(
        &self,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<PaymentEntity>>;
}
