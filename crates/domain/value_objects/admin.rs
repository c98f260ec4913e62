use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::payments::PaymentEntity;

#[derive(Debug, Clone, Serialize)]
pub struct DisconnectOutcomeDto {
    /// False when the entitlement was already expired or cancelled; the
    /// operation is idempotent either way.
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentAuditDto {
    pub payment_id: i64,
    pub device_id: String,
    pub plan_id: i64,
    pub amount_minor: i32,
    pub method: String,
    pub status: String,
    pub provider_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentEntity> for PaymentAuditDto {
    fn from(payment: PaymentEntity) -> Self {
        Self {
            payment_id: payment.id,
            device_id: payment.device_id,
            plan_id: payment.plan_id,
            amount_minor: payment.amount_minor,
            method: payment.method,
            status: payment.status,
            provider_reference: payment.provider_reference,
            created_at: payment.created_at,
        }
    }
}

/// Money-moved-but-no-access audit: attempts that need a human decision
/// (retroactive grant or refund).
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReportDto {
    pub completed_without_entitlement: Vec<PaymentAuditDto>,
    pub stale_pending: Vec<PaymentAuditDto>,
}
