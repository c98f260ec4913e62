use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Purchase request as submitted by the portal. Everything in here is
/// untrusted client input; the engine validates before any side effect.
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseRequestModel {
    pub device_id: String,
    pub plan_id: i64,
    pub method: String,
    pub amount_minor: i32,
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceiptDto {
    pub payment_id: i64,
    pub entitlement_id: i64,
    pub expires_at: DateTime<Utc>,
}
