use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: i64,
    pub device_id: String,
    pub plan_id: i64,
    pub entitlement_id: Option<i64>,
    pub amount_minor: i32,
    pub method: String,
    pub status: String,
    pub provider_reference: Option<String>,
    pub error: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub device_id: String,
    pub plan_id: i64,
    pub amount_minor: i32,
    pub method: String,
    pub status: String,
    pub metadata: serde_json::Value,
}
