use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::entitlements;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = entitlements)]
pub struct EntitlementEntity {
    pub id: i64,
    pub device_id: String,
    pub plan_id: i64,
    pub status: String,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = entitlements)]
pub struct InsertEntitlementEntity {
    pub device_id: String,
    pub plan_id: i64,
    pub status: String,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
