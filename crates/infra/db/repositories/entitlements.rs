use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{entitlements, payments},
    },
};
use domain::{
    entities::entitlements::{EntitlementEntity, InsertEntitlementEntity},
    repositories::entitlements::EntitlementRepository,
    value_objects::enums::{
        entitlement_statuses::EntitlementStatus, payment_statuses::PaymentStatus,
    },
};

pub struct EntitlementPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl EntitlementPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl EntitlementRepository for EntitlementPostgres {
    async fn create_granted(
        &self,
        payment_id: i64,
        provider_reference: &str,
        entitlement: InsertEntitlementEntity,
    ) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Single transaction: the ledger never shows a completed charge
        // without its entitlement, and vice versa.
        let entitlement_id = conn.transaction::<i64, anyhow::Error, _>(|conn| {
            let entitlement_id = insert_into(entitlements::table)
                .values(&entitlement)
                .returning(entitlements::id)
                .get_result::<i64>(conn)?;

            let updated = update(payments::table)
                .filter(payments::id.eq(payment_id))
                .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
                .set((
                    payments::status.eq(PaymentStatus::Completed.as_str()),
                    payments::provider_reference.eq(Some(provider_reference)),
                    payments::entitlement_id.eq(Some(entitlement_id)),
                    payments::updated_at.eq(Utc::now()),
                ))
                .execute(conn)?;

            if updated == 0 {
                return Err(anyhow!(
                    "payment {} is not pending; refusing to grant",
                    payment_id
                ));
            }

            Ok(entitlement_id)
        })?;

        Ok(entitlement_id)
    }

    async fn find_current(&self, device_id: &str) -> Result<Option<EntitlementEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let current = entitlements::table
            .filter(entitlements::device_id.eq(device_id))
            .filter(entitlements::status.eq(EntitlementStatus::Active.as_str()))
            .filter(entitlements::expires_at.gt(Utc::now()))
            .order(entitlements::expires_at.desc())
            .select(EntitlementEntity::as_select())
            .first::<EntitlementEntity>(&mut conn)
            .optional()?;

        Ok(current)
    }

    async fn find_by_id(&self, entitlement_id: i64) -> Result<Option<EntitlementEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let entitlement = entitlements::table
            .filter(entitlements::id.eq(entitlement_id))
            .select(EntitlementEntity::as_select())
            .first::<EntitlementEntity>(&mut conn)
            .optional()?;

        Ok(entitlement)
    }

    async fn transition_from_active(
        &self,
        entitlement_id: i64,
        status: EntitlementStatus,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(entitlements::table)
            .filter(entitlements::id.eq(entitlement_id))
            .filter(entitlements::status.eq(EntitlementStatus::Active.as_str()))
            .set((
                entitlements::status.eq(status.as_str()),
                entitlements::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn list_active_expiring_before(
        &self,
        deadline: DateTime<Utc>,
    ) -> Result<Vec<EntitlementEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = entitlements::table
            .filter(entitlements::status.eq(EntitlementStatus::Active.as_str()))
            .filter(entitlements::expires_at.le(deadline))
            .order(entitlements::expires_at.asc())
            .select(EntitlementEntity::as_select())
            .load::<EntitlementEntity>(&mut conn)?;

        Ok(results)
    }
}
