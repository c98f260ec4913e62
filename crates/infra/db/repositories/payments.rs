use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::payments},
};
use domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    repositories::payments::PaymentRepository,
    value_objects::enums::payment_statuses::PaymentStatus,
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn create_attempt(&self, payment: InsertPaymentEntity) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment_id = insert_into(payments::table)
            .values(&payment)
            .returning(payments::id)
            .get_result::<i64>(&mut conn)?;

        Ok(payment_id)
    }

    async fn mark_failed(&self, payment_id: i64, reason: &str) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Guarded on `pending` so a terminal row is never rewritten.
        update(payments::table)
            .filter(payments::id.eq(payment_id))
            .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
            .set((
                payments::status.eq(PaymentStatus::Failed.as_str()),
                payments::error.eq(Some(reason)),
                payments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn list_completed_unlinked(&self) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::status.eq(PaymentStatus::Completed.as_str()))
            .filter(payments::entitlement_id.is_null())
            .order(payments::created_at.asc())
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_pending_older_than(
        &self,
        stale_before: DateTime<Utc>,
    ) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
            .filter(payments::created_at.lt(stale_before))
            .order(payments::created_at.asc())
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }
}
