use anyhow::Result;
use chrono::Utc;
use crates::domain::{
    repositories::{actuator::NetworkActuator, entitlements::EntitlementRepository},
    value_objects::enums::entitlement_statuses::EntitlementStatus,
};
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    pub scanned: usize,
    pub expired: usize,
    /// Rows that were no longer active by the time this pass reached them
    /// (a concurrent cancel or an overlapping earlier pass). No revoke fired.
    pub skipped_not_active: usize,
    pub revoke_failed: usize,
    pub expired_ids: Vec<i64>,
}

/// One sweep pass: find active entitlements whose window has elapsed, mark
/// them expired and tell the actuator to drop each device. Bookkeeping only;
/// the status read path decides access from timestamps, not from this.
pub struct ExpireEntitlementsUseCase {
    entitlement_repo: Arc<dyn EntitlementRepository + Send + Sync>,
    actuator: Arc<dyn NetworkActuator + Send + Sync>,
}

impl ExpireEntitlementsUseCase {
    pub fn new(
        entitlement_repo: Arc<dyn EntitlementRepository + Send + Sync>,
        actuator: Arc<dyn NetworkActuator + Send + Sync>,
    ) -> Self {
        Self {
            entitlement_repo,
            actuator,
        }
    }

    pub async fn run(&self) -> Result<SweepResult> {
        let now = Utc::now();
        let elapsed = self
            .entitlement_repo
            .list_active_expiring_before(now)
            .await?;

        let mut result = SweepResult {
            scanned: elapsed.len(),
            ..Default::default()
        };

        for entitlement in elapsed {
            // Guarded transition: a row someone else already moved out of
            // active is a no-op here, and must not fire a second revoke.
            let transitioned = match self
                .entitlement_repo
                .transition_from_active(entitlement.id, EntitlementStatus::Expired)
                .await
            {
                Ok(transitioned) => transitioned,
                Err(err) => {
                    error!(
                        entitlement_id = entitlement.id,
                        device_id = %entitlement.device_id,
                        db_error = ?err,
                        "sweeper: failed to mark entitlement expired"
                    );
                    continue;
                }
            };

            if !transitioned {
                result.skipped_not_active += 1;
                continue;
            }

            result.expired += 1;
            if result.expired_ids.len() < 20 {
                result.expired_ids.push(entitlement.id);
            }

            if let Err(err) = self.actuator.revoke_access(&entitlement.device_id).await {
                // Not retried here; the actuator hears about the device again
                // on its next grant, and access is already denied by the
                // status read path.
                warn!(
                    entitlement_id = entitlement.id,
                    device_id = %entitlement.device_id,
                    error = ?err,
                    "sweeper: actuator revoke failed"
                );
                result.revoke_failed += 1;
            }
        }

        info!(
            scanned = result.scanned,
            expired = result.expired,
            skipped_not_active = result.skipped_not_active,
            revoke_failed = result.revoke_failed,
            "sweeper: pass completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crates::domain::{
        entities::entitlements::EntitlementEntity,
        repositories::{
            actuator::MockNetworkActuator, entitlements::MockEntitlementRepository,
        },
    };
    use mockall::predicate::eq;

    fn elapsed_entitlement(id: i64, device_id: &str) -> EntitlementEntity {
        let now = Utc::now();
        EntitlementEntity {
            id,
            device_id: device_id.to_string(),
            plan_id: 7,
            status: EntitlementStatus::Active.to_string(),
            starts_at: now - Duration::hours(25),
            expires_at: now - Duration::hours(1),
            created_at: now - Duration::hours(25),
            updated_at: now - Duration::hours(25),
        }
    }

    #[tokio::test]
    async fn expires_elapsed_rows_and_revokes_once_each() {
        let mut entitlement_repo = MockEntitlementRepository::new();
        let mut actuator = MockNetworkActuator::new();

        entitlement_repo
            .expect_list_active_expiring_before()
            .returning(|_| {
                Box::pin(async {
                    Ok(vec![
                        elapsed_entitlement(1, "d1"),
                        elapsed_entitlement(2, "d2"),
                    ])
                })
            });
        entitlement_repo
            .expect_transition_from_active()
            .times(2)
            .returning(|_, _| Box::pin(async { Ok(true) }));
        actuator
            .expect_revoke_access()
            .with(eq("d1"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));
        actuator
            .expect_revoke_access()
            .with(eq("d2"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase =
            ExpireEntitlementsUseCase::new(Arc::new(entitlement_repo), Arc::new(actuator));
        let result = usecase.run().await.unwrap();

        assert_eq!(result.scanned, 2);
        assert_eq!(result.expired, 2);
        assert_eq!(result.expired_ids, vec![1, 2]);
        assert_eq!(result.revoke_failed, 0);
    }

    #[tokio::test]
    async fn already_transitioned_row_is_a_noop_without_revoke() {
        let mut entitlement_repo = MockEntitlementRepository::new();
        // No revoke expectation: a second pass over an expired row must not
        // fire the actuator again.
        let actuator = MockNetworkActuator::new();

        entitlement_repo
            .expect_list_active_expiring_before()
            .returning(|_| Box::pin(async { Ok(vec![elapsed_entitlement(1, "d1")]) }));
        entitlement_repo
            .expect_transition_from_active()
            .with(eq(1), eq(EntitlementStatus::Expired))
            .returning(|_, _| Box::pin(async { Ok(false) }));

        let usecase =
            ExpireEntitlementsUseCase::new(Arc::new(entitlement_repo), Arc::new(actuator));
        let result = usecase.run().await.unwrap();

        assert_eq!(result.expired, 0);
        assert_eq!(result.skipped_not_active, 1);
    }

    #[tokio::test]
    async fn revoke_failure_does_not_block_the_transition() {
        let mut entitlement_repo = MockEntitlementRepository::new();
        let mut actuator = MockNetworkActuator::new();

        entitlement_repo
            .expect_list_active_expiring_before()
            .returning(|_| Box::pin(async { Ok(vec![elapsed_entitlement(1, "d1")]) }));
        entitlement_repo
            .expect_transition_from_active()
            .returning(|_, _| Box::pin(async { Ok(true) }));
        actuator
            .expect_revoke_access()
            .returning(|_| Box::pin(async { Err(anyhow::anyhow!("gateway offline")) }));

        let usecase =
            ExpireEntitlementsUseCase::new(Arc::new(entitlement_repo), Arc::new(actuator));
        let result = usecase.run().await.unwrap();

        assert_eq!(result.expired, 1);
        assert_eq!(result.revoke_failed, 1);
    }

    #[tokio::test]
    async fn empty_sweep_is_a_noop() {
        let mut entitlement_repo = MockEntitlementRepository::new();
        let actuator = MockNetworkActuator::new();

        entitlement_repo
            .expect_list_active_expiring_before()
            .returning(|_| Box::pin(async { Ok(vec![]) }));

        let usecase =
            ExpireEntitlementsUseCase::new(Arc::new(entitlement_repo), Arc::new(actuator));
        let result = usecase.run().await.unwrap();

        assert_eq!(result.scanned, 0);
        assert_eq!(result.expired, 0);
    }
}
