use std::sync::Arc;

use chrono::{Duration, Utc};
use crates::domain::{
    repositories::{
        actuator::NetworkActuator, entitlements::EntitlementRepository,
        payments::PaymentRepository,
    },
    value_objects::{
        admin::{DisconnectOutcomeDto, PaymentAuditDto, ReconciliationReportDto},
        enums::entitlement_statuses::EntitlementStatus,
    },
};
use thiserror::Error;
use tracing::{error, info, warn};

/// Pending attempts older than this are presumed stuck (crash or timeout
/// between charge and commit) and show up in the reconciliation report.
const STALE_PENDING_MINUTES: i64 = 30;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("entitlement not found")]
    EntitlementNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdminError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AdminError::EntitlementNotFound => StatusCode::NOT_FOUND,
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct AdminUseCase<E, Pay, A>
where
    E: EntitlementRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    A: NetworkActuator + Send + Sync + 'static,
{
    entitlement_repo: Arc<E>,
    payment_repo: Arc<Pay>,
    actuator: Arc<A>,
}

impl<E, Pay, A> AdminUseCase<E, Pay, A>
where
    E: EntitlementRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    A: NetworkActuator + Send + Sync + 'static,
{
    pub fn new(entitlement_repo: Arc<E>, payment_repo: Arc<Pay>, actuator: Arc<A>) -> Self {
        Self {
            entitlement_repo,
            payment_repo,
            actuator,
        }
    }

    /// Administrative `active -> cancelled`. Idempotent: disconnecting an
    /// already expired or cancelled entitlement reports `cancelled: false`
    /// and fires no revoke.
    pub async fn disconnect(
        &self,
        entitlement_id: i64,
    ) -> Result<DisconnectOutcomeDto, AdminError> {
        let entitlement = self
            .entitlement_repo
            .find_by_id(entitlement_id)
            .await
            .map_err(|err| {
                error!(
                    entitlement_id,
                    db_error = ?err,
                    "admin: failed to load entitlement for disconnect"
                );
                AdminError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = AdminError::EntitlementNotFound;
                warn!(
                    entitlement_id,
                    status = err.status_code().as_u16(),
                    "admin: entitlement not found for disconnect"
                );
                err
            })?;

        let cancelled = self
            .entitlement_repo
            .transition_from_active(entitlement_id, EntitlementStatus::Cancelled)
            .await
            .map_err(|err| {
                error!(
                    entitlement_id,
                    db_error = ?err,
                    "admin: failed to cancel entitlement"
                );
                AdminError::Internal(err)
            })?;

        if cancelled {
            if let Err(err) = self.actuator.revoke_access(&entitlement.device_id).await {
                warn!(
                    entitlement_id,
                    device_id = %entitlement.device_id,
                    error = ?err,
                    "admin: actuator revoke failed after cancellation"
                );
            }
            info!(
                entitlement_id,
                device_id = %entitlement.device_id,
                "admin: entitlement cancelled"
            );
        } else {
            info!(
                entitlement_id,
                status = %entitlement.status,
                "admin: entitlement already non-active; nothing to do"
            );
        }

        Ok(DisconnectOutcomeDto { cancelled })
    }

    pub async fn reconciliation_report(&self) -> Result<ReconciliationReportDto, AdminError> {
        let stale_before = Utc::now() - Duration::minutes(STALE_PENDING_MINUTES);

        let completed_without_entitlement = self
            .payment_repo
            .list_completed_unlinked()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "admin: failed to load unlinked completed payments");
                AdminError::Internal(err)
            })?
            .into_iter()
            .map(PaymentAuditDto::from)
            .collect::<Vec<_>>();

        let stale_pending = self
            .payment_repo
            .list_pending_older_than(stale_before)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "admin: failed to load stale pending payments");
                AdminError::Internal(err)
            })?
            .into_iter()
            .map(PaymentAuditDto::from)
            .collect::<Vec<_>>();

        info!(
            completed_without_entitlement = completed_without_entitlement.len(),
            stale_pending = stale_pending.len(),
            "admin: reconciliation report built"
        );

        Ok(ReconciliationReportDto {
            completed_without_entitlement,
            stale_pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crates::domain::{
        entities::{entitlements::EntitlementEntity, payments::PaymentEntity},
        repositories::{
            actuator::MockNetworkActuator, entitlements::MockEntitlementRepository,
            payments::MockPaymentRepository,
        },
    };
    use mockall::predicate::eq;

    fn sample_entitlement(status: EntitlementStatus) -> EntitlementEntity {
        let now = Utc::now();
        EntitlementEntity {
            id: 9,
            device_id: "d1".to_string(),
            plan_id: 7,
            status: status.to_string(),
            starts_at: now - Duration::hours(1),
            expires_at: now + Duration::hours(23),
            created_at: now - Duration::hours(1),
            updated_at: now - Duration::hours(1),
        }
    }

    fn sample_payment(id: i64, status: &str) -> PaymentEntity {
        let now = Utc::now();
        PaymentEntity {
            id,
            device_id: "d1".to_string(),
            plan_id: 7,
            entitlement_id: None,
            amount_minor: 1000,
            method: "mtn_momo".to_string(),
            status: status.to_string(),
            provider_reference: None,
            error: None,
            metadata: serde_json::json!({}),
            created_at: now - Duration::hours(2),
            updated_at: now - Duration::hours(2),
        }
    }

    #[tokio::test]
    async fn disconnect_cancels_and_revokes_once() {
        let mut entitlement_repo = MockEntitlementRepository::new();
        let payment_repo = MockPaymentRepository::new();
        let mut actuator = MockNetworkActuator::new();

        entitlement_repo
            .expect_find_by_id()
            .with(eq(9))
            .returning(|_| {
                Box::pin(async { Ok(Some(sample_entitlement(EntitlementStatus::Active))) })
            });
        entitlement_repo
            .expect_transition_from_active()
            .with(eq(9), eq(EntitlementStatus::Cancelled))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(true) }));
        actuator
            .expect_revoke_access()
            .with(eq("d1"))
            .times(1)
            .returning(|_| Box::pin(async { Ok(()) }));

        let usecase = AdminUseCase::new(
            Arc::new(entitlement_repo),
            Arc::new(payment_repo),
            Arc::new(actuator),
        );
        let outcome = usecase.disconnect(9).await.unwrap();

        assert!(outcome.cancelled);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent_on_non_active_entitlement() {
        let mut entitlement_repo = MockEntitlementRepository::new();
        // No actuator expectation: a repeat disconnect must not revoke again.
        let actuator = MockNetworkActuator::new();

        entitlement_repo.expect_find_by_id().returning(|_| {
            Box::pin(async { Ok(Some(sample_entitlement(EntitlementStatus::Cancelled))) })
        });
        entitlement_repo
            .expect_transition_from_active()
            .returning(|_, _| Box::pin(async { Ok(false) }));

        let usecase = AdminUseCase::new(
            Arc::new(entitlement_repo),
            Arc::new(MockPaymentRepository::new()),
            Arc::new(actuator),
        );
        let outcome = usecase.disconnect(9).await.unwrap();

        assert!(!outcome.cancelled);
    }

    #[tokio::test]
    async fn disconnect_unknown_entitlement_is_not_found() {
        let mut entitlement_repo = MockEntitlementRepository::new();
        entitlement_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = AdminUseCase::new(
            Arc::new(entitlement_repo),
            Arc::new(MockPaymentRepository::new()),
            Arc::new(MockNetworkActuator::new()),
        );
        let err = usecase.disconnect(404).await.unwrap_err();

        assert!(matches!(err, AdminError::EntitlementNotFound));
    }

    #[tokio::test]
    async fn reconciliation_report_collects_both_shapes() {
        let mut payment_repo = MockPaymentRepository::new();
        payment_repo
            .expect_list_completed_unlinked()
            .returning(|| Box::pin(async { Ok(vec![sample_payment(41, "completed")]) }));
        payment_repo
            .expect_list_pending_older_than()
            .returning(|_| Box::pin(async { Ok(vec![sample_payment(42, "pending")]) }));

        let usecase = AdminUseCase::new(
            Arc::new(MockEntitlementRepository::new()),
            Arc::new(payment_repo),
            Arc::new(MockNetworkActuator::new()),
        );
        let report = usecase.reconciliation_report().await.unwrap();

        assert_eq!(report.completed_without_entitlement.len(), 1);
        assert_eq!(report.completed_without_entitlement[0].payment_id, 41);
        assert_eq!(report.stale_pending.len(), 1);
        assert_eq!(report.stale_pending[0].payment_id, 42);
    }
}
