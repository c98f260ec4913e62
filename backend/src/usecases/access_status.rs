use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    repositories::{entitlements::EntitlementRepository, plans::PlanRepository},
    value_objects::{
        access_status::{AccessStatusDto, format_remaining},
        enums::entitlement_statuses::EntitlementStatus,
    },
};
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum AccessStatusError {
    #[error("device id must not be empty")]
    EmptyDeviceId,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AccessStatusError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AccessStatusError::EmptyDeviceId => StatusCode::BAD_REQUEST,
            AccessStatusError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Read path for "is this device connected now". Polled by the portal at a
/// short fixed interval, so it must stay side-effect free and cheap.
pub struct AccessStatusUseCase<P, E>
where
    P: PlanRepository + Send + Sync + 'static,
    E: EntitlementRepository + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    entitlement_repo: Arc<E>,
}

impl<P, E> AccessStatusUseCase<P, E>
where
    P: PlanRepository + Send + Sync + 'static,
    E: EntitlementRepository + Send + Sync + 'static,
{
    pub fn new(plan_repo: Arc<P>, entitlement_repo: Arc<E>) -> Self {
        Self {
            plan_repo,
            entitlement_repo,
        }
    }

    pub async fn status(&self, device_id: &str) -> Result<AccessStatusDto, AccessStatusError> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(AccessStatusError::EmptyDeviceId);
        }

        let entitlement = match self
            .entitlement_repo
            .find_current(device_id)
            .await
            .map_err(|err| {
                error!(
                    device_id,
                    db_error = ?err,
                    "access_status: failed to load current entitlement"
                );
                AccessStatusError::Internal(err)
            })? {
            Some(entitlement) => entitlement,
            None => {
                debug!(device_id, "access_status: no current entitlement");
                return Ok(AccessStatusDto::disconnected());
            }
        };

        // The store already filters on the window; the live re-check here
        // means a stale status column can delay bookkeeping but never grant
        // access.
        let now = Utc::now();
        if EntitlementStatus::from_str(&entitlement.status) != EntitlementStatus::Active
            || entitlement.expires_at <= now
        {
            debug!(
                device_id,
                entitlement_id = entitlement.id,
                "access_status: entitlement window elapsed"
            );
            return Ok(AccessStatusDto::disconnected());
        }

        let plan_name = self
            .plan_repo
            .find_by_id(entitlement.plan_id)
            .await
            .map_err(|err| {
                error!(
                    device_id,
                    plan_id = entitlement.plan_id,
                    db_error = ?err,
                    "access_status: failed to load plan"
                );
                AccessStatusError::Internal(err)
            })?
            .map(|plan| plan.name);

        let remaining = entitlement.expires_at - now;

        Ok(AccessStatusDto {
            connected: true,
            plan_name,
            expires_at: Some(entitlement.expires_at),
            time_remaining_minutes: remaining.num_minutes().max(0),
            time_remaining_text: format_remaining(remaining),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use crates::domain::{
        entities::{entitlements::EntitlementEntity, plans::PlanEntity},
        repositories::{entitlements::MockEntitlementRepository, plans::MockPlanRepository},
    };
    use mockall::predicate::eq;

    fn sample_entitlement(device_id: &str, expires_in: Duration) -> EntitlementEntity {
        let now = Utc::now();
        EntitlementEntity {
            id: 9,
            device_id: device_id.to_string(),
            plan_id: 7,
            status: EntitlementStatus::Active.to_string(),
            starts_at: now - Duration::hours(1),
            expires_at: now + expires_in,
            created_at: now - Duration::hours(1),
            updated_at: now - Duration::hours(1),
        }
    }

    fn sample_plan() -> PlanEntity {
        PlanEntity {
            id: 7,
            name: "Day Pass".to_string(),
            price_minor: 1000,
            duration_minutes: 24 * 60,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn device_without_entitlement_is_disconnected() {
        let plan_repo = MockPlanRepository::new();
        let mut entitlement_repo = MockEntitlementRepository::new();

        entitlement_repo
            .expect_find_current()
            .with(eq("d1"))
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = AccessStatusUseCase::new(Arc::new(plan_repo), Arc::new(entitlement_repo));
        let status = usecase.status("d1").await.unwrap();

        assert!(!status.connected);
        assert_eq!(status.time_remaining_minutes, 0);
    }

    #[tokio::test]
    async fn active_entitlement_reports_connected_with_remaining_time() {
        let mut plan_repo = MockPlanRepository::new();
        let mut entitlement_repo = MockEntitlementRepository::new();

        entitlement_repo
            .expect_find_current()
            .returning(|_| Box::pin(async { Ok(Some(sample_entitlement("d1", Duration::hours(5)))) }));
        plan_repo
            .expect_find_by_id()
            .with(eq(7))
            .returning(|_| Box::pin(async { Ok(Some(sample_plan())) }));

        let usecase = AccessStatusUseCase::new(Arc::new(plan_repo), Arc::new(entitlement_repo));
        let status = usecase.status("d1").await.unwrap();

        assert!(status.connected);
        assert_eq!(status.plan_name.as_deref(), Some("Day Pass"));
        assert!(status.time_remaining_minutes >= 299 && status.time_remaining_minutes <= 300);
    }

    #[tokio::test]
    async fn elapsed_window_is_disconnected_without_any_write() {
        // A row the sweeper has not caught up with yet: status still says
        // active but the window has passed.
        let plan_repo = MockPlanRepository::new();
        let mut entitlement_repo = MockEntitlementRepository::new();

        entitlement_repo.expect_find_current().returning(|_| {
            Box::pin(async { Ok(Some(sample_entitlement("d1", Duration::minutes(-5)))) })
        });

        let usecase = AccessStatusUseCase::new(Arc::new(plan_repo), Arc::new(entitlement_repo));
        let status = usecase.status("d1").await.unwrap();

        assert!(!status.connected);
        assert!(status.expires_at.is_none());
    }

    #[tokio::test]
    async fn empty_device_id_is_rejected() {
        let usecase = AccessStatusUseCase::new(
            Arc::new(MockPlanRepository::new()),
            Arc::new(MockEntitlementRepository::new()),
        );

        let err = usecase.status("  ").await.unwrap_err();
        assert!(matches!(err, AccessStatusError::EmptyDeviceId));
    }

    #[tokio::test]
    async fn latest_expiry_reported_when_overlapping_grants_exist() {
        // Two concurrent purchases leave two active rows; the store returns
        // the one with the later expiry and that is what gets reported.
        let mut plan_repo = MockPlanRepository::new();
        let mut entitlement_repo = MockEntitlementRepository::new();

        let later = sample_entitlement("d1", Duration::hours(24));
        let expected_expiry = later.expires_at;
        entitlement_repo.expect_find_current().returning(move |_| {
            let later = later.clone();
            Box::pin(async move { Ok(Some(later)) })
        });
        plan_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(Some(sample_plan())) }));

        let usecase = AccessStatusUseCase::new(Arc::new(plan_repo), Arc::new(entitlement_repo));
        let status = usecase.status("d1").await.unwrap();

        assert!(status.connected);
        assert_eq!(status.expires_at, Some(expected_expiry));
    }
}
