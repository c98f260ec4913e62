use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use crates::{
    domain::{
        entities::{entitlements::InsertEntitlementEntity, payments::InsertPaymentEntity},
        repositories::{
            actuator::NetworkActuator, entitlements::EntitlementRepository,
            payments::PaymentRepository, plans::PlanRepository,
        },
        value_objects::{
            enums::{
                charge_methods::ChargeMethod, entitlement_statuses::EntitlementStatus,
                payment_statuses::PaymentStatus,
            },
            purchases::{PurchaseReceiptDto, PurchaseRequestModel},
        },
    },
    payments::momo_client::{ChargeError, ChargeOutcome, ChargeRequest, MobileMoneyClient},
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, info, warn};

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait ChargeGateway: Send + Sync {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeOutcome, ChargeError>;
}

#[async_trait]
impl ChargeGateway for MobileMoneyClient {
    async fn charge(&self, request: ChargeRequest) -> Result<ChargeOutcome, ChargeError> {
        self.charge(request).await
    }
}

#[derive(Debug, Error)]
pub enum PurchaseError {
    #[error("device id must not be empty")]
    EmptyDeviceId,
    #[error("plan not found")]
    PlanNotFound,
    #[error("plan is no longer purchasable")]
    PlanInactive,
    #[error("amount {got} does not match plan price {expected}")]
    AmountMismatch { expected: i32, got: i32 },
    #[error("unsupported charge method: {0}")]
    UnsupportedMethod(String),
    #[error("phone number is required for mobile-money charges")]
    MissingPhoneNumber,
    #[error("charge declined: {0}")]
    GatewayDeclined(String),
    #[error("charge timed out; attempt left pending for reconciliation")]
    GatewayTimeout,
    #[error("payment provider unavailable")]
    GatewayUnavailable(String),
    #[error("failed to persist entitlement after successful charge")]
    Storage(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PurchaseError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PurchaseError::EmptyDeviceId
            | PurchaseError::PlanInactive
            | PurchaseError::AmountMismatch { .. }
            | PurchaseError::UnsupportedMethod(_)
            | PurchaseError::MissingPhoneNumber => StatusCode::BAD_REQUEST,
            PurchaseError::PlanNotFound => StatusCode::NOT_FOUND,
            PurchaseError::GatewayDeclined(_) => StatusCode::PAYMENT_REQUIRED,
            PurchaseError::GatewayTimeout | PurchaseError::GatewayUnavailable(_) => {
                StatusCode::BAD_GATEWAY
            }
            PurchaseError::Storage(_) | PurchaseError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PurchaseError>;

/// Owns the entitlement lifecycle for a purchase: validate -> record the
/// attempt -> charge once -> grant. Every call produces exactly one payment
/// row; retries are new, independently-auditable attempts, never dedup.
pub struct PurchaseUseCase<P, Pay, E, G, A>
where
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    E: EntitlementRepository + Send + Sync + 'static,
    G: ChargeGateway + Send + Sync + 'static,
    A: NetworkActuator + Send + Sync + 'static,
{
    plan_repo: Arc<P>,
    payment_repo: Arc<Pay>,
    entitlement_repo: Arc<E>,
    gateway: Arc<G>,
    actuator: Arc<A>,
}

impl<P, Pay, E, G, A> PurchaseUseCase<P, Pay, E, G, A>
where
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    E: EntitlementRepository + Send + Sync + 'static,
    G: ChargeGateway + Send + Sync + 'static,
    A: NetworkActuator + Send + Sync + 'static,
{
    pub fn new(
        plan_repo: Arc<P>,
        payment_repo: Arc<Pay>,
        entitlement_repo: Arc<E>,
        gateway: Arc<G>,
        actuator: Arc<A>,
    ) -> Self {
        Self {
            plan_repo,
            payment_repo,
            entitlement_repo,
            gateway,
            actuator,
        }
    }

    pub async fn purchase(
        &self,
        request: PurchaseRequestModel,
    ) -> UseCaseResult<PurchaseReceiptDto> {
        let device_id = request.device_id.trim().to_string();
        if device_id.is_empty() {
            return Err(PurchaseError::EmptyDeviceId);
        }

        let method = ChargeMethod::from_str(&request.method).ok_or_else(|| {
            let err = PurchaseError::UnsupportedMethod(request.method.clone());
            warn!(
                device_id = %device_id,
                method = %request.method,
                status = err.status_code().as_u16(),
                "purchase: unsupported charge method"
            );
            err
        })?;

        let phone_number = request
            .phone_number
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string());

        if method.requires_phone_number() && phone_number.is_none() {
            let err = PurchaseError::MissingPhoneNumber;
            warn!(
                device_id = %device_id,
                method = %method,
                status = err.status_code().as_u16(),
                "purchase: missing originating account for mobile-money method"
            );
            return Err(err);
        }

        let plan = self
            .plan_repo
            .find_by_id(request.plan_id)
            .await
            .map_err(|err| {
                error!(
                    device_id = %device_id,
                    plan_id = request.plan_id,
                    db_error = ?err,
                    "purchase: failed to load plan"
                );
                PurchaseError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = PurchaseError::PlanNotFound;
                warn!(
                    device_id = %device_id,
                    plan_id = request.plan_id,
                    status = err.status_code().as_u16(),
                    "purchase: plan not found"
                );
                err
            })?;

        if !plan.is_active {
            let err = PurchaseError::PlanInactive;
            warn!(
                device_id = %device_id,
                plan_id = plan.id,
                status = err.status_code().as_u16(),
                "purchase: plan is inactive"
            );
            return Err(err);
        }

        // Client-supplied amounts are rejected on mismatch, never corrected.
        if request.amount_minor != plan.price_minor {
            let err = PurchaseError::AmountMismatch {
                expected: plan.price_minor,
                got: request.amount_minor,
            };
            warn!(
                device_id = %device_id,
                plan_id = plan.id,
                expected = plan.price_minor,
                got = request.amount_minor,
                status = err.status_code().as_u16(),
                "purchase: amount does not match plan price"
            );
            return Err(err);
        }

        // Ledger row lands before the gateway call so the attempt is
        // auditable even if the process dies mid-charge.
        let payment_id = self
            .payment_repo
            .create_attempt(InsertPaymentEntity {
                device_id: device_id.clone(),
                plan_id: plan.id,
                amount_minor: plan.price_minor,
                method: method.to_string(),
                status: PaymentStatus::Pending.to_string(),
                metadata: json!({ "phone_number": phone_number.clone() }),
            })
            .await
            .map_err(|err| {
                error!(
                    device_id = %device_id,
                    plan_id = plan.id,
                    db_error = ?err,
                    "purchase: failed to record payment attempt"
                );
                PurchaseError::Internal(err)
            })?;

        info!(
            device_id = %device_id,
            plan_id = plan.id,
            payment_id,
            method = %method,
            amount_minor = plan.price_minor,
            "purchase: submitting charge"
        );

        let outcome = self
            .gateway
            .charge(ChargeRequest {
                method,
                account: phone_number,
                amount_minor: plan.price_minor,
                client_reference: payment_id.to_string(),
            })
            .await;

        match outcome {
            Ok(ChargeOutcome::Approved { provider_reference }) => {
                let now = Utc::now();
                let expires_at = now + Duration::minutes(plan.duration_minutes.into());

                let entitlement_id = self
                    .entitlement_repo
                    .create_granted(
                        payment_id,
                        &provider_reference,
                        InsertEntitlementEntity {
                            device_id: device_id.clone(),
                            plan_id: plan.id,
                            status: EntitlementStatus::Active.to_string(),
                            starts_at: now,
                            expires_at,
                        },
                    )
                    .await
                    .map_err(|err| {
                        // Money has moved but access was not granted. Surface
                        // it loudly; the reconciliation report picks it up.
                        error!(
                            device_id = %device_id,
                            payment_id,
                            provider_reference = %provider_reference,
                            db_error = ?err,
                            "purchase: charge succeeded but entitlement write failed"
                        );
                        PurchaseError::Storage(err)
                    })?;

                // At-least-once; the actuator failing does not undo the
                // grant, the live status query stays authoritative.
                if let Err(err) = self.actuator.grant_access(&device_id, expires_at).await {
                    warn!(
                        device_id = %device_id,
                        entitlement_id,
                        error = ?err,
                        "purchase: actuator grant failed; access will be retried by the gateway"
                    );
                }

                info!(
                    device_id = %device_id,
                    plan_id = plan.id,
                    payment_id,
                    entitlement_id,
                    %expires_at,
                    "purchase: entitlement granted"
                );

                Ok(PurchaseReceiptDto {
                    payment_id,
                    entitlement_id,
                    expires_at,
                })
            }
            Ok(ChargeOutcome::Declined { reason }) => {
                self.payment_repo
                    .mark_failed(payment_id, &reason)
                    .await
                    .map_err(|err| {
                        error!(
                            device_id = %device_id,
                            payment_id,
                            db_error = ?err,
                            "purchase: failed to mark declined attempt"
                        );
                        PurchaseError::Internal(err)
                    })?;

                info!(
                    device_id = %device_id,
                    payment_id,
                    reason = %reason,
                    "purchase: charge declined"
                );
                Err(PurchaseError::GatewayDeclined(reason))
            }
            Err(ChargeError::Timeout) => {
                // Outcome unknown: leave the attempt pending so it is never
                // silently promoted or buried; reconciliation resolves it.
                warn!(
                    device_id = %device_id,
                    payment_id,
                    "purchase: charge timed out; attempt left pending"
                );
                Err(PurchaseError::GatewayTimeout)
            }
            Err(err) => {
                let detail = err.to_string();
                self.payment_repo
                    .mark_failed(payment_id, &detail)
                    .await
                    .map_err(|err| {
                        error!(
                            device_id = %device_id,
                            payment_id,
                            db_error = ?err,
                            "purchase: failed to mark unreachable-provider attempt"
                        );
                        PurchaseError::Internal(err)
                    })?;

                error!(
                    device_id = %device_id,
                    payment_id,
                    error = %detail,
                    "purchase: charge failed before reaching the provider"
                );
                Err(PurchaseError::GatewayUnavailable(detail))
            }
        }
    }
}
