use crate::{axum_http::error_responses, usecases::admin::AdminUseCase};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::repositories::{
        actuator::NetworkActuator, entitlements::EntitlementRepository,
        payments::PaymentRepository,
    },
    infra::{
        actuator::http_actuator::HttpActuator,
        db::{
            postgres::postgres_connection::PgPoolSquad,
            repositories::{entitlements::EntitlementPostgres, payments::PaymentPostgres},
        },
    },
};
use std::sync::Arc;
use tracing::info;

pub fn routes(db_pool: Arc<PgPoolSquad>, actuator: Arc<HttpActuator>) -> Router {
    let entitlement_repository = Arc::new(EntitlementPostgres::new(Arc::clone(&db_pool)));
    let payment_repository = Arc::new(PaymentPostgres::new(Arc::clone(&db_pool)));

    let admin_usecase = AdminUseCase::new(entitlement_repository, payment_repository, actuator);

    Router::new()
        .route(
            "/entitlements/:entitlement_id/disconnect",
            post(disconnect_entitlement),
        )
        .route("/reconciliation", get(reconciliation_report))
        .with_state(Arc::new(admin_usecase))
}

pub async fn disconnect_entitlement<E, Pay, A>(
    State(usecase): State<Arc<AdminUseCase<E, Pay, A>>>,
    Path(entitlement_id): Path<i64>,
) -> impl IntoResponse
where
    E: EntitlementRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    A: NetworkActuator + Send + Sync + 'static,
{
    info!(entitlement_id, "admin: disconnect request received");

    match usecase.disconnect(entitlement_id).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_responses::render(err.status_code(), &err),
    }
}

pub async fn reconciliation_report<E, Pay, A>(
    State(usecase): State<Arc<AdminUseCase<E, Pay, A>>>,
) -> impl IntoResponse
where
    E: EntitlementRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    A: NetworkActuator + Send + Sync + 'static,
{
    match usecase.reconciliation_report().await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_responses::render(err.status_code(), &err),
    }
}
