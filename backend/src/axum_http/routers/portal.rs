use crate::{
    axum_http::error_responses,
    usecases::{
        access_status::AccessStatusUseCase,
        plan_catalog::PlanCatalogUseCase,
        purchase::{ChargeGateway, PurchaseUseCase},
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            actuator::NetworkActuator, entitlements::EntitlementRepository,
            payments::PaymentRepository, plans::PlanRepository,
        },
        value_objects::purchases::PurchaseRequestModel,
    },
    infra::{
        actuator::http_actuator::HttpActuator,
        db::{
            postgres::postgres_connection::PgPoolSquad,
            repositories::{
                entitlements::EntitlementPostgres, payments::PaymentPostgres, plans::PlanPostgres,
            },
        },
    },
    payments::momo_client::MobileMoneyClient,
};
use std::sync::Arc;
use tracing::{error, info};

pub fn routes(
    db_pool: Arc<PgPoolSquad>,
    gateway: Arc<MobileMoneyClient>,
    actuator: Arc<HttpActuator>,
) -> Router {
    let plan_repository = Arc::new(PlanPostgres::new(Arc::clone(&db_pool)));
    let payment_repository = Arc::new(PaymentPostgres::new(Arc::clone(&db_pool)));
    let entitlement_repository = Arc::new(EntitlementPostgres::new(Arc::clone(&db_pool)));

    let purchase_usecase = PurchaseUseCase::new(
        Arc::clone(&plan_repository),
        Arc::clone(&payment_repository),
        Arc::clone(&entitlement_repository),
        gateway,
        actuator,
    );
    let access_status_usecase = AccessStatusUseCase::new(
        Arc::clone(&plan_repository),
        Arc::clone(&entitlement_repository),
    );
    let plan_catalog_usecase = PlanCatalogUseCase::new(Arc::clone(&plan_repository));

    Router::new()
        .route("/purchase", post(purchase))
        .with_state(Arc::new(purchase_usecase))
        .merge(
            Router::new()
                .route("/status/:device_id", get(device_status))
                .with_state(Arc::new(access_status_usecase)),
        )
        .merge(
            Router::new()
                .route("/plans", get(list_plans))
                .with_state(Arc::new(plan_catalog_usecase)),
        )
}

pub async fn purchase<P, Pay, E, G, A>(
    State(usecase): State<Arc<PurchaseUseCase<P, Pay, E, G, A>>>,
    Json(purchase_request_model): Json<PurchaseRequestModel>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    Pay: PaymentRepository + Send + Sync + 'static,
    E: EntitlementRepository + Send + Sync + 'static,
    G: ChargeGateway + Send + Sync + 'static,
    A: NetworkActuator + Send + Sync + 'static,
{
    info!(
        device_id = %purchase_request_model.device_id,
        plan_id = purchase_request_model.plan_id,
        "portal: purchase request received"
    );

    match usecase.purchase(purchase_request_model).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => error_responses::render(err.status_code(), &err),
    }
}

pub async fn device_status<P, E>(
    State(usecase): State<Arc<AccessStatusUseCase<P, E>>>,
    Path(device_id): Path<String>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
    E: EntitlementRepository + Send + Sync + 'static,
{
    match usecase.status(&device_id).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => error_responses::render(err.status_code(), &err),
    }
}

pub async fn list_plans<P>(
    State(usecase): State<Arc<PlanCatalogUseCase<P>>>,
) -> impl IntoResponse
where
    P: PlanRepository + Send + Sync + 'static,
{
    match usecase.list_active_plans().await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => {
            error!(error = ?err, "portal: failed to list plans");
            error_responses::render(StatusCode::INTERNAL_SERVER_ERROR, &err)
        }
    }
}
