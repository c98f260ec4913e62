use crate::{
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::{
    infra::{
        actuator::http_actuator::{HttpActuator, HttpActuatorConfig},
        db::postgres::postgres_connection::PgPoolSquad,
    },
    payments::momo_client::MobileMoneyClient,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let gateway = Arc::new(MobileMoneyClient::new(
        config.charge_gateway.base_url.clone(),
        config.charge_gateway.api_key.clone(),
        config.charge_gateway.signing_secret.clone(),
        config.charge_gateway.timeout_secs,
    )?);

    let actuator = Arc::new(HttpActuator::new(HttpActuatorConfig {
        base_url: config.actuator.base_url.clone(),
        api_key: config.actuator.api_key.clone(),
        timeout_secs: config.actuator.timeout_secs,
    })?);

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/portal",
            routers::portal::routes(
                Arc::clone(&db_pool),
                Arc::clone(&gateway),
                Arc::clone(&actuator),
            ),
        )
        .nest(
            "/api/v1/admin",
            routers::admin::routes(Arc::clone(&db_pool), Arc::clone(&actuator)),
        )
        .route("/api/v1/health-check", get(default_routers::health_check))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
    };

    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
