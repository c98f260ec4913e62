use anyhow::Result;
use crates::domain::repositories::{
    actuator::NetworkActuator, entitlements::EntitlementRepository,
};
use crates::infra::{
    actuator::http_actuator::{HttpActuator, HttpActuatorConfig},
    db::{postgres::postgres_connection, repositories::entitlements::EntitlementPostgres},
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info};
use worker::{axum_http, config, services, usecases::expire_entitlements::ExpireEntitlementsUseCase};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    crates::observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let db_pool_arc = Arc::new(postgres_pool);

    let entitlement_repository: Arc<dyn EntitlementRepository + Send + Sync> =
        Arc::new(EntitlementPostgres::new(Arc::clone(&db_pool_arc)));

    let actuator: Arc<dyn NetworkActuator + Send + Sync> =
        Arc::new(HttpActuator::new(HttpActuatorConfig {
            base_url: dotenvy_env.actuator.base_url.clone(),
            api_key: dotenvy_env.actuator.api_key.clone(),
            timeout_secs: dotenvy_env.actuator.timeout_secs,
        })?);

    let sweeper_usecase = Arc::new(ExpireEntitlementsUseCase::new(
        entitlement_repository,
        actuator,
    ));

    info!("Worker started");

    let sweep_interval = Duration::from_secs(dotenvy_env.sweeper.interval_secs);
    let sweeper_loop = tokio::spawn(services::sweeper_loop::run_sweeper_loop(
        sweeper_usecase,
        sweep_interval,
    ));

    let server_port = dotenvy_env.worker_server.port;
    let health_server = tokio::spawn(async move { axum_http::http_serve::start(server_port).await });

    tokio::select! {
        result = sweeper_loop => result??,
        result = health_server => result??,
    };

    Ok(())
}
