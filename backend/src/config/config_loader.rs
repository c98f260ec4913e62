use anyhow::{Ok, Result};

use super::config_model::{Actuator, BackendServer, ChargeGateway, Database, DotEnvyConfig};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let charge_gateway = ChargeGateway {
        base_url: std::env::var("GATEWAY_BASE_URL").expect("GATEWAY_BASE_URL is invalid"),
        api_key: std::env::var("GATEWAY_API_KEY").expect("GATEWAY_API_KEY is invalid"),
        signing_secret: std::env::var("GATEWAY_SIGNING_SECRET")
            .expect("GATEWAY_SIGNING_SECRET is invalid"),
        timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?,
    };

    let actuator = Actuator {
        base_url: std::env::var("ACTUATOR_BASE_URL").expect("ACTUATOR_BASE_URL is invalid"),
        api_key: std::env::var("ACTUATOR_API_KEY").expect("ACTUATOR_API_KEY is invalid"),
        timeout_secs: std::env::var("ACTUATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        backend_server,
        database,
        charge_gateway,
        actuator,
    })
}
