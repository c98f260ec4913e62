use anyhow::{Ok, Result};

use super::config_model::{Actuator, Database, DotEnvyConfig, Sweeper, WorkerServer};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = WorkerServer {
        port: std::env::var("SERVER_PORT_WORKER")
            .expect("SERVER_PORT_WORKER is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let actuator = Actuator {
        base_url: std::env::var("ACTUATOR_BASE_URL").expect("ACTUATOR_BASE_URL is invalid"),
        api_key: std::env::var("ACTUATOR_API_KEY").expect("ACTUATOR_API_KEY is invalid"),
        timeout_secs: std::env::var("ACTUATOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?,
    };

    let sweeper = Sweeper {
        interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        worker_server,
        database,
        actuator,
        sweeper,
    })
}
