#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub actuator: Actuator,
    pub sweeper: Sweeper,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Actuator {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Sweeper {
    pub interval_secs: u64,
}
