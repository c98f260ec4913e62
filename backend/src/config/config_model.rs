#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub charge_gateway: ChargeGateway,
    pub actuator: Actuator,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ChargeGateway {
    pub base_url: String,
    pub api_key: String,
    pub signing_secret: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Actuator {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}
