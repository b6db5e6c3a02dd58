#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub maintenance: Maintenance,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
    pub timeout: u64,
    pub body_limit: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

/// Internal maintenance routes answer 503 while `internal_token` is unset.
#[derive(Debug, Clone)]
pub struct Maintenance {
    pub internal_token: Option<String>,
    pub invitation_ttl_days: i64,
}
