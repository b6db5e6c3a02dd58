use url::Url;

use crate::config::stage::Stage;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub auth: Auth,
    pub session: Session,
    pub public: Public,
    pub mail: Option<Mail>,
    pub stage: Stage,
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
pub struct Auth {
    pub jwt_secret: String,
}

/// `secret` signs the progress cookie and must be at least 64 bytes.
#[derive(Debug, Clone)]
pub struct Session {
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct Public {
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Mail {
    pub api_url: Url,
    pub api_key: String,
    pub from: String,
}
