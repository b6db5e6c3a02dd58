use anyhow::{Context, Result, bail};
use url::Url;

use crate::config::{
    config_model::{Auth, BackendServer, Database, DotEnvyConfig, Mail, Public, Session},
    stage::Stage,
};

/// Minimum length of `SESSION_SECRET`, required by the cookie signing key.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

pub fn from_lookup<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| -> Result<String> {
        lookup(key)
            .filter(|value| !value.trim().is_empty())
            .with_context(|| format!("{} is invalid", key))
    };

    let backend_server = BackendServer {
        port: required("SERVER_PORT_BACKEND")?
            .parse()
            .context("SERVER_PORT_BACKEND is invalid")?,
        body_limit: required("SERVER_BODY_LIMIT")?
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: required("SERVER_TIMEOUT")?
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let auth = Auth {
        jwt_secret: required("JWT_SECRET")?,
    };

    let session = Session {
        secret: required("SESSION_SECRET")?,
    };
    if session.secret.len() < MIN_SESSION_SECRET_LEN {
        bail!("SESSION_SECRET must be at least {} bytes", MIN_SESSION_SECRET_LEN);
    }

    let public = Public {
        base_url: Url::parse(&required("PUBLIC_BASE_URL")?)
            .context("PUBLIC_BASE_URL is invalid")?
            .as_str()
            .trim_end_matches('/')
            .to_string(),
    };

    let mail = match lookup("MAIL_API_URL").filter(|value| !value.trim().is_empty()) {
        Some(api_url) => Some(Mail {
            api_url: Url::parse(&api_url).context("MAIL_API_URL is invalid")?,
            api_key: required("MAIL_API_KEY")?,
            from: required("MAIL_FROM")?,
        }),
        None => None,
    };

    let stage = lookup("STAGE")
        .map(|value| Stage::try_from(&value).unwrap_or_default())
        .unwrap_or_default();

    Ok(DotEnvyConfig {
        backend_server,
        database,
        auth,
        session,
        public,
        mail,
        stage,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("SERVER_PORT_BACKEND", "8080".to_string()),
            ("SERVER_BODY_LIMIT", "10".to_string()),
            ("SERVER_TIMEOUT", "30".to_string()),
            ("DATABASE_URL", "postgres://localhost:5432/bw".to_string()),
            ("JWT_SECRET", "supersecretjwtsecretforunittesting123".to_string()),
            ("SESSION_SECRET", "s".repeat(64)),
            ("PUBLIC_BASE_URL", "https://bw.example/".to_string()),
        ])
    }

    fn load_from(env: &HashMap<&'static str, String>) -> Result<DotEnvyConfig> {
        from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn loads_without_mail_settings() {
        let config = load_from(&base_env()).expect("config");

        assert_eq!(config.backend_server.port, 8080);
        assert_eq!(config.public.base_url, "https://bw.example");
        assert!(config.mail.is_none());
        assert_eq!(config.stage, Stage::Local);
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut env = base_env();
        env.insert("SESSION_SECRET", "short".to_string());

        assert!(load_from(&env).is_err());
    }

    #[test]
    fn mail_api_needs_key_and_sender() {
        let mut env = base_env();
        env.insert("MAIL_API_URL", "https://mail.example/send".to_string());
        assert!(load_from(&env).is_err());

        env.insert("MAIL_API_KEY", "key".to_string());
        env.insert("MAIL_FROM", "noreply@bw.example".to_string());
        env.insert("STAGE", "production".to_string());
        let config = load_from(&env).expect("config");

        assert_eq!(config.mail.map(|mail| mail.from), Some("noreply@bw.example".to_string()));
        assert_eq!(config.stage, Stage::Production);
    }
}
