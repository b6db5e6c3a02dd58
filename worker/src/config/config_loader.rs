use super::config_model::{Database, DotEnvyConfig, Maintenance, WorkerServer};
use anyhow::{Context, Result};

pub const DEFAULT_INVITATION_TTL_DAYS: i64 = 30;

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

    let worker_server = WorkerServer {
        port: required("SERVER_PORT_WORKER")?
            .parse()
            .context("SERVER_PORT_WORKER is invalid")?,
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

    let maintenance = Maintenance {
        internal_token: lookup("INTERNAL_MAINTENANCE_TOKEN").and_then(|v| {
            let trimmed = v.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        }),
        invitation_ttl_days: lookup("INVITATION_TTL_DAYS")
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|v| *v >= 0)
            .unwrap_or(DEFAULT_INVITATION_TTL_DAYS),
    };

    Ok(DotEnvyConfig {
        worker_server,
        database,
        maintenance,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("SERVER_PORT_WORKER", "8081".to_string()),
            ("SERVER_BODY_LIMIT", "1".to_string()),
            ("SERVER_TIMEOUT", "30".to_string()),
            ("DATABASE_URL", "postgres://localhost:5432/bw".to_string()),
        ])
    }

    #[test]
    fn maintenance_defaults_apply() {
        let env = base_env();
        let config = from_lookup(|key| env.get(key).cloned()).expect("config");

        assert!(config.maintenance.internal_token.is_none());
        assert_eq!(config.maintenance.invitation_ttl_days, DEFAULT_INVITATION_TTL_DAYS);
    }

    #[test]
    fn blank_token_counts_as_unset_and_negative_ttl_is_ignored() {
        let mut env = base_env();
        env.insert("INTERNAL_MAINTENANCE_TOKEN", "   ".to_string());
        env.insert("INVITATION_TTL_DAYS", "-3".to_string());
        let config = from_lookup(|key| env.get(key).cloned()).expect("config");

        assert!(config.maintenance.internal_token.is_none());
        assert_eq!(config.maintenance.invitation_ttl_days, DEFAULT_INVITATION_TTL_DAYS);
    }

    #[test]
    fn missing_port_is_an_error() {
        let mut env = base_env();
        env.remove("SERVER_PORT_WORKER");

        assert!(from_lookup(|key| env.get(key).cloned()).is_err());
    }
}
