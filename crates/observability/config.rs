use std::env;
use tracing::Level;
use url::Url;

const DEFAULT_SERVICE_NAME: &str = "business-wall";

#[derive(Debug, Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Debug, Clone)]
pub(crate) struct DiscordConfig {
    pub(crate) webhook_url: Url,
    pub(crate) min_level: Level,
}

#[derive(Debug, Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) discord: Option<DiscordConfig>,
    /// Logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| env::var(key).ok())
    }

    fn from_lookup(component: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let service_context = ServiceContext {
            service_name: non_empty("SERVICE_NAME")
                .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string()),
            environment: non_empty("STAGE").unwrap_or_else(|| "local".to_string()),
            component: component.trim().to_string(),
        };

        let mut warnings = Vec::new();
        let enabled = non_empty("DISCORD_NOTIFY_ENABLED")
            .map(|raw| parse_bool(&raw))
            .unwrap_or(Some(true));

        let discord = match (enabled, non_empty("DISCORD_WEBHOOK_URL")) {
            (Some(false), _) | (_, None) => None,
            (None, _) => {
                warnings.push(
                    "DISCORD_NOTIFY_ENABLED is not a boolean; Discord alerts disabled".to_string(),
                );
                None
            }
            (Some(true), Some(raw)) => match Url::parse(&raw) {
                Ok(webhook_url) => {
                    let min_level = match non_empty("DISCORD_NOTIFY_LEVEL") {
                        None => Level::ERROR,
                        Some(level) => parse_level(&level).unwrap_or_else(|| {
                            warnings.push(format!(
                                "DISCORD_NOTIFY_LEVEL={level} is invalid; using ERROR"
                            ));
                            Level::ERROR
                        }),
                    };
                    Some(DiscordConfig { webhook_url, min_level })
                }
                // The raw URL embeds the webhook secret, keep it out of the warning.
                Err(err) => {
                    warnings.push(format!(
                        "DISCORD_WEBHOOK_URL is invalid ({err}); Discord alerts disabled"
                    ));
                    None
                }
            },
        };

        Self {
            service_context,
            discord,
            warnings,
        }
    }
}

fn parse_level(input: &str) -> Option<Level> {
    match input.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
