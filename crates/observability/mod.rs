//! Tracing setup shared by the backend and the worker.

mod config;
mod discord;
mod layer;

use anyhow::Result;
use config::ObservabilityConfig;
use layer::ErrorNotifyLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Installs the global subscriber. Call once, from inside the tokio runtime.
pub fn init_observability(component: &str) -> Result<()> {
    let config = ObservabilityConfig::from_env(component);

    let notify_layer = match config.discord.as_ref() {
        Some(discord) => {
            let sender = discord::spawn_discord_sink(discord.webhook_url.clone())?;
            Some(
                ErrorNotifyLayer::new(sender, config.service_context.clone(), discord.min_level)
                    .with_filter(LevelFilter::from_level(discord.min_level)),
            )
        }
        None => None,
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Local time so a configured TZ shows up in the offset.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339());

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(notify_layer)
        .with(env_filter)
        .try_init()?;

    let context = &config.service_context;
    for warning in &config.warnings {
        warn!(
            service = %context.service_name,
            environment = %context.environment,
            component = %context.component,
            %warning,
            "observability: config warning"
        );
    }

    info!(
        service = %context.service_name,
        environment = %context.environment,
        component = %context.component,
        discord_alerts = config.discord.is_some(),
        "observability: tracing initialised"
    );

    Ok(())
}
