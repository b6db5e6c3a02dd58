use anyhow::{Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{Level, warn};
use url::Url;

const DISCORD_CONTENT_LIMIT: usize = 2000;
const ALERT_QUEUE_SIZE: usize = 256;

#[derive(Debug, Clone)]
pub(crate) struct AlertEvent {
    pub(crate) level: Level,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
    pub(crate) target: String,
    pub(crate) location: Option<String>,
    pub(crate) message: Option<String>,
    pub(crate) fields: BTreeMap<String, String>,
    pub(crate) spans: Vec<String>,
}

/// Non-blocking handle used from the tracing layer.
#[derive(Clone)]
pub(crate) struct AlertSender {
    tx: mpsc::Sender<AlertEvent>,
}

impl AlertSender {
    /// A full queue drops the alert; the event is still in the fmt output.
    pub(crate) fn try_send(&self, event: AlertEvent) {
        let _ = self.tx.try_send(event);
    }
}

/// Spawns the delivery task. Must be called inside a tokio runtime.
pub(crate) fn spawn_discord_sink(webhook_url: Url) -> Result<AlertSender> {
    let client = Client::builder().timeout(Duration::from_secs(3)).build()?;
    let (tx, mut rx) = mpsc::channel::<AlertEvent>(ALERT_QUEUE_SIZE);

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Err(err) = post(&client, &webhook_url, format_content(&event)).await {
                warn!(error = %err, "observability: discord alert failed");
            }
        }
    });

    Ok(AlertSender { tx })
}

async fn post(client: &Client, webhook_url: &Url, content: String) -> Result<()> {
    let response = client
        .post(webhook_url.clone())
        .json(&json!({ "content": content }))
        .send()
        .await
        .map_err(|err| {
            // reqwest errors carry the URL, which embeds the webhook secret.
            if err.is_timeout() {
                anyhow!("discord webhook request timed out")
            } else {
                anyhow!("discord webhook request failed")
            }
        })?;

    if !response.status().is_success() {
        return Err(anyhow!("discord webhook returned {}", response.status()));
    }

    Ok(())
}

fn format_content(event: &AlertEvent) -> String {
    let mut lines = vec![
        format!(
            "**{}** `{}` `{}` `{}`",
            event.service_name,
            event.environment,
            event.component,
            event.level.as_str()
        ),
        format!(
            "`{}` `{}`{}",
            event.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            event.target,
            event
                .location
                .as_ref()
                .map(|l| format!(" `{l}`"))
                .unwrap_or_default()
        ),
    ];

    if let Some(message) = event.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        lines.push(format!("> {message}"));
    }
    if !event.spans.is_empty() {
        lines.push(format!("spans: `{}`", event.spans.join(" > ")));
    }
    for (key, value) in &event.fields {
        lines.push(format!("- `{key}` = `{value}`"));
    }

    truncate(lines.join("\n"))
}

fn truncate(content: String) -> String {
    const SUFFIX: &str = "\n… (truncated)";

    if content.chars().count() <= DISCORD_CONTENT_LIMIT {
        return content;
    }

    let keep = DISCORD_CONTENT_LIMIT - SUFFIX.chars().count();
    let mut truncated: String = content.chars().take(keep).collect();
    truncated.push_str(SUFFIX);
    truncated
}
