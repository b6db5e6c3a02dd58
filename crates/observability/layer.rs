use super::config::ServiceContext;
use super::discord::{AlertEvent, AlertSender};
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Forwards events at or above `min_level` to the alert sink.
pub(crate) struct ErrorNotifyLayer {
    sender: AlertSender,
    service_context: ServiceContext,
    min_level: Level,
}

impl ErrorNotifyLayer {
    pub(crate) fn new(
        sender: AlertSender,
        service_context: ServiceContext,
        min_level: Level,
    ) -> Self {
        Self {
            sender,
            service_context,
            min_level,
        }
    }
}

#[derive(Default)]
struct FieldCollector {
    values: BTreeMap<String, String>,
}

impl FieldCollector {
    fn insert(&mut self, field: &Field, value: String) {
        let name = field.name();
        let value = if is_sensitive_key(name) {
            "[REDACTED]".to_string()
        } else {
            value
        };
        self.values.insert(name.to_string(), value);
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_string());
    }
}

impl<S> Layer<S> for ErrorNotifyLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        // Level ordering is inverted: ERROR is the smallest.
        if *metadata.level() > self.min_level {
            return;
        }

        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        let message = collector
            .values
            .remove("message")
            .map(|raw| unquote(&raw).to_string());

        let spans = ctx
            .event_span(event)
            .map(|span| {
                span.scope()
                    .from_root()
                    .map(|s| s.metadata().name().to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        self.sender.try_send(AlertEvent {
            level: *metadata.level(),
            timestamp: Utc::now(),
            service_name: self.service_context.service_name.clone(),
            environment: self.service_context.environment.clone(),
            component: self.service_context.component.clone(),
            target: metadata.target().to_string(),
            location: metadata
                .file()
                .zip(metadata.line())
                .map(|(file, line)| format!("{file}:{line}")),
            message,
            fields: collector.values,
            spans,
        });
    }
}

fn unquote(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
}

/// Emails of invitees and members are personal data and stay out of alerts.
fn is_sensitive_key(field_name: &str) -> bool {
    let field = field_name.to_ascii_lowercase();
    ["webhook", "secret", "password", "token", "authorization", "email", "cookie"]
        .iter()
        .any(|needle| field.contains(needle))
}
