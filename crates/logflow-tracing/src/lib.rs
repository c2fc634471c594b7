//! logflow-tracing: republishes `tracing` events into a logflow [`Router`].
//!
//! ```ignore
//! use logflow_tracing::RouterLayer;
//! use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(RouterLayer::shared())
//!     .init();
//! ```
//!
//! | tracing level | logflow level |
//! |---------------|---------------|
//! | `ERROR`, `WARN` | `Error`     |
//! | `INFO`        | `Info`        |
//! | `DEBUG`, `TRACE` | `Debug`    |
//!
//! The record tag is the first `::` segment of the event target. Events from
//! `logflow*` targets are dropped so the router's own diagnostics never feed
//! back into it.

use std::fmt;

use logflow_core::{LogLevel, Metadata, Router};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Metadata key holding the full event target.
pub const TARGET_KEY: &str = "target";
/// Metadata key holding the original tracing level name.
pub const TRACING_LEVEL_KEY: &str = "tracing_level";

/// A tracing [`Layer`] that publishes every event into a [`Router`].
#[derive(Debug, Clone, Copy)]
pub struct RouterLayer {
    router: &'static Router,
}

impl RouterLayer {
    pub fn new(router: &'static Router) -> Self {
        Self { router }
    }

    /// A layer publishing into [`Router::shared`].
    pub fn shared() -> Self {
        Self::new(Router::shared())
    }

    pub fn router(&self) -> &'static Router {
        self.router
    }

    fn map_level(level: &Level) -> LogLevel {
        match *level {
            Level::ERROR | Level::WARN => LogLevel::Error,
            Level::INFO => LogLevel::Info,
            Level::DEBUG | Level::TRACE => LogLevel::Debug,
        }
    }
}

impl<S> Layer<S> for RouterLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let target = meta.target();
        if target.starts_with("logflow") {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut metadata = visitor.fields;
        metadata.insert(TARGET_KEY.to_string(), target.into());
        metadata.insert(TRACING_LEVEL_KEY.to_string(), meta.level().as_str().into());

        let tag = target.split("::").next().unwrap_or(target);
        self.router.publish(
            visitor.message.unwrap_or_default(),
            tag,
            Self::map_level(meta.level()),
            false,
            metadata,
        );
    }
}

/// Collects the `message` field and every other field as a JSON value.
#[derive(Default)]
struct FieldVisitor {
    message: Option<String>,
    fields: Metadata,
}

impl FieldVisitor {
    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.insert(field, rendered.into());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, value.into());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value.to_string().into());
    }
}
