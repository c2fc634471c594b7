//! logflow: in-process structured logging with filtered asynchronous
//! subscriptions.
//!
//! The free functions in this crate delegate to the process-wide
//! [`Router::shared`] instance, giving one ambient log stream. Construct a
//! private [`Router`] when a component (or a test) needs its own.
//!
//! ```ignore
//! let mut errors = logflow::subscribe("Billing", logflow::LogLevel::Error);
//! logflow::error("card declined", "Billing", false);
//! let record = errors.next().await;
//! ```
//!
//! # Crates
//!
//! ```text
//! logflow-core ──► logflow-tracing
//!      │                 │
//!      └──────┬──────────┘
//!          logflow (facade)
//! ```

use std::fmt;

pub use logflow_core::{
    resolve_caller, BacktraceCaller, BroadcastStream, CallerContext, CallerTag, Config,
    ConfigError, Continuation, Filter, LogLevel, LogRecord, Metadata, NoCaller, ParseLevelError,
    Router, RouterConfig, Subscription, Tagged, TRACE_KEY,
};
pub use logflow_tracing::RouterLayer;

/// The process-wide router.
pub fn shared() -> &'static Router {
    Router::shared()
}

pub fn publish(
    message: impl fmt::Display,
    tag: impl Into<String>,
    level: LogLevel,
    secure: bool,
    metadata: Metadata,
) {
    shared().publish(message, tag, level, secure, metadata);
}

pub fn log<'a>(
    message: impl fmt::Display,
    tag: impl Into<Option<&'a str>>,
    level: LogLevel,
    secure: bool,
) {
    shared().log(message, tag, level, secure);
}

pub fn fault<'a>(message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
    shared().fault(message, tag, secure);
}

pub fn error<'a>(message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
    shared().error(message, tag, secure);
}

pub fn info<'a>(message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
    shared().info(message, tag, secure);
}

pub fn debug<'a>(message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
    shared().debug(message, tag, secure);
}

/// Subscribe to the shared router.
pub fn subscribe<'a>(tag: impl Into<Option<&'a str>>, level: LogLevel) -> Subscription {
    shared().subscribe(tag, level)
}

/// Every record on the shared router at the default threshold.
pub fn flow() -> Subscription {
    shared().flow()
}

pub fn tagged(tag: impl Into<String>) -> Tagged<'static> {
    shared().tagged(tag)
}
