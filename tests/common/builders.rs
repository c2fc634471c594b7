//! Test builders: ergonomic constructors for `LogRecord` and routers.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use logflow::{LogLevel, LogRecord, Metadata, NoCaller, Router};

// ---------------------------------------------------------------------------
// LogRecordBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`LogRecord`] fixtures.
///
/// ```rust
/// let record = LogRecordBuilder::new("card declined")
///     .tag("Billing")
///     .level(LogLevel::Error)
///     .meta("request_id", "req-abc123")
///     .build();
/// ```
pub struct LogRecordBuilder {
    message: String,
    tag: String,
    level: LogLevel,
    secure: bool,
    metadata: Metadata,
}

impl LogRecordBuilder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tag: "Test".to_string(),
            level: LogLevel::Info,
            secure: false,
            metadata: Metadata::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> LogRecord {
        LogRecord::new(self.message, self.tag, self.level, self.secure, self.metadata)
    }

    /// Publish through `router` instead of building a detached record.
    pub fn publish(self, router: &Router) {
        router.publish(self.message, self.tag, self.level, self.secure, self.metadata);
    }
}

// ---------------------------------------------------------------------------
// Routers
// ---------------------------------------------------------------------------

/// A private router that never inspects call stacks.
pub fn quiet_router() -> Router {
    Router::new().with_caller(NoCaller)
}

/// A private router whose caller strategy always reports `frame`.
pub fn router_with_frame(frame: &'static str) -> Router {
    Router::new().with_caller(move || Some(frame.to_string()))
}

/// A router with `'static` lifetime, for APIs that need one (tracing layers).
pub fn leaked_router() -> &'static Router {
    Box::leak(Box::new(quiet_router()))
}
