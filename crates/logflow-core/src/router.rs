//! Log Router: publishes [`LogRecord`]s into one owned broadcast stream and
//! hands out filtered [`Subscription`]s over it.
//!
//! ```text
//! fault/error/info/debug ─► log ─► publish ─► Continuation::push
//!                                                   │
//!                           Subscription::next ◄────┘  (tag / level filter)
//! ```
//!
//! Subscriptions share the router's single read path. A subscription that is
//! the only active reader sees every record; two subscriptions pulling at the
//! same time split the records between them, each discarding whatever its
//! own filter rejects.

use std::fmt;
use std::sync::{Arc, OnceLock};

use futures::Stream;
use tracing::debug;

use crate::caller::{resolve_caller, BacktraceCaller, CallerContext, CallerTag};
use crate::config::RouterConfig;
use crate::stream::{BroadcastStream, Continuation};
use crate::types::{LogLevel, LogRecord, Metadata, TRACE_KEY};

/// Owns a broadcast stream of log records.
pub struct Router {
    continuation: Continuation<Arc<LogRecord>>,
    caller: Box<dyn CallerContext>,
    config: RouterConfig,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("config", &self.config)
            .field("closed", &self.continuation.is_closed())
            .finish_non_exhaustive()
    }
}

impl Router {
    /// A private router with default configuration.
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        let (continuation, _) = BroadcastStream::channel();
        Self {
            continuation,
            caller: Box::new(BacktraceCaller::new()),
            config,
        }
    }

    /// Replace the strategy used to derive tags for untagged calls.
    pub fn with_caller(mut self, caller: impl CallerContext + 'static) -> Self {
        self.caller = Box::new(caller);
        self
    }

    /// The process-wide router, created on first use.
    pub fn shared() -> &'static Router {
        static SHARED: OnceLock<Router> = OnceLock::new();
        SHARED.get_or_init(Router::new)
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Publishing
    // -----------------------------------------------------------------------

    /// Publish a record with an explicit tag, level and metadata.
    pub fn publish(
        &self,
        message: impl fmt::Display,
        tag: impl Into<String>,
        level: LogLevel,
        secure: bool,
        metadata: Metadata,
    ) {
        let record = LogRecord::new(message, tag, level, secure, metadata);
        self.continuation.push(Arc::new(record));
    }

    /// Publish a record, deriving the tag from the caller when none is given.
    ///
    /// A recovered caller frame is recorded under `trace` either way; only
    /// the tag depends on whether one was supplied.
    pub fn log<'a>(
        &self,
        message: impl fmt::Display,
        tag: impl Into<Option<&'a str>>,
        level: LogLevel,
        secure: bool,
    ) {
        let caller = self.call_site();
        let mut metadata = Metadata::new();
        if let Some(CallerTag { trace, .. }) = &caller {
            metadata.insert(TRACE_KEY.to_string(), trace.as_str().into());
        }

        let tag = match (tag.into(), caller) {
            (Some(tag), _) => tag.to_string(),
            (None, Some(caller)) => caller.tag,
            (None, None) => {
                debug!(fallback = %self.config.fallback_tag, "caller not recovered");
                self.config.fallback_tag.clone()
            }
        };
        self.publish(message, tag, level, secure, metadata);
    }

    pub fn fault<'a>(&self, message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
        self.log(message, tag, LogLevel::Fault, secure);
    }

    pub fn error<'a>(&self, message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
        self.log(message, tag, LogLevel::Error, secure);
    }

    pub fn info<'a>(&self, message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
        self.log(message, tag, LogLevel::Info, secure);
    }

    pub fn debug<'a>(&self, message: impl fmt::Display, tag: impl Into<Option<&'a str>>, secure: bool) {
        self.log(message, tag, LogLevel::Debug, secure);
    }

    fn call_site(&self) -> Option<CallerTag> {
        if !self.config.capture_caller {
            return None;
        }
        self.caller.caller_frame().as_deref().and_then(resolve_caller)
    }

    // -----------------------------------------------------------------------
    // Subscribing
    // -----------------------------------------------------------------------

    /// Records matching `tag` (any tag when `None`) at `level` or more severe.
    pub fn subscribe<'a>(&self, tag: impl Into<Option<&'a str>>, level: LogLevel) -> Subscription {
        Subscription {
            stream: self.continuation.stream(),
            filter: Filter::new(tag.into(), level),
        }
    }

    /// Every record at the configured default threshold.
    pub fn flow(&self) -> Subscription {
        self.subscribe(None, self.config.subscribe_level)
    }

    /// A view that publishes every record under `tag`.
    pub fn tagged(&self, tag: impl Into<String>) -> Tagged<'_> {
        Tagged {
            router: self,
            tag: tag.into(),
        }
    }

    /// Close the owned stream. Pending and future pulls end with `None`.
    ///
    /// Logging never needs this; it exists for owners that want to end
    /// their subscriptions deterministically.
    pub fn close(&self) {
        self.continuation.close();
    }

    pub fn is_closed(&self) -> bool {
        self.continuation.is_closed()
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// The tag/level predicate a subscription applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub tag: Option<String>,
    pub level: LogLevel,
}

impl Filter {
    pub fn new(tag: Option<&str>, level: LogLevel) -> Self {
        Self {
            tag: tag.map(str::to_string),
            level,
        }
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        let tag_matches = self.tag.as_deref().map_or(true, |tag| tag == record.tag);
        tag_matches && record.level.admits(self.level)
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A filtered, lazily produced sequence of records.
///
/// Dropping it, or dropping a pending `next()` future, has no effect on the
/// router or on other subscriptions.
pub struct Subscription {
    stream: BroadcastStream<Arc<LogRecord>>,
    filter: Filter,
}

impl Subscription {
    /// The next matching record. `None` only once the router is closed.
    pub async fn next(&mut self) -> Option<Arc<LogRecord>> {
        loop {
            let record = self.stream.next().await?;
            if self.filter.matches(&record) {
                return Some(record);
            }
        }
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn into_stream(self) -> impl Stream<Item = Arc<LogRecord>> + Send {
        futures::stream::unfold(self, |mut subscription| async move {
            let record = subscription.next().await?;
            Some((record, subscription))
        })
    }
}

// ---------------------------------------------------------------------------
// Tagged view
// ---------------------------------------------------------------------------

/// A router view with a fixed tag.
#[derive(Debug, Clone)]
pub struct Tagged<'r> {
    router: &'r Router,
    tag: String,
}

impl Tagged<'_> {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn publish(&self, message: impl fmt::Display, level: LogLevel, secure: bool, metadata: Metadata) {
        self.router.publish(message, self.tag.as_str(), level, secure, metadata);
    }

    pub fn log(&self, message: impl fmt::Display, level: LogLevel, secure: bool) {
        self.router.log(message, self.tag.as_str(), level, secure);
    }

    pub fn fault(&self, message: impl fmt::Display, secure: bool) {
        self.log(message, LogLevel::Fault, secure);
    }

    pub fn error(&self, message: impl fmt::Display, secure: bool) {
        self.log(message, LogLevel::Error, secure);
    }

    pub fn info(&self, message: impl fmt::Display, secure: bool) {
        self.log(message, LogLevel::Info, secure);
    }

    pub fn debug(&self, message: impl fmt::Display, secure: bool) {
        self.log(message, LogLevel::Debug, secure);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
