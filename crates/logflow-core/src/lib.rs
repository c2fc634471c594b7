//! logflow-core: in-process structured logging with filtered subscriptions.
//!
//! # Architecture
//!
//! ```text
//! publish ──► Router ──► BroadcastStream<Arc<LogRecord>> ──► Subscription (tag / level)
//!               │
//!               └── CallerContext (tag for untagged calls)
//! ```
//!
//! [`stream`] is the generic single-producer stream; [`router`] wraps it for
//! log records. Neither can fail at runtime.

pub mod caller;
pub mod config;
pub mod error;
pub mod router;
pub mod stream;
pub mod types;

pub use caller::{resolve_caller, BacktraceCaller, CallerContext, CallerTag, NoCaller};
pub use config::{Config, RouterConfig};
pub use error::{ConfigError, ParseLevelError};
pub use router::{Filter, Router, Subscription, Tagged};
pub use stream::{BroadcastStream, Continuation};
pub use types::{LogLevel, LogRecord, Metadata, TRACE_KEY};
