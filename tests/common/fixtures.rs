//! Static publish sequences used across harnesses.
//!
//! Each entry is `(tag, level, message)`. Tags and levels are interleaved so
//! every tag/threshold combination has both matching and rejected records.

use logflow::{LogLevel, Router};

pub const TAGS: &[&str] = &["Api", "Db", "Worker"];

pub const MIXED_SEQUENCE: &[(&str, LogLevel, &str)] = &[
    ("Api", LogLevel::Info, "GET /api/v1/users 200 OK (12ms)"),
    ("Db", LogLevel::Debug, "connection acquired from pool (pool=18/20)"),
    ("Worker", LogLevel::Info, "dequeued job type=email"),
    ("Api", LogLevel::Error, "upstream error: POST http://payments:8080 503"),
    ("Db", LogLevel::Fault, "replica lost quorum"),
    ("Worker", LogLevel::Debug, "heartbeat sent to coordinator"),
    ("Api", LogLevel::Debug, "middleware chain completed in 0.4ms"),
    ("Worker", LogLevel::Error, "job failed after 3 attempts: type=data_export"),
    ("Db", LogLevel::Info, "slow query: SELECT * FROM orders (1240ms)"),
    ("Api", LogLevel::Fault, "panic: index out of range [3] with length 3"),
];

/// Publish every entry of `sequence` through `router`, in order.
pub fn publish_sequence(router: &Router, sequence: &[(&str, LogLevel, &str)]) {
    for (tag, level, message) in sequence {
        router.log(*message, *tag, *level, false);
    }
}

/// The entries of `sequence` a `(tag, level)` subscription should yield.
pub fn expected_messages<'a>(
    sequence: &[(&'a str, LogLevel, &'a str)],
    tag: Option<&str>,
    level: LogLevel,
) -> Vec<&'a str> {
    sequence
        .iter()
        .filter(|(t, l, _)| tag.map_or(true, |tag| tag == *t) && l.admits(level))
        .map(|(_, _, m)| *m)
        .collect()
}
