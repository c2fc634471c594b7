//! Domain-specific assertion macros for logflow harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* record invariant was violated.

use logflow::{Filter, LogRecord};

// ---------------------------------------------------------------------------
// Record assertions
// ---------------------------------------------------------------------------

/// Assert that a record carries the expected tag.
///
/// ```rust
/// assert_tag!(record, "Billing");
/// ```
#[macro_export]
macro_rules! assert_tag {
    ($record:expr, $tag:expr) => {{
        let record: &logflow::LogRecord = &$record;
        let expected: &str = $tag;
        if record.tag != expected {
            panic!(
                "assert_tag! failed:\n  expected: {:?}\n  actual:   {:?}\n  message: {:?}",
                expected, record.tag, record.message
            );
        }
    }};
}

/// Assert that a record has a specific level.
///
/// ```rust
/// assert_level!(record, LogLevel::Error);
/// ```
#[macro_export]
macro_rules! assert_level {
    ($record:expr, $level:expr) => {{
        let record: &logflow::LogRecord = &$record;
        let expected: logflow::LogLevel = $level;
        if record.level != expected {
            panic!(
                "assert_level! failed:\n  expected: {:?}\n  actual:   {:?}\n  message: {:?}",
                expected, record.level, record.message
            );
        }
    }};
}

/// Assert that a record has a non-empty `trace` metadata entry.
#[macro_export]
macro_rules! assert_has_trace {
    ($record:expr) => {{
        let record: &logflow::LogRecord = &$record;
        match record.trace() {
            Some(trace) if !trace.is_empty() => {}
            other => panic!(
                "assert_has_trace! failed: trace is {:?}.\n  metadata: {:?}",
                other, record.metadata
            ),
        }
    }};
}

/// Assert that a record has no `trace` metadata entry.
#[macro_export]
macro_rules! assert_no_trace {
    ($record:expr) => {{
        let record: &logflow::LogRecord = &$record;
        if record.metadata.contains_key(logflow::TRACE_KEY) {
            panic!(
                "assert_no_trace! failed: unexpected trace {:?}",
                record.metadata[logflow::TRACE_KEY]
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Filter assertions
// ---------------------------------------------------------------------------

/// Assert that every record delivered to a subscription satisfies its filter.
pub fn assert_all_match<R: AsRef<LogRecord>>(filter: &Filter, records: &[R]) {
    let failing: Vec<_> = records
        .iter()
        .map(AsRef::as_ref)
        .filter(|r| !filter.matches(r))
        .collect();
    assert!(
        failing.is_empty(),
        "{} of {} records escaped filter {:?}: {:?}",
        failing.len(),
        records.len(),
        filter,
        failing
    );
}
