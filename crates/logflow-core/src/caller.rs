//! Caller context: best-effort tag derivation for untagged log calls.
//!
//! A [`CallerContext`] produces the raw text of the frame that issued a log
//! call. [`resolve_caller`] turns that text into a tag: the frame must contain
//! `at <qualified-name>`, and the tag is the leading segment of the name
//! before the first `.` or `::`.
//!
//! | Frame text                                   | Tag       |
//! |----------------------------------------------|-----------|
//! | `at Billing.charge (billing.ts:10:3)`        | `Billing` |
//! | `at myapp::worker::run (./src/worker.rs:4:9)`| `myapp`   |
//! | `<anonymous>`                                | none      |
//!
//! Nothing here can fail a log call: every strategy returns `Option`.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::OnceLock;

use regex::Regex;

/// Symbol prefixes treated as the logger's own (or the runtime's) frames.
const INTERNAL_PREFIXES: &[&str] = &[
    "std::",
    "core::",
    "alloc::",
    "backtrace::",
    "logflow_core::",
    "logflow_tracing::",
    "logflow::",
    "tokio::",
    "futures",
    "tracing",
    "__rust",
    "rust_begin_unwind",
];

/// Source of the raw frame text for the code that issued a log call.
///
/// Any `Fn() -> Option<String>` closure is a `CallerContext`, which is how
/// tests inject fixed frames.
pub trait CallerContext: Send + Sync {
    fn caller_frame(&self) -> Option<String>;
}

impl<F> CallerContext for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn caller_frame(&self) -> Option<String> {
        self()
    }
}

/// A tag recovered from a caller frame, with the frame it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerTag {
    pub tag: String,
    /// The trimmed frame text, stored under the `trace` metadata key.
    pub trace: String,
}

fn frame_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|\s)at\s+<?([^\s.:<>()]+)").expect("frame pattern must compile")
    })
}

/// Extract a tag from frame text of the form `at <qualified-name> ...`.
pub fn resolve_caller(frame: &str) -> Option<CallerTag> {
    let frame = frame.trim();
    let tag = frame_pattern().captures(frame)?.get(1)?.as_str();
    Some(CallerTag {
        tag: tag.to_string(),
        trace: frame.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Never recovers a caller. Every untagged record gets the fallback tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCaller;

impl CallerContext for NoCaller {
    fn caller_frame(&self) -> Option<String> {
        None
    }
}

/// Captures a [`Backtrace`] on each untagged call and picks the first frame
/// outside the logger, the runtime and the standard library.
///
/// Depends on debug symbols. When backtraces are unsupported or every frame
/// is internal, no frame is returned.
#[derive(Debug, Clone, Default)]
pub struct BacktraceCaller {
    extra_prefixes: Vec<String>,
}

impl BacktraceCaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also treat frames whose symbol starts with `prefix` as internal, e.g.
    /// an application's own logging wrapper.
    pub fn skip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.extra_prefixes.push(prefix.into());
        self
    }

    fn is_internal(&self, symbol: &str) -> bool {
        if symbol == "<unknown>" {
            return true;
        }
        let symbol = symbol.trim_start_matches('<');
        INTERNAL_PREFIXES.iter().any(|p| symbol.starts_with(p))
            || self.extra_prefixes.iter().any(|p| symbol.starts_with(p.as_str()))
    }

    /// Pick the caller frame out of a rendered backtrace.
    ///
    /// The rendering is the one `std` produces: a numbered symbol line,
    /// optionally followed by an indented `at <file>:<line>:<col>` line. The
    /// result reads `at <symbol> (<file>:<line>:<col>)`.
    pub fn select_frame(&self, rendered: &str) -> Option<String> {
        let mut lines = rendered.lines().map(str::trim).peekable();
        while let Some(line) = lines.next() {
            let Some((index, symbol)) = line.split_once(": ") else {
                continue;
            };
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                continue;
            }
            let location = lines
                .next_if(|next| next.starts_with("at "))
                .map(|next| next["at ".len()..].to_string());
            if self.is_internal(symbol) {
                continue;
            }
            return Some(match location {
                Some(location) => format!("at {symbol} ({location})"),
                None => format!("at {symbol}"),
            });
        }
        None
    }
}

impl CallerContext for BacktraceCaller {
    fn caller_frame(&self) -> Option<String> {
        let backtrace = Backtrace::force_capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return None;
        }
        self.select_frame(&backtrace.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
