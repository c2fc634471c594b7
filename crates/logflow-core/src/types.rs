//! Core types for logflow-core.
//!
//! This module defines the immutable [`LogRecord`] handed to every
//! subscriber, its [`LogLevel`] severity, and the open [`Metadata`] map.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseLevelError;

/// Open key/value mapping attached to a record. Order is irrelevant.
pub type Metadata = HashMap<String, serde_json::Value>;

/// Metadata key holding the caller frame a tag was derived from.
pub const TRACE_KEY: &str = "trace";

/// Log severity.
///
/// Lower discriminant means more severe: `Fault < Error < Info < Debug`.
/// A subscription with threshold `L` admits every record whose level is
/// `<= L`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
#[repr(u8)]
pub enum LogLevel {
    Fault = 0,
    Error = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Every level, most severe first.
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Fault,
        LogLevel::Error,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    /// Whether a record at this level passes a subscription threshold.
    pub fn admits(self, threshold: LogLevel) -> bool {
        self <= threshold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Fault => "FAULT",
            LogLevel::Error => "ERROR",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fault" => Ok(LogLevel::Fault),
            "error" => Ok(LogLevel::Error),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLevelError;

    fn try_from(value: String) -> Result<Self, ParseLevelError> {
        value.parse()
    }
}

/// A structured log event.
///
/// Records are built once by the router and shared behind an `Arc` with
/// every subscriber; nothing mutates a record after it is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Publish time (UTC).
    pub timestamp: DateTime<Utc>,
    /// Logical source of the record (component, module, subsystem).
    pub tag: String,
    /// The stringified payload.
    pub message: String,
    pub level: LogLevel,
    /// Advisory only: consumers decide whether to redact. The router never does.
    pub secure: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

impl LogRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        message: impl fmt::Display,
        tag: impl Into<String>,
        level: LogLevel,
        secure: bool,
        metadata: Metadata,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            tag: tag.into(),
            message: message.to_string(),
            level,
            secure,
            metadata,
        }
    }

    /// The caller frame recorded when the tag was derived, if any.
    pub fn trace(&self) -> Option<&str> {
        self.metadata.get(TRACE_KEY).and_then(|v| v.as_str())
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = if self.secure { "<secure>" } else { &self.message };
        write!(
            f,
            "{} {} [{}] {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.level,
            self.tag,
            message
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
