//! Error types for logflow-core.
//!
//! Publishing and subscribing never fail; these only surface when parsing
//! severity names or building configuration.

/// A severity name that is not one of `fault`, `error`, `info` or `debug`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level {0:?} (expected fault, error, info or debug)")]
pub struct ParseLevelError(pub String);

/// Failure while building or deserialising a [`Config`](crate::config::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid logflow configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}
