//! Configuration types for logflow.
//!
//! [`Config::defaults`] returns the built-in defaults without touching the
//! filesystem. [`Config::from_toml`] layers a TOML string over them and
//! [`Config::load`] layers an optional file.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::LogLevel;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[router]
subscribe_level = "debug"
fallback_tag    = "Unknown"
capture_caller  = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level logflow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
}

/// `[router]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouterConfig {
    /// Threshold used by `Router::flow`.
    #[serde(default = "default_subscribe_level")]
    pub subscribe_level: LogLevel,
    /// Tag given to untagged records whose caller cannot be recovered.
    #[serde(default = "default_fallback_tag")]
    pub fallback_tag: String,
    /// When false, untagged records skip caller derivation entirely.
    #[serde(default = "default_capture_caller")]
    pub capture_caller: bool,
}

fn default_subscribe_level() -> LogLevel { LogLevel::Debug }
fn default_fallback_tag() -> String { "Unknown".to_string() }
fn default_capture_caller() -> bool { true }

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            subscribe_level: default_subscribe_level(),
            fallback_tag: default_fallback_tag(),
            capture_caller: default_capture_caller(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Layer `toml` over the built-in defaults.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Layer the TOML file at `path` over the built-in defaults. A missing
    /// file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(
                config::File::from(path.as_ref())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
