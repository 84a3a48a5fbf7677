//! Server Configuration
//!
//! Deployment settings loaded from environment variables. The core takes
//! these as plain data; nothing inside a session reads the environment.
//!
//! # Environment Variables
//!
//! - `STOCK_STREAM_PORT`: HTTP listen port (default: 8080)
//! - `STOCK_STREAM_TICK_MS`: milliseconds between frames (default: 1000)
//! - `STOCK_STREAM_MAX_TICKS`: frames per stream (default: 10)

use std::time::Duration;

use crate::application::session::SessionSettings;

/// Default HTTP listen port.
const DEFAULT_PORT: u16 = 8080;

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port.
    pub port: u16,
    /// Streaming settings applied to every session.
    pub session: SessionSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            session: SessionSettings::default(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable was set to a value that does not parse.
    #[error("invalid value for {var}: {value:?}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// The rejected raw value.
        value: String,
    },
}

impl ServerConfig {
    /// Load configuration from process environment variables.
    ///
    /// Unset variables take their defaults; set-but-invalid values are
    /// rejected rather than silently replaced.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is set to a value that
    /// does not parse or is zero where zero is meaningless.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup (testable
    /// without touching the process environment).
    ///
    /// # Errors
    ///
    /// Same contract as [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = parse_var(&lookup, "STOCK_STREAM_PORT", defaults.port)?;
        let tick_ms: u64 = parse_var(
            &lookup,
            "STOCK_STREAM_TICK_MS",
            u64::try_from(defaults.session.tick_interval.as_millis()).unwrap_or(1_000),
        )?;
        let max_ticks: usize =
            parse_var(&lookup, "STOCK_STREAM_MAX_TICKS", defaults.session.max_ticks)?;

        if tick_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "STOCK_STREAM_TICK_MS",
                value: "0".to_string(),
            });
        }
        if max_ticks == 0 {
            return Err(ConfigError::Invalid {
                var: "STOCK_STREAM_MAX_TICKS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            port,
            session: SessionSettings {
                tick_interval: Duration::from_millis(tick_ms),
                max_ticks,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            var,
            value: raw,
        }),
    }
}

// =============================================================================
// Tests
// =============================================================================
