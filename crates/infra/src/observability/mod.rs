//! Tracing subscriber installation
//!
//! Libraries in this workspace only emit `tracing` events; the host binary
//! decides where they go by calling [`init_tracing`] once at startup.
//!
//! Filtering follows `RUST_LOG` and falls back to [`DEFAULT_LOG_FILTER`].

use std::str::FromStr;

use butterfly_domain::{ButterflyError, Result};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Selects the output format through `BUTTERFLY_LOG_FORMAT`
pub const ENV_LOG_FORMAT: &str = "BUTTERFLY_LOG_FORMAT";

/// Output format of the fmt subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Format requested through the environment, defaulting to
    /// [`LogFormat::Pretty`]
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_FORMAT).ok().and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = ButterflyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ButterflyError::InvalidInput(format!("Unknown log format: {other}"))),
        }
    }
}

/// Install the global fmt subscriber
///
/// # Errors
/// Returns `ButterflyError::Internal` if a global subscriber is already set.
pub fn init_tracing(format: LogFormat) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed
        .map_err(|e| ButterflyError::Internal(format!("Failed to install tracing subscriber: {e}")))
}
