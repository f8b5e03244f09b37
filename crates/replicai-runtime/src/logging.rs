//! Tracing subscriber setup for binaries embedding the engine

use std::str::FromStr;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ConfigError;

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "plain" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::UnknownLogFormat(s.to_string())),
        }
    }
}

/// Install the global subscriber
///
/// An invalid `filter` falls back to `info`. Returns false when a global
/// subscriber was already installed.
pub fn init_tracing(filter: &str, format: LogFormat) -> bool {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init().is_ok(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .try_init()
            .is_ok(),
    }
}
