//! Runtime configuration

use std::time::Duration;

use replicai_coach::CoachConfig;
use thiserror::Error;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

const ENV_IDLE_TIMEOUT: &str = "REPLICAI_IDLE_TIMEOUT";
const ENV_SWEEP_INTERVAL: &str = "REPLICAI_SWEEP_INTERVAL";
const ENV_COACH_COOLDOWN: &str = "REPLICAI_COACH_COOLDOWN";
const ENV_COACH_ENABLED: &str = "REPLICAI_COACH_ENABLED";

/// Invalid configuration value
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: invalid duration {value:?}: {source}")]
    InvalidDuration {
        var: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("{var}: expected true/false/1/0, got {value:?}")]
    InvalidBool { var: &'static str, value: String },

    #[error("{var}: must be greater than zero")]
    Zero { var: &'static str },

    #[error("unknown log format {0:?}, expected pretty or json")]
    UnknownLogFormat(String),
}

/// Workout engine configuration
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Sessions untouched for this long are evicted by the sweeper
    pub idle_timeout: Duration,
    /// Period of the idle sweeper
    pub sweep_interval: Duration,
    pub coach: CoachConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            coach: CoachConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults overlaid with `REPLICAI_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(ENV_IDLE_TIMEOUT) {
            config.idle_timeout = parse_duration(ENV_IDLE_TIMEOUT, &value)?;
        }
        if let Some(value) = get(ENV_SWEEP_INTERVAL) {
            config.sweep_interval = parse_duration(ENV_SWEEP_INTERVAL, &value)?;
            if config.sweep_interval.is_zero() {
                return Err(ConfigError::Zero {
                    var: ENV_SWEEP_INTERVAL,
                });
            }
        }
        if let Some(value) = get(ENV_COACH_COOLDOWN) {
            config.coach.cooldown = parse_duration(ENV_COACH_COOLDOWN, &value)?;
        }
        if let Some(value) = get(ENV_COACH_ENABLED) {
            config.coach.enabled = parse_bool(ENV_COACH_ENABLED, &value)?;
        }

        Ok(config)
    }
}

fn parse_duration(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        var,
        value: value.to_string(),
        source,
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var,
            value: value.to_string(),
        }),
    }
}
