use crate::error::SchedulerError;
use crate::event_loop::DEFAULT_IDLE_POLL;
use crate::task::IntervalMode;
use crate::time_unit::TimeUnit;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `CADENZA_SCHEDULER__IDLE_POLL=50ms`
pub const ENV_PREFIX: &str = "CADENZA";

pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for the event loop and task registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// How long the loop sleeps before re-checking an empty queue
    pub idle_poll: Duration,
    /// How long `shutdown` waits for the loop before aborting it
    pub shutdown_timeout: Duration,
    /// Mode used by `set_interval`
    pub interval_mode: IntervalMode,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            idle_poll: DEFAULT_IDLE_POLL,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            interval_mode: IntervalMode::default(),
        }
    }
}

/// Shape of the `[scheduler]` table before durations are resolved
#[derive(Debug, Default, Deserialize)]
struct RawSchedulerConfig {
    idle_poll: Option<String>,
    shutdown_timeout: Option<String>,
    interval_mode: Option<IntervalMode>,
}

impl SchedulerConfig {
    /// Read the `scheduler` table from a loaded config, falling back to defaults
    pub fn from_config(config: &Config) -> Result<Self, SchedulerError> {
        let raw: RawSchedulerConfig = match config.get("scheduler") {
            Ok(raw) => raw,
            Err(config::ConfigError::NotFound(_)) => RawSchedulerConfig::default(),
            Err(e) => return Err(e.into()),
        };

        let defaults = Self::default();
        Ok(Self {
            idle_poll: resolve_or(raw.idle_poll, defaults.idle_poll)?,
            shutdown_timeout: resolve_or(raw.shutdown_timeout, defaults.shutdown_timeout)?,
            interval_mode: raw.interval_mode.unwrap_or(defaults.interval_mode),
        })
    }
}

fn resolve_or(value: Option<String>, default: Duration) -> Result<Duration, SchedulerError> {
    value.map_or(Ok(default), |v| TimeUnit::resolve(&v))
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

/// Load config from a specific TOML file
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, SchedulerError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .add_source(environment())
        .build()?;
    Ok(config)
}

/// Load config from a specific YAML file
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, SchedulerError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Yaml))
        .add_source(environment())
        .build()?;
    Ok(config)
}
