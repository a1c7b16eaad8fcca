use super::scheduler::Scheduler;
use crate::config::{load_toml_config, load_yaml_config, SchedulerConfig};
use crate::error::SchedulerError;
use crate::event_loop::EventLoop;
use crate::registry::TaskManager;
use crate::task::IntervalMode;
use crate::timer_queue::TimerQueue;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for the scheduler
#[derive(Debug, Clone, Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
}

impl SchedulerBuilder {
    /// Create a new scheduler builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an already resolved config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    /// Create with the `[scheduler]` table of a TOML file, plus `CADENZA_` environment overrides
    pub fn with_toml<P: AsRef<Path>>(path: P) -> Result<Self, SchedulerError> {
        let config = load_toml_config(path)?;
        Ok(Self::with_config(SchedulerConfig::from_config(&config)?))
    }

    /// Create with the `scheduler` table of a YAML file, plus `CADENZA_` environment overrides
    pub fn with_yaml<P: AsRef<Path>>(path: P) -> Result<Self, SchedulerError> {
        let config = load_yaml_config(path)?;
        Ok(Self::with_config(SchedulerConfig::from_config(&config)?))
    }

    pub fn idle_poll(mut self, idle_poll: Duration) -> Self {
        self.config.idle_poll = idle_poll;
        self
    }

    pub fn shutdown_timeout(mut self, shutdown_timeout: Duration) -> Self {
        self.config.shutdown_timeout = shutdown_timeout;
        self
    }

    pub fn interval_mode(mut self, interval_mode: IntervalMode) -> Self {
        self.config.interval_mode = interval_mode;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build the scheduler (does not start it yet)
    ///
    /// Tasks may be registered through [`Scheduler::task_manager`] before
    /// the loop is started; they wait in the queue.
    pub fn build(self) -> Scheduler {
        let queue = Arc::new(TimerQueue::new());
        let event_loop = Arc::new(EventLoop::new(queue.clone(), self.config.idle_poll));
        let task_manager = TaskManager::new(queue, self.config.interval_mode);

        info!(
            idle_poll_ms = self.config.idle_poll.as_millis() as u64,
            shutdown_timeout_ms = self.config.shutdown_timeout.as_millis() as u64,
            interval_mode = ?self.config.interval_mode,
            "Building scheduler"
        );

        Scheduler {
            config: self.config,
            event_loop,
            task_manager,
        }
    }
}
