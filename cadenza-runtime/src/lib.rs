//! Cadenza Runtime - Core runtime for timer-based task execution
//!
//! This crate provides the timer queue, the event loop that drains it and
//! the task registry behind `set_timeout` / `set_interval` / `clear_interval`.

mod config;
mod error;
mod event_loop;
mod registry;
mod runnable;
mod time_unit;
mod timer_queue;
pub mod scheduler;
pub mod task;

// Re-export public API
pub use crate::config::{load_toml_config, load_yaml_config, SchedulerConfig, ENV_PREFIX};
pub use error::{ActionError, SchedulerError};
pub use event_loop::{EventLoop, DEFAULT_IDLE_POLL};
pub use registry::{TaskManager, MIN_INTERVAL_PERIOD};
pub use runnable::{fallible, Fallible, Runnable};
pub use scheduler::{Scheduler, SchedulerBuilder, SchedulerHandle};
pub use task::{IntervalMode, ScheduledTask, TaskId};
pub use time_unit::TimeUnit;
pub use timer_queue::TimerQueue;
