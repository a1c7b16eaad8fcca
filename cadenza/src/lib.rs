//! # Cadenza - setTimeout / setInterval for Rust
//!
//! A small timer-driven scheduler: register work to run once after a delay
//! or repeatedly at a fixed period, and cancel intervals by identifier. All
//! work runs on a single event loop task that sleeps until the next task is
//! due.
//!
//! ## Features
//!
//! - **Timeouts**: run a closure once after `delay_ms`
//! - **Intervals**: run a closure every `period_ms`, fixed rate or fixed delay
//! - **Cancellation**: `clear_interval` suppresses every run that has not started
//! - **Failure isolation**: errors and panics in actions are logged, the loop keeps going
//! - **Config support**: tune the loop from TOML/YAML files and `CADENZA_` env vars
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cadenza::SchedulerBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handle = SchedulerBuilder::new().build().start()?;
//!     let tasks = handle.task_manager();
//!
//!     tasks.set_timeout(|| println!("once, after 200ms"), 200);
//!     let id = tasks.set_interval(|| println!("every 50ms"), 50)?;
//!
//!     tokio::time::sleep(std::time::Duration::from_millis(500)).await;
//!     tasks.clear_interval(id);
//!
//!     handle.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Create `config/cadenza.toml`:
//!
//! ```toml
//! [scheduler]
//! idle_poll = "100ms"
//! shutdown_timeout = "5s"
//! interval_mode = "fixed_rate"
//! ```
//!
//! Or `config/cadenza.yaml`:
//!
//! ```yaml
//! scheduler:
//!   idle_poll: 100ms
//!   interval_mode: fixed_delay
//! ```
//!
//! You can also use environment variables with the `CADENZA_` prefix:
//!
//! ```bash
//! export CADENZA_SCHEDULER__IDLE_POLL=50ms
//! ```

// Re-export core types
pub use cadenza_runtime::{
    fallible, ActionError, IntervalMode, Runnable, Scheduler, SchedulerBuilder, SchedulerConfig,
    SchedulerError, SchedulerHandle, TaskId, TaskManager, TimeUnit,
};

// Lower-level building blocks for embedders driving their own loop
pub use cadenza_runtime;
