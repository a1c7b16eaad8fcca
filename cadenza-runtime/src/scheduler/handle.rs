use crate::error::SchedulerError;
use crate::event_loop::EventLoop;
use crate::registry::TaskManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Handle for a running scheduler
/// Used to register work and to shut the event loop down
pub struct SchedulerHandle {
    event_loop: Arc<EventLoop>,
    task_manager: TaskManager,
    join: Option<JoinHandle<()>>,
    shutdown_timeout: Duration,
}

impl SchedulerHandle {
    pub(crate) fn new(
        event_loop: Arc<EventLoop>,
        task_manager: TaskManager,
        join: JoinHandle<()>,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            event_loop,
            task_manager,
            join: Some(join),
            shutdown_timeout,
        }
    }

    pub fn task_manager(&self) -> TaskManager {
        self.task_manager.clone()
    }

    /// Whether the loop task is still alive
    pub fn is_running(&self) -> bool {
        self.event_loop.is_running()
            && self.join.as_ref().is_some_and(|join| !join.is_finished())
    }

    /// Ask the loop to stop without waiting for it
    pub fn stop(&self) {
        self.event_loop.stop();
    }

    /// Stop the event loop and wait for it to exit.
    ///
    /// The loop finishes its current sleep or action first. If that takes
    /// longer than the configured shutdown timeout the loop task is aborted.
    pub async fn shutdown(mut self) -> Result<(), SchedulerError> {
        self.event_loop.stop();

        let Some(mut join) = self.join.take() else {
            return Ok(());
        };

        match tokio::time::timeout(self.shutdown_timeout, &mut join).await {
            Ok(result) => {
                result?;
                info!(
                    pending = self.task_manager.pending_tasks(),
                    "Scheduler shut down"
                );
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.shutdown_timeout.as_millis() as u64,
                    "Event loop did not stop in time, aborting"
                );
                join.abort();
            }
        }

        Ok(())
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.event_loop.stop();
        }
    }
}
