use super::handle::SchedulerHandle;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::event_loop::EventLoop;
use crate::registry::TaskManager;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

/// Configured scheduler ready to start
pub struct Scheduler {
    pub(crate) config: SchedulerConfig,
    pub(crate) event_loop: Arc<EventLoop>,
    pub(crate) task_manager: TaskManager,
}

impl Scheduler {
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn task_manager(&self) -> TaskManager {
        self.task_manager.clone()
    }

    /// Start the event loop on the current tokio runtime
    pub fn start(self) -> Result<SchedulerHandle, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Ok(self.start_on(&runtime))
    }

    /// Start the event loop on the given runtime, for callers outside async context
    pub fn start_on(self, runtime: &Handle) -> SchedulerHandle {
        info!(
            pending = self.task_manager.pending_tasks(),
            "Starting scheduler"
        );

        let event_loop = self.event_loop.clone();
        let join = runtime.spawn(async move { event_loop.run().await });

        SchedulerHandle::new(self.event_loop, self.task_manager, join, self.config.shutdown_timeout)
    }
}
