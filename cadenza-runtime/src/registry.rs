use crate::error::SchedulerError;
use crate::runnable::Runnable;
use crate::task::{IntervalMode, ScheduledTask, TaskId};
use crate::timer_queue::TimerQueue;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Shortest period accepted for an interval; a zero period would monopolise the loop
pub const MIN_INTERVAL_PERIOD: Duration = Duration::from_millis(1);

/// Bookkeeping kept for each live interval
#[derive(Debug)]
struct IntervalEntry {
    period: Duration,
    mode: IntervalMode,
    cancelled: Arc<AtomicBool>,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    intervals: HashMap<TaskId, IntervalEntry>,
}

struct Inner {
    queue: Arc<TimerQueue>,
    registry: Mutex<Registry>,
    default_mode: IntervalMode,
}

/// Front door for scheduling work.
///
/// Cloning is cheap and every clone talks to the same queue, so a task's
/// action may capture a `TaskManager` and schedule follow-up work.
#[derive(Clone)]
pub struct TaskManager {
    inner: Arc<Inner>,
}

impl TaskManager {
    pub fn new(queue: Arc<TimerQueue>, default_mode: IntervalMode) -> Self {
        Self {
            inner: Arc::new(Inner {
                queue,
                registry: Mutex::new(Registry::default()),
                default_mode,
            }),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `action` every `period_ms` milliseconds until cleared.
    ///
    /// The first run is due one period from now. Returns immediately with the
    /// identifier to pass to [`clear_interval`](Self::clear_interval).
    pub fn set_interval<R>(&self, action: R, period_ms: u64) -> Result<TaskId, SchedulerError>
    where
        R: Runnable + 'static,
    {
        self.set_interval_with_mode(action, period_ms, self.inner.default_mode)
    }

    pub fn set_interval_with_mode<R>(
        &self,
        action: R,
        period_ms: u64,
        mode: IntervalMode,
    ) -> Result<TaskId, SchedulerError>
    where
        R: Runnable + 'static,
    {
        let period = Duration::from_millis(period_ms).max(MIN_INTERVAL_PERIOD);
        let due_at = Instant::now() + period;
        let cancelled = Arc::new(AtomicBool::new(false));

        let id = {
            let mut registry = self.registry();
            let id = TaskId::new(registry.next_id);
            registry.next_id = registry
                .next_id
                .checked_add(1)
                .ok_or(SchedulerError::IdSpaceExhausted)?;
            registry.intervals.insert(
                id,
                IntervalEntry {
                    period,
                    mode,
                    cancelled: cancelled.clone(),
                },
            );
            id
        };

        debug!(
            task_id = id.as_u64(),
            period_ms = period.as_millis() as u64,
            ?mode,
            "Interval registered"
        );

        let action: Arc<dyn Runnable> = Arc::new(action);
        self.inner
            .queue
            .enqueue(ScheduledTask::interval(action, due_at, id, period, mode, cancelled));

        Ok(id)
    }

    /// Run `action` once, `delay_ms` milliseconds from now.
    ///
    /// Timeouts get no identifier and cannot be cancelled. A zero delay still
    /// defers the action to the event loop.
    pub fn set_timeout<R>(&self, action: R, delay_ms: u64)
    where
        R: Runnable + 'static,
    {
        let due_at = Instant::now() + Duration::from_millis(delay_ms);
        let action: Arc<dyn Runnable> = Arc::new(action);
        self.inner.queue.enqueue(ScheduledTask::timeout(action, due_at));

        debug!(delay_ms, "Timeout registered");
    }

    /// Cancel an interval.
    ///
    /// Any occurrence that has not started yet is suppressed. Unknown or
    /// already cleared identifiers are ignored.
    pub fn clear_interval(&self, task_id: TaskId) {
        let removed = self.registry().intervals.remove(&task_id);

        match removed {
            Some(entry) => {
                entry.cancelled.store(true, Ordering::Release);
                debug!(
                    task_id = task_id.as_u64(),
                    period_ms = entry.period.as_millis() as u64,
                    mode = ?entry.mode,
                    "Interval cleared"
                );
            }
            None => trace!(task_id = task_id.as_u64(), "clear_interval on unknown id ignored"),
        }
    }

    /// Number of intervals that have not been cleared
    pub fn active_intervals(&self) -> usize {
        self.registry().intervals.len()
    }

    /// Whether `task_id` refers to a live interval
    pub fn is_active(&self, task_id: TaskId) -> bool {
        self.registry().intervals.contains_key(&task_id)
    }

    /// Number of occurrences waiting in the queue, cancelled ones included
    pub fn pending_tasks(&self) -> usize {
        self.inner.queue.len()
    }

    #[cfg(test)]
    fn queue(&self) -> &Arc<TimerQueue> {
        &self.inner.queue
    }

    #[cfg(test)]
    fn set_next_id(&self, next_id: u64) {
        self.registry().next_id = next_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TaskManager {
        TaskManager::new(Arc::new(TimerQueue::new()), IntervalMode::FixedRate)
    }

    #[test]
    fn ids_are_sequential_from_zero() {
        let tasks = manager();
        let ids: Vec<u64> = (0..3)
            .map(|_| tasks.set_interval(|| {}, 50).unwrap().as_u64())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(tasks.active_intervals(), 3);
        assert_eq!(tasks.pending_tasks(), 3);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let tasks = manager();
        let first = tasks.set_interval(|| {}, 50).unwrap();
        tasks.clear_interval(first);
        let second = tasks.set_interval(|| {}, 50).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.as_u64(), 1);
    }

    #[test]
    fn clear_marks_queued_entry_cancelled() {
        let tasks = manager();
        let id = tasks.set_interval(|| {}, 50).unwrap();
        tasks.clear_interval(id);

        assert!(!tasks.is_active(id));
        assert_eq!(tasks.active_intervals(), 0);

        let far = Instant::now() + Duration::from_secs(60);
        let queued = tasks.queue().pop_due(far).unwrap();
        assert_eq!(queued.id(), Some(id));
        assert!(queued.is_cancelled());
    }

    #[test]
    fn clearing_unknown_or_twice_is_harmless() {
        let tasks = manager();
        let keep = tasks.set_interval(|| {}, 50).unwrap();
        let gone = tasks.set_interval(|| {}, 50).unwrap();

        tasks.clear_interval(TaskId::new(999));
        tasks.clear_interval(gone);
        tasks.clear_interval(gone);

        assert!(tasks.is_active(keep));
        assert_eq!(tasks.active_intervals(), 1);
    }

    #[test]
    fn timeouts_are_queued_without_bookkeeping() {
        let tasks = manager();
        tasks.set_timeout(|| {}, 0);
        tasks.set_timeout(|| {}, 10);
        assert_eq!(tasks.pending_tasks(), 2);
        assert_eq!(tasks.active_intervals(), 0);
    }

    #[test]
    fn due_time_is_one_period_out() {
        let tasks = manager();
        let before = Instant::now();
        tasks.set_interval(|| {}, 200).unwrap();
        let due = tasks.queue().next_due().unwrap();
        assert!(due >= before + Duration::from_millis(200));
    }

    #[test]
    fn zero_period_is_clamped() {
        let tasks = manager();
        let before = Instant::now();
        tasks.set_interval(|| {}, 0).unwrap();
        let due = tasks.queue().next_due().unwrap();
        assert!(due >= before + MIN_INTERVAL_PERIOD);
    }

    #[test]
    fn exhausted_id_space_is_reported() {
        let tasks = manager();
        tasks.set_next_id(u64::MAX);
        let err = tasks.set_interval(|| {}, 10).unwrap_err();
        assert!(matches!(err, SchedulerError::IdSpaceExhausted));
        assert_eq!(tasks.active_intervals(), 0);
        assert_eq!(tasks.pending_tasks(), 0);
    }
}
