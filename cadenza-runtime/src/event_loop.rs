use crate::error::panic_message;
use crate::task::ScheduledTask;
use crate::timer_queue::{Next, TimerQueue};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info, trace, warn};

/// Polling interval used while the queue is empty
pub const DEFAULT_IDLE_POLL: Duration = Duration::from_millis(100);

/// Drains the timer queue, running each task once it becomes due.
///
/// `run` is meant to be driven by exactly one tokio task. Each action runs on
/// the blocking pool and is awaited before the next task is considered, so
/// actions never overlap and the runtime keeps serving other tasks while one
/// is in flight. No lock is held during an action, so it may register more
/// work.
pub struct EventLoop {
    queue: Arc<TimerQueue>,
    running: AtomicBool,
    idle_poll: Duration,
}

impl EventLoop {
    pub fn new(queue: Arc<TimerQueue>, idle_poll: Duration) -> Self {
        Self {
            queue,
            running: AtomicBool::new(true),
            idle_poll,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Request the loop to exit.
    ///
    /// Observed at the top of the next iteration; an in-flight sleep or
    /// action is not interrupted.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub async fn run(&self) {
        info!(idle_poll_ms = self.idle_poll.as_millis() as u64, "Event loop started");

        while self.is_running() {
            match self.queue.poll(Instant::now()) {
                Next::Empty => tokio::time::sleep(self.idle_poll).await,
                Next::Wait(due_at) => tokio::time::sleep_until(due_at).await,
                Next::Due(task) => self.execute(task).await,
            }
        }

        info!(pending = self.queue.len(), "Event loop stopped");
    }

    async fn execute(&self, task: ScheduledTask) {
        if task.is_cancelled() {
            debug!(task = %task, "Skipping cancelled interval");
            tokio::task::yield_now().await;
            return;
        }

        let lateness = Instant::now().saturating_duration_since(task.due_at());
        trace!(task = %task, lateness_us = lateness.as_micros() as u64, "Running task");

        let action = task.action().clone();
        match tokio::task::spawn_blocking(move || action.run()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(task = %task, error = %e, "Task action failed");
            }
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                error!(
                    task = %task,
                    panic = panic_message(payload.as_ref()),
                    "Task action panicked (unclassified failure)"
                );
            }
            Err(e) => {
                warn!(task = %task, error = %e, "Task action was cancelled");
            }
        }

        if let Some(next) = task.next_occurrence(Instant::now()) {
            self.queue.enqueue(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runnable::Runnable;
    use crate::task::{IntervalMode, TaskId};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    fn spawn_loop(queue: Arc<TimerQueue>) -> (Arc<EventLoop>, tokio::task::JoinHandle<()>) {
        let event_loop = Arc::new(EventLoop::new(queue, Duration::from_millis(10)));
        let runner = event_loop.clone();
        let join = tokio::spawn(async move { runner.run().await });
        (event_loop, join)
    }

    #[tokio::test]
    async fn runs_due_tasks_in_order() {
        let queue = Arc::new(TimerQueue::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let base = Instant::now();

        for delay in [60u64, 20, 40] {
            let seen = seen.clone();
            let action: Arc<dyn Runnable> = Arc::new(move || seen.lock().unwrap().push(delay));
            queue.enqueue(ScheduledTask::timeout(action, base + Duration::from_millis(delay)));
        }

        let (event_loop, join) = spawn_loop(queue.clone());
        tokio::time::sleep(Duration::from_millis(200)).await;
        event_loop.stop();
        join.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![20, 40, 60]);
        assert!(queue.is_empty());
    }

    fn kaboom() {
        panic!("kaboom");
    }

    #[tokio::test]
    async fn survives_errors_and_panics() {
        let queue = Arc::new(TimerQueue::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let base = Instant::now();

        let failing: Arc<dyn Runnable> =
            Arc::new(crate::runnable::fallible(|| -> Result<(), String> { Err("bad".into()) }));
        let panicking: Arc<dyn Runnable> = Arc::new(kaboom as fn());
        let counter = hits.clone();
        let healthy: Arc<dyn Runnable> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        queue.enqueue(ScheduledTask::timeout(failing, base));
        queue.enqueue(ScheduledTask::timeout(panicking, base + Duration::from_millis(5)));
        queue.enqueue(ScheduledTask::timeout(healthy, base + Duration::from_millis(10)));

        let (event_loop, join) = spawn_loop(queue);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(event_loop.is_running());
        event_loop.stop();
        join.await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_interval_is_skipped() {
        let queue = Arc::new(TimerQueue::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let cancelled = Arc::new(AtomicBool::new(true));
        let counter = hits.clone();
        let action: Arc<dyn Runnable> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        queue.enqueue(ScheduledTask::interval(
            action,
            Instant::now(),
            TaskId::new(0),
            Duration::from_millis(5),
            IntervalMode::FixedRate,
            cancelled,
        ));

        let (event_loop, join) = spawn_loop(queue.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        event_loop.stop();
        join.await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn overrunning_interval_does_not_starve_current_thread_runtime() {
        let queue = Arc::new(TimerQueue::new());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let action: Arc<dyn Runnable> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(3));
        });

        queue.enqueue(ScheduledTask::interval(
            action,
            Instant::now(),
            TaskId::new(0),
            Duration::from_millis(1),
            IntervalMode::FixedRate,
            Arc::new(AtomicBool::new(false)),
        ));

        let (event_loop, join) = spawn_loop(queue);
        // Never returns if the loop monopolises the runtime thread.
        tokio::time::sleep(Duration::from_millis(50)).await;
        event_loop.stop();
        tokio::time::timeout(Duration::from_secs(2), join)
            .await
            .expect("loop should exit after the in-flight action")
            .unwrap();

        assert!(hits.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn stop_is_observed_after_idle_sleep() {
        let (event_loop, join) = spawn_loop(Arc::new(TimerQueue::new()));
        event_loop.stop();
        tokio::time::timeout(Duration::from_secs(1), join)
            .await
            .expect("loop should exit after one idle poll")
            .unwrap();
    }
}
