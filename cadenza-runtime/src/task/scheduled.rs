use super::{IntervalMode, TaskId};
use crate::runnable::Runnable;
use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// What kind of registration produced a queue entry
#[derive(Clone)]
enum TaskKind {
    Timeout,
    Interval {
        id: TaskId,
        period: Duration,
        mode: IntervalMode,
        cancelled: Arc<AtomicBool>,
    },
}

/// One pending occurrence of a task in the timer queue.
///
/// `due_at` is fixed on construction. Recurring work is rescheduled by
/// building a fresh entry through [`ScheduledTask::next_occurrence`].
#[derive(Clone)]
pub struct ScheduledTask {
    action: Arc<dyn Runnable>,
    due_at: Instant,
    kind: TaskKind,
}

impl ScheduledTask {
    pub fn timeout(action: Arc<dyn Runnable>, due_at: Instant) -> Self {
        Self {
            action,
            due_at,
            kind: TaskKind::Timeout,
        }
    }

    pub fn interval(
        action: Arc<dyn Runnable>,
        due_at: Instant,
        id: TaskId,
        period: Duration,
        mode: IntervalMode,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            action,
            due_at,
            kind: TaskKind::Interval {
                id,
                period,
                mode,
                cancelled,
            },
        }
    }

    pub fn due_at(&self) -> Instant {
        self.due_at
    }

    pub fn action(&self) -> &Arc<dyn Runnable> {
        &self.action
    }

    /// Interval identifier, `None` for timeouts
    pub fn id(&self) -> Option<TaskId> {
        match &self.kind {
            TaskKind::Timeout => None,
            TaskKind::Interval { id, .. } => Some(*id),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        match &self.kind {
            TaskKind::Timeout => false,
            TaskKind::Interval { cancelled, .. } => cancelled.load(AtomicOrdering::Acquire),
        }
    }

    /// Build the entry for the following run of an interval.
    ///
    /// Returns `None` for timeouts and for intervals cancelled in the meantime.
    pub fn next_occurrence(&self, completed_at: Instant) -> Option<ScheduledTask> {
        let TaskKind::Interval {
            period, mode, ..
        } = &self.kind
        else {
            return None;
        };

        if self.is_cancelled() {
            return None;
        }

        let due_at = match mode {
            IntervalMode::FixedRate => (self.due_at + *period).max(completed_at),
            IntervalMode::FixedDelay => completed_at + *period,
        };

        Some(ScheduledTask {
            action: self.action.clone(),
            due_at,
            kind: self.kind.clone(),
        })
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ScheduledTask");
        s.field("due_at", &self.due_at);
        match &self.kind {
            TaskKind::Timeout => s.field("kind", &"timeout"),
            TaskKind::Interval { id, period, mode, .. } => s
                .field("id", id)
                .field("period", period)
                .field("mode", mode),
        };
        s.finish_non_exhaustive()
    }
}

impl fmt::Display for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TaskKind::Timeout => write!(f, "timeout"),
            TaskKind::Interval { id, period, .. } => {
                write!(f, "interval {} every {}ms", id, period.as_millis())
            }
        }
    }
}

// Reversed so that `BinaryHeap` behaves as a min-heap on `due_at`.

impl Eq for ScheduledTask {}

impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.due_at.eq(&other.due_at)
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        other.due_at.cmp(&self.due_at)
    }
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
