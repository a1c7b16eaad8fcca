use crate::task::ScheduledTask;
use std::collections::BinaryHeap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

/// Result of inspecting the head of the queue
#[derive(Debug)]
pub(crate) enum Next {
    /// Nothing is queued
    Empty,
    /// The head was due and has been removed
    Due(ScheduledTask),
    /// The head becomes due at this instant
    Wait(Instant),
}

/// Time-ordered collection of pending tasks.
///
/// Shared between every caller that registers work and the event loop that
/// drains it. The lock is held only for the heap operation itself.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: Mutex<BinaryHeap<ScheduledTask>>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic can never leave the heap half-updated, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, BinaryHeap<ScheduledTask>> {
        self.heap.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn enqueue(&self, task: ScheduledTask) {
        self.lock().push(task);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Due time of the earliest pending task
    pub fn next_due(&self) -> Option<Instant> {
        self.lock().peek().map(ScheduledTask::due_at)
    }

    /// Remove and return the earliest task if it is due at `now`
    pub fn pop_due(&self, now: Instant) -> Option<ScheduledTask> {
        let mut heap = self.lock();
        if heap.peek()?.due_at() <= now {
            heap.pop()
        } else {
            None
        }
    }

    /// Peek and, when due, pop under a single lock acquisition
    pub(crate) fn poll(&self, now: Instant) -> Next {
        let mut heap = self.lock();
        match heap.peek().map(ScheduledTask::due_at) {
            None => Next::Empty,
            Some(due_at) if due_at <= now => match heap.pop() {
                Some(task) => Next::Due(task),
                None => Next::Empty,
            },
            Some(due_at) => Next::Wait(due_at),
        }
    }
}
