//! Virtual-clock timer queue.
//!
//! Page behaviors schedule follow-up work (banner fade, element removal)
//! as plain data on this queue instead of capturing closures, so a test or
//! a host can advance time deterministically.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::Duration;

/// Handle returned by [`TimerQueue::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A scheduled task
#[derive(Debug)]
pub struct ScheduledTask<T> {
    /// Virtual time at which the task is due
    pub run_at: Duration,
    /// Unique task ID, also the tie-breaker between equal deadlines
    pub id: TaskId,
    pub task: T,
}

impl<T> PartialEq for ScheduledTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ScheduledTask<T> {}

impl<T> PartialOrd for ScheduledTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTask<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (earliest first, then oldest)
        other
            .run_at
            .cmp(&self.run_at)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// Min-heap of tasks keyed by virtual deadline.
#[derive(Debug)]
pub struct TimerQueue<T> {
    tasks: BinaryHeap<ScheduledTask<T>>,
    cancelled: HashSet<TaskId>,
    next_id: u64,
    now: Duration,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: BinaryHeap::new(),
            cancelled: HashSet::new(),
            next_id: 0,
            now: Duration::ZERO,
        }
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Schedule `task` to run `delay` after the current virtual time.
    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        self.tasks.push(ScheduledTask {
            run_at: self.now + delay,
            id,
            task,
        });

        id
    }

    /// Cancel a pending task. Returns `false` when it already ran, was
    /// already cancelled, or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if !self.tasks.iter().any(|t| t.id == id) || self.cancelled.contains(&id) {
            return false;
        }
        self.cancelled.insert(id)
    }

    /// Number of live (not cancelled) pending tasks.
    pub fn pending(&self) -> usize {
        self.tasks.len() - self.cancelled.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending() > 0
    }

    /// Pop the earliest live task due at or before `until`, moving the
    /// clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<ScheduledTask<T>> {
        loop {
            let due = self.tasks.peek().is_some_and(|t| t.run_at <= until);
            if !due {
                return None;
            }
            let task = self.tasks.pop()?;
            if self.cancelled.remove(&task.id) {
                continue;
            }
            self.now = self.now.max(task.run_at);
            return Some(task);
        }
    }

    /// Move the clock forward to `to` (never backwards).
    pub fn set_now(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    /// Time from now until the next live task, if any.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.tasks
            .iter()
            .filter(|t| !self.cancelled.contains(&t.id))
            .map(|t| t.run_at)
            .min()
            .map(|run_at| run_at.saturating_sub(self.now))
    }
}
