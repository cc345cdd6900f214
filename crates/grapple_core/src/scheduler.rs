use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

/// Handle to a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// Single-threaded timer queue driven by the frame clock.
///
/// Tasks are plain data, the owner decides what to do with them once they
/// are due. Tasks due at the same time are returned in scheduling order.
#[derive(Debug)]
pub struct Scheduler<T> {
    /// Elapsed time in seconds.
    now: f64,
    next_handle: u64,
    queue: BinaryHeap<ScheduledTask<T>>,
    cancelled: HashSet<TaskHandle>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_handle: 0,
            queue: BinaryHeap::new(),
            cancelled: HashSet::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Schedule `task` to be due `delay` seconds from now.
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle += 1;

        self.queue.push(ScheduledTask {
            due: self.now + delay.max(0.0) as f64,
            handle,
            task,
        });
        handle
    }

    /// Cancel a pending task. Cancelling a finished task does nothing.
    pub fn cancel(&mut self, handle: TaskHandle) {
        if self.queue.iter().any(|t| t.handle == handle) {
            self.cancelled.insert(handle);
        }
    }

    /// Advance the clock and return every task that became due.
    pub fn advance(&mut self, delta_seconds: f32) -> Vec<T> {
        self.now += delta_seconds.max(0.0) as f64;

        let mut due = Vec::new();
        while let Some(next) = self.queue.peek() {
            if next.due > self.now {
                break;
            }
            let Some(task) = self.queue.pop() else {
                break;
            };
            if self.cancelled.remove(&task.handle) {
                continue;
            }
            due.push(task.task);
        }

        due
    }

    /// Drop every pending task.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.cancelled.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
struct ScheduledTask<T> {
    due: f64,
    handle: TaskHandle,
    task: T,
}

impl<T> PartialEq for ScheduledTask<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for ScheduledTask<T> {}

impl<T> PartialOrd for ScheduledTask<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for ScheduledTask<T> {
    // Reversed so that the earliest task sits on top of the max-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.handle.cmp(&self.handle))
    }
}
