use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use rowmux_core::{DispatchScheduler, Executor, Task};

/// Queues tasks until the test runs them.
#[derive(Clone, Default)]
pub struct ManualExecutor {
    queue: Arc<Mutex<VecDeque<Task>>>,
}

impl ManualExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Runs the oldest queued task. Returns `false` when none was queued.
    pub fn run_next(&self) -> bool {
        // The queue lock is released before running, as tasks may enqueue.
        let task = self.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Runs tasks until the queue is empty, including tasks queued by the
    /// tasks it runs. Returns how many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }

    /// Drops every queued task without running it.
    pub fn discard_all(&self) -> usize {
        let mut queue = self.lock();
        let discarded = queue.len();
        queue.clear();
        discarded
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Task>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Executor for ManualExecutor {
    fn execute(&self, task: Task) {
        self.lock().push_back(task);
    }
}

impl std::fmt::Debug for ManualExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualExecutor")
            .field("pending", &self.pending())
            .finish()
    }
}

/// Counts dispatch requests.
#[derive(Debug, Default)]
pub struct CountingScheduler {
    requests: AtomicUsize,
}

impl CountingScheduler {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl DispatchScheduler for CountingScheduler {
    fn request_dispatch(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}
