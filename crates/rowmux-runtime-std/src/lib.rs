//! Standard runtime services backed by Rust's `std` library.
//!
//! Differ and page-fetch work runs on [`WorkerPool`]s; results are announced
//! to the host thread through a [`DispatchSignal`]. Applications construct a
//! [`StdRuntime`] and pass [`StdRuntime::adapter_runtime`] to
//! [`rowmux_core::CompositeAdapter`].

use std::fmt;
use std::io;
use std::mem;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rowmux_core::{AdapterRuntime, DispatchScheduler, Executor, Task};

/// Compute workers started by [`StdRuntime::new`].
pub const DEFAULT_COMPUTE_WORKERS: usize = 1;

/// Fetch workers started by [`StdRuntime::new`].
pub const DEFAULT_FETCH_WORKERS: usize = 2;

type DispatchWaker = Arc<dyn Fn() + Send + Sync + 'static>;

/// Counts dispatch requests raised by worker threads and lets the host
/// thread either poll for them or park until one arrives.
///
/// Each request means at least one differ result is queued; one
/// `dispatch_pending` call on the adapter drains all of them.
pub struct DispatchSignal {
    pending: Mutex<usize>,
    ready: Condvar,
    waker: Mutex<Option<DispatchWaker>>,
}

impl DispatchSignal {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(0),
            ready: Condvar::new(),
            waker: Mutex::new(None),
        }
    }

    /// Returns the number of requests raised since the last take.
    pub fn take(&self) -> usize {
        mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Blocks until a request is raised or `timeout` elapses, then takes the
    /// requests. Returns zero on timeout.
    pub fn wait(&self, timeout: Duration) -> usize {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut pending, _) = self
            .ready
            .wait_timeout_while(pending, timeout, |pending| *pending == 0)
            .unwrap_or_else(PoisonError::into_inner);
        mem::take(&mut *pending)
    }

    /// Registers a callback run on the raising worker thread, for hosts with
    /// their own event loop to wake.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(waker));
    }

    pub fn clear_waker(&self) {
        self.waker.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

impl Default for DispatchSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DispatchSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = *self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("DispatchSignal")
            .field("pending", &pending)
            .finish()
    }
}

impl DispatchScheduler for DispatchSignal {
    fn request_dispatch(&self) {
        *self.pending.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.ready.notify_all();
        // Cloned out so a waker may re-enter the signal.
        let waker = self
            .waker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(waker) = waker {
            waker();
        }
    }
}

/// Fixed set of named threads draining one task queue.
///
/// Dropping the pool lets queued tasks finish, then joins the threads.
pub struct WorkerPool {
    name: String,
    sender: Mutex<Option<mpsc::Sender<Task>>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `threads` workers (at least one) named `{name}-{index}`.
    pub fn new(name: &str, threads: usize) -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<Task>();
        let receiver = Arc::new(Mutex::new(receiver));
        let mut workers = Vec::with_capacity(threads.max(1));
        for index in 0..threads.max(1) {
            let receiver = Arc::clone(&receiver);
            let worker_name = format!("{name}-{index}");
            let handle = thread::Builder::new()
                .name(worker_name)
                .spawn(move || run_worker(&receiver))?;
            workers.push(handle);
        }
        log::debug!("started {} {name} workers", workers.len());
        Ok(Self {
            name: name.to_owned(),
            sender: Mutex::new(Some(sender)),
            workers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }
}

fn run_worker(receiver: &Mutex<mpsc::Receiver<Task>>) {
    loop {
        let next = receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        let Ok(task) = next else {
            return;
        };
        if catch_unwind(AssertUnwindSafe(task)).is_err() {
            let current = thread::current();
            log::error!("task panicked on {}", current.name().unwrap_or("worker"));
        }
    }
}

impl Executor for WorkerPool {
    fn execute(&self, task: Task) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        match sender.as_ref() {
            Some(sender) => {
                if sender.send(task).is_err() {
                    log::warn!("{} workers are gone; dropping task", self.name);
                }
            }
            None => log::warn!("{} pool is shut down; dropping task", self.name),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            if worker.thread().id() == current {
                continue;
            }
            if worker.join().is_err() {
                log::warn!("a {} worker exited by panic", self.name);
            }
        }
    }
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("name", &self.name)
            .field("threads", &self.workers.len())
            .finish()
    }
}

/// Worker pools and the dispatch signal shared by the adapters of one host
/// thread.
#[derive(Clone)]
pub struct StdRuntime {
    signal: Arc<DispatchSignal>,
    compute: Arc<WorkerPool>,
    fetch: Arc<WorkerPool>,
}

impl StdRuntime {
    /// Creates a runtime with the default worker counts.
    pub fn new() -> io::Result<Self> {
        Self::with_workers(DEFAULT_COMPUTE_WORKERS, DEFAULT_FETCH_WORKERS)
    }

    pub fn with_workers(compute: usize, fetch: usize) -> io::Result<Self> {
        Ok(Self {
            signal: Arc::new(DispatchSignal::default()),
            compute: Arc::new(WorkerPool::new("rowmux-compute", compute)?),
            fetch: Arc::new(WorkerPool::new("rowmux-fetch", fetch)?),
        })
    }

    /// Returns the executors and scheduler to build an adapter with.
    pub fn adapter_runtime(&self) -> AdapterRuntime {
        AdapterRuntime::new(
            self.compute.clone(),
            self.fetch.clone(),
            self.signal.clone(),
        )
    }

    pub fn signal(&self) -> Arc<DispatchSignal> {
        Arc::clone(&self.signal)
    }

    pub fn compute_pool(&self) -> Arc<WorkerPool> {
        Arc::clone(&self.compute)
    }

    pub fn fetch_pool(&self) -> Arc<WorkerPool> {
        Arc::clone(&self.fetch)
    }

    /// Returns whether results were announced since the last poll.
    pub fn take_dispatch_request(&self) -> bool {
        self.signal.take() > 0
    }

    /// Parks the calling thread until results are announced or `timeout`
    /// elapses. Returns whether results are waiting.
    pub fn wait_for_dispatch(&self, timeout: Duration) -> bool {
        self.signal.wait(timeout) > 0
    }

    pub fn set_dispatch_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        self.signal.set_waker(waker);
    }

    pub fn clear_dispatch_waker(&self) {
        self.signal.clear_waker();
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("signal", &self.signal)
            .field("compute", &self.compute)
            .field("fetch", &self.fetch)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/std_runtime_tests.rs"]
mod tests;
