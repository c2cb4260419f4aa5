//! Execution contexts used by the differ.
//!
//! Diff computation and page fetches run on executors supplied by the host;
//! results come back to the surface thread through the differ's own channel,
//! and the host learns that something is waiting through
//! [`DispatchScheduler::request_dispatch`].

use std::sync::Arc;

/// A unit of background work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks off the surface thread.
pub trait Executor: Send + Sync {
    fn execute(&self, task: Task);
}

/// Told by workers that results are waiting for
/// [`dispatch_pending`](crate::CompositeAdapter::dispatch_pending).
pub trait DispatchScheduler: Send + Sync {
    fn request_dispatch(&self);
}

/// Scheduler for hosts that poll `dispatch_pending` every frame anyway.
#[derive(Clone, Copy, Debug, Default)]
pub struct PollingScheduler;

impl DispatchScheduler for PollingScheduler {
    fn request_dispatch(&self) {}
}

/// The executors and scheduler an adapter runs with.
#[derive(Clone)]
pub struct AdapterRuntime {
    pub compute: Arc<dyn Executor>,
    pub fetch: Arc<dyn Executor>,
    pub scheduler: Arc<dyn DispatchScheduler>,
}

impl AdapterRuntime {
    pub fn new(
        compute: Arc<dyn Executor>,
        fetch: Arc<dyn Executor>,
        scheduler: Arc<dyn DispatchScheduler>,
    ) -> Self {
        Self {
            compute,
            fetch,
            scheduler,
        }
    }
}

impl std::fmt::Debug for AdapterRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRuntime").finish_non_exhaustive()
    }
}
