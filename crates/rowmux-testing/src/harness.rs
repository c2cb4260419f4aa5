use std::sync::Arc;

use rowmux_core::{AdapterDelegate, AdapterRuntime, CompositeAdapter, RenderSurface};

use crate::executor::{CountingScheduler, ManualExecutor};

/// Step-driven executors for an adapter under test.
#[derive(Debug, Default)]
pub struct ListHarness {
    compute: ManualExecutor,
    fetch: ManualExecutor,
    scheduler: Arc<CountingScheduler>,
}

impl ListHarness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runtime(&self) -> AdapterRuntime {
        AdapterRuntime::new(
            Arc::new(self.compute.clone()),
            Arc::new(self.fetch.clone()),
            self.scheduler.clone(),
        )
    }

    pub fn compute(&self) -> &ManualExecutor {
        &self.compute
    }

    pub fn fetch(&self) -> &ManualExecutor {
        &self.fetch
    }

    pub fn dispatch_requests(&self) -> usize {
        self.scheduler.requests()
    }

    /// Runs queued fetches and diffs until neither executor has work left.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;
        loop {
            let step = self.fetch.run_all() + self.compute.run_all();
            if step == 0 {
                return ran;
            }
            ran += step;
        }
    }

    /// Runs all background work, then dispatches its results to the surface.
    /// Returns whether the item list changed.
    pub fn settle<T, D, S>(&self, adapter: &mut CompositeAdapter<T, D, S>) -> bool
    where
        T: Send + Sync + 'static,
        D: AdapterDelegate<T>,
        S: RenderSurface<D::View>,
    {
        let ran = self.run_until_idle();
        log::trace!("harness ran {ran} background tasks");
        adapter.dispatch_pending()
    }
}
