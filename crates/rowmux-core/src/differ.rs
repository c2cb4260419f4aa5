//! Background diffing and paging of the item list.
//!
//! The differ owns the current [`Snapshot`]. Submissions are diffed against it
//! on the compute executor, data source pages are loaded on the fetch
//! executor, and every result travels back over a channel that is drained on
//! the surface thread by [`AsyncListDiffer::dispatch_pending`]. Only that
//! drain replaces the current snapshot, so readers on the surface thread keep
//! seeing the old list until the new one is installed in a single step.
//!
//! Each submission takes a new generation number. Workers stop as soon as
//! they notice a newer generation, and the drain drops any result whose
//! generation is no longer the latest, so superseded diffs are never
//! delivered.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};

use crate::diff::{self, ItemCallback, ListUpdateCallback};
use crate::executor::{AdapterRuntime, DispatchScheduler};
use crate::paging::{fetch_page, PageRequest, PagedList, PagingConfig};
use crate::snapshot::Snapshot;

enum DifferMessage<T> {
    Diffed {
        generation: u64,
        baseline: Arc<Snapshot<T>>,
        snapshot: Arc<Snapshot<T>>,
        result: diff::DiffResult,
        paging: Option<PagingState<T>>,
    },
    PageLoaded {
        generation: u64,
        start: usize,
        items: Vec<T>,
        end_reached: bool,
    },
    PageFailed {
        generation: u64,
    },
    SubmissionFailed {
        generation: u64,
    },
}

struct PagingState<T> {
    list: PagedList<T>,
    end_reached: bool,
    /// Generation an outstanding page request was issued under.
    fetch_in_flight: Option<u64>,
}

struct Shared<T> {
    generation: AtomicU64,
    callback: Box<dyn ItemCallback<T>>,
}

/// Work sent to an executor on behalf of one generation.
struct Job<T> {
    shared: Arc<Shared<T>>,
    tx: mpsc::Sender<DifferMessage<T>>,
    scheduler: Arc<dyn DispatchScheduler>,
    generation: u64,
}

impl<T> Job<T>
where
    T: Send + Sync + 'static,
{
    fn is_stale(&self) -> bool {
        self.shared.generation.load(Ordering::SeqCst) != self.generation
    }

    fn post(&self, message: DifferMessage<T>) {
        if self.tx.send(message).is_ok() {
            self.scheduler.request_dispatch();
        }
    }

    fn diff(
        self,
        baseline: Arc<Snapshot<T>>,
        snapshot: Arc<Snapshot<T>>,
        paging: Option<PagingState<T>>,
    ) {
        if self.is_stale() {
            log::debug!("skipping diff for superseded generation {}", self.generation);
            return;
        }
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            diff::diff_snapshots(&baseline, &snapshot, &*self.shared.callback, &|| {
                self.is_stale()
            })
        }));
        match outcome {
            Ok(Some(result)) => {
                log::trace!(
                    "generation {} diffed {} -> {} rows in {} updates",
                    self.generation,
                    result.old_len(),
                    result.new_len(),
                    result.updates().len()
                );
                let generation = self.generation;
                self.post(DifferMessage::Diffed {
                    generation,
                    baseline,
                    snapshot,
                    result,
                    paging,
                });
            }
            Ok(None) => {
                log::debug!("diff for generation {} cancelled", self.generation);
            }
            Err(_) => {
                log::error!(
                    "diff for generation {} panicked; keeping the current list",
                    self.generation
                );
                let generation = self.generation;
                self.post(DifferMessage::SubmissionFailed { generation });
            }
        }
    }
}

/// Keeps the item list current, computing list updates off the surface
/// thread.
///
/// All methods are called from the surface thread. Results of background work
/// are applied by [`dispatch_pending`](Self::dispatch_pending).
pub struct AsyncListDiffer<T> {
    shared: Arc<Shared<T>>,
    runtime: AdapterRuntime,
    config: PagingConfig,
    current: Arc<Snapshot<T>>,
    installed_generation: u64,
    paging: Option<PagingState<T>>,
    tx: mpsc::Sender<DifferMessage<T>>,
    rx: mpsc::Receiver<DifferMessage<T>>,
}

impl<T> AsyncListDiffer<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(
        callback: impl ItemCallback<T> + 'static,
        runtime: AdapterRuntime,
        config: PagingConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            shared: Arc::new(Shared {
                generation: AtomicU64::new(0),
                callback: Box::new(callback),
            }),
            runtime,
            config,
            current: Arc::new(Snapshot::empty()),
            installed_generation: 0,
            paging: None,
            tx,
            rx,
        }
    }

    /// The installed list.
    pub fn current(&self) -> &Arc<Snapshot<T>> {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Item at `index` of the installed list.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.current.get(index)
    }

    pub fn config(&self) -> PagingConfig {
        self.config
    }

    /// Whether a submission has been made that is not installed yet.
    pub fn has_pending_submission(&self) -> bool {
        self.installed_generation != self.shared.generation.load(Ordering::SeqCst)
    }

    fn next_generation(&self) -> u64 {
        self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn job(&self, generation: u64) -> Job<T> {
        Job {
            shared: Arc::clone(&self.shared),
            tx: self.tx.clone(),
            scheduler: Arc::clone(&self.runtime.scheduler),
            generation,
        }
    }

    /// Submits a finite list, chunked into pages of the configured size.
    ///
    /// When either the installed list or `items` is empty the change is
    /// applied at once and reported to `updates` before returning `true`.
    /// Otherwise the diff runs on the compute executor and `false` is
    /// returned.
    pub fn submit_list(
        &mut self,
        items: Option<Vec<T>>,
        updates: &mut dyn ListUpdateCallback,
    ) -> bool {
        let generation = self.next_generation();
        let snapshot = Arc::new(Snapshot::from_vec(
            items.unwrap_or_default(),
            self.config.page_size,
        ));
        log::debug!(
            "submit generation {generation}: {} -> {} items",
            self.current.len(),
            snapshot.len()
        );
        if snapshot.is_empty() || self.current.is_empty() {
            self.install_now(generation, snapshot, updates);
            return true;
        }
        let baseline = Arc::clone(&self.current);
        let job = self.job(generation);
        self.runtime
            .compute
            .execute(Box::new(move || job.diff(baseline, snapshot, None)));
        false
    }

    /// Submits a data source. Its first page is loaded on the fetch executor
    /// and then diffed against the installed list like any other submission.
    pub fn submit_paged(&mut self, list: PagedList<T>) {
        let generation = self.next_generation();
        log::debug!("submit generation {generation}: paged source");
        let baseline = Arc::clone(&self.current);
        let job = self.job(generation);
        let compute = Arc::clone(&self.runtime.compute);
        self.runtime.fetch.execute(Box::new(move || {
            if job.is_stale() {
                return;
            }
            let config = list.config();
            let request = PageRequest {
                start: 0,
                load_size: config.initial_load_size,
            };
            match fetch_page(&**list.source(), request) {
                Ok(page) => {
                    let snapshot = Arc::new(Snapshot::from_vec(page.items, config.page_size));
                    let paging = PagingState {
                        list,
                        end_reached: page.end_reached,
                        fetch_in_flight: None,
                    };
                    compute.execute(Box::new(move || job.diff(baseline, snapshot, Some(paging))));
                }
                Err(err) => {
                    log::warn!("initial load for generation {} failed: {err}", job.generation);
                    let generation = job.generation;
                    job.post(DifferMessage::SubmissionFailed { generation });
                }
            }
        }));
    }

    /// Drops the installed list at once, obsoleting any in-flight work.
    pub fn clear(&mut self) {
        let generation = self.next_generation();
        self.current = Arc::new(Snapshot::empty());
        self.installed_generation = generation;
        self.paging = None;
    }

    /// Requests the next page of a paged list when `index` is within the
    /// prefetch distance of the loaded end.
    pub fn load_around(&mut self, index: usize) {
        if self.has_pending_submission() {
            return;
        }
        let loaded = self.current.len();
        let Some(paging) = self.paging.as_mut() else {
            return;
        };
        let config = paging.list.config();
        if paging.end_reached
            || paging.fetch_in_flight.is_some()
            || !config.should_prefetch(index, loaded)
        {
            return;
        }
        paging.fetch_in_flight = Some(self.installed_generation);
        let source = Arc::clone(paging.list.source());
        let request = PageRequest {
            start: loaded,
            load_size: config.page_size,
        };
        log::trace!("prefetching {request:?} around {index}");
        let job = self.job(self.installed_generation);
        self.runtime.fetch.execute(Box::new(move || {
            let generation = job.generation;
            if job.is_stale() {
                job.post(DifferMessage::PageFailed { generation });
                return;
            }
            match fetch_page(&*source, request) {
                Ok(page) => job.post(DifferMessage::PageLoaded {
                    generation,
                    start: request.start,
                    items: page.items,
                    end_reached: page.end_reached,
                }),
                Err(err) => {
                    log::warn!("loading {request:?} failed: {err}");
                    job.post(DifferMessage::PageFailed { generation });
                }
            }
        }));
    }

    /// Applies every result that has arrived, reporting list updates to
    /// `updates`. Returns whether the installed list changed.
    pub fn dispatch_pending(&mut self, updates: &mut dyn ListUpdateCallback) -> bool {
        let mut changed = false;
        while let Ok(message) = self.rx.try_recv() {
            changed |= self.apply(message, updates);
        }
        changed
    }

    fn apply(&mut self, message: DifferMessage<T>, updates: &mut dyn ListUpdateCallback) -> bool {
        let latest = self.shared.generation.load(Ordering::SeqCst);
        match message {
            DifferMessage::Diffed {
                generation,
                baseline,
                snapshot,
                result,
                paging,
            } => {
                if generation != latest {
                    log::debug!("dropping diff of generation {generation}; latest is {latest}");
                    return false;
                }
                if !Arc::ptr_eq(&baseline, &self.current) {
                    log::warn!("dropping diff of generation {generation}: baseline is no longer installed");
                    return false;
                }
                self.current = snapshot;
                self.installed_generation = generation;
                self.paging = paging;
                result.dispatch_updates_to(updates);
                true
            }
            DifferMessage::PageLoaded {
                generation,
                start,
                items,
                end_reached,
            } => {
                let Some(paging) = self.paging.as_mut() else {
                    return false;
                };
                if paging.fetch_in_flight == Some(generation) {
                    paging.fetch_in_flight = None;
                }
                if generation != self.installed_generation || generation != latest {
                    log::trace!("dropping page at {start} loaded for generation {generation}");
                    return false;
                }
                if start != self.current.len() {
                    return false;
                }
                paging.end_reached = end_reached;
                if items.is_empty() {
                    return false;
                }
                let count = items.len();
                self.current = Arc::new(self.current.appended(items));
                updates.on_inserted(start, count);
                true
            }
            DifferMessage::PageFailed { generation } => {
                if let Some(paging) = self.paging.as_mut() {
                    if paging.fetch_in_flight == Some(generation) {
                        paging.fetch_in_flight = None;
                    }
                }
                false
            }
            DifferMessage::SubmissionFailed { generation } => {
                // The installed list stays current and is adopted by the
                // failed generation, so paging around it resumes.
                if generation == latest {
                    self.installed_generation = generation;
                }
                false
            }
        }
    }

    fn install_now(
        &mut self,
        generation: u64,
        snapshot: Arc<Snapshot<T>>,
        updates: &mut dyn ListUpdateCallback,
    ) {
        let old_len = self.current.len();
        let new_len = snapshot.len();
        self.current = snapshot;
        self.installed_generation = generation;
        self.paging = None;
        if new_len == 0 {
            if old_len > 0 {
                updates.on_removed(0, old_len);
            }
        } else if old_len == 0 {
            updates.on_inserted(0, new_len);
        }
    }
}

impl<T> std::fmt::Debug for AsyncListDiffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncListDiffer")
            .field("len", &self.current.len())
            .field("installed_generation", &self.installed_generation)
            .field("paged", &self.paging.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "tests/differ_tests.rs"]
mod tests;
