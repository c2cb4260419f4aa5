use super::*;
use crate::diff::{item_callback, EqualityCallback, ListUpdate};
use crate::error::LoadError;
use crate::executor::{Executor, Task};
use crate::paging::data_source_fn;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize};
use std::sync::Mutex;

#[derive(Clone, Default)]
struct QueueExecutor {
    tasks: Arc<Mutex<VecDeque<Task>>>,
}

impl Executor for QueueExecutor {
    fn execute(&self, task: Task) {
        self.tasks.lock().unwrap().push_back(task);
    }
}

impl QueueExecutor {
    fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    fn run_all(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.tasks.lock().unwrap().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

#[derive(Default)]
struct CountingScheduler {
    requests: AtomicUsize,
}

impl DispatchScheduler for CountingScheduler {
    fn request_dispatch(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

struct Fixture {
    compute: QueueExecutor,
    fetch: QueueExecutor,
    scheduler: Arc<CountingScheduler>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            compute: QueueExecutor::default(),
            fetch: QueueExecutor::default(),
            scheduler: Arc::new(CountingScheduler::default()),
        }
    }

    fn runtime(&self) -> AdapterRuntime {
        AdapterRuntime::new(
            Arc::new(self.compute.clone()),
            Arc::new(self.fetch.clone()),
            self.scheduler.clone(),
        )
    }

    fn differ(&self, config: PagingConfig) -> AsyncListDiffer<u32> {
        AsyncListDiffer::new(EqualityCallback, self.runtime(), config)
    }

    fn settle(&self, differ: &mut AsyncListDiffer<u32>) -> Vec<ListUpdate> {
        let mut updates: Vec<ListUpdate> = Vec::new();
        while self.fetch.run_all() + self.compute.run_all() > 0 {}
        differ.dispatch_pending(&mut updates);
        updates
    }
}

fn sink() -> Vec<ListUpdate> {
    Vec::new()
}

fn items(differ: &AsyncListDiffer<u32>) -> Vec<u32> {
    differ.current().to_vec()
}

#[test]
fn first_list_is_installed_synchronously() {
    let fixture = Fixture::new();
    let mut differ = fixture.differ(PagingConfig::default());
    let mut updates: Vec<ListUpdate> = Vec::new();

    assert!(differ.submit_list(Some(vec![1, 2, 3]), &mut updates));
    assert_eq!(updates, vec![ListUpdate::Inserted { position: 0, count: 3 }]);
    assert_eq!(items(&differ), vec![1, 2, 3]);
    assert_eq!(fixture.compute.pending(), 0);
    assert!(!differ.has_pending_submission());
}

#[test]
fn submitting_nothing_removes_everything_at_once() {
    let fixture = Fixture::new();
    let mut differ = fixture.differ(PagingConfig::default());
    let mut updates: Vec<ListUpdate> = Vec::new();
    differ.submit_list(Some(vec![1, 2, 3]), &mut updates);
    updates.clear();

    assert!(differ.submit_list(None, &mut updates));
    assert_eq!(updates, vec![ListUpdate::Removed { position: 0, count: 3 }]);
    assert!(differ.is_empty());
}

#[test]
fn resubmitting_an_equal_list_reports_nothing() {
    let fixture = Fixture::new();
    let mut differ = fixture.differ(PagingConfig::default());
    differ.submit_list(Some(vec![1, 2, 3]), &mut sink());

    let mut updates: Vec<ListUpdate> = Vec::new();
    assert!(!differ.submit_list(Some(vec![1, 2, 3]), &mut updates));
    assert!(updates.is_empty());
    assert!(fixture.settle(&mut differ).is_empty());
    assert_eq!(items(&differ), vec![1, 2, 3]);
    assert!(!differ.has_pending_submission());
}

#[test]
fn reads_see_the_old_list_until_dispatch() {
    let fixture = Fixture::new();
    let mut differ = fixture.differ(PagingConfig::default());
    differ.submit_list(Some(vec![1, 2, 3]), &mut sink());

    differ.submit_list(Some(vec![3, 2, 1, 0]), &mut sink());
    fixture.compute.run_all();
    assert_eq!(differ.len(), 3);
    assert_eq!(differ.get(0), Some(&1));
    assert!(differ.has_pending_submission());
    assert!(fixture.scheduler.requests.load(Ordering::SeqCst) >= 1);

    let mut updates: Vec<ListUpdate> = Vec::new();
    assert!(differ.dispatch_pending(&mut updates));
    assert!(!updates.is_empty());
    assert_eq!(items(&differ), vec![3, 2, 1, 0]);
}

#[test]
fn superseded_submission_is_never_delivered() {
    let fixture = Fixture::new();
    let mut differ = fixture.differ(PagingConfig::default());
    differ.submit_list(Some(vec![1, 2, 3]), &mut sink());

    differ.submit_list(Some(vec![1, 2]), &mut sink());
    differ.submit_list(Some(vec![1, 2, 3, 4, 5]), &mut sink());
    let updates = fixture.settle(&mut differ);

    assert_eq!(updates, vec![ListUpdate::Inserted { position: 3, count: 2 }]);
    assert_eq!(items(&differ), vec![1, 2, 3, 4, 5]);
}

#[test]
fn finished_but_superseded_result_is_dropped() {
    let fixture = Fixture::new();
    let mut differ = fixture.differ(PagingConfig::default());
    differ.submit_list(Some(vec![1, 2, 3]), &mut sink());

    differ.submit_list(Some(vec![1, 2]), &mut sink());
    fixture.compute.run_all();
    differ.submit_list(Some(vec![0, 1, 2, 3]), &mut sink());
    let updates = fixture.settle(&mut differ);

    assert_eq!(updates, vec![ListUpdate::Inserted { position: 0, count: 1 }]);
    assert_eq!(items(&differ), vec![0, 1, 2, 3]);
}

#[test]
fn clear_obsoletes_in_flight_diffs() {
    let fixture = Fixture::new();
    let mut differ = fixture.differ(PagingConfig::default());
    differ.submit_list(Some(vec![1, 2, 3]), &mut sink());
    differ.submit_list(Some(vec![4, 5]), &mut sink());

    differ.clear();
    assert!(fixture.settle(&mut differ).is_empty());
    assert!(differ.is_empty());
    assert!(!differ.has_pending_submission());
}

#[test]
fn panicking_callback_keeps_the_installed_list() {
    let fixture = Fixture::new();
    let callback = item_callback(
        |old: &u32, new: &u32| {
            if *new == 99 {
                panic!("cannot compare {old} with {new}");
            }
            old == new
        },
        |old: &u32, new: &u32| old == new,
    );
    let mut differ = AsyncListDiffer::new(callback, fixture.runtime(), PagingConfig::default());
    differ.submit_list(Some(vec![1, 2, 3]), &mut sink());

    differ.submit_list(Some(vec![1, 99]), &mut sink());
    assert!(fixture.settle(&mut differ).is_empty());
    assert_eq!(items(&differ), vec![1, 2, 3]);
    assert!(!differ.has_pending_submission());

    differ.submit_list(Some(vec![1, 2]), &mut sink());
    assert_eq!(
        fixture.settle(&mut differ),
        vec![ListUpdate::Removed { position: 2, count: 1 }]
    );
}

#[test]
fn paged_source_loads_initial_pages_then_appends_on_demand() {
    let fixture = Fixture::new();
    let config = PagingConfig::new(2).with_prefetch_distance(1);
    let mut differ = fixture.differ(config);

    differ.submit_paged(PagedList::from_list((0..10).collect(), config));
    assert_eq!(fixture.fetch.pending(), 1);
    assert_eq!(
        fixture.settle(&mut differ),
        vec![ListUpdate::Inserted { position: 0, count: 6 }]
    );
    assert_eq!(differ.current().page_count(), 3);

    differ.load_around(3);
    assert_eq!(fixture.fetch.pending(), 0);

    differ.load_around(5);
    differ.load_around(5);
    assert_eq!(fixture.fetch.pending(), 1);
    assert_eq!(
        fixture.settle(&mut differ),
        vec![ListUpdate::Inserted { position: 6, count: 2 }]
    );

    differ.load_around(7);
    assert_eq!(
        fixture.settle(&mut differ),
        vec![ListUpdate::Inserted { position: 8, count: 2 }]
    );

    differ.load_around(9);
    assert!(fixture.settle(&mut differ).is_empty());
    differ.load_around(9);
    assert_eq!(fixture.fetch.pending(), 0);
    assert_eq!(items(&differ), (0..10).collect::<Vec<_>>());
}

#[test]
fn failed_page_can_be_requested_again() {
    let fixture = Fixture::new();
    let config = PagingConfig::new(2)
        .with_prefetch_distance(1)
        .with_initial_load_size(2);
    let offline = Arc::new(AtomicBool::new(false));
    let source = {
        let offline = Arc::clone(&offline);
        data_source_fn(move |request: PageRequest| -> Result<Vec<u32>, LoadError> {
            if offline.load(Ordering::SeqCst) {
                return Err(LoadError::new("offline"));
            }
            Ok((request.start as u32..).take(request.load_size).collect())
        })
    };
    let mut differ = fixture.differ(config);
    differ.submit_paged(PagedList::new(source, config));
    fixture.settle(&mut differ);
    assert_eq!(items(&differ), vec![0, 1]);

    offline.store(true, Ordering::SeqCst);
    differ.load_around(1);
    assert!(fixture.settle(&mut differ).is_empty());

    offline.store(false, Ordering::SeqCst);
    differ.load_around(1);
    assert_eq!(
        fixture.settle(&mut differ),
        vec![ListUpdate::Inserted { position: 2, count: 2 }]
    );
}

#[test]
fn page_for_a_replaced_list_is_discarded() {
    let fixture = Fixture::new();
    let config = PagingConfig::new(2).with_initial_load_size(2);
    let mut differ = fixture.differ(config);
    differ.submit_paged(PagedList::from_list((0..10).collect(), config));
    fixture.settle(&mut differ);

    differ.load_around(1);
    differ.submit_list(Some(vec![7, 8]), &mut sink());
    let updates = fixture.settle(&mut differ);

    assert_eq!(items(&differ), vec![7, 8]);
    assert!(!updates.contains(&ListUpdate::Inserted { position: 2, count: 2 }));
    differ.load_around(1);
    assert_eq!(fixture.fetch.pending(), 0);
}

#[test]
fn fetch_issued_before_a_failed_submission_releases_paging() {
    let fixture = Fixture::new();
    let config = PagingConfig::new(2)
        .with_prefetch_distance(1)
        .with_initial_load_size(2);
    let callback = item_callback(
        |old: &u32, new: &u32| {
            if *new == 99 {
                panic!("cannot compare {old} with {new}");
            }
            old == new
        },
        |old: &u32, new: &u32| old == new,
    );
    let mut differ = AsyncListDiffer::new(callback, fixture.runtime(), config);
    differ.submit_paged(PagedList::from_list((0..10).collect(), config));
    fixture.settle(&mut differ);
    assert_eq!(items(&differ), vec![0, 1]);

    differ.load_around(1);
    differ.submit_list(Some(vec![0, 99]), &mut sink());
    assert_eq!(fixture.compute.run_all(), 1);
    assert!(!differ.dispatch_pending(&mut sink()));
    assert!(!differ.has_pending_submission());

    assert!(fixture.settle(&mut differ).is_empty());
    differ.load_around(1);
    assert_eq!(fixture.fetch.pending(), 1);
    assert_eq!(
        fixture.settle(&mut differ),
        vec![ListUpdate::Inserted { position: 2, count: 2 }]
    );
    assert_eq!(items(&differ), vec![0, 1, 2, 3]);
}
