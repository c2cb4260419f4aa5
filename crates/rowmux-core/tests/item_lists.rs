use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rowmux_core::{
    data_source_fn, item_callback, CompositeAdapter, ContainerId, EqualityCallback, LoadError,
    PageRequest, PagedList, PagingConfig, ViewType,
};
use rowmux_testing::{
    DelegateCall, ListHarness, RecordingDelegate, RecordingSurface, SurfaceEvent, TestContainer,
};

type WordAdapter = CompositeAdapter<&'static str, RecordingDelegate<&'static str>, RecordingSurface>;
type NumberAdapter = CompositeAdapter<u32, RecordingDelegate<u32>, RecordingSurface>;

const PARENT: ContainerId = ContainerId(3);

fn words(harness: &ListHarness, headers: usize) -> WordAdapter {
    let mut adapter = CompositeAdapter::new(
        RecordingDelegate::new(),
        RecordingSurface::new(),
        harness.runtime(),
    );
    let container = TestContainer::new(1, 1);
    for header in 0..headers {
        adapter
            .add_header_view(ViewType(100 + header as u32), &container)
            .unwrap();
    }
    adapter.surface_mut().take_events();
    adapter
}

fn numbers(harness: &ListHarness, config: PagingConfig) -> NumberAdapter {
    CompositeAdapter::with_config(
        RecordingDelegate::new(),
        RecordingSurface::new(),
        EqualityCallback,
        harness.runtime(),
        config,
    )
}

#[test]
fn first_list_is_announced_without_background_work() {
    let harness = ListHarness::new();
    let mut adapter = words(&harness, 1);

    adapter.set_items_list(Some(vec!["a", "b"]));

    assert_eq!(harness.compute().pending(), 0);
    assert_eq!(
        adapter.surface().events(),
        &[SurfaceEvent::Inserted {
            position: 1,
            count: 2
        }]
    );
    assert_eq!(
        adapter.delegate().calls(),
        &[DelegateCall::ListChanged { len: 2 }]
    );
}

#[test]
fn submitting_the_same_list_twice_reports_nothing() {
    let harness = ListHarness::new();
    let mut adapter = words(&harness, 1);
    adapter.set_items_list(Some(vec!["a", "b", "c"]));
    adapter.surface_mut().take_events();

    adapter.set_items_list(Some(vec!["a", "b", "c"]));
    harness.settle(&mut adapter);

    assert!(adapter.surface().events().is_empty());
    assert!(!adapter.has_pending_submission());
}

#[test]
fn only_the_latest_submission_is_delivered() {
    let harness = ListHarness::new();
    let mut adapter = words(&harness, 1);
    adapter.set_items_list(Some(vec!["a", "b", "c"]));
    adapter.surface_mut().take_events();

    adapter.set_items_list(Some(vec!["a"]));
    adapter.set_items_list(Some(vec!["a", "b", "c", "d"]));
    assert!(harness.settle(&mut adapter));

    assert_eq!(
        adapter.surface().events(),
        &[SurfaceEvent::Inserted {
            position: 4,
            count: 1
        }]
    );
    assert_eq!(adapter.current_list().to_vec(), vec!["a", "b", "c", "d"]);
}

#[test]
fn reads_use_the_installed_list_while_a_diff_runs() {
    let harness = ListHarness::new();
    let mut adapter = words(&harness, 0);
    adapter.set_items_list(Some(vec!["a", "b", "c"]));

    adapter.set_items_list(Some(vec!["x", "y"]));
    harness.run_until_idle();
    assert_eq!(adapter.get_item(0), Ok(&"a"));
    assert_eq!(adapter.item_count(), 3);

    assert!(adapter.dispatch_pending());
    assert_eq!(adapter.get_item(0), Ok(&"x"));
    assert_eq!(adapter.item_count(), 2);
}

#[test]
fn moves_are_offset_past_the_headers_on_both_ends() {
    let harness = ListHarness::new();
    let mut adapter = words(&harness, 1);
    adapter.set_items_list(Some(vec!["a", "b", "c"]));
    adapter.surface_mut().take_events();

    adapter.set_items_list(Some(vec!["c", "a", "b"]));
    harness.settle(&mut adapter);

    assert_eq!(
        adapter.surface().events(),
        &[SurfaceEvent::Moved { from: 3, to: 1 }]
    );
}

#[test]
fn content_changes_are_reported_at_flat_positions() {
    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        id: u32,
        title: &'static str,
    }

    let harness = ListHarness::new();
    let mut adapter = CompositeAdapter::with_config(
        RecordingDelegate::new(),
        RecordingSurface::new(),
        item_callback(|a: &Row, b: &Row| a.id == b.id, |a: &Row, b: &Row| a == b),
        harness.runtime(),
        PagingConfig::default(),
    );
    let container = TestContainer::new(1, 1);
    adapter.add_header_view(ViewType(100), &container).unwrap();
    adapter.set_items_list(Some(vec![
        Row { id: 1, title: "one" },
        Row { id: 2, title: "two" },
    ]));
    adapter.surface_mut().take_events();

    adapter.set_items_list(Some(vec![
        Row { id: 1, title: "one" },
        Row { id: 2, title: "TWO" },
    ]));
    harness.settle(&mut adapter);

    assert_eq!(
        adapter.surface().events(),
        &[SurfaceEvent::Changed {
            position: 2,
            count: 1
        }]
    );
}

#[test]
fn clearing_the_list_removes_all_rows() {
    let harness = ListHarness::new();
    let mut adapter = words(&harness, 2);
    adapter.set_items_list(Some(vec!["a", "b", "c"]));
    adapter.surface_mut().take_events();

    adapter.set_items_list(None);

    assert_eq!(
        adapter.surface().events(),
        &[SurfaceEvent::Removed {
            position: 2,
            count: 3
        }]
    );
    assert_eq!(adapter.item_count(), 2);
}

#[test]
fn clear_items_redraws_and_drops_pending_diffs() {
    let harness = ListHarness::new();
    let mut adapter = words(&harness, 0);
    adapter.set_items_list(Some(vec!["a", "b", "c"]));
    adapter.set_items_list(Some(vec!["d"]));
    adapter.surface_mut().take_events();
    adapter.delegate_mut().take_calls();

    adapter.clear_items();
    assert!(!harness.settle(&mut adapter));

    assert_eq!(adapter.surface().events(), &[SurfaceEvent::DataSetChanged]);
    assert_eq!(
        adapter.delegate().calls(),
        &[DelegateCall::ListChanged { len: 0 }]
    );
    assert_eq!(adapter.items_list_count(), 0);
}

#[test]
fn panicking_item_callback_leaves_the_list_in_place() {
    let harness = ListHarness::new();
    let mut adapter: NumberAdapter = CompositeAdapter::with_config(
        RecordingDelegate::new(),
        RecordingSurface::new(),
        item_callback(
            |a: &u32, b: &u32| {
                assert!(*a != 13 && *b != 13, "unlucky row");
                a == b
            },
            |a: &u32, b: &u32| a == b,
        ),
        harness.runtime(),
        PagingConfig::default(),
    );
    adapter.set_items_list(Some(vec![1, 2, 3]));
    adapter.surface_mut().take_events();

    adapter.set_items_list(Some(vec![1, 13]));
    assert!(!harness.settle(&mut adapter));

    assert!(adapter.surface().events().is_empty());
    assert_eq!(adapter.current_list().to_vec(), vec![1, 2, 3]);
}

#[test]
fn paged_list_grows_as_rows_near_the_end_are_bound() {
    let harness = ListHarness::new();
    let config = PagingConfig::new(5).with_prefetch_distance(2);
    let mut adapter = numbers(&harness, config);

    adapter.set_paged_list(PagedList::from_list((0..22).collect(), config));
    assert_eq!(adapter.items_list_count(), 0);
    assert!(harness.settle(&mut adapter));
    assert_eq!(
        adapter.surface_mut().take_events(),
        vec![SurfaceEvent::Inserted {
            position: 0,
            count: 15
        }]
    );

    let holder = adapter.create_view_holder(PARENT, RecordingDelegate::<u32>::ITEM_VIEW_TYPE);
    adapter.bind_view_holder(&holder, 10).unwrap();
    assert_eq!(harness.fetch().pending(), 0);

    adapter.bind_view_holder(&holder, 13).unwrap();
    assert_eq!(harness.fetch().pending(), 1);
    assert!(harness.settle(&mut adapter));
    assert_eq!(
        adapter.surface_mut().take_events(),
        vec![SurfaceEvent::Inserted {
            position: 15,
            count: 5
        }]
    );

    adapter.bind_view_holder(&holder, 19).unwrap();
    harness.settle(&mut adapter);
    assert_eq!(adapter.items_list_count(), 22);

    adapter.bind_view_holder(&holder, 21).unwrap();
    assert_eq!(harness.fetch().pending(), 0);
    assert_eq!(adapter.get_item(21), Ok(&21));
}

#[test]
fn failed_page_load_is_retried_by_a_later_bind() {
    let harness = ListHarness::new();
    let config = PagingConfig::new(4).with_initial_load_size(4);
    let offline = Arc::new(AtomicBool::new(false));
    let source = {
        let offline = Arc::clone(&offline);
        data_source_fn(move |request: PageRequest| -> Result<Vec<u32>, LoadError> {
            if offline.load(Ordering::SeqCst) {
                return Err(LoadError::new("offline"));
            }
            Ok((request.start as u32..100).take(request.load_size).collect())
        })
    };
    let mut adapter = numbers(&harness, config);
    adapter.set_paged_list(PagedList::new(source, config));
    harness.settle(&mut adapter);
    assert_eq!(adapter.items_list_count(), 4);

    let holder = adapter.create_view_holder(PARENT, RecordingDelegate::<u32>::ITEM_VIEW_TYPE);
    offline.store(true, Ordering::SeqCst);
    adapter.bind_view_holder(&holder, 3).unwrap();
    assert!(!harness.settle(&mut adapter));
    assert_eq!(adapter.items_list_count(), 4);

    offline.store(false, Ordering::SeqCst);
    adapter.bind_view_holder(&holder, 3).unwrap();
    assert!(harness.settle(&mut adapter));
    assert_eq!(adapter.items_list_count(), 8);
}

#[test]
fn failed_initial_load_keeps_the_previous_list() {
    let harness = ListHarness::new();
    let config = PagingConfig::new(4);
    let mut adapter = numbers(&harness, config);
    adapter.set_items_list(Some(vec![7, 8, 9]));
    adapter.surface_mut().take_events();

    let source =
        data_source_fn(|_: PageRequest| -> Result<Vec<u32>, LoadError> { Err(LoadError::new("down")) });
    adapter.set_paged_list(PagedList::new(source, config));
    assert!(!harness.settle(&mut adapter));

    assert!(!adapter.has_pending_submission());
    assert_eq!(adapter.current_list().to_vec(), vec![7, 8, 9]);
    assert!(adapter.surface().events().is_empty());
}

#[test]
fn paging_resumes_after_a_failed_submission() {
    let harness = ListHarness::new();
    let config = PagingConfig::new(4).with_initial_load_size(4);
    let mut adapter: NumberAdapter = CompositeAdapter::with_config(
        RecordingDelegate::new(),
        RecordingSurface::new(),
        item_callback(
            |a: &u32, b: &u32| {
                assert!(*a != 13 && *b != 13, "unlucky row");
                a == b
            },
            |a: &u32, b: &u32| a == b,
        ),
        harness.runtime(),
        config,
    );
    adapter.set_paged_list(PagedList::from_list((0..12).collect(), config));
    harness.settle(&mut adapter);
    assert_eq!(adapter.items_list_count(), 4);

    let holder = adapter.create_view_holder(PARENT, RecordingDelegate::<u32>::ITEM_VIEW_TYPE);
    adapter.bind_view_holder(&holder, 3).unwrap();
    assert_eq!(harness.fetch().pending(), 1);

    adapter.set_items_list(Some(vec![100, 13]));
    assert_eq!(harness.compute().run_all(), 1);
    assert!(!adapter.dispatch_pending());
    assert!(!adapter.has_pending_submission());
    assert!(!harness.settle(&mut adapter));
    assert_eq!(adapter.current_list().to_vec(), vec![0, 1, 2, 3]);

    adapter.bind_view_holder(&holder, 3).unwrap();
    assert_eq!(harness.fetch().pending(), 1);
    assert!(harness.settle(&mut adapter));
    assert_eq!(adapter.items_list_count(), 8);
    assert_eq!(adapter.get_item(7), Ok(&7));
}
