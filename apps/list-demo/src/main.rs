use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use rowmux_core::{
    data_source_fn, item_callback, on_hf_click, on_item_click_with_position, AdapterDelegate,
    CompositeAdapter, ContainerId, DetachError, LoadError, PageRequest, PagedList, PagingConfig,
    RenderSurface, Snapshot, SurfaceUpdates, SurfaceView, ViewContainer, ViewHolder, ViewType,
};
use rowmux_runtime_std::StdRuntime;

const STORY: ViewType = ViewType(1);
const BANNER: ViewType = ViewType(10);
const LOADING: ViewType = ViewType(20);
const SCREEN: ContainerId = ContainerId(1);
const FEED_LEN: usize = 57;
const FETCH_LATENCY: Duration = Duration::from_millis(15);

#[derive(Debug)]
struct ConsoleView {
    id: u64,
    parent: Cell<Option<ContainerId>>,
}

impl ConsoleView {
    fn new(id: u64) -> Self {
        Self {
            id,
            parent: Cell::new(None),
        }
    }
}

impl SurfaceView for ConsoleView {
    fn parent(&self) -> Option<ContainerId> {
        self.parent.get()
    }

    fn detach_from_parent(&self) -> Result<(), DetachError> {
        self.parent.set(None);
        Ok(())
    }
}

/// Inflates header and footer views.
#[derive(Default)]
struct ConsoleContainer {
    next_id: Cell<u64>,
}

impl ViewContainer<ConsoleView> for ConsoleContainer {
    fn id(&self) -> ContainerId {
        SCREEN
    }

    fn inflate(&self, view_type: ViewType) -> ConsoleView {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        log::debug!("inflated view {id} of type {view_type}");
        ConsoleView::new(id)
    }
}

/// Logs notifications and keeps a row count.
#[derive(Debug, Default)]
struct ConsoleSurface {
    rows: usize,
    redraws: usize,
}

impl SurfaceUpdates for ConsoleSurface {
    fn notify_item_range_inserted(&mut self, position: usize, count: usize) {
        self.rows += count;
        log::info!("+{count} rows at {position} ({} total)", self.rows);
    }

    fn notify_item_range_removed(&mut self, position: usize, count: usize) {
        self.rows = self.rows.saturating_sub(count);
        log::info!("-{count} rows at {position} ({} total)", self.rows);
    }

    fn notify_item_moved(&mut self, from: usize, to: usize) {
        log::info!("row {from} moved to {to}");
    }

    fn notify_item_range_changed(&mut self, position: usize, count: usize) {
        log::info!("{count} rows changed at {position}");
    }

    fn notify_data_set_changed(&mut self) {
        self.redraws += 1;
        log::info!("full redraw");
    }
}

impl RenderSurface<ConsoleView> for ConsoleSurface {}

#[derive(Clone, Debug, PartialEq)]
struct Story {
    id: u32,
    title: String,
}

impl Story {
    fn new(id: u32) -> Self {
        Self {
            id,
            title: format!("Story number {id}"),
        }
    }
}

/// Renders each story into the holder's text payload.
#[derive(Default)]
struct FeedDelegate {
    next_view_id: u64,
}

impl AdapterDelegate<Story> for FeedDelegate {
    type View = ConsoleView;
    type Payload = String;

    fn item_view_type(&self, _position: usize) -> ViewType {
        STORY
    }

    fn create_item_view(
        &mut self,
        _parent: ContainerId,
        _view_type: ViewType,
    ) -> (ConsoleView, String) {
        self.next_view_id += 1;
        (ConsoleView::new(1000 + self.next_view_id), String::new())
    }

    fn bind_item(
        &mut self,
        holder: &ViewHolder<ConsoleView, String>,
        item: Option<&Story>,
        _position: usize,
    ) {
        if let Some(mut text) = holder.payload_mut() {
            *text = match item {
                Some(story) => format!("#{} {}", story.id, story.title),
                None => String::from("..."),
            };
        }
    }

    fn bind_header(&mut self, _holder: &ViewHolder<ConsoleView, String>, position: usize) {
        log::debug!("banner {position} bound");
    }

    fn current_list_changed(&mut self, list: &Snapshot<Story>) {
        log::info!("feed holds {} stories in {} pages", list.len(), list.page_count());
    }
}

type FeedAdapter = CompositeAdapter<Story, FeedDelegate, ConsoleSurface>;

fn load_stories(request: PageRequest) -> Result<Vec<Story>, LoadError> {
    thread::sleep(FETCH_LATENCY);
    let end = (request.start + request.load_size).min(FEED_LEN);
    Ok((request.start..end).map(|id| Story::new(id as u32)).collect())
}

/// Parks until background results arrive and applies them. Returns whether
/// the list changed before `timeout`.
fn wait_for_dispatch(runtime: &StdRuntime, adapter: &mut FeedAdapter, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() || !runtime.wait_for_dispatch(left) {
            return false;
        }
        if adapter.dispatch_pending() {
            return true;
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let runtime = StdRuntime::new()?;
    let config = PagingConfig::new(10).with_prefetch_distance(4);
    let mut adapter = CompositeAdapter::with_config(
        FeedDelegate::default(),
        ConsoleSurface::default(),
        item_callback(
            |a: &Story, b: &Story| a.id == b.id,
            |a: &Story, b: &Story| a == b,
        ),
        runtime.adapter_runtime(),
        config,
    );

    let container = ConsoleContainer::default();
    adapter.add_header_view(BANNER, &container)?;
    adapter.add_footer_view(LOADING, &container)?;
    adapter.register_item_click_listener(Some(on_item_click_with_position(
        |position, story: &Story| log::info!("clicked story {} at item {position}", story.id),
    )));
    adapter.register_header_click_listener(Some(on_hf_click(
        |holder: &ViewHolder<ConsoleView, String>| {
            log::info!("banner view {} clicked", holder.view().id)
        },
    )));

    adapter.set_paged_list(PagedList::new(data_source_fn(load_stories), config));
    if !wait_for_dispatch(&runtime, &mut adapter, Duration::from_secs(2)) {
        anyhow::bail!("the first page never arrived");
    }

    // Scroll to the bottom with a single recycled row.
    let row = adapter.create_view_holder(SCREEN, STORY);
    let mut flat = adapter.header_count();
    while flat < adapter.first_footer_index() {
        adapter.bind_view_holder(&row, flat)?;
        if let Some(text) = row.payload() {
            log::debug!("row {flat}: {}", *text);
        }
        if flat == 3 {
            adapter.dispatch_click(&row);
        }
        adapter.view_recycled(&row);
        if runtime.take_dispatch_request() {
            adapter.dispatch_pending();
        }
        flat += 1;
        if flat == adapter.first_footer_index() {
            wait_for_dispatch(&runtime, &mut adapter, Duration::from_millis(250));
        }
    }
    log::info!("scrolled through {} stories", adapter.items_list_count());

    let banner = adapter.create_view_holder(SCREEN, BANNER);
    adapter.bind_view_holder(&banner, 0)?;
    adapter.dispatch_click(&banner);

    // Newest first: one move per story, delivered as a single batch.
    let mut reversed = adapter.current_list().to_vec();
    reversed.reverse();
    adapter.set_items_list(Some(reversed));
    wait_for_dispatch(&runtime, &mut adapter, Duration::from_secs(2));

    log::info!(
        "{} rows on screen, {} expected",
        adapter.surface().rows,
        adapter.item_count()
    );

    adapter.clear_headers();
    adapter.clear_items();
    log::info!(
        "cleared with {} full redraws; {} footer rows left",
        adapter.surface().redraws,
        adapter.item_count()
    );
    Ok(())
}
