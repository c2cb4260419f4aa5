use rustc_hash::FxHashMap;

use rowmux_core::{RenderSurface, SurfaceUpdates};

use crate::view::TestView;

/// A notification received by a [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    Inserted { position: usize, count: usize },
    Removed { position: usize, count: usize },
    Moved { from: usize, to: usize },
    Changed { position: usize, count: usize },
    DataSetChanged,
}

/// Surface that records notifications and reports scripted positions.
///
/// Positions are keyed by [`TestView::id`]; views without one report none,
/// which exercises the adapter's bound-position fallback.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Vec<SurfaceEvent>,
    adapter_positions: FxHashMap<u64, usize>,
    layout_positions: FxHashMap<u64, usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Returns and forgets the recorded notifications.
    pub fn take_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_adapter_position(&mut self, view: &TestView, position: Option<usize>) {
        set_position(&mut self.adapter_positions, view, position);
    }

    pub fn set_layout_position(&mut self, view: &TestView, position: Option<usize>) {
        set_position(&mut self.layout_positions, view, position);
    }

    fn record(&mut self, event: SurfaceEvent) {
        log::trace!("surface received {event:?}");
        self.events.push(event);
    }
}

fn set_position(positions: &mut FxHashMap<u64, usize>, view: &TestView, position: Option<usize>) {
    match position {
        Some(position) => {
            positions.insert(view.id(), position);
        }
        None => {
            positions.remove(&view.id());
        }
    }
}

impl SurfaceUpdates for RecordingSurface {
    fn notify_item_range_inserted(&mut self, position: usize, count: usize) {
        self.record(SurfaceEvent::Inserted { position, count });
    }

    fn notify_item_range_removed(&mut self, position: usize, count: usize) {
        self.record(SurfaceEvent::Removed { position, count });
    }

    fn notify_item_moved(&mut self, from: usize, to: usize) {
        self.record(SurfaceEvent::Moved { from, to });
    }

    fn notify_item_range_changed(&mut self, position: usize, count: usize) {
        self.record(SurfaceEvent::Changed { position, count });
    }

    fn notify_data_set_changed(&mut self) {
        self.record(SurfaceEvent::DataSetChanged);
    }
}

impl RenderSurface<TestView> for RecordingSurface {
    fn adapter_position(&self, view: &TestView) -> Option<usize> {
        self.adapter_positions.get(&view.id()).copied()
    }

    fn layout_position(&self, view: &TestView) -> Option<usize> {
        self.layout_positions.get(&view.id()).copied()
    }
}
