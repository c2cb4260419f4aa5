use std::cell::Cell;

use rowmux_core::{ContainerId, DetachError, SurfaceView, ViewContainer, ViewType};

/// In-memory view that tracks its parent and detach attempts.
#[derive(Debug)]
pub struct TestView {
    id: u64,
    view_type: ViewType,
    parent: Cell<Option<ContainerId>>,
    fail_detach: Cell<bool>,
    detach_calls: Cell<usize>,
}

impl TestView {
    pub fn new(id: u64, view_type: ViewType) -> Self {
        Self {
            id,
            view_type,
            parent: Cell::new(None),
            fail_detach: Cell::new(false),
            detach_calls: Cell::new(0),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn attach_to(&self, parent: ContainerId) {
        self.parent.set(Some(parent));
    }

    /// Makes every later detach fail, leaving the parent in place.
    pub fn fail_detach(&self) {
        self.fail_detach.set(true);
    }

    pub fn detach_calls(&self) -> usize {
        self.detach_calls.get()
    }
}

impl SurfaceView for TestView {
    fn parent(&self) -> Option<ContainerId> {
        self.parent.get()
    }

    fn detach_from_parent(&self) -> Result<(), DetachError> {
        self.detach_calls.set(self.detach_calls.get() + 1);
        if self.fail_detach.get() {
            return Err(DetachError::new("view refused to detach"));
        }
        self.parent.set(None);
        Ok(())
    }
}

/// Container that inflates [`TestView`]s with increasing ids.
#[derive(Debug)]
pub struct TestContainer {
    id: ContainerId,
    next_view_id: Cell<u64>,
}

impl TestContainer {
    /// View ids start at `first_view_id`, keeping them apart from ids handed
    /// out elsewhere in a test.
    pub fn new(id: u64, first_view_id: u64) -> Self {
        Self {
            id: ContainerId(id),
            next_view_id: Cell::new(first_view_id),
        }
    }
}

impl ViewContainer<TestView> for TestContainer {
    fn id(&self) -> ContainerId {
        self.id
    }

    fn inflate(&self, view_type: ViewType) -> TestView {
        let id = self.next_view_id.get();
        self.next_view_id.set(id + 1);
        TestView::new(id, view_type)
    }
}
