use rowmux_core::{AdapterDelegate, ContainerId, Snapshot, ViewHolder, ViewType};

use crate::view::TestView;

/// A hook invocation seen by a [`RecordingDelegate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DelegateCall<T> {
    CreateItem { view_type: ViewType, view_id: u64 },
    BindHeader { position: usize },
    BindItem { position: usize, item: Option<T> },
    BindFooter { position: usize },
    ItemRecycled { position: usize },
    HeaderRecycled { position: usize },
    FooterRecycled { position: usize },
    ItemClicked { position: usize, item: T },
    ListChanged { len: usize },
}

/// Delegate that records every hook call.
///
/// Item views get ids from 1000 upwards and every item row has
/// [`RecordingDelegate::ITEM_VIEW_TYPE`].
#[derive(Debug)]
pub struct RecordingDelegate<T> {
    calls: Vec<DelegateCall<T>>,
    next_view_id: u64,
    extra_rows: usize,
}

impl<T> RecordingDelegate<T> {
    pub const ITEM_VIEW_TYPE: ViewType = ViewType(1);

    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            next_view_id: 1000,
            extra_rows: 0,
        }
    }

    pub fn with_extra_rows(mut self, extra_rows: usize) -> Self {
        self.extra_rows = extra_rows;
        self
    }

    pub fn set_extra_rows(&mut self, extra_rows: usize) {
        self.extra_rows = extra_rows;
    }

    pub fn calls(&self) -> &[DelegateCall<T>] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DelegateCall<T>> {
        std::mem::take(&mut self.calls)
    }
}

impl<T> Default for RecordingDelegate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> AdapterDelegate<T> for RecordingDelegate<T> {
    type View = TestView;
    type Payload = ();

    fn item_view_type(&self, _position: usize) -> ViewType {
        Self::ITEM_VIEW_TYPE
    }

    fn create_item_view(&mut self, _parent: ContainerId, view_type: ViewType) -> (TestView, ()) {
        let view_id = self.next_view_id;
        self.next_view_id += 1;
        self.calls.push(DelegateCall::CreateItem { view_type, view_id });
        (TestView::new(view_id, view_type), ())
    }

    fn bind_item(&mut self, _holder: &ViewHolder<TestView>, item: Option<&T>, position: usize) {
        self.calls.push(DelegateCall::BindItem {
            position,
            item: item.cloned(),
        });
    }

    fn bind_header(&mut self, _holder: &ViewHolder<TestView>, position: usize) {
        self.calls.push(DelegateCall::BindHeader { position });
    }

    fn bind_footer(&mut self, _holder: &ViewHolder<TestView>, position: usize) {
        self.calls.push(DelegateCall::BindFooter { position });
    }

    fn item_recycled(&mut self, _holder: &ViewHolder<TestView>, position: usize) {
        self.calls.push(DelegateCall::ItemRecycled { position });
    }

    fn header_recycled(&mut self, _holder: &ViewHolder<TestView>, position: usize) {
        self.calls.push(DelegateCall::HeaderRecycled { position });
    }

    fn footer_recycled(&mut self, _holder: &ViewHolder<TestView>, position: usize) {
        self.calls.push(DelegateCall::FooterRecycled { position });
    }

    fn item_clicked(&mut self, position: usize, item: &T, _holder: &ViewHolder<TestView>) {
        self.calls.push(DelegateCall::ItemClicked {
            position,
            item: item.clone(),
        });
    }

    fn current_list_changed(&mut self, list: &Snapshot<T>) {
        self.calls.push(DelegateCall::ListChanged { len: list.len() });
    }

    fn extra_item_count(&self) -> usize {
        self.extra_rows
    }
}
