#![doc = r"Composite list adapter: headers, a diffed or paged item list and footers behind one flat row space."]

pub extern crate self as rowmux_core;

mod adapter;
mod bridge;
pub mod diff;
mod differ;
pub mod error;
pub mod executor;
mod holder;
mod listeners;
pub mod paging;
pub mod position;
mod registry;
mod snapshot;
mod surface;

pub use adapter::{AdapterDelegate, CompositeAdapter, DelegateHolder};
pub use bridge::UpdateBridge;
pub use diff::{
    calculate_diff, calculate_snapshot_diff, item_callback, DiffResult, EqualityCallback,
    FnItemCallback, ItemCallback, ListUpdate, ListUpdateCallback,
};
pub use differ::AsyncListDiffer;
pub use error::{ConfigurationError, DetachError, IndexError, LoadError};
pub use executor::{AdapterRuntime, DispatchScheduler, Executor, PollingScheduler, Task};
pub use holder::{
    inflate_view, resolve_position, ClickRoutes, ContainerId, HolderKind, HolderRef, HolderState,
    SurfaceView, ViewContainer, ViewHolder,
};
pub use listeners::{
    on_hf_click, on_hf_click_with_position, on_item_click, on_item_click_with_position,
    on_item_long_click, HfClickListener, ItemClickListener, ItemLongClickListener,
};
pub use paging::{
    data_source_fn, DataSource, ListDataSource, PageRequest, PagedList, PagingConfig,
};
pub use position::{PositionSpace, Zone, ZoneIndex};
pub use registry::{ensure_view_type_unused, Entry, HeaderFooterRegistry};
pub use snapshot::Snapshot;
pub use surface::{RenderSurface, SurfaceUpdates};

/// Identifies the layout and binding logic of a row.
///
/// Header and footer rows use their view type as a key, so a view type is
/// never shared between the two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewType(pub u32);

impl std::fmt::Display for ViewType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
