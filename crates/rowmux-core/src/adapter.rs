//! The composite adapter: headers, the item list and footers behind one flat
//! row space.

use std::rc::Rc;
use std::sync::Arc;

use crate::bridge::UpdateBridge;
use crate::diff::{EqualityCallback, ItemCallback};
use crate::differ::AsyncListDiffer;
use crate::error::{ConfigurationError, IndexError};
use crate::executor::AdapterRuntime;
use crate::holder::{
    inflate_view, resolve_position, ClickRoutes, ContainerId, HolderRef, SurfaceView,
    ViewContainer, ViewHolder,
};
use crate::listeners::{HfClickListener, ItemClickListener, ItemLongClickListener, Listeners};
use crate::paging::{PagedList, PagingConfig};
use crate::position::{PositionSpace, Zone, ZoneIndex};
use crate::registry::HeaderFooterRegistry;
use crate::snapshot::Snapshot;
use crate::surface::RenderSurface;
use crate::ViewType;

/// Item-zone behavior supplied by the host.
///
/// Positions passed to the item hooks are zone-local; recycle hooks receive
/// the flat index the holder was last bound to.
pub trait AdapterDelegate<T> {
    type View: SurfaceView;

    /// Per-holder state kept by item holders.
    type Payload;

    /// View type of the item-zone row at `position`.
    fn item_view_type(&self, position: usize) -> ViewType;

    fn create_item_view(
        &mut self,
        parent: ContainerId,
        view_type: ViewType,
    ) -> (Self::View, Self::Payload);

    /// Binds an item-zone row. `item` is `None` for extra rows and for rows
    /// whose item is not loaded.
    fn bind_item(
        &mut self,
        holder: &ViewHolder<Self::View, Self::Payload>,
        item: Option<&T>,
        position: usize,
    );

    fn bind_header(&mut self, holder: &ViewHolder<Self::View, Self::Payload>, position: usize) {
        let _ = (holder, position);
    }

    fn bind_footer(&mut self, holder: &ViewHolder<Self::View, Self::Payload>, position: usize) {
        let _ = (holder, position);
    }

    /// Release per-row resources here.
    fn item_recycled(&mut self, holder: &ViewHolder<Self::View, Self::Payload>, position: usize) {
        let _ = (holder, position);
    }

    fn header_recycled(&mut self, holder: &ViewHolder<Self::View, Self::Payload>, position: usize) {
        let _ = (holder, position);
    }

    fn footer_recycled(&mut self, holder: &ViewHolder<Self::View, Self::Payload>, position: usize) {
        let _ = (holder, position);
    }

    /// Runs right after the item click listener.
    fn item_clicked(
        &mut self,
        position: usize,
        item: &T,
        holder: &ViewHolder<Self::View, Self::Payload>,
    ) {
        let _ = (position, item, holder);
    }

    /// Runs after every change of the installed list.
    fn current_list_changed(&mut self, list: &Snapshot<T>) {
        let _ = list;
    }

    /// Rows appended to the item zone after the list items, such as a
    /// loading indicator. They bind with no item.
    fn extra_item_count(&self) -> usize {
        0
    }
}

/// The holder type of a delegate.
pub type DelegateHolder<D, T> =
    ViewHolder<<D as AdapterDelegate<T>>::View, <D as AdapterDelegate<T>>::Payload>;

/// Presents headers, a diffed or paged item list and footers to one
/// rendering surface.
///
/// Every method runs on the surface thread. Item-zone updates computed in the
/// background reach the surface through [`dispatch_pending`](Self::dispatch_pending).
pub struct CompositeAdapter<T, D, S>
where
    D: AdapterDelegate<T>,
{
    delegate: D,
    surface: S,
    registry: HeaderFooterRegistry<HolderRef<D::View, D::Payload>>,
    differ: AsyncListDiffer<T>,
    listeners: Listeners<T, D::View, D::Payload>,
}

impl<T, D, S> CompositeAdapter<T, D, S>
where
    T: Send + Sync + 'static,
    D: AdapterDelegate<T>,
    S: RenderSurface<D::View>,
{
    /// Creates an adapter that matches items by `PartialEq` and pages lists
    /// with the default config.
    pub fn new(delegate: D, surface: S, runtime: AdapterRuntime) -> Self
    where
        T: PartialEq,
    {
        Self::with_config(
            delegate,
            surface,
            EqualityCallback,
            runtime,
            PagingConfig::default(),
        )
    }

    pub fn with_config(
        delegate: D,
        surface: S,
        callback: impl ItemCallback<T> + 'static,
        runtime: AdapterRuntime,
        config: PagingConfig,
    ) -> Self {
        Self {
            delegate,
            surface,
            registry: HeaderFooterRegistry::new(),
            differ: AsyncListDiffer::new(callback, runtime, config),
            listeners: Listeners::default(),
        }
    }

    /// Zone boundaries for the current headers, list and footers.
    pub fn position_space(&self) -> PositionSpace {
        PositionSpace::new(
            self.registry.header_count(),
            self.differ.len(),
            self.delegate.extra_item_count(),
            self.registry.footer_count(),
        )
    }

    // List submission

    /// Replaces the item list. `None` clears it.
    ///
    /// The list is diffed against the installed one in the background unless
    /// one of the two is empty, in which case the change is applied now.
    pub fn set_items_list(&mut self, items: Option<Vec<T>>) {
        let mut bridge = UpdateBridge::new(&self.registry, &mut self.surface);
        if self.differ.submit_list(items, &mut bridge) {
            self.delegate.current_list_changed(self.differ.current());
        }
    }

    /// Replaces the item list with one loaded incrementally from a data
    /// source.
    pub fn set_paged_list(&mut self, list: PagedList<T>) {
        self.differ.submit_paged(list);
    }

    /// Installs finished background work and forwards its updates to the
    /// surface. Returns whether the item list changed.
    pub fn dispatch_pending(&mut self) -> bool {
        let mut bridge = UpdateBridge::new(&self.registry, &mut self.surface);
        let changed = self.differ.dispatch_pending(&mut bridge);
        if changed {
            self.delegate.current_list_changed(self.differ.current());
        }
        changed
    }

    /// Whether a submitted list is still being loaded or diffed.
    pub fn has_pending_submission(&self) -> bool {
        self.differ.has_pending_submission()
    }

    /// Drops the item list at once and redraws every row.
    pub fn clear_items(&mut self) {
        self.differ.clear();
        self.surface.notify_data_set_changed();
        self.delegate.current_list_changed(self.differ.current());
    }

    // Headers and footers

    /// Inflates a header view from `container` and registers it.
    pub fn add_header_view<C>(
        &mut self,
        view_type: ViewType,
        container: &C,
    ) -> Result<usize, ConfigurationError>
    where
        C: ViewContainer<D::View> + ?Sized,
    {
        let view = inflate_view(container, view_type);
        self.add_header_holder(Rc::new(ViewHolder::header(view, view_type)))
    }

    /// Appends a header row and returns its flat index.
    pub fn add_header_holder(
        &mut self,
        holder: HolderRef<D::View, D::Payload>,
    ) -> Result<usize, ConfigurationError> {
        expect_zone(&holder, Zone::Header)?;
        let view_type = holder.view_type();
        let index = self.registry.add_header(view_type, holder)?;
        self.surface.notify_item_range_inserted(index, 1);
        Ok(index)
    }

    /// Inflates a footer view from `container` and registers it.
    pub fn add_footer_view<C>(
        &mut self,
        view_type: ViewType,
        container: &C,
    ) -> Result<usize, ConfigurationError>
    where
        C: ViewContainer<D::View> + ?Sized,
    {
        let view = inflate_view(container, view_type);
        self.add_footer_holder(Rc::new(ViewHolder::footer(view, view_type)))
    }

    /// Appends a footer row and returns its flat index.
    pub fn add_footer_holder(
        &mut self,
        holder: HolderRef<D::View, D::Payload>,
    ) -> Result<usize, ConfigurationError> {
        expect_zone(&holder, Zone::Footer)?;
        let view_type = holder.view_type();
        let index = self.registry.add_footer(view_type, holder)?;
        let position = self.position_space().footer_to_flat(index);
        self.surface.notify_item_range_inserted(position, 1);
        Ok(position)
    }

    pub fn clear_headers(&mut self) {
        let count = self.registry.clear_headers();
        if count > 0 {
            self.surface.notify_item_range_removed(0, count);
        }
    }

    pub fn clear_footers(&mut self) {
        let start = self.position_space().first_footer_index();
        let count = self.registry.clear_footers();
        if count > 0 {
            self.surface.notify_item_range_removed(start, count);
        }
    }

    pub fn header_holders(&self) -> impl Iterator<Item = &HolderRef<D::View, D::Payload>> + '_ {
        self.registry.headers()
    }

    pub fn footer_holders(&self) -> impl Iterator<Item = &HolderRef<D::View, D::Payload>> + '_ {
        self.registry.footers()
    }

    pub fn header_count(&self) -> usize {
        self.registry.header_count()
    }

    pub fn footer_count(&self) -> usize {
        self.registry.footer_count()
    }

    pub fn first_footer_index(&self) -> usize {
        self.position_space().first_footer_index()
    }

    // Item access

    /// Item at zone-local `index`, or `None` outside the installed list.
    pub fn get_item_or_null(&self, index: usize) -> Option<&T> {
        self.differ.get(index)
    }

    pub fn get_item(&self, index: usize) -> Result<&T, IndexError> {
        self.differ.get(index).ok_or(IndexError {
            index,
            len: self.differ.len(),
        })
    }

    /// Rows shown by the surface: headers, items, extra rows and footers.
    pub fn item_count(&self) -> usize {
        self.position_space().item_count()
    }

    /// Items in the installed list.
    pub fn items_list_count(&self) -> usize {
        self.differ.len()
    }

    pub fn current_list(&self) -> &Arc<Snapshot<T>> {
        self.differ.current()
    }

    pub fn item_view_type(&self, position: usize) -> Result<ViewType, IndexError> {
        let space = self.position_space();
        let out_of_range = IndexError {
            index: position,
            len: space.item_count(),
        };
        let view_type = match space.locate(position).ok_or(out_of_range)? {
            ZoneIndex::Header(index) => self.registry.header_view_type(index),
            ZoneIndex::Item(index) => Some(self.delegate.item_view_type(index)),
            ZoneIndex::Footer(index) => self.registry.footer_view_type(index),
        };
        view_type.ok_or(out_of_range)
    }

    /// Index of `item` in the installed list.
    pub fn item_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.differ.current().iter().position(|candidate| candidate == item)
    }

    /// Flat index of `item`.
    pub fn raw_index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        let index = self.item_index_of(item)?;
        Some(self.position_space().item_to_flat(index))
    }

    // Holder lifecycle

    /// Returns the holder for a row of `view_type` about to be attached to
    /// `parent`.
    ///
    /// Header and footer view types map to their registered holders; any
    /// other view type gets a new item holder from the delegate. A view still
    /// attached somewhere is detached first.
    pub fn create_view_holder(
        &mut self,
        parent: ContainerId,
        view_type: ViewType,
    ) -> HolderRef<D::View, D::Payload> {
        let holder = if let Some(header) = self.registry.header_for_view_type(view_type) {
            Rc::clone(header)
        } else if let Some(footer) = self.registry.footer_for_view_type(view_type) {
            Rc::clone(footer)
        } else {
            let (view, payload) = self.delegate.create_item_view(parent, view_type);
            Rc::new(ViewHolder::item(view, view_type, payload))
        };
        holder.set_routes(self.routes_for(holder.zone()));

        if let Some(previous) = holder.view().parent() {
            if let Err(err) = holder.view().detach_from_parent() {
                log::debug!("ignoring failed detach of {view_type} from {previous:?}: {err}");
            }
        }
        holder
    }

    /// Binds `holder` to the row at flat `position`.
    pub fn bind_view_holder(
        &mut self,
        holder: &DelegateHolder<D, T>,
        position: usize,
    ) -> Result<(), IndexError> {
        let space = self.position_space();
        let zone = space.locate(position).ok_or(IndexError {
            index: position,
            len: space.item_count(),
        })?;
        match zone {
            ZoneIndex::Header(index) => self.delegate.bind_header(holder, index),
            ZoneIndex::Item(index) => {
                self.differ.load_around(index);
                self.delegate
                    .bind_item(holder, self.differ.get(index), index);
            }
            ZoneIndex::Footer(index) => self.delegate.bind_footer(holder, index),
        }
        holder.set_routes(self.routes_for(zone.zone()));
        holder.mark_bound(position);
        Ok(())
    }

    /// Hands a holder leaving the screen to the recycle hook of the zone its
    /// last bound row falls in now.
    pub fn view_recycled(&mut self, holder: &DelegateHolder<D, T>) {
        let Some(position) = holder.mark_recycled() else {
            log::trace!("recycled a {} holder that was never bound", holder.zone());
            return;
        };
        let space = self.position_space();
        if space.is_item(position) {
            self.delegate.item_recycled(holder, position);
        } else if space.is_header(position) {
            self.delegate.header_recycled(holder, position);
        } else {
            self.delegate.footer_recycled(holder, position);
        }
    }

    // Clicks

    /// Routes a click on `holder` to the listener of its zone.
    pub fn dispatch_click(&mut self, holder: &DelegateHolder<D, T>) {
        let Some(position) = resolve_position(&self.surface, holder) else {
            return;
        };
        let space = self.position_space();
        match holder.zone() {
            Zone::Header => {
                if let Some(listener) = self.listeners.header_click.as_mut() {
                    listener(position, holder);
                }
            }
            Zone::Footer => {
                let Some(index) = position.checked_sub(space.first_footer_index()) else {
                    return;
                };
                if let Some(listener) = self.listeners.footer_click.as_mut() {
                    listener(index, holder);
                }
            }
            Zone::Item => {
                let Some(listener) = self.listeners.item_click.as_mut() else {
                    return;
                };
                let Some(index) = position.checked_sub(space.header_count()) else {
                    return;
                };
                let Some(item) = self.differ.get(index) else {
                    log::trace!("click on row {position} with no item");
                    return;
                };
                listener(index, item);
                self.delegate.item_clicked(index, item, holder);
            }
        }
    }

    /// Routes a long click on an item holder. Returns whether the listener
    /// consumed it.
    pub fn dispatch_long_click(&mut self, holder: &DelegateHolder<D, T>) -> bool {
        if holder.zone() != Zone::Item {
            return false;
        }
        let Some(listener) = self.listeners.item_long_click.as_mut() else {
            return false;
        };
        let Some(position) = resolve_position(&self.surface, holder) else {
            return false;
        };
        let Some(index) = position.checked_sub(self.registry.header_count()) else {
            return false;
        };
        match self.differ.get(index) {
            Some(item) => listener(index, item),
            None => false,
        }
    }

    // Listeners. Registering one redraws every row so holders pick up the
    // new click routes.

    pub fn register_item_click_listener(&mut self, listener: Option<ItemClickListener<T>>) {
        self.listeners.item_click = listener;
        self.surface.notify_data_set_changed();
    }

    pub fn register_item_long_click_listener(
        &mut self,
        listener: Option<ItemLongClickListener<T>>,
    ) {
        self.listeners.item_long_click = listener;
        self.surface.notify_data_set_changed();
    }

    pub fn register_header_click_listener(
        &mut self,
        listener: Option<HfClickListener<D::View, D::Payload>>,
    ) {
        self.listeners.header_click = listener;
        self.surface.notify_data_set_changed();
    }

    pub fn register_footer_click_listener(
        &mut self,
        listener: Option<HfClickListener<D::View, D::Payload>>,
    ) {
        self.listeners.footer_click = listener;
        self.surface.notify_data_set_changed();
    }

    fn routes_for(&self, zone: Zone) -> ClickRoutes {
        match zone {
            Zone::Header => ClickRoutes {
                click: self.listeners.header_click.is_some(),
                long_click: false,
            },
            Zone::Footer => ClickRoutes {
                click: self.listeners.footer_click.is_some(),
                long_click: false,
            },
            Zone::Item => ClickRoutes {
                click: self.listeners.item_click.is_some(),
                long_click: self.listeners.item_long_click.is_some(),
            },
        }
    }

    // Accessors

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }
}

fn expect_zone<V, P>(holder: &ViewHolder<V, P>, expected: Zone) -> Result<(), ConfigurationError> {
    let found = holder.zone();
    if found != expected {
        return Err(ConfigurationError::ZoneMismatch {
            view_type: holder.view_type(),
            expected,
            found,
        });
    }
    Ok(())
}

impl<T, D, S> std::fmt::Debug for CompositeAdapter<T, D, S>
where
    T: Send + Sync + 'static,
    D: AdapterDelegate<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeAdapter")
            .field("headers", &self.registry.header_count())
            .field("items", &self.differ.len())
            .field("footers", &self.registry.footer_count())
            .finish_non_exhaustive()
    }
}
