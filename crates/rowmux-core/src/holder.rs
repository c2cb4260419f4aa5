//! View holders and the views they wrap.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::error::DetachError;
use crate::position::Zone;
use crate::surface::RenderSurface;
use crate::ViewType;

/// Identifies a container views are attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContainerId(pub u64);

/// A view the rendering surface can show.
///
/// Views are handles: detaching goes through a shared reference.
pub trait SurfaceView {
    /// The container the view is attached to, if any.
    fn parent(&self) -> Option<ContainerId>;

    fn detach_from_parent(&self) -> Result<(), DetachError>;
}

/// Produces views for a container without attaching them.
pub trait ViewContainer<V> {
    fn id(&self) -> ContainerId;

    fn inflate(&self, view_type: ViewType) -> V;
}

/// Inflates the layout for `view_type` against `container`. The view is not
/// attached; the surface attaches it when the row is shown.
pub fn inflate_view<V, C>(container: &C, view_type: ViewType) -> V
where
    C: ViewContainer<V> + ?Sized,
{
    container.inflate(view_type)
}

/// Where a holder is in its bind cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HolderState {
    #[default]
    Unbound,
    Bound(usize),
    /// Returned to the surface's pool after being bound at `last`.
    Recycled { last: usize },
}

impl HolderState {
    /// Flat index of the most recent bind.
    pub fn last_bound(self) -> Option<usize> {
        match self {
            HolderState::Unbound => None,
            HolderState::Bound(position) => Some(position),
            HolderState::Recycled { last } => Some(last),
        }
    }
}

/// Which gestures the holder currently forwards to the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickRoutes {
    pub click: bool,
    pub long_click: bool,
}

/// Zone of a holder, with the item payload for item holders.
#[derive(Debug)]
pub enum HolderKind<P> {
    Header,
    Footer,
    Item(RefCell<P>),
}

/// Owns one view of the rendering surface.
///
/// Header and footer holders are created by the host and registered with the
/// adapter; item holders come from the delegate and carry its payload.
#[derive(Debug)]
pub struct ViewHolder<V, P = ()> {
    view: V,
    view_type: ViewType,
    kind: HolderKind<P>,
    state: Cell<HolderState>,
    routes: Cell<ClickRoutes>,
}

/// Shared handle to a holder. Holders live on the surface thread.
pub type HolderRef<V, P = ()> = Rc<ViewHolder<V, P>>;

impl<V, P> ViewHolder<V, P> {
    fn with_kind(view: V, view_type: ViewType, kind: HolderKind<P>) -> Self {
        Self {
            view,
            view_type,
            kind,
            state: Cell::new(HolderState::Unbound),
            routes: Cell::new(ClickRoutes::default()),
        }
    }

    pub fn header(view: V, view_type: ViewType) -> Self {
        Self::with_kind(view, view_type, HolderKind::Header)
    }

    pub fn footer(view: V, view_type: ViewType) -> Self {
        Self::with_kind(view, view_type, HolderKind::Footer)
    }

    pub fn item(view: V, view_type: ViewType, payload: P) -> Self {
        Self::with_kind(view, view_type, HolderKind::Item(RefCell::new(payload)))
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn zone(&self) -> Zone {
        match self.kind {
            HolderKind::Header => Zone::Header,
            HolderKind::Footer => Zone::Footer,
            HolderKind::Item(_) => Zone::Item,
        }
    }

    pub fn kind(&self) -> &HolderKind<P> {
        &self.kind
    }

    /// Item payload; `None` for header and footer holders.
    pub fn payload(&self) -> Option<Ref<'_, P>> {
        match &self.kind {
            HolderKind::Item(payload) => Some(payload.borrow()),
            _ => None,
        }
    }

    pub fn payload_mut(&self) -> Option<RefMut<'_, P>> {
        match &self.kind {
            HolderKind::Item(payload) => Some(payload.borrow_mut()),
            _ => None,
        }
    }

    pub fn state(&self) -> HolderState {
        self.state.get()
    }

    /// Flat index recorded at the most recent bind, kept after recycling.
    pub fn bound_position(&self) -> Option<usize> {
        self.state.get().last_bound()
    }

    pub fn routes(&self) -> ClickRoutes {
        self.routes.get()
    }

    pub fn is_clickable(&self) -> bool {
        self.routes.get().click
    }

    pub fn is_long_clickable(&self) -> bool {
        self.routes.get().long_click
    }

    pub(crate) fn set_routes(&self, routes: ClickRoutes) {
        self.routes.set(routes);
    }

    pub(crate) fn mark_bound(&self, position: usize) {
        self.state.set(HolderState::Bound(position));
    }

    /// Moves a bound holder to `Recycled`, returning the flat index it was
    /// bound to. Holders never bound stay as they are.
    pub(crate) fn mark_recycled(&self) -> Option<usize> {
        let last = self.bound_position()?;
        self.state.set(HolderState::Recycled { last });
        Some(last)
    }
}

/// Current flat index of `holder`: the surface's adapter position, else its
/// layout position, else the index recorded at the last bind.
pub fn resolve_position<V, P, S>(surface: &S, holder: &ViewHolder<V, P>) -> Option<usize>
where
    S: RenderSurface<V> + ?Sized,
{
    surface
        .adapter_position(holder.view())
        .or_else(|| surface.layout_position(holder.view()))
        .or_else(|| holder.bound_position())
}

#[cfg(test)]
#[path = "tests/holder_tests.rs"]
mod tests;
