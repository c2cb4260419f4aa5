//! The rendering surface as seen by the adapter.
//!
//! A surface owns the on-screen rows. The adapter tells it which flat rows
//! changed and asks it, when a click arrives, where a holder currently sits.

/// Flat-index change notifications.
///
/// Positions are flat indices. Updates of one batch are delivered in order and
/// each is expressed against the rows left by the ones before it.
pub trait SurfaceUpdates {
    fn notify_item_range_inserted(&mut self, position: usize, count: usize);

    fn notify_item_range_removed(&mut self, position: usize, count: usize);

    fn notify_item_moved(&mut self, from: usize, to: usize);

    fn notify_item_range_changed(&mut self, position: usize, count: usize);

    /// Every row may have changed; rebind all of them.
    fn notify_data_set_changed(&mut self);
}

/// A surface that can report where a view is currently shown.
///
/// Both lookups may be unavailable, for instance while the view is being
/// detached. The adapter then falls back to the flat index the view was last
/// bound to.
pub trait RenderSurface<V>: SurfaceUpdates {
    /// Flat index of `view` in the adapter's latest row set.
    fn adapter_position(&self, view: &V) -> Option<usize> {
        let _ = view;
        None
    }

    /// Flat index of `view` as last laid out.
    fn layout_position(&self, view: &V) -> Option<usize> {
        let _ = view;
        None
    }
}
