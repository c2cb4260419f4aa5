//! Click listeners and constructors for the common shapes.
//!
//! Listeners run on the surface thread and receive zone-local indices.

use crate::holder::ViewHolder;

/// Called with the item's zone-local index and the item.
pub type ItemClickListener<T> = Box<dyn FnMut(usize, &T)>;

/// Like [`ItemClickListener`]; returns whether the long click was consumed.
pub type ItemLongClickListener<T> = Box<dyn FnMut(usize, &T) -> bool>;

/// Called with the header or footer's zone-local index and its holder.
pub type HfClickListener<V, P> = Box<dyn FnMut(usize, &ViewHolder<V, P>)>;

pub fn on_item_click<T: 'static>(mut listener: impl FnMut(&T) + 'static) -> ItemClickListener<T> {
    Box::new(move |_: usize, item: &T| listener(item))
}

pub fn on_item_click_with_position<T: 'static>(
    listener: impl FnMut(usize, &T) + 'static,
) -> ItemClickListener<T> {
    Box::new(listener)
}

pub fn on_item_long_click<T: 'static>(
    mut listener: impl FnMut(&T) -> bool + 'static,
) -> ItemLongClickListener<T> {
    Box::new(move |_: usize, item: &T| listener(item))
}

pub fn on_hf_click<V: 'static, P: 'static>(
    mut listener: impl FnMut(&ViewHolder<V, P>) + 'static,
) -> HfClickListener<V, P> {
    Box::new(move |_: usize, holder: &ViewHolder<V, P>| listener(holder))
}

pub fn on_hf_click_with_position<V: 'static, P: 'static>(
    listener: impl FnMut(usize, &ViewHolder<V, P>) + 'static,
) -> HfClickListener<V, P> {
    Box::new(listener)
}

pub(crate) struct Listeners<T, V, P> {
    pub(crate) item_click: Option<ItemClickListener<T>>,
    pub(crate) item_long_click: Option<ItemLongClickListener<T>>,
    pub(crate) header_click: Option<HfClickListener<V, P>>,
    pub(crate) footer_click: Option<HfClickListener<V, P>>,
}

impl<T, V, P> Default for Listeners<T, V, P> {
    fn default() -> Self {
        Self {
            item_click: None,
            item_long_click: None,
            header_click: None,
            footer_click: None,
        }
    }
}
