/// Equality predicates used to match rows between two lists.
///
/// `are_items_the_same` decides whether two values are the same logical
/// entity (and so may be moved rather than removed and re-inserted);
/// `are_contents_the_same` is only asked for matched pairs and decides
/// whether the row needs a change notification.
///
/// Both are called from a compute worker.
pub trait ItemCallback<T>: Send + Sync {
    fn are_items_the_same(&self, old: &T, new: &T) -> bool;

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool;
}

/// Uses `PartialEq` for both identity and content, so a row is either
/// unchanged or replaced.
#[derive(Clone, Copy, Debug, Default)]
pub struct EqualityCallback;

impl<T: PartialEq> ItemCallback<T> for EqualityCallback {
    fn are_items_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        old == new
    }
}

/// Callback built from two closures, see [`item_callback`].
#[derive(Clone, Copy)]
pub struct FnItemCallback<S, C> {
    same_item: S,
    same_contents: C,
}

impl<T, S, C> ItemCallback<T> for FnItemCallback<S, C>
where
    S: Fn(&T, &T) -> bool + Send + Sync,
    C: Fn(&T, &T) -> bool + Send + Sync,
{
    fn are_items_the_same(&self, old: &T, new: &T) -> bool {
        (self.same_item)(old, new)
    }

    fn are_contents_the_same(&self, old: &T, new: &T) -> bool {
        (self.same_contents)(old, new)
    }
}

/// Builds an [`ItemCallback`] from an identity predicate and a content predicate.
///
/// ```
/// use rowmux_core::item_callback;
///
/// #[derive(PartialEq)]
/// struct Row { id: u32, title: String }
///
/// let callback = item_callback(|a: &Row, b: &Row| a.id == b.id, |a: &Row, b: &Row| a == b);
/// # let _ = callback;
/// ```
pub fn item_callback<S, C>(same_item: S, same_contents: C) -> FnItemCallback<S, C> {
    FnItemCallback {
        same_item,
        same_contents,
    }
}
