use smallvec::SmallVec;

/// One positional change to a list, expressed in the coordinates of the list
/// as it stands after every earlier update of the same batch was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListUpdate {
    Inserted { position: usize, count: usize },
    Removed { position: usize, count: usize },
    /// The row at `from` is taken out and re-inserted so that it ends at `to`.
    Moved { from: usize, to: usize },
    Changed { position: usize, count: usize },
}

impl ListUpdate {
    pub fn dispatch_to<C: ListUpdateCallback + ?Sized>(self, callback: &mut C) {
        match self {
            ListUpdate::Inserted { position, count } => callback.on_inserted(position, count),
            ListUpdate::Removed { position, count } => callback.on_removed(position, count),
            ListUpdate::Moved { from, to } => callback.on_moved(from, to),
            ListUpdate::Changed { position, count } => callback.on_changed(position, count),
        }
    }
}

/// Receiver of list updates.
pub trait ListUpdateCallback {
    fn on_inserted(&mut self, position: usize, count: usize);

    fn on_removed(&mut self, position: usize, count: usize);

    fn on_moved(&mut self, from: usize, to: usize);

    fn on_changed(&mut self, position: usize, count: usize);
}

impl ListUpdateCallback for Vec<ListUpdate> {
    fn on_inserted(&mut self, position: usize, count: usize) {
        self.push(ListUpdate::Inserted { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.push(ListUpdate::Removed { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.push(ListUpdate::Moved { from, to });
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        self.push(ListUpdate::Changed { position, count });
    }
}

/// Ordered updates turning one list into another.
///
/// Applying [`updates`](Self::updates) one after another to the old list
/// yields the new one; they must not be reordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffResult {
    updates: SmallVec<[ListUpdate; 8]>,
    old_len: usize,
    new_len: usize,
}

impl DiffResult {
    pub(crate) fn new(updates: SmallVec<[ListUpdate; 8]>, old_len: usize, new_len: usize) -> Self {
        Self {
            updates,
            old_len,
            new_len,
        }
    }

    pub fn updates(&self) -> &[ListUpdate] {
        &self.updates
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn old_len(&self) -> usize {
        self.old_len
    }

    pub fn new_len(&self) -> usize {
        self.new_len
    }

    pub fn dispatch_updates_to<C: ListUpdateCallback + ?Sized>(&self, callback: &mut C) {
        for update in &self.updates {
            update.dispatch_to(&mut *callback);
        }
    }
}

/// Folds consecutive single-row updates of one kind into ranges.
#[derive(Default)]
pub(crate) struct RangeCoalescer {
    pending: Option<ListUpdate>,
}

impl RangeCoalescer {
    /// Adds a one-row `Inserted`/`Changed` at `position`, or a one-row
    /// `Removed` when walking the old list back to front.
    pub(crate) fn push(&mut self, update: ListUpdate, out: &mut SmallVec<[ListUpdate; 8]>) {
        let merged = match (self.pending, update) {
            (
                Some(ListUpdate::Inserted { position, count }),
                ListUpdate::Inserted { position: next, .. },
            ) if next == position + count => Some(ListUpdate::Inserted {
                position,
                count: count + 1,
            }),
            (
                Some(ListUpdate::Changed { position, count }),
                ListUpdate::Changed { position: next, .. },
            ) if next == position + count => Some(ListUpdate::Changed {
                position,
                count: count + 1,
            }),
            (
                Some(ListUpdate::Removed { position, count }),
                ListUpdate::Removed { position: next, .. },
            ) if next + 1 == position => Some(ListUpdate::Removed {
                position: next,
                count: count + 1,
            }),
            _ => None,
        };
        match merged {
            Some(merged) => self.pending = Some(merged),
            None => {
                self.flush(out);
                self.pending = Some(update);
            }
        }
    }

    pub(crate) fn flush(&mut self, out: &mut SmallVec<[ListUpdate; 8]>) {
        if let Some(update) = self.pending.take() {
            out.push(update);
        }
    }
}
