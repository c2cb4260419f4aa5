//! Immutable, page-backed item lists.

use std::sync::Arc;

/// One version of the item list.
///
/// Items are stored in shared pages, so cloning a snapshot or appending a
/// page never copies existing items. A snapshot is never edited in place;
/// every change produces a new one.
pub struct Snapshot<T> {
    pages: Vec<Arc<[T]>>,
    /// Flat index of the first item of each page.
    offsets: Vec<usize>,
    len: usize,
}

impl<T> Snapshot<T> {
    pub fn empty() -> Self {
        Self {
            pages: Vec::new(),
            offsets: Vec::new(),
            len: 0,
        }
    }

    /// Splits `items` into pages of `page_size` (a zero size is treated as one).
    pub fn from_vec(items: Vec<T>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let mut snapshot = Self::empty();
        let mut iter = items.into_iter();
        loop {
            let page: Vec<T> = iter.by_ref().take(page_size).collect();
            if page.is_empty() {
                break;
            }
            snapshot.push_page(Arc::from(page));
        }
        snapshot
    }

    /// Returns a new snapshot with `page` after the existing items.
    pub fn appended(&self, page: Vec<T>) -> Self {
        let mut next = self.clone();
        if !page.is_empty() {
            next.push_page(Arc::from(page));
        }
        next
    }

    fn push_page(&mut self, page: Arc<[T]>) {
        self.offsets.push(self.len);
        self.len += page.len();
        self.pages.push(page);
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let page = self.offsets.partition_point(|&start| start <= index) - 1;
        self.pages[page].get(index - self.offsets[page])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.pages.iter().flat_map(|page| page.iter())
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            pages: self.pages.clone(),
            offsets: self.offsets.clone(),
            len: self.len,
        }
    }
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
