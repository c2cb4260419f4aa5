/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default distance from the end of the loaded items at which the next page
/// is requested.
pub const DEFAULT_PREFETCH_DISTANCE: usize = 10;

/// Tuning for how item lists are paged.
///
/// Placeholder rows are never produced: the item zone only ever contains
/// loaded items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagingConfig {
    /// Items per page, both for chunking finite lists and for page requests.
    pub page_size: usize,

    /// Binding an item closer than this to the end of the loaded items
    /// requests the next page.
    pub prefetch_distance: usize,

    /// Items requested by the first load of a data source.
    pub initial_load_size: usize,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PagingConfig {
    /// Creates a config with the given page size; the initial load covers
    /// three pages.
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
            initial_load_size: page_size * 3,
        }
    }

    pub fn with_prefetch_distance(mut self, prefetch_distance: usize) -> Self {
        self.prefetch_distance = prefetch_distance;
        self
    }

    pub fn with_initial_load_size(mut self, initial_load_size: usize) -> Self {
        self.initial_load_size = initial_load_size.max(1);
        self
    }

    /// Whether binding `index` of `loaded` items should request more.
    pub fn should_prefetch(&self, index: usize, loaded: usize) -> bool {
        index.saturating_add(self.prefetch_distance) >= loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PagingConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.prefetch_distance, 10);
        assert_eq!(config.initial_load_size, 30);
    }

    #[test]
    fn prefetch_window() {
        let config = PagingConfig::new(10).with_prefetch_distance(5);
        assert!(!config.should_prefetch(0, 30));
        assert!(!config.should_prefetch(24, 30));
        assert!(config.should_prefetch(25, 30));
        assert!(config.should_prefetch(29, 30));
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let config = PagingConfig::new(0);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.initial_load_size, 3);
    }
}
