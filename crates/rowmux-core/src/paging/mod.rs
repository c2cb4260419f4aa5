//! Pull-based item sources and paging configuration.

mod config;
mod data_source;

pub use config::{PagingConfig, DEFAULT_PAGE_SIZE, DEFAULT_PREFETCH_DISTANCE};
pub use data_source::{
    data_source_fn, DataSource, FnDataSource, ListDataSource, PageIter, PageRequest,
};
pub(crate) use data_source::fetch_page;

use std::sync::Arc;

/// An incrementally loaded list: a data source plus the paging rules it is
/// read with.
pub struct PagedList<T> {
    source: Arc<dyn DataSource<T>>,
    config: PagingConfig,
}

impl<T> PagedList<T> {
    pub fn new(source: impl DataSource<T> + 'static, config: PagingConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    pub fn from_shared(source: Arc<dyn DataSource<T>>, config: PagingConfig) -> Self {
        Self { source, config }
    }

    /// Pages through a finite list.
    pub fn from_list(items: Vec<T>, config: PagingConfig) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self::new(ListDataSource::new(items), config)
    }

    pub fn source(&self) -> &Arc<dyn DataSource<T>> {
        &self.source
    }

    pub fn config(&self) -> PagingConfig {
        self.config
    }
}

impl<T> Clone for PagedList<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: self.config,
        }
    }
}

impl<T> std::fmt::Debug for PagedList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedList")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
