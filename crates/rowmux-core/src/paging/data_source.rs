use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::LoadError;

/// A contiguous range of items to load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub start: usize,
    pub load_size: usize,
}

/// Lazily yielded page contents.
pub type PageIter<'a, T> = Box<dyn Iterator<Item = T> + Send + 'a>;

/// Pull-based supplier of items.
///
/// `load` is called on a fetch worker. It may yield fewer than
/// `request.load_size` items, which marks the end of the source; anything
/// beyond `load_size` is ignored. Each call is independent, so a failed
/// request can simply be issued again.
pub trait DataSource<T>: Send + Sync {
    fn load(&self, request: PageRequest) -> Result<PageIter<'_, T>, LoadError>;
}

/// Serves a finite list page by page.
#[derive(Debug)]
pub struct ListDataSource<T> {
    items: Arc<[T]>,
}

impl<T> ListDataSource<T> {
    pub fn new(items: impl Into<Arc<[T]>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> DataSource<T> for ListDataSource<T>
where
    T: Clone + Send + Sync,
{
    fn load(&self, request: PageRequest) -> Result<PageIter<'_, T>, LoadError> {
        let rest = self.items.get(request.start..).unwrap_or(&[]);
        Ok(Box::new(rest.iter().take(request.load_size).cloned()))
    }
}

/// Data source backed by a closure, see [`data_source_fn`].
pub struct FnDataSource<F> {
    load: F,
}

impl<T, F> DataSource<T> for FnDataSource<F>
where
    T: Send + 'static,
    F: Fn(PageRequest) -> Result<Vec<T>, LoadError> + Send + Sync,
{
    fn load(&self, request: PageRequest) -> Result<PageIter<'_, T>, LoadError> {
        let page = (self.load)(request)?;
        Ok(Box::new(page.into_iter()))
    }
}

/// Wraps a closure returning whole pages as a [`DataSource`].
pub fn data_source_fn<T, F>(load: F) -> FnDataSource<F>
where
    F: Fn(PageRequest) -> Result<Vec<T>, LoadError> + Send + Sync,
{
    FnDataSource { load }
}

/// Items produced for one request.
#[derive(Debug)]
pub(crate) struct FetchedPage<T> {
    pub(crate) items: Vec<T>,
    pub(crate) end_reached: bool,
}

/// Runs `request` against `source`, bounding the page to the requested size.
///
/// A panicking source is reported as a load failure.
pub(crate) fn fetch_page<T, S>(source: &S, request: PageRequest) -> Result<FetchedPage<T>, LoadError>
where
    S: DataSource<T> + ?Sized,
{
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        source
            .load(request)
            .map(|page| page.take(request.load_size).collect::<Vec<T>>())
    }));
    match outcome {
        Ok(Ok(items)) => {
            let end_reached = items.len() < request.load_size;
            Ok(FetchedPage { items, end_reached })
        }
        Ok(Err(err)) => Err(err),
        Err(_) => Err(LoadError::new(format!(
            "data source panicked loading {} items at {}",
            request.load_size, request.start
        ))),
    }
}
