//! Ordered header and footer collections.

use crate::error::ConfigurationError;
use crate::position::Zone;
use crate::ViewType;

/// A registered header or footer row.
#[derive(Clone, Debug)]
pub struct Entry<H> {
    pub view_type: ViewType,
    pub holder: H,
}

/// Headers and footers, each in insertion order.
///
/// A view type may repeat inside one collection (each registration is its own
/// row) but never across the two.
#[derive(Debug)]
pub struct HeaderFooterRegistry<H> {
    headers: Vec<Entry<H>>,
    footers: Vec<Entry<H>>,
}

impl<H> Default for HeaderFooterRegistry<H> {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            footers: Vec::new(),
        }
    }
}

impl<H> HeaderFooterRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header and returns its header index.
    pub fn add_header(
        &mut self,
        view_type: ViewType,
        holder: H,
    ) -> Result<usize, ConfigurationError> {
        ensure_view_type_unused(self.footer_view_types(), view_type, Zone::Footer)?;
        self.headers.push(Entry { view_type, holder });
        Ok(self.headers.len() - 1)
    }

    /// Appends a footer and returns its footer index.
    pub fn add_footer(
        &mut self,
        view_type: ViewType,
        holder: H,
    ) -> Result<usize, ConfigurationError> {
        ensure_view_type_unused(self.header_view_types(), view_type, Zone::Header)?;
        self.footers.push(Entry { view_type, holder });
        Ok(self.footers.len() - 1)
    }

    /// Removes every header, returning how many there were.
    pub fn clear_headers(&mut self) -> usize {
        let count = self.headers.len();
        self.headers.clear();
        count
    }

    /// Removes every footer, returning how many there were.
    pub fn clear_footers(&mut self) -> usize {
        let count = self.footers.len();
        self.footers.clear();
        count
    }

    pub fn header_count(&self) -> usize {
        self.headers.len()
    }

    pub fn footer_count(&self) -> usize {
        self.footers.len()
    }

    pub fn header_view_type(&self, index: usize) -> Option<ViewType> {
        self.headers.get(index).map(|entry| entry.view_type)
    }

    pub fn footer_view_type(&self, index: usize) -> Option<ViewType> {
        self.footers.get(index).map(|entry| entry.view_type)
    }

    /// First header registered with `view_type`.
    pub fn header_for_view_type(&self, view_type: ViewType) -> Option<&H> {
        self.headers
            .iter()
            .find(|entry| entry.view_type == view_type)
            .map(|entry| &entry.holder)
    }

    /// First footer registered with `view_type`.
    pub fn footer_for_view_type(&self, view_type: ViewType) -> Option<&H> {
        self.footers
            .iter()
            .find(|entry| entry.view_type == view_type)
            .map(|entry| &entry.holder)
    }

    pub fn headers(&self) -> impl Iterator<Item = &H> + '_ {
        self.headers.iter().map(|entry| &entry.holder)
    }

    pub fn footers(&self) -> impl Iterator<Item = &H> + '_ {
        self.footers.iter().map(|entry| &entry.holder)
    }

    fn header_view_types(&self) -> impl Iterator<Item = ViewType> + '_ {
        self.headers.iter().map(|entry| entry.view_type)
    }

    fn footer_view_types(&self) -> impl Iterator<Item = ViewType> + '_ {
        self.footers.iter().map(|entry| entry.view_type)
    }
}

/// Fails when `view_type` is already among `registered`, which belong to `zone`.
///
/// Rows of the two collections sharing a view type would be handed to the
/// surface's recycler as interchangeable, which they are not.
pub fn ensure_view_type_unused(
    registered: impl IntoIterator<Item = ViewType>,
    view_type: ViewType,
    zone: Zone,
) -> Result<(), ConfigurationError> {
    if registered.into_iter().any(|existing| existing == view_type) {
        return Err(ConfigurationError::ViewTypeCollision {
            view_type,
            registered_to: zone,
        });
    }
    Ok(())
}
