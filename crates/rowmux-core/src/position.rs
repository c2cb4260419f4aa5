//! Flat row space shared by headers, items and footers.
//!
//! The rendering surface addresses every row by a single flat index. Rows are
//! laid out as `[headers][items + extra rows][footers]`; this module is the
//! only place that knows how to split a flat index back into its zone.

/// One of the three independently managed row collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Zone {
    Header,
    Item,
    Footer,
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Zone::Header => "header",
            Zone::Item => "item",
            Zone::Footer => "footer",
        })
    }
}

/// A flat index resolved to its zone and the index local to that zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneIndex {
    Header(usize),
    Item(usize),
    Footer(usize),
}

impl ZoneIndex {
    pub fn zone(self) -> Zone {
        match self {
            ZoneIndex::Header(_) => Zone::Header,
            ZoneIndex::Item(_) => Zone::Item,
            ZoneIndex::Footer(_) => Zone::Footer,
        }
    }

    pub fn local(self) -> usize {
        match self {
            ZoneIndex::Header(i) | ZoneIndex::Item(i) | ZoneIndex::Footer(i) => i,
        }
    }
}

/// Zone boundaries at one instant.
///
/// This is a value, rebuilt from the live counts whenever it is needed; it is
/// never stored across a mutation of headers, footers or the item list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionSpace {
    headers: usize,
    items: usize,
    extra: usize,
    footers: usize,
}

impl PositionSpace {
    pub fn new(headers: usize, items: usize, extra: usize, footers: usize) -> Self {
        Self {
            headers,
            items,
            extra,
            footers,
        }
    }

    pub fn header_count(&self) -> usize {
        self.headers
    }

    /// Rows backed by the item list, excluding extra rows.
    pub fn items_count(&self) -> usize {
        self.items
    }

    pub fn footer_count(&self) -> usize {
        self.footers
    }

    /// Rows in the item zone: list items plus extra rows.
    pub fn item_zone_count(&self) -> usize {
        self.items + self.extra
    }

    /// Total rows seen by the rendering surface.
    pub fn item_count(&self) -> usize {
        self.headers + self.item_zone_count() + self.footers
    }

    /// Flat index of the last row before the footers, `None` when no row
    /// precedes them.
    pub fn footer_start(&self) -> Option<usize> {
        self.first_footer_index().checked_sub(1)
    }

    /// Flat index of the first footer (equal to `footer_start + 1`).
    pub fn first_footer_index(&self) -> usize {
        self.headers + self.item_zone_count()
    }

    pub fn is_header(&self, position: usize) -> bool {
        position < self.headers
    }

    pub fn is_item(&self, position: usize) -> bool {
        self.headers <= position && position < self.first_footer_index()
    }

    pub fn is_footer(&self, position: usize) -> bool {
        position >= self.first_footer_index()
    }

    pub fn item_to_flat(&self, item_index: usize) -> usize {
        item_index + self.headers
    }

    pub fn flat_to_item(&self, position: usize) -> Option<usize> {
        self.is_item(position).then(|| position - self.headers)
    }

    pub fn footer_to_flat(&self, footer_index: usize) -> usize {
        self.first_footer_index() + footer_index
    }

    /// Resolves `position` to its zone, or `None` past the last row.
    pub fn locate(&self, position: usize) -> Option<ZoneIndex> {
        if position >= self.item_count() {
            None
        } else if self.is_header(position) {
            Some(ZoneIndex::Header(position))
        } else if self.is_item(position) {
            Some(ZoneIndex::Item(position - self.headers))
        } else {
            Some(ZoneIndex::Footer(position - self.first_footer_index()))
        }
    }
}
