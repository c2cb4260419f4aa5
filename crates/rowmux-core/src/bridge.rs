//! Forwards item-zone list updates to the surface in flat coordinates.

use crate::diff::ListUpdateCallback;
use crate::registry::HeaderFooterRegistry;
use crate::surface::SurfaceUpdates;

/// Shifts item-zone positions past the headers before they reach the surface.
///
/// The header count is read on every call rather than once, so a bridge held
/// across header changes stays correct.
pub struct UpdateBridge<'a, H, S: ?Sized> {
    registry: &'a HeaderFooterRegistry<H>,
    surface: &'a mut S,
}

impl<'a, H, S: SurfaceUpdates + ?Sized> UpdateBridge<'a, H, S> {
    pub fn new(registry: &'a HeaderFooterRegistry<H>, surface: &'a mut S) -> Self {
        Self { registry, surface }
    }

    fn offset(&self) -> usize {
        self.registry.header_count()
    }
}

impl<H, S: SurfaceUpdates + ?Sized> ListUpdateCallback for UpdateBridge<'_, H, S> {
    fn on_inserted(&mut self, position: usize, count: usize) {
        let offset = self.offset();
        self.surface.notify_item_range_inserted(position + offset, count);
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        let offset = self.offset();
        self.surface.notify_item_range_removed(position + offset, count);
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        let offset = self.offset();
        self.surface.notify_item_moved(from + offset, to + offset);
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        let offset = self.offset();
        self.surface.notify_item_range_changed(position + offset, count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViewType;

    #[derive(Debug, PartialEq)]
    enum Note {
        Inserted(usize, usize),
        Removed(usize, usize),
        Moved(usize, usize),
        Changed(usize, usize),
        All,
    }

    #[derive(Default)]
    struct Notes(Vec<Note>);

    impl SurfaceUpdates for Notes {
        fn notify_item_range_inserted(&mut self, position: usize, count: usize) {
            self.0.push(Note::Inserted(position, count));
        }

        fn notify_item_range_removed(&mut self, position: usize, count: usize) {
            self.0.push(Note::Removed(position, count));
        }

        fn notify_item_moved(&mut self, from: usize, to: usize) {
            self.0.push(Note::Moved(from, to));
        }

        fn notify_item_range_changed(&mut self, position: usize, count: usize) {
            self.0.push(Note::Changed(position, count));
        }

        fn notify_data_set_changed(&mut self) {
            self.0.push(Note::All);
        }
    }

    #[test]
    fn offsets_every_update_by_the_header_count() {
        let mut registry = HeaderFooterRegistry::new();
        registry.add_header(ViewType(100), ()).unwrap();
        registry.add_header(ViewType(101), ()).unwrap();
        let mut notes = Notes::default();

        let mut bridge = UpdateBridge::new(&registry, &mut notes);
        bridge.on_inserted(0, 3);
        bridge.on_removed(1, 1);
        bridge.on_moved(4, 0);
        bridge.on_changed(2, 2);

        assert_eq!(
            notes.0,
            vec![
                Note::Inserted(2, 3),
                Note::Removed(3, 1),
                Note::Moved(6, 2),
                Note::Changed(4, 2),
            ]
        );
    }

    #[test]
    fn no_headers_means_no_offset() {
        let registry = HeaderFooterRegistry::<()>::new();
        let mut notes = Notes::default();
        UpdateBridge::new(&registry, &mut notes).on_inserted(0, 1);
        assert_eq!(notes.0, vec![Note::Inserted(0, 1)]);
    }
}
