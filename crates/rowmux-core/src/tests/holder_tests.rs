use super::*;
use crate::surface::SurfaceUpdates;

#[derive(Default)]
struct FixedSurface {
    adapter: Option<usize>,
    layout: Option<usize>,
}

impl SurfaceUpdates for FixedSurface {
    fn notify_item_range_inserted(&mut self, _position: usize, _count: usize) {}

    fn notify_item_range_removed(&mut self, _position: usize, _count: usize) {}

    fn notify_item_moved(&mut self, _from: usize, _to: usize) {}

    fn notify_item_range_changed(&mut self, _position: usize, _count: usize) {}

    fn notify_data_set_changed(&mut self) {}
}

impl RenderSurface<&'static str> for FixedSurface {
    fn adapter_position(&self, _view: &&'static str) -> Option<usize> {
        self.adapter
    }

    fn layout_position(&self, _view: &&'static str) -> Option<usize> {
        self.layout
    }
}

#[test]
fn holder_moves_through_bind_cycle() {
    let holder: ViewHolder<&str, u8> = ViewHolder::item("row", ViewType(1), 0);
    assert_eq!(holder.state(), HolderState::Unbound);
    assert_eq!(holder.mark_recycled(), None);
    assert_eq!(holder.state(), HolderState::Unbound);

    holder.mark_bound(4);
    assert_eq!(holder.state(), HolderState::Bound(4));
    assert_eq!(holder.mark_recycled(), Some(4));
    assert_eq!(holder.state(), HolderState::Recycled { last: 4 });
    assert_eq!(holder.bound_position(), Some(4));

    holder.mark_bound(7);
    assert_eq!(holder.bound_position(), Some(7));
}

#[test]
fn only_item_holders_carry_a_payload() {
    let item: ViewHolder<&str, Vec<u8>> = ViewHolder::item("row", ViewType(1), vec![1]);
    item.payload_mut().unwrap().push(2);
    assert_eq!(*item.payload().unwrap(), vec![1, 2]);
    assert_eq!(item.zone(), Zone::Item);

    let header: ViewHolder<&str, Vec<u8>> = ViewHolder::header("title", ViewType(100));
    assert!(header.payload().is_none());
    assert_eq!(header.zone(), Zone::Header);
    assert_eq!(ViewHolder::<&str>::footer("end", ViewType(200)).zone(), Zone::Footer);
}

#[test]
fn position_falls_back_from_adapter_to_layout_to_bound_tag() {
    let holder: ViewHolder<&'static str> = ViewHolder::item("row", ViewType(1), ());
    holder.mark_bound(3);

    let surface = FixedSurface {
        adapter: Some(1),
        layout: Some(2),
    };
    assert_eq!(resolve_position(&surface, &holder), Some(1));

    let surface = FixedSurface {
        adapter: None,
        layout: Some(2),
    };
    assert_eq!(resolve_position(&surface, &holder), Some(2));

    let surface = FixedSurface::default();
    assert_eq!(resolve_position(&surface, &holder), Some(3));

    let unbound: ViewHolder<&'static str> = ViewHolder::item("row", ViewType(1), ());
    assert_eq!(resolve_position(&surface, &unbound), None);
}
