//! Target resolution
//!
//! Finds the nearest draggable ancestor of the element a touch started on.

use touchdnd_core::ElementId;

use crate::host::DocumentHost;

/// Walk the ancestor chain (start element included) for the nearest element
/// flagged draggable
pub fn find_draggable_target<H: DocumentHost + ?Sized>(
    host: &H,
    start: ElementId,
) -> Option<ElementId> {
    let mut current = Some(start);
    while let Some(el) = current {
        if host.is_draggable(el) {
            return Some(el);
        }
        current = host.parent(el);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use touchdnd_core::Rect;

    #[test]
    fn test_finds_nearest_draggable_ancestor() {
        let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
        let outer = host.add_element(host.root(), "div", Rect::from_xywh(0.0, 0.0, 200.0, 200.0));
        let inner = host.add_element(outer, "span", Rect::from_xywh(10.0, 10.0, 50.0, 20.0));
        host.set_draggable(outer, true);

        assert_eq!(find_draggable_target(&host, inner), Some(outer));
        assert_eq!(find_draggable_target(&host, outer), Some(outer));
    }

    #[test]
    fn test_no_draggable_in_chain() {
        let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
        let el = host.add_element(host.root(), "div", Rect::from_xywh(0.0, 0.0, 100.0, 100.0));

        assert_eq!(find_draggable_target(&host, el), None);
    }
}
