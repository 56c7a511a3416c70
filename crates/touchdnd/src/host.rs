//! Document host capability interface
//!
//! The only way the engine reaches the document tree. Kept narrow so the
//! state machine can be exercised with a scripted fake implementation.

use touchdnd_core::{DragEvent, ElementId, Rect, ScrollMetrics};

use crate::error::SetupError;

/// Deferred-start notifications bubbled from the touch target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragNotice {
    /// A hold-to-drag delay started counting down
    Pending,
    /// The deferred start was abandoned before the delay elapsed
    Cancel,
}

/// Capability interface over the host document.
///
/// Implementations must keep the drag image out of `element_at_point`
/// results; the engine hit-tests the hotspot every tick while the image
/// floats directly under it.
pub trait DocumentHost {
    /// Top-level viewport container, the fallback scrollable and drop target
    fn root(&self) -> ElementId;

    fn parent(&self, el: ElementId) -> Option<ElementId>;

    fn is_draggable(&self, el: ElementId) -> bool;

    /// Whether the node is a text node (element drag sources never are)
    fn is_text(&self, el: ElementId) -> bool;

    fn tag_name(&self, el: ElementId) -> String;

    /// Hit test in viewport coordinates
    fn element_at_point(&self, x: f64, y: f64) -> Option<ElementId>;

    /// Computed style property, e.g. "visibility", "display", "overflow-x"
    fn computed_style(&self, el: ElementId, property: &str) -> Option<String>;

    /// Viewport-relative bounding rectangle
    fn bounding_rect(&self, el: ElementId) -> Rect;

    fn scroll_metrics(&self, el: ElementId) -> ScrollMetrics;

    fn scroll_by(&mut self, el: ElementId, dx: f64, dy: f64);

    /// Run listeners for a synthetic event; report whether the default
    /// action was prevented
    fn dispatch(&mut self, event: &mut DragEvent) -> bool;

    fn dispatch_notice(&mut self, target: ElementId, notice: DragNotice);

    /// Clone the source into a floating drag image element
    fn create_drag_image(&mut self, source: ElementId) -> Result<ElementId, SetupError>;

    fn remove_element(&mut self, el: ElementId);

    /// Position an element by viewport-relative translation
    fn set_translate(&mut self, el: ElementId, x: f64, y: f64);

    fn add_class(&mut self, el: ElementId, class: &str);

    fn remove_class(&mut self, el: ElementId, class: &str);
}
