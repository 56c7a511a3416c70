//! Synthetic drag events
//!
//! The drag-style event shape synthesized from touch samples.

use crate::geometry::Rect;
use crate::touch::TouchPoint;
use crate::transfer::DataTransfer;
use crate::ElementId;

/// Drag event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragEventKind {
    DragStart,
    Drag,
    DragEnter,
    DragOver,
    DragExit,
    DragLeave,
    Drop,
    DragEnd,
}

impl DragEventKind {
    /// Whether a listener may cancel the default action of this event
    pub fn is_cancelable(&self) -> bool {
        !matches!(
            self,
            DragEventKind::DragExit | DragEventKind::DragLeave | DragEventKind::DragEnd
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DragEventKind::DragStart => "dragstart",
            DragEventKind::Drag => "drag",
            DragEventKind::DragEnter => "dragenter",
            DragEventKind::DragOver => "dragover",
            DragEventKind::DragExit => "dragexit",
            DragEventKind::DragLeave => "dragleave",
            DragEventKind::Drop => "drop",
            DragEventKind::DragEnd => "dragend",
        }
    }
}

/// Synthetic drag event
#[derive(Debug, Clone)]
pub struct DragEvent {
    pub kind: DragEventKind,
    pub target: ElementId,
    pub related_target: Option<ElementId>,
    pub data_transfer: DataTransfer,

    // Geometry, copied from the first changed touch
    pub screen_x: f64,
    pub screen_y: f64,
    pub client_x: f64,
    pub client_y: f64,
    pub page_x: f64,
    pub page_y: f64,
    /// Relative to the target's bounding rect
    pub offset_x: f64,
    pub offset_y: f64,

    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
}

impl DragEvent {
    /// Build a synthetic event from a touch point and the target's rect
    pub fn from_touch(
        kind: DragEventKind,
        target: ElementId,
        touch: Option<&TouchPoint>,
        target_rect: Rect,
        data_transfer: DataTransfer,
        related_target: Option<ElementId>,
    ) -> Self {
        let (screen_x, screen_y, client_x, client_y, page_x, page_y) = match touch {
            Some(t) => (t.screen_x, t.screen_y, t.client_x, t.client_y, t.page_x, t.page_y),
            None => (0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
        };
        Self {
            kind,
            target,
            related_target,
            data_transfer,
            screen_x,
            screen_y,
            client_x,
            client_y,
            page_x,
            page_y,
            offset_x: client_x - target_rect.left(),
            offset_y: client_y - target_rect.top(),
            bubbles: true,
            cancelable: kind.is_cancelable(),
            default_prevented: false,
        }
    }

    /// Prevent the default action, if the event is cancelable
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
