//! touchdnd core types
//!
//! Drag payload store, transfer gateway, outcome negotiation, and the
//! synthetic drag event shape. No document access happens here; these are
//! the leaf types the drag engine operates on.

mod effects;
mod event;
mod geometry;
mod touch;
mod transfer;

pub use effects::{default_drop_effect, negotiate_drop_effect};
pub use event::{DragEvent, DragEventKind};
pub use geometry::{Point, Rect, ScrollMetrics};
pub use touch::{TouchPhase, TouchPoint, TouchSample};
pub use transfer::{
    AccessMode, DataError, DataTransfer, DragDataStore, DragImageRequest, DropEffect,
    EffectAllowed,
};

/// Element identifier (opaque handle into the host document)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);
