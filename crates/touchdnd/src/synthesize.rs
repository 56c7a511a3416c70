//! Event synthesis
//!
//! Builds a synthetic drag event, dispatches it through the host, and
//! forces the payload store back into disconnected mode so nothing a
//! listener kept alive can touch it afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use touchdnd_core::{
    AccessMode, DataTransfer, DragDataStore, DragEvent, DragEventKind, DropEffect, ElementId,
    TouchSample,
};

use crate::host::DocumentHost;

/// Dispatch one synthetic drag event at a target.
///
/// The store is switched into `mode` for the duration of the dispatch and
/// the gateway's `dropEffect` is seeded with `default_effect`; afterwards
/// the store is disconnected regardless of what the listeners did. Returns
/// whether the default action was prevented.
#[allow(clippy::too_many_arguments)]
pub fn dispatch_drag_event<H: DocumentHost>(
    host: &mut H,
    kind: DragEventKind,
    target: ElementId,
    sample: &TouchSample,
    transfer: &DataTransfer,
    store: &Rc<RefCell<DragDataStore>>,
    mode: AccessMode,
    default_effect: DropEffect,
    related_target: Option<ElementId>,
) -> bool {
    store.borrow_mut().set_mode(mode);
    transfer.reset_drop_effect(default_effect);

    let touch = sample.first_changed().or_else(|| sample.touches.first());
    let target_rect = host.bounding_rect(target);
    let mut event =
        DragEvent::from_touch(kind, target, touch, target_rect, transfer.clone(), related_target);

    let prevented = host.dispatch(&mut event);
    store.borrow_mut().set_mode(AccessMode::Disconnected);

    tracing::debug!(
        "dispatched {} at {:?} (prevented: {})",
        kind.as_str(),
        target,
        prevented
    );
    prevented
}
