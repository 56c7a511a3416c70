//! Drag payload store and transfer gateway
//!
//! Mode-gated storage for the data being dragged, plus the per-operation
//! facade listeners see on synthetic drag events.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::ElementId;

/// Access mode of the payload store.
///
/// Only the drag engine changes the mode, immediately before and after each
/// synthetic dispatch. Listeners observe exactly one mode per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// No access at all; the mode every store ends up in after a dispatch
    #[default]
    Disconnected,
    /// Values readable, store immutable
    ReadOnly,
    /// Full access, granted only for "dragstart"
    ReadWrite,
    /// Types enumerable, values hidden
    Protected,
}

/// Source-declared permitted outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectAllowed {
    None,
    Copy,
    CopyLink,
    CopyMove,
    Link,
    LinkMove,
    Move,
    All,
}

impl EffectAllowed {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectAllowed::None => "none",
            EffectAllowed::Copy => "copy",
            EffectAllowed::CopyLink => "copyLink",
            EffectAllowed::CopyMove => "copyMove",
            EffectAllowed::Link => "link",
            EffectAllowed::LinkMove => "linkMove",
            EffectAllowed::Move => "move",
            EffectAllowed::All => "all",
        }
    }
}

/// Target-declared preferred outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropEffect {
    #[default]
    None,
    Copy,
    Link,
    Move,
}

impl DropEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropEffect::None => "none",
            DropEffect::Copy => "copy",
            DropEffect::Link => "link",
            DropEffect::Move => "move",
        }
    }
}

/// Payload store access error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    #[error("drag data type must not contain whitespace: {0:?}")]
    InvalidFormat(String),
}

/// Mode-gated container of type/value pairs.
///
/// Types are unique and enumerate in insertion order.
#[derive(Debug, Default)]
pub struct DragDataStore {
    entries: Vec<(String, String)>,
    effect_allowed: Option<EffectAllowed>,
    mode: AccessMode,
}

impl DragDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Engine-only: listeners never change the mode
    pub fn set_mode(&mut self, mode: AccessMode) {
        self.mode = mode;
    }

    pub fn effect_allowed(&self) -> Option<EffectAllowed> {
        self.effect_allowed
    }

    /// Applied only in read-write mode
    pub fn set_effect_allowed(&mut self, effect: EffectAllowed) {
        if self.mode != AccessMode::ReadWrite {
            tracing::debug!("effectAllowed write refused in {:?} mode", self.mode);
            return;
        }
        self.effect_allowed = Some(effect);
    }

    /// Get the value stored for a type.
    ///
    /// Returns `None` when the mode denies reads, `Some("")` when the type
    /// is absent but reads are allowed.
    pub fn get_data(&self, format: &str) -> Option<String> {
        match self.mode {
            AccessMode::ReadOnly | AccessMode::ReadWrite => Some(
                self.entries
                    .iter()
                    .find(|(t, _)| t == format)
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default(),
            ),
            AccessMode::Disconnected | AccessMode::Protected => None,
        }
    }

    /// Store a value for a type.
    ///
    /// A type containing whitespace is rejected in every mode and the store
    /// is left unchanged. Writes in a non-writable mode are ignored.
    pub fn set_data(&mut self, format: &str, data: &str) -> Result<(), DataError> {
        if format.contains(char::is_whitespace) {
            return Err(DataError::InvalidFormat(format.to_string()));
        }
        if self.mode != AccessMode::ReadWrite {
            tracing::debug!("data write refused in {:?} mode", self.mode);
            return Ok(());
        }
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| t == format) {
            entry.1 = data.to_string();
        } else {
            self.entries.push((format.to_string(), data.to_string()));
        }
        Ok(())
    }

    /// Remove one type/value pair, or everything when no format is given
    pub fn clear_data(&mut self, format: Option<&str>) {
        if self.mode != AccessMode::ReadWrite {
            tracing::debug!("data clear refused in {:?} mode", self.mode);
            return;
        }
        match format {
            Some(format) => self.entries.retain(|(t, _)| t != format),
            None => self.entries.clear(),
        }
    }

    /// Stored types, in insertion order
    pub fn types(&self) -> Vec<String> {
        match self.mode {
            AccessMode::Disconnected => Vec::new(),
            _ => self.entries.iter().map(|(t, _)| t.clone()).collect(),
        }
    }
}

/// Drag image replacement requested through the gateway
#[derive(Debug, Clone, Copy)]
pub struct DragImageRequest {
    pub source: ElementId,
    /// Point of the image that should sit under the touch
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Per-operation facade over one payload store.
///
/// Cheap to clone; every synthetic event of an operation carries a handle to
/// the same store. Owned by the active drag operation and destroyed with it.
#[derive(Debug, Clone)]
pub struct DataTransfer {
    store: Rc<RefCell<DragDataStore>>,
    drop_effect: Rc<Cell<DropEffect>>,
    image_request: Rc<RefCell<Option<DragImageRequest>>>,
}

impl DataTransfer {
    pub fn new(store: Rc<RefCell<DragDataStore>>) -> Self {
        Self {
            store,
            drop_effect: Rc::new(Cell::new(DropEffect::None)),
            image_request: Rc::new(RefCell::new(None)),
        }
    }

    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect.get()
    }

    /// Listener-facing setter, refused while the store is disconnected
    pub fn set_drop_effect(&self, effect: DropEffect) {
        if self.store.borrow().mode() == AccessMode::Disconnected {
            tracing::debug!("dropEffect write refused on disconnected store");
            return;
        }
        self.drop_effect.set(effect);
    }

    /// Engine-only: seeds the per-event default, bypassing the access gate
    pub fn reset_drop_effect(&self, effect: DropEffect) {
        self.drop_effect.set(effect);
    }

    pub fn effect_allowed(&self) -> Option<EffectAllowed> {
        self.store.borrow().effect_allowed()
    }

    pub fn set_effect_allowed(&self, effect: EffectAllowed) {
        self.store.borrow_mut().set_effect_allowed(effect);
    }

    pub fn get_data(&self, format: &str) -> Option<String> {
        self.store.borrow().get_data(format)
    }

    pub fn set_data(&self, format: &str, data: &str) -> Result<(), DataError> {
        self.store.borrow_mut().set_data(format, data)
    }

    pub fn clear_data(&self, format: Option<&str>) {
        self.store.borrow_mut().clear_data(format)
    }

    pub fn types(&self) -> Vec<String> {
        self.store.borrow().types()
    }

    /// Override the generated drag image.
    ///
    /// Honored at most once per operation; later calls are ignored. The
    /// offsets name the point of the image that tracks the touch.
    pub fn set_drag_image(&self, source: ElementId, offset_x: f64, offset_y: f64) {
        if self.store.borrow().mode() == AccessMode::Disconnected {
            tracing::debug!("setDragImage refused on disconnected store");
            return;
        }
        let mut request = self.image_request.borrow_mut();
        if request.is_some() {
            tracing::debug!("setDragImage already recorded for this operation");
            return;
        }
        *request = Some(DragImageRequest { source, offset_x, offset_y });
    }

    /// Engine-only: consume the recorded image override
    pub fn take_image_request(&self) -> Option<DragImageRequest> {
        self.image_request.borrow_mut().take()
    }
}
