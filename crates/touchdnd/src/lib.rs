//! touchdnd — synthesized drag-and-drop for touch-only input
//!
//! Reproduces the desktop drag-and-drop event model from continuous touch
//! samples: a polled drag-operation state machine, a mode-gated data
//! transfer, and an autonomous edge-scroll automaton, all reaching the
//! document through a narrow capability interface so the machine can run
//! against a scripted fake tree in tests.

mod config;
mod context;
mod error;
mod hooks;
mod host;
mod operation;
mod resolver;
mod scroll;
mod synthesize;
pub mod testing;

pub use config::{
    DefaultActionFn, DragConfig, DragImageFactoryFn, HitTestFn, OperationEndFn, ScrollVelocityFn,
    StartConditionFn, TargetResolverFn, TranslateOverrideFn,
};
pub use context::DragDropContext;
pub use error::SetupError;
pub use hooks::HookResult;
pub use host::{DocumentHost, DragNotice};
pub use operation::{DragOperation, DragOperationState, CLASS_DRAG_IMAGE, CLASS_EFFECT_PREFIX};
pub use resolver::find_draggable_target;
pub use scroll::ScrollAutomaton;
pub use synthesize::dispatch_drag_event;

// Core types embedders need to write listeners and feed touch input
pub use touchdnd_core::{
    default_drop_effect, negotiate_drop_effect, AccessMode, DataError, DataTransfer,
    DragDataStore, DragEvent, DragEventKind, DragImageRequest, DropEffect, EffectAllowed,
    ElementId, Point, Rect, ScrollMetrics, TouchPhase, TouchPoint, TouchSample,
};
