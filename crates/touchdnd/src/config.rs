//! Drag configuration
//!
//! Tuning knobs and the optional user hooks. Hooks are plain boxed
//! closures; panics inside them are contained at the call site.

use std::fmt;
use std::time::Duration;

use touchdnd_core::{ElementId, Point, TouchSample};

use crate::error::SetupError;
use crate::host::DocumentHost;
use crate::operation::DragOperationState;

/// Decides whether a touch-move commits the drag (default: exactly one
/// active touch)
pub type StartConditionFn = Box<dyn Fn(&TouchSample) -> bool>;

/// May take over drag-image positioning for one touch-move. Receives the
/// sample and the position the engine computed; returning `None` means the
/// hook owns the image for this tick.
pub type TranslateOverrideFn = Box<dyn Fn(&TouchSample, Point) -> Option<Point>>;

/// Decides whether a non-start touch-end keeps the input's ordinary
/// default action (default: yes)
pub type DefaultActionFn = Box<dyn Fn(&TouchSample) -> bool>;

/// Replaces the ancestor walk that finds the draggable source
pub type TargetResolverFn = Box<dyn Fn(&dyn DocumentHost, ElementId) -> Option<ElementId>>;

/// Builds the floating drag image instead of the host's default factory
pub type DragImageFactoryFn =
    Box<dyn Fn(&mut dyn DocumentHost, ElementId) -> Result<ElementId, SetupError>>;

/// Replaces the host's hit test for hotspot retargeting
pub type HitTestFn = Box<dyn Fn(&dyn DocumentHost, f64, f64) -> Option<ElementId>>;

/// Maps (dynamic velocity, threshold) to a per-frame scroll speed in pixels
pub type ScrollVelocityFn = Box<dyn Fn(f64, f64) -> f64>;

/// Observes the end of every operation: final state and whether the input's
/// ordinary default action should still be applied
pub type OperationEndFn = Box<dyn FnMut(DragOperationState, bool)>;

/// Drag engine configuration
pub struct DragConfig {
    /// Period of the drag-operation iteration
    pub iteration_interval: Duration,
    /// Fixed offset between the hotspot and the drag image
    pub drag_image_offset: Point,
    /// Center the drag image on the touch instead of applying the offset
    pub drag_image_center_on_touch: bool,
    /// Defer the operation start until the touch is held this long
    pub hold_to_drag: Option<Duration>,
    /// Length of the failure-path snap-back animation
    pub snap_back_duration: Duration,
    /// Distance from a scrollable edge that triggers edge scrolling
    pub scroll_threshold: f64,
    pub scroll_velocity: Option<ScrollVelocityFn>,
    pub start_condition: Option<StartConditionFn>,
    pub translate_override: Option<TranslateOverrideFn>,
    pub default_action_override: Option<DefaultActionFn>,
    pub target_resolver: Option<TargetResolverFn>,
    pub drag_image_factory: Option<DragImageFactoryFn>,
    pub hit_test: Option<HitTestFn>,
    pub on_operation_end: Option<OperationEndFn>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            iteration_interval: Duration::from_millis(150),
            drag_image_offset: Point::default(),
            drag_image_center_on_touch: false,
            hold_to_drag: None,
            snap_back_duration: Duration::from_millis(250),
            scroll_threshold: 75.0,
            scroll_velocity: None,
            start_condition: None,
            translate_override: None,
            default_action_override: None,
            target_resolver: None,
            drag_image_factory: None,
            hit_test: None,
            on_operation_end: None,
        }
    }
}

impl fmt::Debug for DragConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragConfig")
            .field("iteration_interval", &self.iteration_interval)
            .field("drag_image_offset", &self.drag_image_offset)
            .field("drag_image_center_on_touch", &self.drag_image_center_on_touch)
            .field("hold_to_drag", &self.hold_to_drag)
            .field("snap_back_duration", &self.snap_back_duration)
            .field("scroll_threshold", &self.scroll_threshold)
            .field("scroll_velocity", &self.scroll_velocity.is_some())
            .field("start_condition", &self.start_condition.is_some())
            .field("translate_override", &self.translate_override.is_some())
            .field("default_action_override", &self.default_action_override.is_some())
            .field("target_resolver", &self.target_resolver.is_some())
            .field("drag_image_factory", &self.drag_image_factory.is_some())
            .field("hit_test", &self.hit_test.is_some())
            .field("on_operation_end", &self.on_operation_end.is_some())
            .finish()
    }
}

impl DragConfig {
    /// Per-frame scroll speed for a given edge distance
    pub(crate) fn scroll_velocity_at(&self, dynamic_velocity: f64, threshold: f64) -> f64 {
        match &self.scroll_velocity {
            Some(velocity) => velocity(dynamic_velocity, threshold),
            None => default_scroll_velocity(dynamic_velocity, threshold),
        }
    }
}

/// Linear ramp from 0 at the threshold boundary up to 10 px/frame at the edge
fn default_scroll_velocity(dynamic_velocity: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    (dynamic_velocity / threshold).min(1.0) * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_velocity_ramp() {
        assert_eq!(default_scroll_velocity(0.0, 75.0), 0.0);
        assert_eq!(default_scroll_velocity(75.0, 75.0), 10.0);
        // Clamped at the edge
        assert_eq!(default_scroll_velocity(150.0, 75.0), 10.0);
        assert!(default_scroll_velocity(37.5, 75.0) > 4.9);
    }
}
