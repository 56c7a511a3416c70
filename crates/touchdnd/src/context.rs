//! Entry point
//!
//! Routes touch input into the drag engine and enforces the
//! single-active-operation invariant. An explicit context object rather
//! than process-global state, so independent instances can coexist in a
//! test suite.

use std::time::Instant;

use touchdnd_core::{ElementId, TouchSample};

use crate::config::DragConfig;
use crate::error::SetupError;
use crate::hooks::{call_hook, HookResult};
use crate::host::{DocumentHost, DragNotice};
use crate::operation::DragOperation;
use crate::resolver::find_draggable_target;

/// A touch-down on a draggable element waiting out the hold-to-drag delay
#[derive(Debug)]
struct PendingStart {
    target: ElementId,
    touch_id: u64,
    sample: TouchSample,
    deadline: Instant,
}

/// Drag-and-drop entry point.
///
/// Owns the configuration and the single-slot guard for the active
/// operation; the slot is released exactly once per operation, on every
/// exit path including construction failure.
pub struct DragDropContext {
    config: DragConfig,
    active: Option<DragOperation>,
    pending: Option<PendingStart>,
}

impl DragDropContext {
    pub fn new(config: DragConfig) -> Self {
        Self { config, active: None, pending: None }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn has_active_operation(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&DragOperation> {
        self.active.as_ref()
    }

    /// Handle a touch-start. Returns whether a drag may begin from it.
    pub fn on_touch_start<H: DocumentHost>(
        &mut self,
        host: &mut H,
        sample: &TouchSample,
        now: Instant,
    ) -> bool {
        if self.active.is_some() || self.pending.is_some() {
            tracing::debug!("touch start ignored, a drag operation is already active");
            return false;
        }
        let Some(touch) = sample.first_changed() else { return false };
        let start = touch
            .target
            .or_else(|| host.element_at_point(touch.client_x, touch.client_y));
        let Some(start) = start else { return false };

        let target = match &self.config.target_resolver {
            Some(hook) => match call_hook("target_resolver", || hook(&*host, start)) {
                HookResult::Value(target) => target,
                HookResult::Declined => None,
            },
            None => find_draggable_target(host, start),
        };
        let Some(target) = target else { return false };

        match self.config.hold_to_drag {
            Some(delay) => {
                tracing::debug!("deferring drag start on {:?} by {:?}", target, delay);
                host.dispatch_notice(target, DragNotice::Pending);
                self.pending = Some(PendingStart {
                    target,
                    touch_id: touch.identifier,
                    sample: sample.clone(),
                    deadline: now + delay,
                });
            }
            None => {
                self.active = Some(DragOperation::new(target, touch.identifier, sample.clone()));
            }
        }
        true
    }

    /// Handle a touch-move.
    ///
    /// Returns whether the input's default action must be suppressed. A
    /// setup failure propagates after the guard has been released.
    pub fn on_touch_move<H: DocumentHost>(
        &mut self,
        host: &mut H,
        sample: &TouchSample,
        now: Instant,
    ) -> Result<bool, SetupError> {
        if let Some(pending) = self.pending.take() {
            // Movement before the hold deadline abandons the deferred start
            tracing::debug!("deferred drag start abandoned by touch-move");
            host.dispatch_notice(pending.target, DragNotice::Cancel);
            return Ok(false);
        }
        let result = match self.active.as_mut() {
            Some(operation) => operation.on_touch_move(&self.config, host, sample, now),
            None => Ok(false),
        };
        self.reap();
        result
    }

    /// Handle a touch-end
    pub fn on_touch_end<H: DocumentHost>(&mut self, host: &mut H, sample: &TouchSample) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!("deferred drag start abandoned by touch-end");
            host.dispatch_notice(pending.target, DragNotice::Cancel);
            return;
        }
        if let Some(operation) = self.active.as_mut() {
            operation.on_touch_end(&self.config, host, sample);
        }
        self.reap();
    }

    /// Handle a touch-cancel
    pub fn on_touch_cancel<H: DocumentHost>(&mut self, host: &mut H, sample: &TouchSample) {
        if let Some(pending) = self.pending.take() {
            host.dispatch_notice(pending.target, DragNotice::Cancel);
            return;
        }
        if let Some(operation) = self.active.as_mut() {
            operation.on_touch_cancel(host, sample);
        }
        self.reap();
    }

    /// Advance the clock: promote an elapsed deferred start, fire due
    /// iteration ticks, and drive the snap-back animation
    pub fn poll<H: DocumentHost>(&mut self, host: &mut H, now: Instant) {
        if let Some(pending) = self.pending.take() {
            if now < pending.deadline {
                self.pending = Some(pending);
            } else {
                tracing::debug!("hold delay elapsed, drag now potential on {:?}", pending.target);
                self.active = Some(DragOperation::new(
                    pending.target,
                    pending.touch_id,
                    pending.sample,
                ));
            }
        }
        if let Some(operation) = self.active.as_mut() {
            operation.poll(&self.config, host, now);
        }
        self.reap();
    }

    /// Run one rendering frame of the edge-scroll automaton
    pub fn on_frame<H: DocumentHost>(&mut self, host: &mut H) {
        if let Some(operation) = self.active.as_mut() {
            operation.on_frame(&self.config, host);
        }
    }

    /// Release the single-operation slot once the operation finished
    fn reap(&mut self) {
        let finished = self.active.as_ref().is_some_and(|op| op.is_finished());
        if !finished {
            return;
        }
        if let Some(operation) = self.active.take() {
            tracing::debug!("active operation slot released ({:?})", operation.state());
            if let Some(callback) = self.config.on_operation_end.as_mut() {
                callback(operation.state(), operation.perform_default_action());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use touchdnd_core::{Rect, TouchPhase, TouchPoint};

    fn start_sample(target: ElementId) -> TouchSample {
        let mut touch = TouchPoint::new(1, 20.0, 20.0);
        touch.target = Some(target);
        TouchSample::new(TouchPhase::Start, vec![touch.clone()], vec![touch])
    }

    #[test]
    fn test_second_touch_start_ignored_while_active() {
        let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
        let source = host.add_element(host.root(), "div", Rect::from_xywh(10.0, 10.0, 50.0, 50.0));
        host.set_draggable(source, true);

        let mut context = DragDropContext::new(DragConfig::default());
        let now = Instant::now();

        assert!(context.on_touch_start(&mut host, &start_sample(source), now));
        assert!(!context.on_touch_start(&mut host, &start_sample(source), now));
    }

    #[test]
    fn test_touch_start_on_non_draggable_declines() {
        let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
        let el = host.add_element(host.root(), "div", Rect::from_xywh(10.0, 10.0, 50.0, 50.0));

        let mut context = DragDropContext::new(DragConfig::default());
        assert!(!context.on_touch_start(&mut host, &start_sample(el), Instant::now()));
        assert!(!context.has_active_operation());
    }
}
