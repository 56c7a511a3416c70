//! Drag operation state machine
//!
//! Owns the lifecycle of one drag: commit on the first qualifying
//! touch-move, the periodic iteration with hit-testing and retargeting,
//! outcome negotiation, and the end-of-operation procedure with its
//! snap-back animation.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use touchdnd_core::{
    default_drop_effect, negotiate_drop_effect, AccessMode, DataTransfer, DragDataStore,
    DragEventKind, DropEffect, ElementId, Point, TouchSample,
};

use crate::config::DragConfig;
use crate::error::SetupError;
use crate::hooks::{call_hook, HookResult};
use crate::host::DocumentHost;
use crate::scroll::ScrollAutomaton;
use crate::synthesize::dispatch_drag_event;

/// Class applied to every drag image element
pub const CLASS_DRAG_IMAGE: &str = "touchdnd-drag-image";
/// Prefix of the operation-indicator class on the drag image
pub const CLASS_EFFECT_PREFIX: &str = "touchdnd-effect-";

/// Lifecycle state of a drag operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOperationState {
    /// Touch listeners installed, drag not yet committed
    Potential,
    /// "dragstart" went uncanceled, iteration running
    Started,
    Ended,
    Cancelled,
}

/// Snap-back animation of the drag image toward the source rect
#[derive(Debug, Clone, Copy)]
struct Snapback {
    from: Point,
    to: Point,
    started: Instant,
    duration: Duration,
}

impl Snapback {
    /// Eased position at `now` and whether the animation completed
    fn position(&self, now: Instant) -> (Point, bool) {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let progress = elapsed / self.duration.as_secs_f64().max(f64::EPSILON);
        if progress >= 1.0 {
            return (self.to, true);
        }
        // Ease-out interpolation
        let t = 1.0 - (1.0 - progress).powi(3);
        let point = Point::new(
            self.from.x + (self.to.x - self.from.x) * t,
            self.from.y + (self.to.y - self.from.y) * t,
        );
        (point, false)
    }
}

/// One active drag operation.
///
/// Created the instant a touch lands on a draggable element; committed by
/// the first qualifying touch-move. All mutation happens from the touch
/// handlers and the iteration, interleaved on one thread.
pub struct DragOperation {
    state: DragOperationState,
    source: ElementId,
    touch_id: u64,
    last_sample: TouchSample,
    /// Viewport-relative hit-test point (centroid of active touches)
    hotspot: Point,
    /// Document-relative centroid
    page_point: Point,
    store: Rc<RefCell<DragDataStore>>,
    transfer: Option<DataTransfer>,
    image: Option<ElementId>,
    image_offset: Point,
    /// Scroll-induced translation reported back by the scroll automaton
    image_translation: Point,
    immediate_selection: Option<ElementId>,
    drop_target: Option<ElementId>,
    /// Negotiated operation as of the last tick
    current_effect: DropEffect,
    effect_class: Option<String>,
    next_tick: Option<Instant>,
    /// Reentrancy flag; a tick due while the previous one runs is dropped
    in_tick: bool,
    scroller: ScrollAutomaton,
    snapback: Option<Snapback>,
    perform_default_action: bool,
    finished: bool,
    cleaned_up: bool,
}

impl DragOperation {
    /// Record the initiating touch. Does not commit to a drag; only the
    /// first qualifying touch-move does.
    pub fn new(source: ElementId, touch_id: u64, sample: TouchSample) -> Self {
        let hotspot = sample.client_centroid().unwrap_or_default();
        let page_point = sample.page_centroid().unwrap_or_default();
        Self {
            state: DragOperationState::Potential,
            source,
            touch_id,
            last_sample: sample,
            hotspot,
            page_point,
            store: Rc::new(RefCell::new(DragDataStore::new())),
            transfer: None,
            image: None,
            image_offset: Point::default(),
            image_translation: Point::default(),
            immediate_selection: None,
            drop_target: None,
            current_effect: DropEffect::None,
            effect_class: None,
            next_tick: None,
            in_tick: false,
            scroller: ScrollAutomaton::new(),
            snapback: None,
            perform_default_action: false,
            finished: false,
            cleaned_up: false,
        }
    }

    pub fn state(&self) -> DragOperationState {
        self.state
    }

    pub fn source(&self) -> ElementId {
        self.source
    }

    /// Whether the operation ran its cleanup and can be discarded
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a non-start touch-end keeps the input's default action
    pub fn perform_default_action(&self) -> bool {
        self.perform_default_action
    }

    pub fn current_drop_target(&self) -> Option<ElementId> {
        self.drop_target
    }

    /// Handle a touch-move routed to this operation.
    ///
    /// Returns whether the input's default action should be suppressed.
    pub fn on_touch_move<H: DocumentHost>(
        &mut self,
        config: &DragConfig,
        host: &mut H,
        sample: &TouchSample,
        now: Instant,
    ) -> Result<bool, SetupError> {
        if !sample.involves(self.touch_id) {
            return Ok(false);
        }
        match self.state {
            DragOperationState::Potential => {
                let qualifies = match &config.start_condition {
                    Some(hook) => {
                        call_hook("start_condition", || hook(sample)).value_or(false)
                    }
                    None => sample.touches.len() == 1,
                };
                if !qualifies {
                    tracing::debug!("start predicate failed, drag never begins");
                    self.cleanup(host);
                    return Ok(false);
                }
                self.last_sample = sample.clone();
                self.update_centroids(sample);
                self.setup(config, host, now)?;
                Ok(self.state == DragOperationState::Started)
            }
            DragOperationState::Started => {
                self.last_sample = sample.clone();
                self.update_centroids(sample);
                self.scroller.on_touch_move(config, host, self.hotspot, self.immediate_selection);
                self.translate_image(config, host);
                Ok(true)
            }
            DragOperationState::Ended | DragOperationState::Cancelled => Ok(false),
        }
    }

    /// Handle a touch-end. Finalization of a started drag is deferred to
    /// the next iteration tick.
    pub fn on_touch_end<H: DocumentHost>(
        &mut self,
        config: &DragConfig,
        host: &mut H,
        sample: &TouchSample,
    ) {
        if sample.changed_with_identifier(self.touch_id).is_none() {
            return;
        }
        self.update_centroids(sample);
        match self.state {
            DragOperationState::Potential => {
                // Non-start: the input keeps its ordinary default action
                // unless the override hook declines it
                self.perform_default_action = match &config.default_action_override {
                    Some(hook) => {
                        call_hook("default_action_override", || hook(sample)).value_or(true)
                    }
                    None => true,
                };
                self.cleanup(host);
            }
            DragOperationState::Started => {
                self.state = DragOperationState::Ended;
            }
            DragOperationState::Ended | DragOperationState::Cancelled => {}
        }
    }

    /// Handle a touch-cancel
    pub fn on_touch_cancel<H: DocumentHost>(&mut self, host: &mut H, sample: &TouchSample) {
        if sample.changed_with_identifier(self.touch_id).is_none() {
            return;
        }
        self.update_centroids(sample);
        match self.state {
            DragOperationState::Potential => {
                self.cleanup(host);
            }
            DragOperationState::Started => {
                // A cancelled drag resolves to no operation
                self.current_effect = DropEffect::None;
                self.state = DragOperationState::Cancelled;
            }
            DragOperationState::Ended | DragOperationState::Cancelled => {}
        }
    }

    /// Advance the operation clock: fire a due iteration tick or drive the
    /// snap-back animation
    pub fn poll<H: DocumentHost>(&mut self, config: &DragConfig, host: &mut H, now: Instant) {
        if let Some(snapback) = self.snapback {
            let (position, done) = snapback.position(now);
            if let Some(image) = self.image {
                host.set_translate(image, position.x, position.y);
            }
            if done {
                self.snapback = None;
                self.finish(host);
            }
            return;
        }

        let Some(due) = self.next_tick else { return };
        if now < due {
            return;
        }
        self.next_tick = Some(now + config.iteration_interval);

        if self.in_tick {
            // Dropped whole, never queued; ordering beats temporal resolution
            tracing::debug!("iteration tick dropped, previous tick still running");
            return;
        }
        self.in_tick = true;
        self.tick(config, host, now);
        self.in_tick = false;
    }

    /// Run one scheduled scroll frame and track its image translation delta
    pub fn on_frame<H: DocumentHost>(&mut self, config: &DragConfig, host: &mut H) {
        if self.state != DragOperationState::Started {
            return;
        }
        let delta = self.scroller.on_frame(config, host);
        if delta.x != 0.0 || delta.y != 0.0 {
            self.image_translation.x += delta.x;
            self.image_translation.y += delta.y;
            self.translate_image(config, host);
        }
    }

    /// Commit the drag: build store, gateway, and drag image, then dispatch
    /// a cancelable "dragstart" in read-write mode at the source
    fn setup<H: DocumentHost>(
        &mut self,
        config: &DragConfig,
        host: &mut H,
        now: Instant,
    ) -> Result<(), SetupError> {
        let transfer = DataTransfer::new(self.store.clone());
        self.transfer = Some(transfer.clone());

        let image = match self.build_image(config, host, self.source) {
            Ok(image) => image,
            Err(error) => {
                tracing::warn!("drag image construction failed: {}", error);
                self.state = DragOperationState::Cancelled;
                self.cleanup(host);
                return Err(error);
            }
        };
        self.image = Some(image);
        self.image_offset = config.drag_image_offset;

        let prevented = self.dispatch(
            host,
            DragEventKind::DragStart,
            self.source,
            &transfer,
            AccessMode::ReadWrite,
            DropEffect::None,
            None,
        );
        if prevented {
            tracing::debug!("dragstart canceled, operation never visibly started");
            self.state = DragOperationState::Cancelled;
            self.cleanup(host);
            return Ok(());
        }

        // A listener may have overridden the drag image through the gateway
        if let Some(request) = transfer.take_image_request() {
            host.remove_element(image);
            let replacement = match self.build_image(config, host, request.source) {
                Ok(replacement) => replacement,
                Err(error) => {
                    tracing::warn!("drag image override failed: {}", error);
                    self.image = None;
                    self.state = DragOperationState::Cancelled;
                    self.cleanup(host);
                    return Err(error);
                }
            };
            self.image = Some(replacement);
            // The requested offsets name the image point under the touch
            self.image_offset = Point::new(-request.offset_x, -request.offset_y);
        }

        self.state = DragOperationState::Started;
        self.next_tick = Some(now + config.iteration_interval);
        self.translate_image(config, host);
        tracing::debug!("drag operation started from {:?}", self.source);
        Ok(())
    }

    fn build_image<H: DocumentHost>(
        &self,
        config: &DragConfig,
        host: &mut H,
        source: ElementId,
    ) -> Result<ElementId, SetupError> {
        let image = match &config.drag_image_factory {
            Some(factory) => factory(host, source)?,
            None => host.create_drag_image(source)?,
        };
        host.add_class(image, CLASS_DRAG_IMAGE);
        Ok(image)
    }

    /// One iteration of the drag process model
    fn tick<H: DocumentHost>(&mut self, config: &DragConfig, host: &mut H, now: Instant) {
        let Some(transfer) = self.transfer.clone() else { return };

        // "drag" always precedes the termination check within a tick
        let drag_prevented = self.dispatch(
            host,
            DragEventKind::Drag,
            self.source,
            &transfer,
            AccessMode::Protected,
            DropEffect::None,
            None,
        );
        if drag_prevented {
            tracing::debug!("drag canceled by listener, forcing operation to none");
            self.current_effect = DropEffect::None;
        }

        if drag_prevented
            || matches!(self.state, DragOperationState::Ended | DragOperationState::Cancelled)
        {
            let failed = self.end_of_operation(host, &transfer);
            if failed && self.begin_snapback(config, host, now) {
                // finish() runs when the animation completes
                return;
            }
            self.finish(host);
            return;
        }

        // Continuous hit-testing with enter/leave/exit semantics
        let previous_target = self.drop_target;
        let new_selection = self.hit_test(config, host);

        if new_selection != self.immediate_selection && new_selection != self.drop_target {
            self.immediate_selection = new_selection;

            if let Some(old_target) = self.drop_target {
                self.dispatch(
                    host,
                    DragEventKind::DragExit,
                    old_target,
                    &transfer,
                    AccessMode::Protected,
                    DropEffect::None,
                    None,
                );
            }

            match new_selection {
                None => {
                    tracing::debug!("hotspot left the document, clearing drop target");
                    self.drop_target = None;
                }
                Some(selection) => {
                    let default_effect = self.default_effect(host);
                    let prevented = self.dispatch(
                        host,
                        DragEventKind::DragEnter,
                        selection,
                        &transfer,
                        AccessMode::Protected,
                        default_effect,
                        None,
                    );
                    if prevented {
                        self.drop_target = Some(selection);
                        self.current_effect = negotiate_drop_effect(
                            self.store.borrow().effect_allowed(),
                            transfer.drop_effect(),
                        );
                    } else if selection != host.root() {
                        // Nothing claimed the drop; retarget to the root container
                        self.drop_target = Some(host.root());
                    }
                }
            }
        }

        if self.drop_target != previous_target {
            if let Some(previous) = previous_target {
                self.dispatch(
                    host,
                    DragEventKind::DragLeave,
                    previous,
                    &transfer,
                    AccessMode::Protected,
                    DropEffect::None,
                    self.drop_target,
                );
            }
        }

        if let Some(target) = self.drop_target {
            let default_effect = self.default_effect(host);
            let prevented = self.dispatch(
                host,
                DragEventKind::DragOver,
                target,
                &transfer,
                AccessMode::Protected,
                default_effect,
                None,
            );
            self.current_effect = if prevented {
                negotiate_drop_effect(
                    self.store.borrow().effect_allowed(),
                    transfer.drop_effect(),
                )
            } else {
                DropEffect::None
            };
        }

        self.update_effect_class(host);
    }

    /// End-of-operation procedure. Returns the failure flag.
    fn end_of_operation<H: DocumentHost>(&mut self, host: &mut H, transfer: &DataTransfer) -> bool {
        let failed = self.current_effect == DropEffect::None
            || self.drop_target.is_none()
            || self.state == DragOperationState::Cancelled;

        if failed {
            if let Some(target) = self.drop_target {
                self.dispatch(
                    host,
                    DragEventKind::DragLeave,
                    target,
                    transfer,
                    AccessMode::Protected,
                    DropEffect::None,
                    None,
                );
            }
        } else if let Some(target) = self.drop_target {
            let prevented = self.dispatch(
                host,
                DragEventKind::Drop,
                target,
                transfer,
                AccessMode::ReadOnly,
                self.current_effect,
                None,
            );
            self.current_effect = if prevented {
                transfer.drop_effect()
            } else {
                // No default drop action for element-only targets
                DropEffect::None
            };
        }
        tracing::debug!("operation ended ({})", if failed { "failure" } else { "success" });
        failed
    }

    /// Start the snap-back animation unless the source is invisible.
    /// Returns whether an animation was started.
    fn begin_snapback<H: DocumentHost>(
        &mut self,
        config: &DragConfig,
        host: &mut H,
        now: Instant,
    ) -> bool {
        let Some(image) = self.image else { return false };
        if config.snap_back_duration.is_zero() {
            return false;
        }
        let visibility = host.computed_style(self.source, "visibility");
        let display = host.computed_style(self.source, "display");
        if visibility.as_deref() == Some("hidden") || display.as_deref() == Some("none") {
            // The animation would be invisible; finish right away
            return false;
        }
        let from = host.bounding_rect(image).origin();
        let to = host.bounding_rect(self.source).origin();
        self.snapback = Some(Snapback {
            from,
            to,
            started: now,
            duration: config.snap_back_duration,
        });
        tracing::debug!("snap-back started toward {:?}", self.source);
        true
    }

    /// Dispatch "dragend" at the source and clean up, exactly once
    fn finish<H: DocumentHost>(&mut self, host: &mut H) {
        if let Some(transfer) = self.transfer.clone() {
            self.dispatch(
                host,
                DragEventKind::DragEnd,
                self.source,
                &transfer,
                AccessMode::Protected,
                self.current_effect,
                None,
            );
        }
        self.state = DragOperationState::Ended;
        self.cleanup(host);
    }

    /// Every exit path funnels through here; runs at most once
    fn cleanup<H: DocumentHost>(&mut self, host: &mut H) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        self.next_tick = None;
        self.snapback = None;
        self.scroller.reset();
        if let Some(image) = self.image.take() {
            host.remove_element(image);
        }
        self.store.borrow_mut().set_mode(AccessMode::Disconnected);
        self.finished = true;
        tracing::debug!("drag operation cleaned up in state {:?}", self.state);
    }

    fn update_centroids(&mut self, sample: &TouchSample) {
        if let Some(centroid) = sample.client_centroid() {
            self.hotspot = centroid;
        }
        if let Some(centroid) = sample.page_centroid() {
            self.page_point = centroid;
        }
    }

    /// Move the drag image to the current hotspot, honoring the fixed
    /// offset, the centering mode, and the translate-override hook
    fn translate_image<H: DocumentHost>(&mut self, config: &DragConfig, host: &mut H) {
        let Some(image) = self.image else { return };
        let computed = if config.drag_image_center_on_touch {
            let rect = host.bounding_rect(image);
            Point::new(self.hotspot.x - rect.width / 2.0, self.hotspot.y - rect.height / 2.0)
        } else {
            Point::new(
                self.hotspot.x + self.image_offset.x,
                self.hotspot.y + self.image_offset.y,
            )
        };
        let position = match &config.translate_override {
            Some(hook) => {
                match call_hook("translate_override", || hook(&self.last_sample, computed)) {
                    HookResult::Value(Some(position)) => position,
                    // The hook owns repositioning for this tick
                    HookResult::Value(None) => return,
                    HookResult::Declined => computed,
                }
            }
            None => computed,
        };
        host.set_translate(
            image,
            position.x + self.image_translation.x,
            position.y + self.image_translation.y,
        );
    }

    fn hit_test<H: DocumentHost>(&self, config: &DragConfig, host: &H) -> Option<ElementId> {
        match &config.hit_test {
            Some(hook) => {
                match call_hook("hit_test", || hook(host, self.hotspot.x, self.hotspot.y)) {
                    HookResult::Value(selection) => selection,
                    HookResult::Declined => host.element_at_point(self.hotspot.x, self.hotspot.y),
                }
            }
            None => host.element_at_point(self.hotspot.x, self.hotspot.y),
        }
    }

    fn default_effect<H: DocumentHost>(&self, host: &H) -> DropEffect {
        default_drop_effect(self.store.borrow().effect_allowed(), self.source_is_link(host))
    }

    /// Mirrors the desktop model's negotiation input: a text node never
    /// carries a tag name, so this stays false for element sources
    fn source_is_link<H: DocumentHost>(&self, host: &H) -> bool {
        host.is_text(self.source) && host.tag_name(self.source).eq_ignore_ascii_case("a")
    }

    fn update_effect_class<H: DocumentHost>(&mut self, host: &mut H) {
        let Some(image) = self.image else { return };
        let class = format!("{}{}", CLASS_EFFECT_PREFIX, self.current_effect.as_str());
        if self.effect_class.as_deref() == Some(class.as_str()) {
            return;
        }
        if let Some(old) = self.effect_class.take() {
            host.remove_class(image, &old);
        }
        host.add_class(image, &class);
        self.effect_class = Some(class);
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch<H: DocumentHost>(
        &self,
        host: &mut H,
        kind: DragEventKind,
        target: ElementId,
        transfer: &DataTransfer,
        mode: AccessMode,
        default_effect: DropEffect,
        related_target: Option<ElementId>,
    ) -> bool {
        dispatch_drag_event(
            host,
            kind,
            target,
            &self.last_sample,
            transfer,
            &self.store,
            mode,
            default_effect,
            related_target,
        )
    }
}
