//! Edge-scroll automaton
//!
//! Frame-paced scrolling of the nearest scrollable ancestor while the drag
//! hotspot sits near one of its edges. Scheduling is independent of the
//! drag iteration timer: the embedder calls `on_frame` on its rendering
//! clock and the automaton stands down on its own once both intentions
//! return to zero.

use touchdnd_core::{ElementId, Point};

use crate::config::DragConfig;
use crate::host::DocumentHost;

/// Per-axis scroll intention and its distance-derived velocity
#[derive(Debug, Clone, Copy, Default)]
struct AxisState {
    /// -1 toward the near edge, +1 toward the far edge, 0 at rest
    intention: i32,
    dynamic_velocity: f64,
}

/// Autonomous edge scroller fed once per touch-move
#[derive(Debug, Default)]
pub struct ScrollAutomaton {
    hovered: Option<ElementId>,
    scrollable: Option<ElementId>,
    hotspot: Option<Point>,
    horizontal: AxisState,
    vertical: AxisState,
    frame_pending: bool,
}

impl ScrollAutomaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all state; called when the operation ends
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether a scroll frame is scheduled
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Current (horizontal, vertical) intentions
    pub fn intentions(&self) -> (i32, i32) {
        (self.horizontal.intention, self.vertical.intention)
    }

    /// Feed the automaton with the current hotspot and hovered element
    pub fn on_touch_move<H: DocumentHost>(
        &mut self,
        config: &DragConfig,
        host: &H,
        hotspot: Point,
        hovered: Option<ElementId>,
    ) {
        if hovered != self.hovered {
            self.hovered = hovered;
            self.scrollable = hovered.map(|el| find_scrollable_ancestor(host, el));
        }
        self.hotspot = Some(hotspot);
        self.evaluate(config, host);

        if (self.horizontal.intention != 0 || self.vertical.intention != 0) && !self.frame_pending {
            tracing::debug!("edge scroll scheduled on {:?}", self.scrollable);
            self.frame_pending = true;
        }
    }

    /// Run one scheduled scroll frame.
    ///
    /// Returns the drag-image translation delta: the scrolled pixels when
    /// the resolved ancestor is the viewport container (the image's
    /// fixed-position math must track viewport scroll), zero for an inner
    /// container (content scrolls beneath the image).
    pub fn on_frame<H: DocumentHost>(&mut self, config: &DragConfig, host: &mut H) -> Point {
        if !self.frame_pending {
            return Point::default();
        }
        let (Some(scrollable), Some(_)) = (self.scrollable, self.hotspot) else {
            self.frame_pending = false;
            return Point::default();
        };

        let threshold = config.scroll_threshold;
        let dx = scroll_step(config, &self.horizontal, threshold);
        let dy = scroll_step(config, &self.vertical, threshold);
        if dx != 0.0 || dy != 0.0 {
            host.scroll_by(scrollable, dx, dy);
        }

        let delta = if scrollable == host.root() {
            Point::new(dx, dy)
        } else {
            Point::default()
        };

        self.evaluate(config, host);
        if (self.horizontal.intention == 0 && self.vertical.intention == 0)
            || self.hotspot.is_none()
        {
            tracing::debug!("edge scroll stopped");
            self.frame_pending = false;
        }
        delta
    }

    /// Recompute both axis intentions from the current hotspot
    fn evaluate<H: DocumentHost>(&mut self, config: &DragConfig, host: &H) {
        let (Some(scrollable), Some(hotspot)) = (self.scrollable, self.hotspot) else {
            self.horizontal = AxisState::default();
            self.vertical = AxisState::default();
            return;
        };
        let rect = host.bounding_rect(scrollable);
        let metrics = host.scroll_metrics(scrollable);
        let threshold = config.scroll_threshold;

        self.horizontal = axis_intention(
            hotspot.x,
            rect.left(),
            rect.right(),
            metrics.scroll_left,
            metrics.max_scroll_left(),
            threshold,
        );
        self.vertical = axis_intention(
            hotspot.y,
            rect.top(),
            rect.bottom(),
            metrics.scroll_top,
            metrics.max_scroll_top(),
            threshold,
        );
    }
}

fn scroll_step(config: &DragConfig, axis: &AxisState, threshold: f64) -> f64 {
    if axis.intention == 0 {
        return 0.0;
    }
    (config.scroll_velocity_at(axis.dynamic_velocity, threshold) * axis.intention as f64).round()
}

/// Intention for one axis: -1/+1 inside the edge threshold with room left
/// to scroll, 0 otherwise
fn axis_intention(
    position: f64,
    near_edge: f64,
    far_edge: f64,
    scroll_offset: f64,
    max_scroll: f64,
    threshold: f64,
) -> AxisState {
    let near_distance = position - near_edge;
    let far_distance = far_edge - position;

    if near_distance < threshold {
        if scroll_offset <= 0.0 {
            // Already at the near extreme
            AxisState::default()
        } else {
            AxisState { intention: -1, dynamic_velocity: (near_distance - threshold).abs() }
        }
    } else if far_distance < threshold {
        if scroll_offset >= max_scroll {
            AxisState::default()
        } else {
            AxisState { intention: 1, dynamic_velocity: (far_distance - threshold).abs() }
        }
    } else {
        AxisState::default()
    }
}

/// Walk upward to the nearest element with overflow capacity its computed
/// overflow style lets it use; the viewport container is the fallback
fn find_scrollable_ancestor<H: DocumentHost + ?Sized>(host: &H, start: ElementId) -> ElementId {
    let mut current = Some(start);
    while let Some(el) = current {
        if el == host.root() {
            break;
        }
        if can_scroll(host, el) {
            return el;
        }
        current = host.parent(el);
    }
    host.root()
}

fn can_scroll<H: DocumentHost + ?Sized>(host: &H, el: ElementId) -> bool {
    let metrics = host.scroll_metrics(el);
    let allows = |property: &str| {
        matches!(host.computed_style(el, property).as_deref(), Some("auto") | Some("scroll"))
    };
    (metrics.has_horizontal_overflow() && allows("overflow-x"))
        || (metrics.has_vertical_overflow() && allows("overflow-y"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;
    use touchdnd_core::{Rect, ScrollMetrics};

    fn scrollable_host() -> (FakeHost, ElementId, ElementId) {
        let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
        let container =
            host.add_element(host.root(), "div", Rect::from_xywh(100.0, 100.0, 200.0, 200.0));
        host.set_style(container, "overflow-y", "auto");
        host.set_scroll_metrics(
            container,
            ScrollMetrics {
                scroll_left: 0.0,
                scroll_top: 50.0,
                scroll_width: 200.0,
                scroll_height: 800.0,
                client_width: 200.0,
                client_height: 200.0,
            },
        );
        let inner = host.add_element(container, "p", Rect::from_xywh(110.0, 110.0, 180.0, 40.0));
        (host, container, inner)
    }

    #[test]
    fn test_intention_near_edge_schedules_frame() {
        let (host, _, inner) = scrollable_host();
        let config = DragConfig::default();
        let mut automaton = ScrollAutomaton::new();

        // 20px from the container's top edge, well inside the 75px threshold
        automaton.on_touch_move(&config, &host, Point::new(200.0, 120.0), Some(inner));

        assert_eq!(automaton.intentions(), (0, -1));
        assert!(automaton.frame_pending());
    }

    #[test]
    fn test_intention_clamped_at_extreme() {
        let (mut host, container, inner) = scrollable_host();
        let mut metrics = host.scroll_metrics(container);
        metrics.scroll_top = 0.0;
        host.set_scroll_metrics(container, metrics);

        let config = DragConfig::default();
        let mut automaton = ScrollAutomaton::new();
        automaton.on_touch_move(&config, &host, Point::new(200.0, 120.0), Some(inner));

        assert_eq!(automaton.intentions(), (0, 0));
        assert!(!automaton.frame_pending());
    }

    #[test]
    fn test_frame_scrolls_inner_container_without_image_delta() {
        let (mut host, container, inner) = scrollable_host();
        let config = DragConfig::default();
        let mut automaton = ScrollAutomaton::new();

        // Near the bottom edge: positive vertical intention
        automaton.on_touch_move(&config, &host, Point::new(200.0, 290.0), Some(inner));
        assert_eq!(automaton.intentions(), (0, 1));

        let before = host.scroll_metrics(container).scroll_top;
        let delta = automaton.on_frame(&config, &mut host);

        assert!(host.scroll_metrics(container).scroll_top > before);
        assert_eq!(delta, Point::default());
    }

    #[test]
    fn test_frame_on_viewport_reports_image_delta() {
        let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
        host.set_scroll_metrics(
            host.root(),
            ScrollMetrics {
                scroll_left: 0.0,
                scroll_top: 0.0,
                scroll_width: 500.0,
                scroll_height: 2000.0,
                client_width: 500.0,
                client_height: 500.0,
            },
        );
        let el = host.add_element(host.root(), "div", Rect::from_xywh(0.0, 400.0, 500.0, 100.0));

        let config = DragConfig::default();
        let mut automaton = ScrollAutomaton::new();
        automaton.on_touch_move(&config, &host, Point::new(250.0, 470.0), Some(el));
        assert_eq!(automaton.intentions(), (0, 1));

        let delta = automaton.on_frame(&config, &mut host);
        assert!(delta.y > 0.0);
        assert!(host.scroll_metrics(host.root()).scroll_top > 0.0);
    }

    #[test]
    fn test_frame_stands_down_when_intentions_clear() {
        let (mut host, container, inner) = scrollable_host();
        let config = DragConfig::default();
        let mut automaton = ScrollAutomaton::new();

        automaton.on_touch_move(&config, &host, Point::new(200.0, 290.0), Some(inner));
        assert!(automaton.frame_pending());

        // Scroll until the container bottoms out; the automaton cancels itself
        let mut frames = 0;
        while automaton.frame_pending() && frames < 200 {
            automaton.on_frame(&config, &mut host);
            frames += 1;
        }
        assert!(!automaton.frame_pending());
        let metrics = host.scroll_metrics(container);
        assert_eq!(metrics.scroll_top, metrics.max_scroll_top());
    }
}
