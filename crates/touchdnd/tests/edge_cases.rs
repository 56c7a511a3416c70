//! Deferred starts, setup failures, image overrides, and edge scrolling.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use touchdnd::testing::FakeHost;
use touchdnd::{
    DocumentHost, DragConfig, DragDropContext, DragEventKind, DragNotice, DragOperationState,
    ElementId, Point,
    Rect, ScrollMetrics, SetupError, TouchPhase, TouchPoint, TouchSample, CLASS_DRAG_IMAGE,
};

fn touch(x: f64, y: f64, target: Option<ElementId>) -> TouchPoint {
    let mut touch = TouchPoint::new(1, x, y);
    touch.target = target;
    touch
}

fn start_sample(x: f64, y: f64, target: ElementId) -> TouchSample {
    let touch = touch(x, y, Some(target));
    TouchSample::new(TouchPhase::Start, vec![touch.clone()], vec![touch])
}

fn move_sample(x: f64, y: f64) -> TouchSample {
    let touch = touch(x, y, None);
    TouchSample::new(TouchPhase::Move, vec![touch.clone()], vec![touch])
}

fn end_sample(x: f64, y: f64) -> TouchSample {
    TouchSample::new(TouchPhase::End, Vec::new(), vec![touch(x, y, None)])
}

fn host_with_source() -> (FakeHost, ElementId) {
    let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
    let source = host.add_element(host.root(), "div", Rect::from_xywh(10.0, 10.0, 50.0, 50.0));
    host.set_draggable(source, true);
    (host, source)
}

#[test]
fn test_hold_to_drag_defers_then_promotes() {
    let (mut host, source) = host_with_source();
    let config = DragConfig {
        hold_to_drag: Some(Duration::from_millis(100)),
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    assert!(context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now));
    assert_eq!(host.notices, vec![(source, DragNotice::Pending)]);
    assert!(!context.has_active_operation());

    // Still waiting out the hold delay
    context.poll(&mut host, now + Duration::from_millis(50));
    assert!(!context.has_active_operation());

    context.poll(&mut host, now + Duration::from_millis(150));
    assert!(context.has_active_operation());
    assert_eq!(context.active().unwrap().state(), DragOperationState::Potential);

    let promoted = now + Duration::from_millis(150);
    assert!(context.on_touch_move(&mut host, &move_sample(100.0, 100.0), promoted).unwrap());
    assert_eq!(host.event_kinds(), vec![DragEventKind::DragStart]);
}

#[test]
fn test_hold_to_drag_abandoned_by_early_end() {
    let (mut host, source) = host_with_source();
    let config = DragConfig {
        hold_to_drag: Some(Duration::from_millis(100)),
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    context.on_touch_end(&mut host, &end_sample(20.0, 20.0));

    assert_eq!(
        host.notices,
        vec![(source, DragNotice::Pending), (source, DragNotice::Cancel)]
    );
    assert!(!context.has_active_operation());
    assert!(host.events.is_empty());

    // The slot is free again
    assert!(context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now));
}

#[test]
fn test_hold_to_drag_abandoned_by_movement() {
    let (mut host, source) = host_with_source();
    let config = DragConfig {
        hold_to_drag: Some(Duration::from_millis(100)),
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    let suppress = context.on_touch_move(&mut host, &move_sample(40.0, 40.0), now).unwrap();

    assert!(!suppress);
    assert_eq!(host.notices.last(), Some(&(source, DragNotice::Cancel)));
    assert!(!context.has_active_operation());
}

#[test]
fn test_drag_image_failure_releases_the_slot() {
    let (mut host, source) = host_with_source();
    host.fail_drag_image = true;

    let ended: Rc<RefCell<Vec<DragOperationState>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = ended.clone();
    let config = DragConfig {
        on_operation_end: Some(Box::new(move |state, _| sink.borrow_mut().push(state))),
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    let result = context.on_touch_move(&mut host, &move_sample(100.0, 100.0), now);

    assert!(matches!(result, Err(SetupError::DragImage(_))));
    assert!(host.events.is_empty());
    assert!(!context.has_active_operation());
    assert_eq!(&*ended.borrow(), &[DragOperationState::Cancelled]);

    // The failure left nothing behind; the next touch can drag
    host.fail_drag_image = false;
    assert!(context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now));
    assert!(context.on_touch_move(&mut host, &move_sample(100.0, 100.0), now).unwrap());
}

#[test]
fn test_set_drag_image_overrides_generated_image() {
    let (mut host, source) = host_with_source();
    let custom = host.add_element(host.root(), "img", Rect::from_xywh(0.0, 0.0, 40.0, 40.0));
    host.on(source, DragEventKind::DragStart, move |event| {
        event.data_transfer.set_drag_image(custom, 5.0, 5.0);
    });

    let mut context = DragDropContext::new(DragConfig::default());
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    context.on_touch_move(&mut host, &move_sample(100.0, 100.0), now).unwrap();

    // Exactly one image survives, positioned so the requested point of the
    // override sits under the touch
    let images = host.attached_with_class(CLASS_DRAG_IMAGE);
    assert_eq!(images.len(), 1);
    assert_eq!(host.translation(images[0]), Some((95.0, 95.0)));
}

#[test]
fn test_center_on_touch_positioning() {
    let (mut host, source) = host_with_source();
    let config = DragConfig {
        drag_image_center_on_touch: true,
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    context.on_touch_move(&mut host, &move_sample(200.0, 200.0), now).unwrap();

    // The image clones the 50x50 source rect
    let images = host.attached_with_class(CLASS_DRAG_IMAGE);
    assert_eq!(host.translation(images[0]), Some((175.0, 175.0)));
}

#[test]
fn test_fixed_offset_positioning() {
    let (mut host, source) = host_with_source();
    let config = DragConfig {
        drag_image_offset: Point::new(10.0, -20.0),
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    context.on_touch_move(&mut host, &move_sample(200.0, 200.0), now).unwrap();

    let images = host.attached_with_class(CLASS_DRAG_IMAGE);
    assert_eq!(host.translation(images[0]), Some((210.0, 180.0)));
}

#[test]
fn test_edge_scroll_moves_viewport_and_image() {
    let (mut host, source) = host_with_source();
    let root = host.root();
    host.set_scroll_metrics(
        root,
        ScrollMetrics {
            scroll_left: 0.0,
            scroll_top: 0.0,
            scroll_width: 500.0,
            scroll_height: 2000.0,
            client_width: 500.0,
            client_height: 500.0,
        },
    );

    let mut context = DragDropContext::new(DragConfig::default());
    let interval = context.config().iteration_interval;
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    context.on_touch_move(&mut host, &move_sample(250.0, 460.0), now).unwrap();
    // First tick establishes the hovered element for the scroller
    context.poll(&mut host, now + interval);
    context.on_touch_move(&mut host, &move_sample(250.0, 470.0), now + interval).unwrap();

    let before = host.translation(host.attached_with_class(CLASS_DRAG_IMAGE)[0]).unwrap();
    context.on_frame(&mut host);

    assert!(host.scroll_metrics(root).scroll_top > 0.0);
    // Fixed-position image math tracks the viewport scroll
    let after = host.translation(host.attached_with_class(CLASS_DRAG_IMAGE)[0]).unwrap();
    assert_eq!(after.0, before.0);
    assert!(after.1 > before.1);
}

#[test]
fn test_translate_override_owns_the_image() {
    let (mut host, source) = host_with_source();
    let config = DragConfig {
        translate_override: Some(Box::new(|_, computed| {
            Some(Point::new(computed.x + 100.0, computed.y))
        })),
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    context.on_touch_move(&mut host, &move_sample(200.0, 200.0), now).unwrap();

    let images = host.attached_with_class(CLASS_DRAG_IMAGE);
    assert_eq!(host.translation(images[0]), Some((300.0, 200.0)));
}

#[test]
fn test_custom_image_factory_failure_propagates() {
    let (mut host, source) = host_with_source();
    let config = DragConfig {
        drag_image_factory: Some(Box::new(|_, _| Err(SetupError::SourceGone))),
        ..DragConfig::default()
    };
    let mut context = DragDropContext::new(config);
    let now = Instant::now();

    context.on_touch_start(&mut host, &start_sample(20.0, 20.0, source), now);
    let result = context.on_touch_move(&mut host, &move_sample(100.0, 100.0), now);

    assert_eq!(result, Err(SetupError::SourceGone));
    assert!(!context.has_active_operation());
}
