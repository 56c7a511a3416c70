//! Example: Driving a drag from scripted touch input

use std::time::Instant;

use touchdnd::testing::FakeHost;
use touchdnd::{
    DocumentHost, DragConfig, DragDropContext, DragEventKind, DropEffect, EffectAllowed, Rect,
    TouchPhase, TouchPoint, TouchSample,
};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let mut host = FakeHost::new(Rect::from_xywh(0.0, 0.0, 500.0, 500.0));
    let card = host.add_element(host.root(), "div", Rect::from_xywh(10.0, 10.0, 50.0, 50.0));
    host.set_draggable(card, true);
    let zone = host.add_element(host.root(), "div", Rect::from_xywh(200.0, 200.0, 100.0, 100.0));

    host.on(card, DragEventKind::DragStart, |event| {
        event.data_transfer.set_effect_allowed(EffectAllowed::Move);
        let _ = event.data_transfer.set_data("text/plain", "card #42");
    });
    host.on(zone, DragEventKind::DragEnter, |event| event.prevent_default());
    host.on(zone, DragEventKind::DragOver, |event| {
        event.data_transfer.set_drop_effect(DropEffect::Move);
        event.prevent_default();
    });
    host.on(zone, DragEventKind::Drop, |event| {
        println!("dropped payload: {:?}", event.data_transfer.get_data("text/plain"));
        event.prevent_default();
    });

    let mut context = DragDropContext::new(DragConfig::default());
    let interval = context.config().iteration_interval;
    let now = Instant::now();

    let press = {
        let mut touch = TouchPoint::new(1, 20.0, 20.0);
        touch.target = Some(card);
        TouchSample::new(TouchPhase::Start, vec![touch.clone()], vec![touch])
    };
    let drag = {
        let touch = TouchPoint::new(1, 250.0, 250.0);
        TouchSample::new(TouchPhase::Move, vec![touch.clone()], vec![touch])
    };
    let lift =
        TouchSample::new(TouchPhase::End, Vec::new(), vec![TouchPoint::new(1, 250.0, 250.0)]);

    context.on_touch_start(&mut host, &press, now);
    context.on_touch_move(&mut host, &drag, now).unwrap();
    context.poll(&mut host, now + interval);
    context.on_touch_end(&mut host, &lift);
    context.poll(&mut host, now + interval * 2);

    for (kind, target, prevented) in &host.events {
        println!("{:<9} at {:?} (prevented: {})", kind.as_str(), target, prevented);
    }
}
