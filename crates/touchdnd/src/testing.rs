//! Scripted fake document host
//!
//! A flat element tree with scripted rects, styles, and listeners, letting
//! the state machine run without a live document. Used by this crate's own
//! tests and available to embedders for theirs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use touchdnd_core::{DragEvent, DragEventKind, ElementId, Rect, ScrollMetrics};

use crate::error::SetupError;
use crate::host::{DocumentHost, DragNotice};

type Listener = Rc<RefCell<dyn FnMut(&mut DragEvent)>>;

/// One scripted element
struct FakeElement {
    parent: Option<ElementId>,
    tag: String,
    rect: Rect,
    draggable: bool,
    text: bool,
    /// Drag images are excluded from hit testing
    hittable: bool,
    styles: HashMap<String, String>,
    classes: Vec<String>,
    scroll: ScrollMetrics,
    translation: Option<(f64, f64)>,
    removed: bool,
}

/// Scripted in-memory implementation of [`DocumentHost`]
pub struct FakeHost {
    elements: Vec<FakeElement>,
    root: ElementId,
    listeners: HashMap<(ElementId, DragEventKind), Vec<Listener>>,
    /// Every dispatched event, in order: kind, target, default prevented
    pub events: Vec<(DragEventKind, ElementId, bool)>,
    /// Every deferred-start notification, in order
    pub notices: Vec<(ElementId, DragNotice)>,
    /// Make drag-image creation fail, for setup-error tests
    pub fail_drag_image: bool,
}

impl FakeHost {
    /// Create a host whose root (viewport container) has the given rect
    pub fn new(viewport: Rect) -> Self {
        let root = FakeElement {
            parent: None,
            tag: "html".to_string(),
            rect: viewport,
            draggable: false,
            text: false,
            hittable: true,
            styles: HashMap::new(),
            classes: Vec::new(),
            scroll: ScrollMetrics {
                scroll_left: 0.0,
                scroll_top: 0.0,
                scroll_width: viewport.width,
                scroll_height: viewport.height,
                client_width: viewport.width,
                client_height: viewport.height,
            },
            translation: None,
            removed: false,
        };
        Self {
            elements: vec![root],
            root: ElementId(0),
            listeners: HashMap::new(),
            events: Vec::new(),
            notices: Vec::new(),
            fail_drag_image: false,
        }
    }

    /// Add an element; later-added elements win hit testing, like paint order
    pub fn add_element(&mut self, parent: ElementId, tag: &str, rect: Rect) -> ElementId {
        let id = ElementId(self.elements.len() as u64);
        self.elements.push(FakeElement {
            parent: Some(parent),
            tag: tag.to_string(),
            rect,
            draggable: false,
            text: false,
            hittable: true,
            styles: HashMap::new(),
            classes: Vec::new(),
            scroll: ScrollMetrics {
                scroll_left: 0.0,
                scroll_top: 0.0,
                scroll_width: rect.width,
                scroll_height: rect.height,
                client_width: rect.width,
                client_height: rect.height,
            },
            translation: None,
            removed: false,
        });
        id
    }

    pub fn set_draggable(&mut self, el: ElementId, draggable: bool) {
        self.element_mut(el).draggable = draggable;
    }

    pub fn set_text(&mut self, el: ElementId, text: bool) {
        self.element_mut(el).text = text;
    }

    pub fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        self.element_mut(el).styles.insert(property.to_string(), value.to_string());
    }

    pub fn set_scroll_metrics(&mut self, el: ElementId, metrics: ScrollMetrics) {
        self.element_mut(el).scroll = metrics;
    }

    /// Register a listener for one event kind at one element. Listeners run
    /// along the bubble path from the target up to the root.
    pub fn on(
        &mut self,
        target: ElementId,
        kind: DragEventKind,
        listener: impl FnMut(&mut DragEvent) + 'static,
    ) {
        self.listeners
            .entry((target, kind))
            .or_default()
            .push(Rc::new(RefCell::new(listener)));
    }

    /// Whether the element is still attached to the document
    pub fn is_attached(&self, el: ElementId) -> bool {
        !self.element(el).removed
    }

    /// Classes currently on the element
    pub fn classes(&self, el: ElementId) -> Vec<String> {
        self.element(el).classes.clone()
    }

    /// Last translation applied to the element
    pub fn translation(&self, el: ElementId) -> Option<(f64, f64)> {
        self.element(el).translation
    }

    /// Elements currently attached and carrying the given class
    pub fn attached_with_class(&self, class: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.removed && e.classes.iter().any(|c| c == class))
            .map(|(i, _)| ElementId(i as u64))
            .collect()
    }

    /// Dispatched event kinds in order, for terse assertions
    pub fn event_kinds(&self) -> Vec<DragEventKind> {
        self.events.iter().map(|(kind, _, _)| *kind).collect()
    }

    fn element(&self, el: ElementId) -> &FakeElement {
        &self.elements[el.0 as usize]
    }

    fn element_mut(&mut self, el: ElementId) -> &mut FakeElement {
        &mut self.elements[el.0 as usize]
    }

    fn effective_rect(&self, el: ElementId) -> Rect {
        let element = self.element(el);
        match element.translation {
            Some((x, y)) => Rect::from_xywh(x, y, element.rect.width, element.rect.height),
            None => element.rect,
        }
    }
}

impl DocumentHost for FakeHost {
    fn root(&self) -> ElementId {
        self.root
    }

    fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.element(el).parent
    }

    fn is_draggable(&self, el: ElementId) -> bool {
        self.element(el).draggable
    }

    fn is_text(&self, el: ElementId) -> bool {
        self.element(el).text
    }

    fn tag_name(&self, el: ElementId) -> String {
        self.element(el).tag.clone()
    }

    fn element_at_point(&self, x: f64, y: f64) -> Option<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .rev()
            .find(|(i, e)| {
                !e.removed
                    && e.hittable
                    && self.effective_rect(ElementId(*i as u64)).contains_point(x, y)
            })
            .map(|(i, _)| ElementId(i as u64))
    }

    fn computed_style(&self, el: ElementId, property: &str) -> Option<String> {
        self.element(el).styles.get(property).cloned()
    }

    fn bounding_rect(&self, el: ElementId) -> Rect {
        self.effective_rect(el)
    }

    fn scroll_metrics(&self, el: ElementId) -> ScrollMetrics {
        self.element(el).scroll
    }

    fn scroll_by(&mut self, el: ElementId, dx: f64, dy: f64) {
        let element = self.element_mut(el);
        element.scroll.scroll_left =
            (element.scroll.scroll_left + dx).clamp(0.0, element.scroll.max_scroll_left());
        element.scroll.scroll_top =
            (element.scroll.scroll_top + dy).clamp(0.0, element.scroll.max_scroll_top());
    }

    fn dispatch(&mut self, event: &mut DragEvent) -> bool {
        // Bubble from the target to the root
        let mut path = vec![event.target];
        let mut current = event.target;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        for el in path {
            let listeners = self.listeners.get(&(el, event.kind)).cloned().unwrap_or_default();
            for listener in listeners {
                (listener.borrow_mut())(event);
            }
        }
        self.events.push((event.kind, event.target, event.default_prevented()));
        event.default_prevented()
    }

    fn dispatch_notice(&mut self, target: ElementId, notice: DragNotice) {
        self.notices.push((target, notice));
    }

    fn create_drag_image(&mut self, source: ElementId) -> Result<ElementId, SetupError> {
        if self.fail_drag_image {
            return Err(SetupError::DragImage("scripted failure".to_string()));
        }
        let rect = self.element(source).rect;
        let tag = self.element(source).tag.clone();
        let image = self.add_element(self.root, &tag, rect);
        self.element_mut(image).hittable = false;
        Ok(image)
    }

    fn remove_element(&mut self, el: ElementId) {
        self.element_mut(el).removed = true;
    }

    fn set_translate(&mut self, el: ElementId, x: f64, y: f64) {
        self.element_mut(el).translation = Some((x, y));
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        let element = self.element_mut(el);
        if !element.classes.iter().any(|c| c == class) {
            element.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        self.element_mut(el).classes.retain(|c| c != class);
    }
}
