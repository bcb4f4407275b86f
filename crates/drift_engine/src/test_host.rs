//! In-memory [`ScrollHost`] fixture for tests
//!
//! Models a small element tree with selector marks, recorded styles and
//! classes, and explicit binding/timer ledgers so tests can observe every
//! side effect the engine produces and drive timer expiry by hand.

use std::cell::RefCell;

use drift_core::geometry::RectBox;
use rustc_hash::FxHashMap;

use crate::host::{
    BindingId, ElementRef, EventKind, ScrollHost, StyleCapabilities, TimerId,
};

const WINDOW: ElementRef = ElementRef(0);
const ROOT: ElementRef = ElementRef(1);

struct MockElement {
    parent: Option<ElementRef>,
    selectors: Vec<String>,
    config: Option<String>,
    bbox: Option<RectBox>,
    layout: (f32, f32),
    scroll: (f32, f32),
    styles: FxHashMap<String, String>,
    classes: Vec<String>,
    attached: bool,
}

impl MockElement {
    fn new(tag: &str, parent: Option<ElementRef>) -> Self {
        Self {
            parent,
            selectors: vec![tag.to_owned()],
            config: None,
            bbox: None,
            layout: (0.0, 0.0),
            scroll: (0.0, 0.0),
            styles: FxHashMap::default(),
            classes: Vec::new(),
            attached: true,
        }
    }
}

struct MockBinding {
    id: BindingId,
    element: ElementRef,
    event: EventKind,
    active: bool,
}

struct MockState {
    elements: Vec<(ElementRef, MockElement)>,
    next_element: u64,
    document_scroll: (f32, f32),
    viewport: (f32, f32),
    capabilities: StyleCapabilities,
    bindings: Vec<MockBinding>,
    next_binding: u64,
    timers: Vec<(TimerId, u64)>,
    next_timer: u64,
}

/// Scriptable host with full side-effect recording.
pub(crate) struct MockHost {
    state: RefCell<MockState>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MockState {
                elements: vec![
                    (WINDOW, MockElement::new("window", None)),
                    (ROOT, MockElement::new("html", None)),
                ],
                next_element: 2,
                document_scroll: (0.0, 0.0),
                viewport: (0.0, 0.0),
                capabilities: StyleCapabilities::default(),
                bindings: Vec::new(),
                next_binding: 0,
                timers: Vec::new(),
                next_timer: 0,
            }),
        }
    }

    /// Add an element; its tag doubles as a matchable selector.
    pub fn add_element(&self, tag: &str, parent: Option<ElementRef>) -> ElementRef {
        let mut state = self.state.borrow_mut();
        let id = ElementRef(state.next_element);
        state.next_element += 1;
        state.elements.push((id, MockElement::new(tag, parent)));
        id
    }

    /// Mark the element as matching an additional selector.
    pub fn mark(&self, element: ElementRef, selector: &str) {
        self.with_element(element, |e| e.selectors.push(selector.to_owned()));
    }

    pub fn set_config(&self, element: ElementRef, blob: &str) {
        self.with_element(element, |e| e.config = Some(blob.to_owned()));
    }

    pub fn set_bbox(&self, element: ElementRef, bbox: RectBox) {
        self.with_element(element, |e| e.bbox = Some(bbox));
    }

    pub fn set_layout(&self, element: ElementRef, width: f32, height: f32) {
        self.with_element(element, |e| e.layout = (width, height));
    }

    pub fn set_scroll(&self, element: ElementRef, left: f32, top: f32) {
        self.with_element(element, |e| e.scroll = (left, top));
    }

    pub fn set_viewport(&self, width: f32, height: f32) {
        self.state.borrow_mut().viewport = (width, height);
    }

    pub fn set_document_scroll(&self, left: f32, top: f32) {
        self.state.borrow_mut().document_scroll = (left, top);
    }

    pub fn set_capabilities(&self, capabilities: StyleCapabilities) {
        self.state.borrow_mut().capabilities = capabilities;
    }

    /// Detach the element: it stops existing and stops matching queries.
    pub fn detach(&self, element: ElementRef) {
        self.with_element(element, |e| {
            e.attached = false;
            e.bbox = None;
        });
    }

    pub fn style_of(&self, element: ElementRef, property: &str) -> Option<String> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|(id, _)| *id == element)
            .and_then(|(_, e)| e.styles.get(property).cloned())
    }

    pub fn has_class(&self, element: ElementRef, class: &str) -> bool {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|(id, _)| *id == element)
            .is_some_and(|(_, e)| e.classes.iter().any(|c| c == class))
    }

    /// Bindings not yet unbound, as `(element, event)` pairs.
    pub fn active_bindings(&self) -> Vec<(ElementRef, EventKind)> {
        self.state
            .borrow()
            .bindings
            .iter()
            .filter(|b| b.active)
            .map(|b| (b.element, b.event))
            .collect()
    }

    /// Armed timers not yet cleared or completed.
    pub fn pending_timers(&self) -> Vec<(TimerId, u64)> {
        self.state.borrow().timers.clone()
    }

    /// Simulate host-side expiry; the test then reports it to the engine.
    pub fn complete_timer(&self, timer: TimerId) {
        self.state.borrow_mut().timers.retain(|(id, _)| *id != timer);
    }

    fn with_element(&self, element: ElementRef, f: impl FnOnce(&mut MockElement)) {
        let mut state = self.state.borrow_mut();
        if let Some((_, e)) = state.elements.iter_mut().find(|(id, _)| *id == element) {
            f(e);
        }
    }

}

fn is_descendant_of(state: &MockState, element: ElementRef, scope: ElementRef) -> bool {
    // The window scopes like the document root.
    let scope = if scope == WINDOW { ROOT } else { scope };
    let mut current = state
        .elements
        .iter()
        .find(|(id, _)| *id == element)
        .and_then(|(_, e)| e.parent);
    loop {
        match current {
            Some(parent) if parent == scope => return true,
            Some(parent) => {
                current = state
                    .elements
                    .iter()
                    .find(|(id, _)| *id == parent)
                    .and_then(|(_, e)| e.parent);
            }
            // Parentless elements hang directly under the root.
            None => return scope == ROOT,
        }
    }
}

impl ScrollHost for MockHost {
    fn window(&self) -> ElementRef {
        WINDOW
    }

    fn root(&self) -> ElementRef {
        ROOT
    }

    fn exists(&self, element: ElementRef) -> bool {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|(id, _)| *id == element)
            .is_some_and(|(_, e)| e.attached)
    }

    fn is_window(&self, element: ElementRef) -> bool {
        element == WINDOW
    }

    fn query(&self, scope: ElementRef, selector: &str) -> Vec<ElementRef> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .filter(|(id, e)| {
                *id != WINDOW
                    && *id != ROOT
                    && e.attached
                    && e.selectors.iter().any(|s| s == selector)
                    && is_descendant_of(&state, *id, scope)
            })
            .map(|(id, _)| *id)
            .collect()
    }

    fn config_blob(&self, element: ElementRef) -> Option<String> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|(id, _)| *id == element)
            .and_then(|(_, e)| e.config.clone())
    }

    fn bounding_box(&self, element: ElementRef) -> Option<RectBox> {
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|(id, _)| *id == element)
            .and_then(|(_, e)| e.bbox)
    }

    fn document_scroll(&self) -> (f32, f32) {
        self.state.borrow().document_scroll
    }

    fn viewport_size(&self) -> (f32, f32) {
        self.state.borrow().viewport
    }

    fn layout_size(&self, element: ElementRef) -> (f32, f32) {
        if element == WINDOW {
            return self.viewport_size();
        }
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|(id, _)| *id == element)
            .map(|(_, e)| e.layout)
            .unwrap_or((0.0, 0.0))
    }

    fn scroll_offset(&self, element: ElementRef) -> (f32, f32) {
        if element == WINDOW {
            return self.document_scroll();
        }
        let state = self.state.borrow();
        state
            .elements
            .iter()
            .find(|(id, _)| *id == element)
            .map(|(_, e)| e.scroll)
            .unwrap_or((0.0, 0.0))
    }

    fn set_style(&self, element: ElementRef, property: &str, value: &str) {
        self.with_element(element, |e| {
            e.styles.insert(property.to_owned(), value.to_owned());
        });
    }

    fn add_class(&self, element: ElementRef, class: &str) {
        self.with_element(element, |e| {
            if !e.classes.iter().any(|c| c == class) {
                e.classes.push(class.to_owned());
            }
        });
    }

    fn remove_class(&self, element: ElementRef, class: &str) {
        self.with_element(element, |e| e.classes.retain(|c| c != class));
    }

    fn bind(&self, element: ElementRef, event: EventKind) -> BindingId {
        let mut state = self.state.borrow_mut();
        let id = BindingId(state.next_binding);
        state.next_binding += 1;
        state.bindings.push(MockBinding {
            id,
            element,
            event,
            active: true,
        });
        id
    }

    fn unbind(&self, binding: BindingId) {
        let mut state = self.state.borrow_mut();
        if let Some(b) = state.bindings.iter_mut().find(|b| b.id == binding) {
            b.active = false;
        }
    }

    fn set_timeout(&self, delay_ms: u64) -> TimerId {
        let mut state = self.state.borrow_mut();
        let id = TimerId(state.next_timer);
        state.next_timer += 1;
        state.timers.push((id, delay_ms));
        id
    }

    fn clear_timeout(&self, timer: TimerId) {
        self.state.borrow_mut().timers.retain(|(id, _)| *id != timer);
    }

    fn capabilities(&self) -> StyleCapabilities {
        self.state.borrow().capabilities.clone()
    }
}
