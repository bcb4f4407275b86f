//! Frame controller
//!
//! [`Parallax`] owns one scroll frame: it scans for containers, recomputes
//! ratios on every scroll tick, projects styles, and manages lifecycle
//! (init, reload, resize coalescing, destroy). The host drives it by calling
//! [`scroll`](Parallax::scroll), [`handle_resize`](Parallax::handle_resize)
//! and [`timer_fired`](Parallax::timer_fired) when the bound events and
//! timers fire.
//!
//! Handles are cheap `Rc` clones; everything is single-threaded and interior
//! mutability is scoped so event callbacks may freely call back into the
//! engine (reload, unsubscribe, even destroy) mid-dispatch.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use drift_core::error::EngineError;
use drift_core::events::{dispatch, CallbackHandle, CallbackRegistry, EngineEvent, EventContext};
use drift_core::geometry::Axis;
use drift_core::ratio::compute_ratio;
use drift_core::value::PropertyMap;
use tracing::{debug, warn};

use crate::config::{parse_inline_config, InlineConfig, Options, OptionsPatch};
use crate::host::{BindingId, ElementRef, EventKind, ScrollHost, StyleCapabilities, TimerId};
use crate::position::{frame_offset, position};
use crate::projector::project;
use crate::registry::SharedRegistry;

/// Class applied to the frame (or document root) while scrolling when the
/// performance freeze is enabled.
pub const PERFORMANCE_CLASS: &str = "drift-performance";

/// Resize reloads coalesce through a zero-delay timer.
const RESIZE_COALESCE_MS: u64 = 0;

/// The freeze class lifts this long after the last scroll tick.
const FREEZE_RELEASE_MS: u64 = 100;

// ============================================================================
// Scanned structure
// ============================================================================

/// One parallax element inside a container.
struct Element {
    element: ElementRef,
    properties: Option<PropertyMap>,
    horizontal: Option<bool>,
}

/// A scanned container and its parallax elements.
struct Container {
    element: ElementRef,
    offset: Option<f32>,
    elements: Vec<Element>,
}

/// Lifecycle state. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Uninitialized,
    Initialized,
    Destroyed,
}

// ============================================================================
// Engine
// ============================================================================

struct EngineInner {
    host: Rc<dyn ScrollHost>,
    frame: ElementRef,
    frame_is_window: bool,
    /// Element carrying [`PERFORMANCE_CLASS`] while frozen.
    freezer: ElementRef,
    registry: SharedRegistry,
    capabilities: StyleCapabilities,
    options: RefCell<Options>,
    axis: Cell<Axis>,
    parents: RefCell<Vec<Container>>,
    callbacks: RefCell<CallbackRegistry>,
    state: Cell<EngineState>,
    bindings: RefCell<Vec<BindingId>>,
    resize_timer: Cell<Option<TimerId>>,
    freeze_timer: Cell<Option<TimerId>>,
    frozen: Cell<bool>,
}

impl EngineInner {
    fn release_resources(&self) {
        for binding in self.bindings.borrow_mut().drain(..) {
            self.host.unbind(binding);
        }
        if let Some(timer) = self.resize_timer.take() {
            self.host.clear_timeout(timer);
        }
        if let Some(timer) = self.freeze_timer.take() {
            self.host.clear_timeout(timer);
        }
        if self.frozen.get() {
            self.host.remove_class(self.freezer, PERFORMANCE_CLASS);
            self.frozen.set(false);
        }
        self.registry.borrow_mut().release(self.frame);
    }
}

impl Drop for EngineInner {
    fn drop(&mut self) {
        // A handle dropped without destroy still releases its frame claim
        // and host resources; no events fire.
        if self.state.get() != EngineState::Destroyed {
            self.release_resources();
        }
    }
}

/// A parallax engine bound to one scroll frame.
///
/// Cloning produces another handle to the same engine.
#[derive(Clone)]
pub struct Parallax {
    inner: Rc<EngineInner>,
}

/// Non-owning handle, for callbacks that must not keep the engine alive.
#[derive(Clone)]
pub struct WeakParallax {
    inner: Weak<EngineInner>,
}

impl WeakParallax {
    /// Recover a strong handle while the engine is still alive.
    pub fn upgrade(&self) -> Option<Parallax> {
        self.inner.upgrade().map(|inner| Parallax { inner })
    }
}

impl Parallax {
    /// Build an engine for `frame`, claiming it in `registry`.
    ///
    /// Fails if the frame does not exist or already has a live engine. The
    /// engine is inert until [`init`](Self::init); callbacks registered in
    /// between observe the initial `Load` and `Initialized` events.
    pub fn new(
        host: Rc<dyn ScrollHost>,
        frame: ElementRef,
        options: Options,
        registry: SharedRegistry,
    ) -> Result<Self, EngineError> {
        if !host.exists(frame) {
            warn!(frame = frame.0, "parallax frame is not available");
            return Err(EngineError::FrameUnavailable);
        }
        if let Err(err) = registry.borrow_mut().claim(frame) {
            warn!(frame = frame.0, "frame already has a live engine");
            return Err(err);
        }

        let capabilities = host.capabilities();
        let frame_is_window = host.is_window(frame);
        let freezer = if frame_is_window { host.root() } else { frame };
        let axis = Axis::from_horizontal(options.horizontal);

        Ok(Self {
            inner: Rc::new(EngineInner {
                host,
                frame,
                frame_is_window,
                freezer,
                registry,
                capabilities,
                options: RefCell::new(options),
                axis: Cell::new(axis),
                parents: RefCell::new(Vec::new()),
                callbacks: RefCell::new(CallbackRegistry::new()),
                state: Cell::new(EngineState::Uninitialized),
                bindings: RefCell::new(Vec::new()),
                resize_timer: Cell::new(None),
                freeze_timer: Cell::new(None),
                frozen: Cell::new(false),
            }),
        })
    }

    /// Downgrade to a non-owning handle.
    pub fn downgrade(&self) -> WeakParallax {
        WeakParallax {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// The frame this engine owns.
    pub fn frame(&self) -> ElementRef {
        self.inner.frame
    }

    /// Whether [`init`](Self::init) has run and the engine is live.
    pub fn is_initialized(&self) -> bool {
        self.inner.state.get() == EngineState::Initialized
    }

    /// Whether the engine has been torn down.
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.get() == EngineState::Destroyed
    }

    /// Snapshot of the current options.
    pub fn options(&self) -> Options {
        self.inner.options.borrow().clone()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Bind host events, run the initial scan, and go live.
    ///
    /// Only the first call does anything; a destroyed engine stays destroyed.
    pub fn init(&self) {
        let inner = &self.inner;
        if inner.state.get() != EngineState::Uninitialized {
            return;
        }

        {
            let mut bindings = inner.bindings.borrow_mut();
            bindings.push(inner.host.bind(inner.frame, EventKind::Scroll));
            bindings.push(inner.host.bind(inner.host.window(), EventKind::Resize));
        }
        inner.state.set(EngineState::Initialized);

        self.load();
        dispatch(
            &inner.callbacks,
            &EventContext::new(EngineEvent::Initialized),
        );
        debug!(frame = inner.frame.0, "parallax engine initialized");
    }

    /// Rescan containers and elements, then recompute immediately.
    ///
    /// The container list is rebuilt and swapped in whole, so a reload never
    /// leaves a half-updated scan behind. Fires `Load` afterwards.
    pub fn load(&self) {
        let inner = &self.inner;
        if inner.state.get() == EngineState::Destroyed {
            return;
        }

        let (parent_selector, elements_selector) = {
            let options = inner.options.borrow();
            inner.axis.set(Axis::from_horizontal(options.horizontal));
            (
                options.effective_parent_selector().to_owned(),
                options.effective_elements_selector().to_owned(),
            )
        };
        let scope = if inner.frame_is_window {
            inner.host.root()
        } else {
            inner.frame
        };

        let mut containers = Vec::new();
        for parent in inner.host.query(scope, &parent_selector) {
            let config = element_config(inner.host.as_ref(), parent);
            let elements = inner
                .host
                .query(parent, &elements_selector)
                .into_iter()
                .map(|element| {
                    let config = element_config(inner.host.as_ref(), element);
                    Element {
                        element,
                        properties: config.properties,
                        horizontal: config.horizontal,
                    }
                })
                .collect();
            containers.push(Container {
                element: parent,
                offset: config.offset,
                elements,
            });
        }
        debug!(
            frame = inner.frame.0,
            containers = containers.len(),
            "container scan complete"
        );
        *inner.parents.borrow_mut() = containers;

        self.scroll();
        dispatch(&inner.callbacks, &EventContext::new(EngineEvent::Load));
    }

    /// Merge an options patch and reload.
    pub fn set(&self, patch: OptionsPatch) {
        let inner = &self.inner;
        if inner.state.get() == EngineState::Destroyed {
            return;
        }
        patch.apply_to(&mut inner.options.borrow_mut());
        self.load();
    }

    /// Tear the engine down: unbind, cancel timers, release the frame claim.
    ///
    /// Fires `Destroy`, then drops all callbacks. Terminal: every later
    /// call on this engine is a no-op.
    pub fn destroy(&self) {
        let inner = &self.inner;
        if inner.state.get() == EngineState::Destroyed {
            return;
        }

        inner.release_resources();
        inner.parents.borrow_mut().clear();
        inner.state.set(EngineState::Destroyed);

        dispatch(&inner.callbacks, &EventContext::new(EngineEvent::Destroy));
        *inner.callbacks.borrow_mut() = CallbackRegistry::new();
        debug!(frame = inner.frame.0, "parallax engine destroyed");
    }

    // ========================================================================
    // Host-driven ticks
    // ========================================================================

    /// Recompute every container's ratio and project element styles.
    ///
    /// Containers that are unmeasurable or outside the traversal range are
    /// skipped for this tick. Fires `Scroll` with the frame offset unless no
    /// containers are loaded.
    pub fn scroll(&self) {
        let inner = &self.inner;
        if inner.state.get() == EngineState::Destroyed {
            return;
        }

        let (performance_trick, global_offset) = {
            let options = inner.options.borrow();
            (options.performance_trick, options.offset)
        };
        if performance_trick {
            self.freeze();
        }

        if inner.parents.borrow().is_empty() {
            return;
        }

        let offset = frame_offset(inner.host.as_ref(), inner.frame);
        let axis = inner.axis.get();
        let reference = if inner.frame_is_window {
            inner.host.window()
        } else {
            inner.frame
        };

        {
            let parents = inner.parents.borrow();
            for container in parents.iter() {
                let Some(container_box) =
                    position(inner.host.as_ref(), container.element, Some(reference))
                else {
                    continue;
                };
                let extra = container.offset.unwrap_or(global_offset);
                let Some(ratio) = compute_ratio(&container_box, &offset, axis, extra) else {
                    continue;
                };
                for element in &container.elements {
                    let element_axis = match element.horizontal {
                        Some(horizontal) => Axis::from_horizontal(horizontal),
                        None => axis,
                    };
                    project(
                        inner.host.as_ref(),
                        &inner.capabilities,
                        element.element,
                        element.properties.as_ref(),
                        ratio,
                        element_axis,
                    );
                }
            }
        }

        dispatch(
            &inner.callbacks,
            &EventContext::with_frame_offset(EngineEvent::Scroll, offset),
        );
    }

    /// Note a window resize; the reload runs through a coalescing timer so a
    /// resize burst triggers one rescan.
    pub fn handle_resize(&self) {
        let inner = &self.inner;
        if inner.state.get() == EngineState::Destroyed {
            return;
        }
        if let Some(timer) = inner.resize_timer.take() {
            inner.host.clear_timeout(timer);
        }
        inner
            .resize_timer
            .set(Some(inner.host.set_timeout(RESIZE_COALESCE_MS)));
    }

    /// Report an expired timer previously armed through the host.
    pub fn timer_fired(&self, timer: TimerId) {
        let inner = &self.inner;
        if inner.state.get() == EngineState::Destroyed {
            return;
        }
        if inner.resize_timer.get() == Some(timer) {
            inner.resize_timer.set(None);
            self.load();
        } else if inner.freeze_timer.get() == Some(timer) {
            inner.freeze_timer.set(None);
            if inner.frozen.get() {
                inner.host.remove_class(inner.freezer, PERFORMANCE_CLASS);
                inner.frozen.set(false);
            }
        }
    }

    fn freeze(&self) {
        let inner = &self.inner;
        if let Some(timer) = inner.freeze_timer.take() {
            inner.host.clear_timeout(timer);
        }
        if !inner.frozen.get() {
            inner.host.add_class(inner.freezer, PERFORMANCE_CLASS);
            inner.frozen.set(true);
        }
        inner
            .freeze_timer
            .set(Some(inner.host.set_timeout(FREEZE_RELEASE_MS)));
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Register a callback for an engine event.
    pub fn on<F>(&self, event: EngineEvent, callback: F) -> CallbackHandle
    where
        F: Fn(&EventContext) + 'static,
    {
        self.inner.callbacks.borrow_mut().on(event, callback)
    }

    /// Register an existing handle for an event (idempotent per event).
    pub fn on_handle(&self, event: EngineEvent, handle: CallbackHandle) {
        self.inner.callbacks.borrow_mut().on_handle(event, handle);
    }

    /// Register a callback that unsubscribes after its first invocation.
    pub fn one<F>(&self, event: EngineEvent, callback: F) -> CallbackHandle
    where
        F: Fn(&EventContext) + 'static,
    {
        self.inner.callbacks.borrow_mut().one(event, callback)
    }

    /// Remove a callback by identity.
    pub fn off(&self, event: EngineEvent, handle: &CallbackHandle) {
        self.inner.callbacks.borrow_mut().off(event, handle);
    }

    /// Remove every callback for an event.
    pub fn off_all(&self, event: EngineEvent) {
        self.inner.callbacks.borrow_mut().off_all(event);
    }

    /// Fire an event's callbacks by hand. `Scroll` carries the live frame
    /// offset, other events carry no payload.
    pub fn trigger(&self, event: EngineEvent) {
        let ctx = match event {
            EngineEvent::Scroll => EventContext::with_frame_offset(
                event,
                frame_offset(self.inner.host.as_ref(), self.inner.frame),
            ),
            _ => EventContext::new(event),
        };
        dispatch(&self.inner.callbacks, &ctx);
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Scan position of a container element, if it was scanned.
    pub fn get_index(&self, element: ElementRef) -> Option<usize> {
        self.inner
            .parents
            .borrow()
            .iter()
            .position(|c| c.element == element)
    }

    /// Number of containers in the current scan.
    pub fn container_count(&self) -> usize {
        self.inner.parents.borrow().len()
    }
}

fn element_config(host: &dyn ScrollHost, element: ElementRef) -> InlineConfig {
    match host.config_blob(element) {
        Some(blob) => {
            let result = parse_inline_config(&blob);
            result.log_diagnostics();
            result.config
        }
        None => InlineConfig::default(),
    }
}
