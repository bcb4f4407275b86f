//! Host abstraction: the engine's only window onto the outside world
//!
//! The engine never touches a real DOM. Everything environment-specific is a
//! primitive on [`ScrollHost`]: selector queries, bounding geometry, inline
//! style writes, event bindings, and timers. A browser binding, a test fixture,
//! or a headless renderer all implement the same trait.
//!
//! The host *drives* the engine: after `bind`, the host is expected to call
//! `Parallax::scroll()` / `Parallax::handle_resize()` when the bound event
//! fires, and `Parallax::timer_fired(id)` when a timeout set through
//! `set_timeout` elapses. All of this is single-threaded: hosts are shared
//! as `Rc<dyn ScrollHost>`.

use drift_core::geometry::RectBox;

/// Opaque identity of a host element.
///
/// Cheap to copy and stable for the element's lifetime; the window frame is
/// an element like any other (see [`ScrollHost::window`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub u64);

/// Events an engine can bind to on a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The element's content scrolled.
    Scroll,
    /// The window was resized.
    Resize,
}

/// Identity of an active event binding, used to unbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingId(pub u64);

/// Identity of a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Style capabilities probed once at startup and injected into the projector.
///
/// Covers the (possibly vendor-prefixed) transform property name and the GPU
/// acceleration hint prepended to assembled transform strings: either the
/// empty string or `"translateZ(0) "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCapabilities {
    /// Resolved name of the transform style property.
    pub transform_property: String,
    /// Prefix for assembled transform strings.
    pub gpu_hint: String,
}

impl Default for StyleCapabilities {
    fn default() -> Self {
        Self {
            transform_property: "transform".to_owned(),
            gpu_hint: String::new(),
        }
    }
}

/// External collaborators the engine is built on.
pub trait ScrollHost {
    /// The global window frame.
    fn window(&self) -> ElementRef;

    /// The document root (scan scope for window frames).
    fn root(&self) -> ElementRef;

    /// Whether the element currently exists in the host.
    fn exists(&self, element: ElementRef) -> bool;

    /// Whether the element is the window frame.
    fn is_window(&self, element: ElementRef) -> bool;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query(&self, scope: ElementRef, selector: &str) -> Vec<ElementRef>;

    /// The element's attached configuration text, if any.
    fn config_blob(&self, element: ElementRef) -> Option<String>;

    /// Raw viewport-relative bounding box; `None` for detached or otherwise
    /// unmeasurable elements.
    fn bounding_box(&self, element: ElementRef) -> Option<RectBox>;

    /// Current document scroll offsets `(left, top)`.
    fn document_scroll(&self) -> (f32, f32);

    /// Viewport dimensions `(width, height)`.
    fn viewport_size(&self) -> (f32, f32);

    /// Layout dimensions of an element frame `(width, height)`.
    fn layout_size(&self, element: ElementRef) -> (f32, f32);

    /// Own scroll offsets `(left, top)` of an element frame.
    fn scroll_offset(&self, element: ElementRef) -> (f32, f32);

    /// Write an inline style property.
    fn set_style(&self, element: ElementRef, property: &str, value: &str);

    /// Add a class to the element.
    fn add_class(&self, element: ElementRef, class: &str);

    /// Remove a class from the element.
    fn remove_class(&self, element: ElementRef, class: &str);

    /// Subscribe to a host event on `element`.
    fn bind(&self, element: ElementRef, event: EventKind) -> BindingId;

    /// Remove a previously created binding.
    fn unbind(&self, binding: BindingId);

    /// Arm a one-shot timeout; the host reports expiry via
    /// `Parallax::timer_fired`.
    fn set_timeout(&self, delay_ms: u64) -> TimerId;

    /// Cancel a pending timeout.
    fn clear_timeout(&self, timer: TimerId);

    /// Style capabilities of the environment, probed once.
    fn capabilities(&self) -> StyleCapabilities;
}
