//! Typed callback registry for engine lifecycle events
//!
//! A minimal synchronous pub/sub: handlers are `Rc<dyn Fn>` callbacks (the
//! engine is single-threaded), registered per [`EngineEvent`], invoked in
//! insertion order.
//!
//! Dispatch operates on a snapshot of the handler list taken before the first
//! invocation, so a handler that unsubscribes itself (or others) mid-dispatch
//! cannot corrupt the in-progress dispatch: handlers registered before the
//! trigger all run; removals take effect for the *next* trigger.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::FrameOffset;

/// Engine lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineEvent {
    /// Containers were (re)scanned.
    Load,
    /// A scroll recomputation completed; carries the frame offset.
    Scroll,
    /// The engine finished initializing.
    Initialized,
    /// The engine was torn down.
    Destroy,
}

/// Context passed to event callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    /// The event that fired.
    pub event: EngineEvent,
    /// Current frame offset: present for [`EngineEvent::Scroll`] only.
    pub frame_offset: Option<FrameOffset>,
}

impl EventContext {
    /// Context with no payload.
    pub fn new(event: EngineEvent) -> Self {
        Self {
            event,
            frame_offset: None,
        }
    }

    /// Context carrying the current frame offset.
    pub fn with_frame_offset(event: EngineEvent, offset: FrameOffset) -> Self {
        Self {
            event,
            frame_offset: Some(offset),
        }
    }
}

/// Callback invoked when an engine event fires.
pub type Callback = Rc<dyn Fn(&EventContext)>;

/// Identity handle for a registered callback.
///
/// Comparison is by allocation identity (`Rc::ptr_eq`), so the same closure
/// registered through one handle can be removed with a clone of that handle.
#[derive(Clone)]
pub struct CallbackHandle(Callback);

impl CallbackHandle {
    /// Wrap a callback for registration.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&EventContext) + 'static,
    {
        Self(Rc::new(callback))
    }

    /// Whether two handles refer to the same callback.
    pub fn ptr_eq(&self, other: &CallbackHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn callback(&self) -> Callback {
        Rc::clone(&self.0)
    }
}

struct Entry {
    callback: Callback,
    once: bool,
}

/// One callback captured by a dispatch snapshot.
pub struct SnapshotEntry {
    /// The callback to invoke.
    pub callback: Callback,
    /// Whether it unsubscribes after this invocation.
    pub once: bool,
}

/// Ordered, identity-deduplicated callback storage per event.
#[derive(Default)]
pub struct CallbackRegistry {
    handlers: HashMap<EngineEvent, Vec<Entry>>,
}

impl CallbackRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; returns its identity handle.
    pub fn on<F>(&mut self, event: EngineEvent, callback: F) -> CallbackHandle
    where
        F: Fn(&EventContext) + 'static,
    {
        let handle = CallbackHandle::new(callback);
        self.on_handle(event, handle.clone());
        handle
    }

    /// Register an existing handle for an event.
    ///
    /// Re-adding a handle already registered for the same event is a no-op,
    /// so the same callback can safely be attached to several events.
    pub fn on_handle(&mut self, event: EngineEvent, handle: CallbackHandle) {
        let entries = self.handlers.entry(event).or_default();
        if entries
            .iter()
            .any(|e| Rc::ptr_eq(&e.callback, &handle.0))
        {
            return;
        }
        entries.push(Entry {
            callback: handle.callback(),
            once: false,
        });
    }

    /// Register a callback that unsubscribes itself after its first
    /// invocation.
    pub fn one<F>(&mut self, event: EngineEvent, callback: F) -> CallbackHandle
    where
        F: Fn(&EventContext) + 'static,
    {
        let handle = CallbackHandle::new(callback);
        self.handlers.entry(event).or_default().push(Entry {
            callback: handle.callback(),
            once: true,
        });
        handle
    }

    /// Remove a callback by identity.
    pub fn off(&mut self, event: EngineEvent, handle: &CallbackHandle) {
        if let Some(entries) = self.handlers.get_mut(&event) {
            entries.retain(|e| !Rc::ptr_eq(&e.callback, &handle.0));
        }
    }

    /// Remove every callback for an event.
    pub fn off_all(&mut self, event: EngineEvent) {
        if let Some(entries) = self.handlers.get_mut(&event) {
            entries.clear();
        }
    }

    /// Number of callbacks registered for an event.
    pub fn len(&self, event: EngineEvent) -> usize {
        self.handlers.get(&event).map_or(0, Vec::len)
    }

    /// Whether no callbacks are registered for an event.
    pub fn is_empty(&self, event: EngineEvent) -> bool {
        self.len(event) == 0
    }

    /// Snapshot the current handler list for an event.
    ///
    /// Taken before invoking any handler so the live list can be mutated
    /// (by the handlers themselves) without affecting the in-flight dispatch.
    pub fn snapshot(&self, event: EngineEvent) -> Vec<SnapshotEntry> {
        self.handlers
            .get(&event)
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| SnapshotEntry {
                        callback: Rc::clone(&e.callback),
                        once: e.once,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn remove_by_ptr(&mut self, event: EngineEvent, callback: &Callback) {
        if let Some(entries) = self.handlers.get_mut(&event) {
            entries.retain(|e| !Rc::ptr_eq(&e.callback, callback));
        }
    }
}

/// Dispatch an event through a shared registry.
///
/// The registry borrow is released before any handler runs, so handlers are
/// free to call back into the registry (`on`, `off`, even `dispatch`).
pub fn dispatch(registry: &RefCell<CallbackRegistry>, ctx: &EventContext) {
    let snapshot = registry.borrow().snapshot(ctx.event);
    for entry in snapshot {
        (entry.callback)(ctx);
        if entry.once {
            registry.borrow_mut().remove_by_ptr(ctx.event, &entry.callback);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_on_and_trigger_in_order() {
        let registry = RefCell::new(CallbackRegistry::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        registry.borrow_mut().on(EngineEvent::Load, move |_| {
            o.borrow_mut().push("first");
        });
        let o = Rc::clone(&order);
        registry.borrow_mut().on(EngineEvent::Load, move |_| {
            o.borrow_mut().push("second");
        });

        dispatch(&registry, &EventContext::new(EngineEvent::Load));
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_idempotent_registration() {
        let mut registry = CallbackRegistry::new();
        let handle = registry.on(EngineEvent::Scroll, |_| {});
        registry.on_handle(EngineEvent::Scroll, handle.clone());
        registry.on_handle(EngineEvent::Scroll, handle);
        assert_eq!(registry.len(EngineEvent::Scroll), 1);
    }

    #[test]
    fn test_same_handle_on_multiple_events() {
        let mut registry = CallbackRegistry::new();
        let handle = registry.on(EngineEvent::Load, |_| {});
        registry.on_handle(EngineEvent::Destroy, handle);
        assert_eq!(registry.len(EngineEvent::Load), 1);
        assert_eq!(registry.len(EngineEvent::Destroy), 1);
    }

    #[test]
    fn test_off_by_identity() {
        let mut registry = CallbackRegistry::new();
        let keep = registry.on(EngineEvent::Load, |_| {});
        let drop = registry.on(EngineEvent::Load, |_| {});
        registry.off(EngineEvent::Load, &drop);
        assert_eq!(registry.len(EngineEvent::Load), 1);
        registry.off(EngineEvent::Load, &keep);
        assert!(registry.is_empty(EngineEvent::Load));
    }

    #[test]
    fn test_off_all() {
        let mut registry = CallbackRegistry::new();
        registry.on(EngineEvent::Load, |_| {});
        registry.on(EngineEvent::Load, |_| {});
        registry.off_all(EngineEvent::Load);
        assert!(registry.is_empty(EngineEvent::Load));
    }

    #[test]
    fn test_one_fires_exactly_once() {
        let registry = RefCell::new(CallbackRegistry::new());
        let count = Rc::new(Cell::new(0));

        let c = Rc::clone(&count);
        registry.borrow_mut().one(EngineEvent::Scroll, move |_| {
            c.set(c.get() + 1);
        });

        let ctx = EventContext::new(EngineEvent::Scroll);
        dispatch(&registry, &ctx);
        dispatch(&registry, &ctx);
        assert_eq!(count.get(), 1);
        assert!(registry.borrow().is_empty(EngineEvent::Scroll));
    }

    #[test]
    fn test_self_unsubscribe_does_not_break_dispatch() {
        // A handler that removes itself must not prevent later-registered
        // handlers from firing in the same dispatch.
        let registry = Rc::new(RefCell::new(CallbackRegistry::new()));
        let fired = Rc::new(RefCell::new(Vec::new()));

        let handle_slot: Rc<RefCell<Option<CallbackHandle>>> = Rc::new(RefCell::new(None));
        let reg = Rc::clone(&registry);
        let slot = Rc::clone(&handle_slot);
        let f = Rc::clone(&fired);
        let self_removing = registry.borrow_mut().on(EngineEvent::Load, move |_| {
            f.borrow_mut().push("self-removing");
            if let Some(handle) = slot.borrow().as_ref() {
                reg.borrow_mut().off(EngineEvent::Load, handle);
            }
        });
        *handle_slot.borrow_mut() = Some(self_removing);

        let f = Rc::clone(&fired);
        registry.borrow_mut().on(EngineEvent::Load, move |_| {
            f.borrow_mut().push("later");
        });

        dispatch(&registry, &EventContext::new(EngineEvent::Load));
        assert_eq!(*fired.borrow(), vec!["self-removing", "later"]);

        // Second dispatch: only the surviving handler runs.
        fired.borrow_mut().clear();
        dispatch(&registry, &EventContext::new(EngineEvent::Load));
        assert_eq!(*fired.borrow(), vec!["later"]);
    }

    #[test]
    fn test_scroll_context_carries_offset() {
        let offset = FrameOffset {
            left: 0.0,
            top: 120.0,
            width: 800.0,
            height: 600.0,
        };
        let ctx = EventContext::with_frame_offset(EngineEvent::Scroll, offset);
        assert_eq!(ctx.frame_offset, Some(offset));
        assert_eq!(EventContext::new(EngineEvent::Load).frame_offset, None);
    }
}
