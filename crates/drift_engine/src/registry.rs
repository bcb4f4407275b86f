//! Engine registry
//!
//! At most one engine may own a given scroll frame. The registry is an
//! explicit claim set shared by every engine built against the same host;
//! construction claims the frame and `destroy` releases it, after which the
//! frame can be claimed again.

use std::cell::RefCell;
use std::rc::Rc;

use drift_core::error::EngineError;
use rustc_hash::FxHashSet;

use crate::host::ElementRef;

/// Shared claim set of frames with a live engine.
#[derive(Default)]
pub struct EngineRegistry {
    claimed: FxHashSet<ElementRef>,
}

/// Shared handle form the engines hold.
pub type SharedRegistry = Rc<RefCell<EngineRegistry>>;

impl EngineRegistry {
    /// Create an empty registry handle.
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Claim `frame` for a new engine.
    pub fn claim(&mut self, frame: ElementRef) -> Result<(), EngineError> {
        if !self.claimed.insert(frame) {
            return Err(EngineError::DuplicateFrame);
        }
        Ok(())
    }

    /// Release a claim so the frame can host a new engine.
    pub fn release(&mut self, frame: ElementRef) {
        self.claimed.remove(&frame);
    }

    /// Whether a live engine owns `frame`.
    pub fn is_claimed(&self, frame: ElementRef) -> bool {
        self.claimed.contains(&frame)
    }
}
