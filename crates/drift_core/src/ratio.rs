//! Traversal ratio computation
//!
//! The heart of the engine: given a container's box relative to its scroll
//! frame and the frame's current offset snapshot, derive a signed progress
//! ratio describing how far the container has traveled through the frame's
//! visible window.
//!
//! The ratio is continuous over the whole traversal:
//!
//! - `-1.0`: the container is just entering the window,
//! - `0.0`: the zero-crossing (shifted by `extra_offset`),
//! - `1.0`: the container has fully exited.
//!
//! Containers outside the meaningful `[-1, 1]` window produce `None` and are
//! left untouched for the tick. That is a designed control-flow outcome, not
//! an error.

use crate::geometry::{Axis, FrameOffset, RectBox};

/// Compute the signed traversal ratio for one container.
///
/// `container` must already be relative to the frame (its origin at the
/// frame's top-left). `extra_offset` shifts the zero-crossing point, letting
/// callers tune when the active phase begins.
///
/// Returns `None` when the container is outside the traversal window: either
/// fully before/after the visible area, or (for containers taller than the
/// frame) outside the `[-1, 1]` meaningful range even after sign correction.
pub fn compute_ratio(
    container: &RectBox,
    frame: &FrameOffset,
    axis: Axis,
    extra_offset: f32,
) -> Option<f32> {
    let near = container.near_edge(axis);
    let far = container.far_edge(axis);
    let span = frame.span(axis);

    // Fully outside the visible window.
    if near < 0.0 || far > span {
        return None;
    }

    // Forward regime: 0 when the trailing edge sits at the frame's entry
    // edge, approaching 1 as the container nears the exit.
    let mut ratio = (span - near + extra_offset) / span;

    if ratio < 0.0 {
        // Reverse regime: the container has not yet crossed the zero point;
        // parametrize the approach from the leading edge instead, yielding a
        // continuous signed progress from -1 through 0.
        ratio = -1.0 + (span - far + extra_offset) / span;
    }

    if ratio > 1.0 || ratio < -1.0 {
        return None;
    }

    Some(ratio)
}
