//! Geometry provider
//!
//! Turns the host's raw viewport-relative bounding boxes into the coordinate
//! spaces the ratio engine needs: document-relative by default, or relative
//! to an ancestor frame element. Unmeasurable elements stay `None` all the
//! way up so the caller can skip them for the tick.

use drift_core::geometry::{FrameOffset, RectBox};

use crate::host::{ElementRef, ScrollHost};

/// Bounding box of `element`, re-expressed per `relative_to`.
///
/// - `relative_to` is the window: the raw viewport-relative box.
/// - `relative_to` is `None` or the document root: document-relative.
/// - any other element: relative to that element's document box.
pub fn position(
    host: &dyn ScrollHost,
    element: ElementRef,
    relative_to: Option<ElementRef>,
) -> Option<RectBox> {
    let raw = host.bounding_box(element)?;

    if let Some(reference) = relative_to {
        if host.is_window(reference) {
            return Some(raw);
        }
    }

    let (scroll_left, scroll_top) = host.document_scroll();
    let document_box = raw.translate(scroll_left, scroll_top);

    match relative_to {
        None => Some(document_box),
        Some(reference) if reference == host.root() => Some(document_box),
        Some(reference) => {
            let reference_box = position(host, reference, None)?;
            Some(document_box.relative_to(&reference_box))
        }
    }
}

/// Snapshot the scroll frame: visible size plus current scroll offsets.
///
/// The window frame reads the viewport and page scroll; an element frame
/// reads its own layout box and scroll offsets.
pub fn frame_offset(host: &dyn ScrollHost, frame: ElementRef) -> FrameOffset {
    if host.is_window(frame) {
        let (width, height) = host.viewport_size();
        let (left, top) = host.document_scroll();
        FrameOffset {
            left,
            top,
            width,
            height,
        }
    } else {
        let (width, height) = host.layout_size(frame);
        let (left, top) = host.scroll_offset(frame);
        FrameOffset {
            left,
            top,
            width,
            height,
        }
    }
}
