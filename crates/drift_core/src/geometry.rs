//! Geometry primitives for scroll-driven computation
//!
//! Two shapes flow through the engine every tick:
//!
//! - [`RectBox`]: an element's bounding box in some coordinate space
//!   (viewport-relative, document-relative, or relative to another element).
//! - [`FrameOffset`]: a snapshot of the scroll frame: the size of its
//!   visible area plus its current scroll offsets.
//!
//! Both carry per-axis accessors so the ratio engine can stay axis-agnostic.

/// Traversal axis of a scroll frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Vertical scrolling (the default): containers traverse top-to-bottom.
    #[default]
    Vertical,
    /// Horizontal scrolling: containers traverse left-to-right.
    Horizontal,
}

impl Axis {
    /// Whether this is the horizontal axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Axis::Horizontal)
    }

    /// Axis from the `horizontal` configuration flag.
    pub fn from_horizontal(horizontal: bool) -> Self {
        if horizontal {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}

/// An element bounding box: position and dimensions in some coordinate space.
///
/// The coordinate origin depends on how the box was produced: raw boxes are
/// viewport-relative, and the geometry provider shifts them to be relative to
/// the document or to another element. Negative or over-range edges naturally
/// indicate "before" / "after" the reference region's visible window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl RectBox {
    /// Build a box from edges, deriving width and height.
    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            width: right - left,
            height: bottom - top,
        }
    }

    /// Shift the box by `(dx, dy)` without changing its size.
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            left: self.left + dx,
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
            width: self.width,
            height: self.height,
        }
    }

    /// Re-express this box relative to `origin`'s top-left corner.
    ///
    /// Both boxes must share a coordinate space.
    pub fn relative_to(&self, origin: &RectBox) -> Self {
        self.translate(-origin.left, -origin.top)
    }

    /// The trailing edge along `axis`: bottom for vertical, right for
    /// horizontal. This is the edge that exits the frame last.
    pub fn near_edge(&self, axis: Axis) -> f32 {
        if axis.is_horizontal() {
            self.right
        } else {
            self.bottom
        }
    }

    /// The leading edge along `axis`: top for vertical, left for horizontal.
    pub fn far_edge(&self, axis: Axis) -> f32 {
        if axis.is_horizontal() {
            self.left
        } else {
            self.top
        }
    }
}

/// A scroll frame snapshot: visible size plus current scroll offsets.
///
/// For a window frame, `width`/`height` are the viewport dimensions and
/// `left`/`top` the page scroll offsets. For an element frame they are the
/// layout box and the element's own scroll offsets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameOffset {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl FrameOffset {
    /// The visible span along `axis`: height for vertical, width for
    /// horizontal.
    pub fn span(&self, axis: Axis) -> f32 {
        if axis.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }
}
