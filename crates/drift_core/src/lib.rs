//! Drift Core
//!
//! This crate provides the pure computational half of the Drift parallax
//! engine:
//!
//! - **Geometry**: element boxes and scroll-frame snapshots with per-axis
//!   accessors
//! - **Ratio Engine**: scroll position → signed traversal ratio in `[-1, 1]`
//! - **Style Values**: declarative property maps and ratio projection math
//! - **Event Dispatch**: a typed callback registry with snapshot dispatch
//!
//! Nothing here touches a DOM or a host; `drift_engine` wires these pieces to
//! the outside world.
//!
//! # Example
//!
//! ```rust
//! use drift_core::geometry::{Axis, FrameOffset, RectBox};
//! use drift_core::ratio::compute_ratio;
//!
//! let frame = FrameOffset { left: 0.0, top: 0.0, width: 0.0, height: 1000.0 };
//! let container = RectBox::from_edges(0.0, 200.0, 100.0, 1200.0);
//!
//! let ratio = compute_ratio(&container, &frame, Axis::Vertical, 0.0).unwrap();
//! assert!((ratio - (-0.2)).abs() < 1e-6);
//! ```

pub mod error;
pub mod events;
pub mod geometry;
pub mod ratio;
pub mod value;

pub use error::EngineError;
pub use events::{
    dispatch, Callback, CallbackHandle, CallbackRegistry, EngineEvent, EventContext,
};
pub use geometry::{Axis, FrameOffset, RectBox};
pub use ratio::compute_ratio;
pub use value::{
    display_opacity, format_number, is_transform_function, scale_text, within, PropertyMap,
    PropertyValue,
};
