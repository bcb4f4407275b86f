//! Drift Engine
//!
//! The host-facing half of the Drift parallax engine. One [`Parallax`]
//! instance owns one scroll frame (the window or a scrollable element),
//! found through an implementation of [`ScrollHost`]:
//!
//! - [`host`]: the trait boundary to the environment (queries, geometry,
//!   style writes, events, timers)
//! - [`position`]: bounding boxes re-expressed per coordinate reference
//! - [`config`]: engine options plus the strict inline-config parser
//! - [`projector`]: ratio → inline style writes
//! - [`registry`]: one-engine-per-frame claim set
//! - [`engine`]: the frame controller tying it together
//!
//! # Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//! use drift_engine::{EngineRegistry, Options, Parallax};
//!
//! let registry = EngineRegistry::shared();
//! let host: Rc<dyn drift_engine::ScrollHost> = Rc::new(BrowserHost::new());
//! let frame = host.window();
//!
//! let parallax = Parallax::new(host, frame, Options::default(), registry)?;
//! parallax.on(drift_core::EngineEvent::Scroll, |ctx| {
//!     // react to each recomputation
//! });
//! parallax.init();
//! ```

pub mod config;
pub mod engine;
pub mod host;
pub mod position;
pub mod projector;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_host;

pub use config::{
    parse_inline_config, ConfigDiagnostic, ConfigParseResult, InlineConfig, Options, OptionsPatch,
    Severity, DEFAULT_ELEMENTS_SELECTOR, DEFAULT_PARENT_SELECTOR,
};
pub use engine::{Parallax, WeakParallax, PERFORMANCE_CLASS};
pub use host::{BindingId, ElementRef, EventKind, ScrollHost, StyleCapabilities, TimerId};
pub use position::{frame_offset, position};
pub use projector::{default_properties, project};
pub use registry::{EngineRegistry, SharedRegistry};
