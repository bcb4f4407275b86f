//! Error types for drift_core
//!
//! The taxonomy is deliberately small and non-fatal: this is a best-effort
//! visual layer. Errors are reported through the `tracing` warning channel by
//! the engine, never raised as panics, and the designed "skip this tick"
//! outcomes are sentinel `Option` results rather than errors.

use thiserror::Error;

/// Errors that can occur when constructing or registering an engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// An engine already exists for this frame.
    #[error("an engine has already been initialized for this frame")]
    DuplicateFrame,

    /// The requested frame element does not exist.
    #[error("frame is not available")]
    FrameUnavailable,
}
