//! Testability helpers.
//!
//! Deterministic synthetic renders, in-process renderers and preset
//! container builders, so the comparison pipeline and the batch loop can be
//! exercised without any external engine.

pub mod renderers;
pub mod signals;

pub use renderers::{preset_container, FailingRenderer, SignalRenderer};
