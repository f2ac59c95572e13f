//! Camera input: pointer events mapped to actions, consumed by orbit controls.
//!
//! # Invariants
//! - Controls only see [`PointerAction`]s, never windowing events.
//! - Orbit motion is damped and never crosses the poles.

pub mod action;
pub mod orbit;

pub use action::{PointerAction, PointerButton, PointerTracker};
pub use orbit::OrbitControls;
