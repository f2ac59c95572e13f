//! Scene session: one scene, one camera, one frame loop.
//!
//! # Invariants
//! - Ticks do nothing until capture has settled, and nothing after `stop()`.
//! - The screen is attached at most once, and only after a successful capture.
//! - Per-tick order: clock, animation, video dirty, controls, render.

mod clock;
mod frame_loop;
mod session;
mod viewport;

pub use clock::{Clock, FakeClock, SystemClock};
pub use frame_loop::{FrameLoop, LoopState};
pub use session::{FrameReport, SceneSession, SessionError};
pub use viewport::{MAX_PIXEL_RATIO, Viewport};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}
