//! Capture Source: live camera image acquisition.
//!
//! # Invariants
//! - A source is opened at most once, off the frame-loop thread.
//! - A failed open is terminal: no retry and no substitute image.
//! - The video texture only exists after a successful open.

mod pending;
mod source;
mod video;

pub use pending::PendingCapture;
pub use source::{
    CaptureError, CaptureSource, CaptureStream, MAX_DIMENSION, TestPattern, Unavailable, VideoFrame,
    rgba_len,
};
pub use video::VideoTexture;

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("capture"));
    }
}
