//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Render output derives only from the scene, the camera and the video texture.
//!
//! A debug text renderer stands in for the GPU backend in headless runs and
//! tests; the wgpu backend implements the same trait.

mod camera;
mod renderer;

pub use camera::PerspectiveCamera;
pub use renderer::{DebugTextRenderer, RenderFrame, Renderer};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
