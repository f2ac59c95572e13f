//! wgpu render backend for camscene.
//!
//! Forward-renders every scene mesh with up to eight lights and samples the
//! live video image where a material maps it.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - The video image is uploaded at most once per texture version.
//! - Meshes without a map sample a 1x1 white texture.

mod gpu;
mod shaders;
mod uniforms;

pub use gpu::{FrameStats, WgpuRenderer, WgpuTarget};
pub use uniforms::MAX_LIGHTS;
