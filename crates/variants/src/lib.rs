//! Scene variants: the fixed content, camera, panel and motion of each scene.
//!
//! # Invariants
//! - Animated properties are pure functions of elapsed time.
//! - A rig only writes the transforms of objects it created.
//! - Panels bind to lights, never to meshes.

mod lights;
pub mod motion;
mod orbit;
mod rig;

pub use lights::LightsShowcase;
pub use orbit::OrbitingLights;
pub use rig::{SceneVariant, ScreenSpec, UnknownVariant, VariantKind};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("variants"));
    }
}
