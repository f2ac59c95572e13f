//! Scene graph: lights, meshes, shared materials and primitive geometry.
//!
//! # Invariants
//! - One scene per session; objects are addressed by [`ObjectId`].
//! - Iteration order is deterministic (BTreeMap), insertion order is not meaningful.
//! - Materials are shared by handle; editing one edits every mesh using it.
//!
//! [`ObjectId`]: camscene_common::ObjectId

pub mod geometry;
pub mod light;
pub mod material;
pub mod scene;

pub use geometry::{Geometry, MeshData, MeshVertex};
pub use light::{Light, LightKind};
pub use material::{Material, MaterialHandle, MaterialStore, TextureSlot};
pub use scene::{Mesh, Scene, SceneNode, SceneObject};

pub fn crate_info() -> &'static str {
    concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
