//! CPU-side layouts of the shader's uniform blocks, and how the scene is
//! packed into them.

use bytemuck::{Pod, Zeroable};
use camscene_common::Transform;
use camscene_render::PerspectiveCamera;
use camscene_scene::{LightKind, Material, MeshVertex, Scene};
use glam::{Mat4, Vec3};

pub const MAX_LIGHTS: usize = 8;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub position: [f32; 4],
    pub color: [f32; 4],
    pub direction: [f32; 4],
    pub size: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub counts: [u32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl From<&MeshVertex> for Vertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
        }
    }
}

fn kind_code(kind: &LightKind) -> f32 {
    match kind {
        LightKind::Ambient => 0.0,
        LightKind::Directional { .. } => 1.0,
        LightKind::Point { .. } => 2.0,
        LightKind::RectArea { .. } => 3.0,
    }
}

/// Pack the scene's lights in iteration order. Lights past [`MAX_LIGHTS`]
/// are dropped; the second value is how many were dropped.
pub fn pack_lights(scene: &Scene) -> (Vec<GpuLight>, usize) {
    let mut packed = Vec::new();
    let mut dropped = 0;
    for (_, node, light) in scene.lights() {
        if packed.len() == MAX_LIGHTS {
            dropped += 1;
            continue;
        }
        let p = node.transform.position;
        let rgb = light.color.scaled(light.intensity).to_array();
        let (cutoff, direction, decay, size) = match light.kind {
            LightKind::Ambient => (0.0, Vec3::ZERO, 0.0, [0.0, 0.0]),
            LightKind::Directional { target } => {
                (0.0, (target - p).normalize_or_zero(), 0.0, [0.0, 0.0])
            }
            LightKind::Point { distance, decay } => (distance, Vec3::ZERO, decay, [0.0, 0.0]),
            LightKind::RectArea {
                width,
                height,
                target,
            } => (0.0, (target - p).normalize_or_zero(), 0.0, [width, height]),
        };
        packed.push(GpuLight {
            position: [p.x, p.y, p.z, kind_code(&light.kind)],
            color: [rgb[0], rgb[1], rgb[2], cutoff],
            direction: [direction.x, direction.y, direction.z, decay],
            size: [size[0], size[1], 0.0, 0.0],
        });
    }
    (packed, dropped)
}

pub fn globals(camera: &PerspectiveCamera, lights: &[GpuLight]) -> Globals {
    let mut slots = [GpuLight::default(); MAX_LIGHTS];
    let count = lights.len().min(MAX_LIGHTS);
    slots[..count].copy_from_slice(&lights[..count]);
    let eye = camera.position;
    Globals {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_pos: [eye.x, eye.y, eye.z, 1.0],
        counts: [count as u32, 0, 0, 0],
        lights: slots,
    }
}

/// Per-object block. `textured` says whether a map image is bound.
pub fn object_uniforms(transform: &Transform, material: &Material, textured: bool) -> ObjectUniforms {
    let model = transform.matrix();
    let normal_matrix = model.inverse().transpose();
    let normal_matrix = if normal_matrix.is_finite() {
        normal_matrix
    } else {
        Mat4::IDENTITY
    };
    let (lit, roughness, metalness) = match material {
        Material::Standard {
            roughness,
            metalness,
            ..
        } => (1.0, *roughness, *metalness),
        Material::Unlit { .. } => (0.0, 1.0, 0.0),
    };
    let c = material.color().to_array();
    ObjectUniforms {
        model: model.to_cols_array_2d(),
        normal_matrix: normal_matrix.to_cols_array_2d(),
        color: [c[0], c[1], c[2], 1.0],
        params: [roughness, metalness, lit, if textured { 1.0 } else { 0.0 }],
    }
}
