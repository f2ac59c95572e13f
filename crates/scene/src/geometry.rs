//! Primitive shapes and their CPU-side tessellation.
//!
//! Winding is counter-clockwise seen from outside. Texture coordinates have
//! `v = 1` at the top edge of the shape.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Vertex with position/normal/uv in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    fn new(position: Vec3, normal: Vec3, uv: [f32; 2]) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both buffers are non-empty and every index is in range.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }
}

/// Fixed shape parameters of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    /// Flat rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
}

impl Geometry {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sphere { .. } => "sphere",
            Self::Box { .. } => "box",
            Self::Torus { .. } => "torus",
            Self::Plane { .. } => "plane",
        }
    }

    pub fn tessellate(&self) -> MeshData {
        match *self {
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments.max(3), height_segments.max(2)),
            Self::Box {
                width,
                height,
                depth,
            } => cuboid(Vec3::new(width, height, depth) * 0.5),
            Self::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments.max(3), tubular_segments.max(3)),
            Self::Plane { width, height } => plane(width, height),
        }
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut vertices = Vec::new();
    let mut grid: Vec<Vec<u32>> = Vec::new();

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let mut row = Vec::new();
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let dir = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            row.push(vertices.len() as u32);
            vertices.push(MeshVertex::new(dir * radius, dir.normalize_or_zero(), [u, 1.0 - v]));
        }
        grid.push(row);
    }

    let mut indices = Vec::new();
    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // Pole rows would produce degenerate triangles.
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}

fn cuboid(half: Vec3) -> MeshData {
    // (normal, u axis, v axis) with u x v == normal.
    let faces = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u_axis, v_axis) in faces {
        let base = vertices.len() as u32;
        for (su, sv) in corners {
            let position = (normal + u_axis * su + v_axis * sv) * half;
            let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
            vertices.push(MeshVertex::new(position, normal, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    MeshData { vertices, indices }
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut vertices = Vec::new();
    for j in 0..=radial_segments {
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let v = j as f32 / radial_segments as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - center).normalize_or_zero();
            let uv = [
                i as f32 / tubular_segments as f32,
                j as f32 / radial_segments as f32,
            ];
            vertices.push(MeshVertex::new(position, normal, uv));
        }
    }

    let stride = tubular_segments + 1;
    let mut indices = Vec::new();
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = stride * j + i - 1;
            let b = stride * (j - 1) + i - 1;
            let c = stride * (j - 1) + i;
            let d = stride * j + i;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData { vertices, indices }
}

fn plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width * 0.5, height * 0.5);
    let vertices = vec![
        MeshVertex::new(Vec3::new(-hw, hh, 0.0), Vec3::Z, [0.0, 1.0]),
        MeshVertex::new(Vec3::new(hw, hh, 0.0), Vec3::Z, [1.0, 1.0]),
        MeshVertex::new(Vec3::new(-hw, -hh, 0.0), Vec3::Z, [0.0, 0.0]),
        MeshVertex::new(Vec3::new(hw, -hh, 0.0), Vec3::Z, [1.0, 0.0]),
    ];
    MeshData {
        vertices,
        indices: vec![0, 2, 1, 2, 3, 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_unit_normals(mesh: &MeshData) {
        for v in &mesh.vertices {
            let n = Vec3::from_array(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-4, "normal {n:?} is not unit");
        }
    }

    /// Every triangle's geometric normal points away from the origin.
    fn assert_outward_winding(mesh: &MeshData) {
        for tri in mesh.indices.chunks(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from_array(mesh.vertices[i as usize].position))
                .collect();
            let n = (p[1] - p[0]).cross(p[2] - p[0]);
            let centroid = (p[0] + p[1] + p[2]) / 3.0;
            assert!(n.dot(centroid) > 0.0, "triangle {tri:?} faces inwards");
        }
    }

    #[test]
    fn sphere_counts_and_radius() {
        let mesh = Geometry::Sphere {
            radius: 0.5,
            width_segments: 32,
            height_segments: 32,
        }
        .tessellate();
        assert!(mesh.is_valid());
        assert_eq!(mesh.vertices.len(), 33 * 33);
        // Two triangles per quad minus one per quad on each pole row.
        assert_eq!(mesh.triangle_count(), 32 * 32 * 2 - 2 * 32);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - 0.5).abs() < 1e-5);
        }
        assert_unit_normals(&mesh);
        assert_outward_winding(&mesh);
    }

    #[test]
    fn box_has_24_vertices_and_outward_faces() {
        let mesh = Geometry::Box {
            width: 0.75,
            height: 0.75,
            depth: 0.75,
        }
        .tessellate();
        assert!(mesh.is_valid());
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            assert!((p.abs().max_element() - 0.375).abs() < 1e-6);
        }
        assert_outward_winding(&mesh);
    }

    #[test]
    fn torus_counts() {
        let mesh = Geometry::Torus {
            radius: 0.3,
            tube: 0.2,
            radial_segments: 32,
            tubular_segments: 64,
        }
        .tessellate();
        assert!(mesh.is_valid());
        assert_eq!(mesh.vertices.len(), 33 * 65);
        assert_eq!(mesh.triangle_count(), 32 * 64 * 2);
        assert_unit_normals(&mesh);
    }

    #[test]
    fn plane_faces_positive_z() {
        let mesh = Geometry::Plane {
            width: 1.6,
            height: 0.9,
        }
        .tessellate();
        assert!(mesh.is_valid());
        for tri in mesh.indices.chunks(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from_array(mesh.vertices[i as usize].position))
                .collect();
            assert!((p[1] - p[0]).cross(p[2] - p[0]).z > 0.0);
        }
        let top_left = mesh.vertices[0];
        assert_eq!(top_left.position, [-0.8, 0.45, 0.0]);
        assert_eq!(top_left.uv, [0.0, 1.0]);
    }

    #[test]
    fn degenerate_segment_counts_are_raised() {
        let mesh = Geometry::Sphere {
            radius: 1.0,
            width_segments: 0,
            height_segments: 0,
        }
        .tessellate();
        assert!(mesh.is_valid());
    }
}
