use camscene_common::{Color, ObjectId, Transform};
use camscene_render::PerspectiveCamera;
use camscene_scene::{Geometry, Light, Material, Mesh, Scene};
use camscene_tools::{DebugPanel, SliderBinding};
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use crate::motion;
use crate::rig::{ScreenSpec, SceneVariant, VariantKind};

/// Sphere, cube and torus spinning over a floor, one shared standard material,
/// and one light of each kind.
#[derive(Debug, Default)]
pub struct LightsShowcase {
    spinning: Vec<ObjectId>,
}

impl LightsShowcase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spinning(&self) -> &[ObjectId] {
        &self.spinning
    }
}

impl SceneVariant for LightsShowcase {
    fn kind(&self) -> VariantKind {
        VariantKind::Lights
    }

    fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 100.0).at(Vec3::new(1.0, 1.0, 2.0))
    }

    fn populate(&mut self, scene: &mut Scene) -> DebugPanel {
        let ambient = scene.add_light("ambient", Light::ambient(Color::WHITE, 0.5), Vec3::ZERO);
        let directional = scene.add_light(
            "directional",
            Light::directional(Color::from_hex(0x00fffc), 0.3),
            Vec3::new(1.0, 0.25, 0.0),
        );
        let point = scene.add_light(
            "point",
            Light::point(Color::from_hex(0xff9000), 0.5, 10.0, 2.0),
            Vec3::new(1.0, -0.5, 1.0),
        );
        let rect_area = scene.add_light(
            "rect-area",
            Light::rect_area(Color::from_hex(0x4e00ff), 2.0, 1.0, 1.0).look_at(Vec3::ZERO),
            Vec3::new(-1.5, 0.0, 1.5),
        );

        let material = scene.add_material(Material::standard(0.4));
        let shapes = [
            (
                "sphere",
                Geometry::Sphere {
                    radius: 0.5,
                    width_segments: 32,
                    height_segments: 32,
                },
                -1.5,
            ),
            (
                "cube",
                Geometry::Box {
                    width: 0.75,
                    height: 0.75,
                    depth: 0.75,
                },
                0.0,
            ),
            (
                "torus",
                Geometry::Torus {
                    radius: 0.3,
                    tube: 0.2,
                    radial_segments: 32,
                    tubular_segments: 64,
                },
                1.5,
            ),
        ];
        self.spinning.clear();
        for (name, geometry, x) in shapes {
            let id = scene.add_mesh(
                name,
                Mesh { geometry, material },
                Transform::from_position(Vec3::new(x, 0.0, 0.0)),
            );
            self.spinning.push(id);
        }

        scene.add_mesh(
            "floor",
            Mesh {
                geometry: Geometry::Plane {
                    width: 5.0,
                    height: 5.0,
                },
                material,
            },
            Transform {
                position: Vec3::new(0.0, -0.65, 0.0),
                rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0),
                ..Transform::default()
            },
        );
        tracing::debug!(objects = scene.object_count(), "lights showcase populated");

        DebugPanel::new()
            .with(SliderBinding::new("Ambient Intensity", ambient, 0.0, 1.0, 0.0001))
            .with(SliderBinding::new("Directional Int.", directional, 0.0, 1.0, 0.0001))
            .with(SliderBinding::new("Point Int.", point, 0.0, 5.0, 0.001))
            .with(SliderBinding::new("RectArea Int.", rect_area, 0.0, 10.0, 0.001))
    }

    fn screen(&self) -> ScreenSpec {
        ScreenSpec {
            geometry: Geometry::Plane {
                width: 1.6,
                height: 0.9,
            },
            material: Material::video(),
            transform: Transform::from_position(Vec3::new(0.0, 0.6, -1.5)),
        }
    }

    fn animate(&self, scene: &mut Scene, t: f32) {
        let rotation = motion::spin(t);
        for &id in &self.spinning {
            scene.set_rotation(id, rotation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camscene_scene::LightKind;

    fn populated() -> (Scene, LightsShowcase, DebugPanel) {
        let mut scene = Scene::new();
        let mut rig = LightsShowcase::new();
        let panel = rig.populate(&mut scene);
        (scene, rig, panel)
    }

    #[test]
    fn content() {
        let (scene, rig, panel) = populated();
        assert_eq!(scene.lights().count(), 4);
        assert_eq!(scene.meshes().count(), 4);
        assert_eq!(scene.materials().len(), 1);
        assert_eq!(rig.spinning().len(), 3);
        assert_eq!(panel.len(), 4);

        let kinds: Vec<_> = scene.lights().map(|(_, _, l)| l.kind_name()).collect();
        for kind in ["ambient", "directional", "point", "rect-area"] {
            assert!(kinds.contains(&kind));
        }
    }

    #[test]
    fn meshes_share_one_material() {
        let (mut scene, rig, _) = populated();
        let handle = scene.mesh(rig.spinning()[0]).map(|m| m.material);
        assert!(scene.meshes().all(|(_, _, m)| Some(m.material) == handle));

        if let Some(Material::Standard { roughness, .. }) =
            handle.and_then(|h| scene.material_mut(h))
        {
            *roughness = 0.9;
        }
        for (_, _, mesh) in scene.meshes() {
            assert!(matches!(
                scene.material(mesh.material),
                Some(Material::Standard { roughness, .. }) if *roughness == 0.9
            ));
        }
    }

    #[test]
    fn panel_ranges() {
        let (scene, _, panel) = populated();
        let expected = [
            ("Ambient Intensity", 1.0, 0.0001, 0.5),
            ("Directional Int.", 1.0, 0.0001, 0.3),
            ("Point Int.", 5.0, 0.001, 0.5),
            ("RectArea Int.", 10.0, 0.001, 2.0),
        ];
        for (i, (label, max, step, initial)) in expected.into_iter().enumerate() {
            let b = &panel.bindings()[i];
            assert_eq!(b.label, label);
            assert_eq!((b.min, b.max, b.step), (0.0, max, step));
            assert_eq!(panel.value(&scene, i), Ok(initial));
        }
    }

    #[test]
    fn rect_area_faces_origin() {
        let (scene, _, _) = populated();
        let rect = scene
            .lights()
            .find(|(_, _, l)| l.kind_name() == "rect-area")
            .map(|(_, _, l)| l.kind);
        assert!(matches!(rect, Some(LightKind::RectArea { target, .. }) if target == Vec3::ZERO));
    }

    #[test]
    fn animate_rotates_spinning_meshes_identically() {
        let (mut scene, rig, _) = populated();
        for t in [0.0, 1.0, 2.0, 37.5] {
            rig.animate(&mut scene, t);
            for &id in rig.spinning() {
                let r = scene.get(id).map(|n| n.transform.rotation);
                assert_eq!(r, Some(Vec3::new(0.15 * t, 0.1 * t, 0.0)));
            }
        }
    }

    #[test]
    fn floor_does_not_spin() {
        let (mut scene, rig, _) = populated();
        rig.animate(&mut scene, 5.0);
        let floor = scene.nodes().values().find(|n| n.name == "floor");
        assert_eq!(floor.map(|n| n.transform.rotation.x), Some(-FRAC_PI_2));
    }

    #[test]
    fn camera_pose() {
        let cam = LightsShowcase::new().camera();
        assert_eq!(cam.position, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!((cam.fov_degrees, cam.near, cam.far), (75.0, 0.1, 100.0));
    }
}
