use camscene_common::{Color, ObjectId, Transform};
use camscene_render::PerspectiveCamera;
use camscene_scene::{Geometry, Light, Material, Scene};
use camscene_tools::{DebugPanel, SliderBinding};
use glam::Vec3;

use crate::motion;
use crate::rig::{ScreenSpec, SceneVariant, VariantKind};

type Path = fn(f32) -> Vec3;

const PATHS: [(&str, u32, Path); 3] = [
    ("moving-light-1", 0xff0040, motion::moving_light_1),
    ("moving-light-2", 0x0040ff, motion::moving_light_2),
    ("moving-light-3", 0x80ff80, motion::moving_light_3),
];

/// A mirrored 4:3 screen lit by fixed lights and three point lights on
/// closed orbital paths.
#[derive(Debug, Default)]
pub struct OrbitingLights {
    moving: Vec<(ObjectId, Path)>,
}

impl OrbitingLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn moving(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.moving.iter().map(|(id, _)| *id)
    }
}

impl SceneVariant for OrbitingLights {
    fn kind(&self) -> VariantKind {
        VariantKind::Orbit
    }

    fn camera(&self) -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 100.0).at(Vec3::new(0.0, 0.0, 1.25))
    }

    fn populate(&mut self, scene: &mut Scene) -> DebugPanel {
        let ambient = scene.add_light("ambient", Light::ambient(Color::WHITE, 0.5), Vec3::ZERO);
        let rect_area = scene.add_light(
            "rect-area",
            Light::rect_area(Color::from_hex(0x4e00ff), 2.0, 1.0, 1.0).look_at(Vec3::ZERO),
            Vec3::new(-1.5, 0.0, 1.5),
        );
        let directional = scene.add_light(
            "directional",
            Light::directional(Color::from_hex(0x00fffc), 0.3),
            Vec3::new(1.0, 0.25, 0.0),
        );

        self.moving.clear();
        for (name, hex, path) in PATHS {
            let id = scene.add_light(name, Light::point(Color::from_hex(hex), 1.5, 10.0, 2.0), path(0.0));
            self.moving.push((id, path));
        }
        tracing::debug!(objects = scene.object_count(), "orbiting lights populated");

        DebugPanel::new()
            .with(SliderBinding::new("Ambient Intensity", ambient, 0.0, 1.0, 0.0001))
            .with(SliderBinding::new("RectArea Int.", rect_area, 0.0, 10.0, 0.001))
            .with(SliderBinding::new("Directional Int.", directional, 0.0, 1.0, 0.0001))
    }

    fn screen(&self) -> ScreenSpec {
        ScreenSpec {
            geometry: Geometry::Plane {
                width: 4.0 / 3.0,
                height: 1.0,
            },
            material: Material::lit_video(0.4),
            transform: Transform {
                scale: Vec3::new(-1.0, 1.0, 1.0),
                ..Transform::default()
            },
        }
    }

    fn animate(&self, scene: &mut Scene, t: f32) {
        for &(id, path) in &self.moving {
            scene.set_position(id, path(t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> (Scene, OrbitingLights, DebugPanel) {
        let mut scene = Scene::new();
        let mut rig = OrbitingLights::new();
        let panel = rig.populate(&mut scene);
        (scene, rig, panel)
    }

    fn position(scene: &Scene, id: ObjectId) -> Vec3 {
        scene.get(id).map(|n| n.transform.position).unwrap_or(Vec3::NAN)
    }

    #[test]
    fn content() {
        let (scene, rig, panel) = populated();
        assert_eq!(scene.lights().count(), 6);
        assert_eq!(scene.meshes().count(), 0);
        assert_eq!(rig.moving().count(), 3);
        let labels: Vec<_> = panel.bindings().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Ambient Intensity", "RectArea Int.", "Directional Int."]);
        assert_eq!(panel.bindings()[1].max, 10.0);
    }

    #[test]
    fn moving_lights_follow_their_paths() {
        let (mut scene, rig, _) = populated();
        let ids: Vec<_> = rig.moving().collect();
        for t in [0.0, 1.0, 2.0, 11.3] {
            rig.animate(&mut scene, t);
            assert_eq!(position(&scene, ids[0]), motion::moving_light_1(t));
            assert_eq!(position(&scene, ids[1]), motion::moving_light_2(t));
            assert_eq!(position(&scene, ids[2]), motion::moving_light_3(t));
        }
    }

    #[test]
    fn fixed_lights_stay_put() {
        let (mut scene, rig, _) = populated();
        let fixed: Vec<_> = scene
            .lights()
            .filter(|(_, n, _)| !n.name.starts_with("moving"))
            .map(|(id, n, _)| (id, n.transform.position))
            .collect();
        rig.animate(&mut scene, 4.0);
        for (id, before) in fixed {
            assert_eq!(position(&scene, id), before);
        }
    }

    #[test]
    fn camera_and_screen() {
        let rig = OrbitingLights::new();
        assert_eq!(rig.camera().position, Vec3::new(0.0, 0.0, 1.25));
        let screen = rig.screen();
        assert_eq!(screen.transform.scale.x, -1.0);
        assert!(screen.material.map().is_some());
    }
}
