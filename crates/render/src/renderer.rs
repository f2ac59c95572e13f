use crate::camera::PerspectiveCamera;
use camscene_capture::VideoTexture;
use camscene_scene::{LightKind, Scene};

/// Everything one render call reads.
#[derive(Clone, Copy)]
pub struct RenderFrame<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
    pub video: Option<&'a VideoTexture>,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene, camera and video texture and produces output.
/// It never mutates the scene; renderer-side caches (GPU buffers, the last
/// uploaded video version) live inside the renderer.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, frame: &RenderFrame<'_>) -> Self::Output;
}

/// Headless renderer producing a human-readable dump of the frame.
///
/// Useful for CLI output, logging, and testing the frame loop without a GPU.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, frame: &RenderFrame<'_>) -> String {
        self.frames += 1;
        tracing::trace!(frame = self.frames, "text frame");
        let cam = frame.camera;
        let mut out = String::new();

        out.push_str(&format!(
            "=== Frame {} ({} objects) ===\n",
            self.frames,
            frame.scene.object_count()
        ));
        out.push_str(&format!(
            "Camera: pos=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}\n",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.target.x,
            cam.target.y,
            cam.target.z,
            cam.fov_degrees,
            cam.aspect
        ));

        // Ids are random, so list by name for stable output.
        let mut lights: Vec<_> = frame.scene.lights().collect();
        lights.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        for (_, node, light) in lights {
            let p = node.transform.position;
            let line = match light.kind {
                LightKind::Ambient => format!(
                    "  light {:<14} {:<11} intensity={:.4}\n",
                    node.name,
                    light.kind_name(),
                    light.intensity
                ),
                _ => format!(
                    "  light {:<14} {:<11} intensity={:.4} pos=({:.3}, {:.3}, {:.3})\n",
                    node.name,
                    light.kind_name(),
                    light.intensity,
                    p.x,
                    p.y,
                    p.z
                ),
            };
            out.push_str(&line);
        }

        let mut meshes: Vec<_> = frame.scene.meshes().collect();
        meshes.sort_by(|a, b| a.1.name.cmp(&b.1.name));
        for (_, node, mesh) in meshes {
            let t = node.transform;
            out.push_str(&format!(
                "  mesh  {:<14} {:<11} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3}) material={}\n",
                node.name,
                mesh.geometry.name(),
                t.position.x,
                t.position.y,
                t.position.z,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z,
                mesh.material.0
            ));
        }

        match frame.video {
            Some(video) => {
                let (w, h) = video.size();
                out.push_str(&format!("Video: {w}x{h} version={}\n", video.version()));
            }
            None => out.push_str("Video: none\n"),
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camscene_capture::{CaptureSource, TestPattern};
    use camscene_common::{Color, Transform};
    use camscene_scene::{Geometry, Light, Material, Mesh};
    use glam::Vec3;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let camera = PerspectiveCamera::default();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&RenderFrame {
            scene: &scene,
            camera: &camera,
            video: None,
        });

        assert!(output.contains("Frame 1 (0 objects)"));
        assert!(output.contains("Video: none"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn debug_renderer_lists_objects_and_video() {
        let mut scene = Scene::new();
        let m = scene.add_material(Material::standard(0.4));
        scene.add_light("ambient", Light::ambient(Color::WHITE, 0.5), Vec3::ZERO);
        scene.add_light(
            "point",
            Light::point(Color::from_hex(0xff9000), 0.5, 10.0, 2.0),
            Vec3::new(1.0, -0.5, 1.0),
        );
        scene.add_mesh(
            "cube",
            Mesh {
                geometry: Geometry::Box {
                    width: 0.75,
                    height: 0.75,
                    depth: 0.75,
                },
                material: m,
            },
            Transform::default(),
        );

        let stream = Box::new(TestPattern::new(16, 9))
            .open()
            .expect("test pattern opens");
        let video = VideoTexture::new(stream);
        let camera = PerspectiveCamera::default();
        let output = DebugTextRenderer::new().render(&RenderFrame {
            scene: &scene,
            camera: &camera,
            video: Some(&video),
        });

        assert!(output.contains("ambient"));
        assert!(output.contains("pos=(1.000, -0.500, 1.000)"));
        assert!(output.contains("box"));
        assert!(output.contains("Video: 16x9 version=0"));
    }
}
