use camscene_capture::{CaptureError, PendingCapture, VideoTexture};
use camscene_common::ObjectId;
use camscene_input::{OrbitControls, PointerAction};
use camscene_render::{PerspectiveCamera, RenderFrame, Renderer};
use camscene_scene::{Mesh, Scene};
use camscene_tools::{DebugPanel, PanelError};
use camscene_variants::{SceneVariant, VariantKind};

use crate::clock::Clock;
use crate::frame_loop::{FrameLoop, LoopState};
use crate::viewport::Viewport;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Panel(#[from] PanelError),
}

/// What one running tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport<T> {
    /// 1-based frame number.
    pub frame: u64,
    /// Seconds since the session clock started.
    pub elapsed: f32,
    /// Video texture version after this tick, if capture succeeded.
    pub video_version: Option<u64>,
    pub output: T,
}

/// One running scene: the scene graph, its camera and controls, the capture
/// hand-off and the frame loop.
///
/// Everything is owned here and mutated on the host's event-loop thread.
pub struct SceneSession {
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: Viewport,
    clock: Box<dyn Clock>,
    frame_loop: FrameLoop,
    capture: PendingCapture,
    video: Option<VideoTexture>,
    screen: Option<ObjectId>,
    rig: Box<dyn SceneVariant>,
    panel: DebugPanel,
}

impl SceneSession {
    /// Build the variant's scene. The frame loop stays `Uninitialized`
    /// until [`poll_capture`](Self::poll_capture) sees the capture settle.
    pub fn new(kind: VariantKind, capture: PendingCapture, clock: Box<dyn Clock>) -> Self {
        Self::with_rig(kind.rig(), capture, clock)
    }

    pub fn with_rig(
        mut rig: Box<dyn SceneVariant>,
        capture: PendingCapture,
        clock: Box<dyn Clock>,
    ) -> Self {
        let mut scene = Scene::new();
        let panel = rig.populate(&mut scene);
        let viewport = Viewport::default();
        let mut camera = rig.camera();
        camera.set_viewport(viewport.width, viewport.height);
        let controls = OrbitControls::new(camera.position, camera.target, camera.fov_degrees);
        tracing::info!(
            variant = %rig.kind(),
            objects = scene.object_count(),
            capture = capture.source(),
            "session created"
        );
        Self {
            scene,
            camera,
            controls,
            viewport,
            clock,
            frame_loop: FrameLoop::new(),
            capture,
            video: None,
            screen: None,
            rig,
            panel,
        }
    }

    pub fn kind(&self) -> VariantKind {
        self.rig.kind()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }

    pub fn video(&self) -> Option<&VideoTexture> {
        self.video.as_ref()
    }

    pub fn screen_id(&self) -> Option<ObjectId> {
        self.screen
    }

    pub fn state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    /// Check the pending capture without blocking.
    ///
    /// Returns `Some` exactly once, when the capture settles. On success the
    /// video texture is created and the screen attached; on failure the error
    /// is logged and the scene runs without a screen. Either way the frame
    /// loop starts.
    pub fn poll_capture(&mut self) -> Option<Result<ObjectId, SessionError>> {
        let result = self.capture.poll()?;
        Some(self.settle(result))
    }

    /// Block until the capture settles. Used by headless hosts.
    pub fn wait_capture(&mut self) -> Option<Result<ObjectId, SessionError>> {
        let result = self.capture.wait()?;
        Some(self.settle(result))
    }

    fn settle(
        &mut self,
        result: Result<Box<dyn camscene_capture::CaptureStream>, CaptureError>,
    ) -> Result<ObjectId, SessionError> {
        let outcome = match result {
            Ok(stream) => {
                let (width, height) = stream.resolution();
                self.video = Some(VideoTexture::new(stream));
                let id = self.attach_screen();
                tracing::info!(width, height, screen = %id.short(), "capture ready, screen attached");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    source = self.capture.source(),
                    "capture unavailable, continuing without screen"
                );
                Err(SessionError::Capture(e))
            }
        };
        if self.frame_loop.start() {
            tracing::info!(variant = %self.kind(), "frame loop running");
        }
        outcome
    }

    /// Add the video screen to the scene. Repeated calls return the existing
    /// screen instead of adding another one.
    pub fn attach_screen(&mut self) -> ObjectId {
        if let Some(id) = self.screen.filter(|id| self.scene.contains(*id)) {
            tracing::debug!(screen = %id.short(), "screen already attached");
            return id;
        }
        let screen = self.rig.screen();
        let material = self.scene.add_material(screen.material);
        let id = self.scene.add_mesh(
            "screen",
            Mesh {
                geometry: screen.geometry,
                material,
            },
            screen.transform,
        );
        self.screen = Some(id);
        id
    }

    /// Run one frame: read the clock, animate, mark the video dirty, step the
    /// controls, render. Does nothing unless the loop is running.
    pub fn tick<R: Renderer>(&mut self, renderer: &mut R) -> Option<FrameReport<R::Output>> {
        if !self.frame_loop.is_running() {
            return None;
        }
        let elapsed = self.clock.elapsed();
        self.rig.animate(&mut self.scene, elapsed);
        if let Some(video) = self.video.as_mut() {
            video.mark_dirty();
        }
        self.camera.position = self.controls.update();
        self.camera.target = self.controls.target();

        let frame = self.frame_loop.advance();
        let output = renderer.render(&RenderFrame {
            scene: &self.scene,
            camera: &self.camera,
            video: self.video.as_ref(),
        });
        Some(FrameReport {
            frame,
            elapsed,
            video_version: self.video.as_ref().map(VideoTexture::version),
            output,
        })
    }

    pub fn handle_pointer(&mut self, action: PointerAction) {
        self.controls.handle(action, self.viewport.height as f32);
    }

    /// Apply a new viewport. Updates the camera aspect; calling again with the
    /// same arguments changes nothing.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f32) -> Viewport {
        let viewport = Viewport::new(width, height, device_pixel_ratio);
        if viewport != self.viewport {
            tracing::debug!(
                width = viewport.width,
                height = viewport.height,
                pixel_ratio = viewport.pixel_ratio,
                "viewport resized"
            );
        }
        self.viewport = viewport;
        self.camera.set_viewport(viewport.width, viewport.height);
        viewport
    }

    pub fn slider_value(&self, index: usize) -> Result<f32, SessionError> {
        Ok(self.panel.value(&self.scene, index)?)
    }

    pub fn set_slider(&mut self, index: usize, value: f32) -> Result<f32, SessionError> {
        Ok(self.panel.set(&mut self.scene, index, value)?)
    }

    pub fn stop(&mut self) {
        if self.frame_loop.state() != LoopState::Stopped {
            tracing::info!(frames = self.frames(), "frame loop stopped");
        }
        self.frame_loop.stop();
    }
}

impl std::fmt::Debug for SceneSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneSession")
            .field("variant", &self.kind())
            .field("state", &self.state())
            .field("frames", &self.frames())
            .field("objects", &self.scene.object_count())
            .field("screen", &self.screen)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use camscene_capture::{CaptureSource, TestPattern};
    use camscene_render::DebugTextRenderer;
    use glam::{Vec2, Vec3};

    fn ready() -> PendingCapture {
        PendingCapture::resolved("test-pattern", Box::new(TestPattern::new(4, 4)).open())
    }

    fn denied() -> PendingCapture {
        PendingCapture::resolved("camera", Err(CaptureError::PermissionDenied))
    }

    fn session(kind: VariantKind, capture: PendingCapture, times: &[f32]) -> SceneSession {
        SceneSession::new(kind, capture, Box::new(FakeClock::new(times.iter().copied())))
    }

    fn screens(s: &SceneSession) -> usize {
        s.scene().nodes().values().filter(|n| n.name == "screen").count()
    }

    #[test]
    fn screen_absent_until_capture_settles() {
        let mut s = session(VariantKind::Lights, ready(), &[0.0]);
        assert_eq!(screens(&s), 0);
        assert_eq!(s.state(), LoopState::Uninitialized);
        assert!(s.tick(&mut DebugTextRenderer::new()).is_none());

        let id = s.poll_capture().and_then(Result::ok);
        assert!(id.is_some());
        assert_eq!(s.screen_id(), id);
        assert_eq!(screens(&s), 1);
        assert!(s.is_running());
    }

    #[test]
    fn screen_is_never_duplicated() {
        let mut s = session(VariantKind::Orbit, ready(), &[0.0]);
        let first = s.poll_capture().and_then(Result::ok);
        assert!(s.poll_capture().is_none());
        let again = s.attach_screen();
        assert_eq!(Some(again), first);
        assert_eq!(screens(&s), 1);
    }

    #[test]
    fn failed_capture_still_runs_without_screen() {
        let mut s = session(VariantKind::Lights, denied(), &[0.0, 1.0]);
        assert!(matches!(
            s.poll_capture(),
            Some(Err(SessionError::Capture(CaptureError::PermissionDenied)))
        ));
        assert!(s.is_running());
        assert_eq!(screens(&s), 0);
        assert!(s.video().is_none());

        let report = s.tick(&mut DebugTextRenderer::new());
        assert_eq!(report.as_ref().map(|r| r.video_version), Some(None));
        assert!(report.is_some_and(|r| r.output.contains("Video: none")));
    }

    #[test]
    fn video_version_advances_once_per_tick() {
        let mut s = session(VariantKind::Lights, ready(), &[0.0, 0.1, 0.2, 0.3]);
        s.poll_capture();
        let mut r = DebugTextRenderer::new();
        let versions: Vec<_> = (0..4)
            .filter_map(|_| s.tick(&mut r))
            .map(|rep| rep.video_version)
            .collect();
        assert_eq!(versions, [Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn fake_clock_sequence_is_deterministic() {
        let run = || {
            let mut s = session(VariantKind::Lights, ready(), &[0.0, 1.0, 2.0]);
            s.poll_capture();
            let mut r = DebugTextRenderer::new();
            let mut rotations = Vec::new();
            while let Some(rep) = s.tick(&mut r) {
                let mut frame: Vec<_> = s
                    .scene()
                    .meshes()
                    .filter(|(_, n, _)| n.name != "floor" && n.name != "screen")
                    .map(|(_, n, _)| (n.name.clone(), n.transform.rotation))
                    .collect();
                frame.sort_by(|a, b| a.0.cmp(&b.0));
                rotations.push((rep.elapsed, frame));
                if rep.frame == 3 {
                    break;
                }
            }
            rotations
        };
        let a = run();
        assert_eq!(a, run());
        assert_eq!(a.len(), 3);
        for (t, frame) in &a {
            assert_eq!(frame.len(), 3);
            for (_, rot) in frame {
                assert_eq!(*rot, Vec3::new(0.15 * t, 0.1 * t, 0.0));
            }
        }
        assert_eq!(a[2].0, 2.0);
    }

    #[test]
    fn orbit_variant_moves_lights() {
        let mut s = session(VariantKind::Orbit, ready(), &[2.0]);
        s.poll_capture();
        s.tick(&mut DebugTextRenderer::new());
        let light1 = s
            .scene()
            .lights()
            .find(|(_, n, _)| n.name == "moving-light-1")
            .map(|(_, n, _)| n.transform.position);
        assert_eq!(light1, Some(camscene_variants::motion::moving_light_1(2.0)));
    }

    #[test]
    fn resize_updates_camera_and_viewport() {
        let mut s = session(VariantKind::Lights, ready(), &[]);
        let vp = s.resize(1000, 500, 3.0);
        assert_eq!((vp.width, vp.height, vp.pixel_ratio), (1000, 500, 2.0));
        assert_eq!(s.camera().aspect, 2.0);
        assert_eq!(s.resize(1000, 500, 3.0), vp);
        assert_eq!(s.viewport().drawing_buffer(), (2000, 1000));
    }

    #[test]
    fn slider_touches_only_its_light() {
        let mut s = session(VariantKind::Lights, ready(), &[]);
        let point = s.panel().find("Point Int.").unwrap_or(usize::MAX);
        let before: Vec<_> = (0..s.panel().len()).map(|i| s.slider_value(i)).collect();
        assert_eq!(s.set_slider(point, 4.2), Ok(4.2));
        for (i, old) in before.into_iter().enumerate() {
            if i == point {
                assert_eq!(s.slider_value(i), Ok(4.2));
            } else {
                assert_eq!(s.slider_value(i), old);
            }
        }
        assert!(matches!(
            s.set_slider(99, 0.0),
            Err(SessionError::Panel(PanelError::NoSuchBinding(99)))
        ));
    }

    #[test]
    fn stop_ends_ticking() {
        let mut s = session(VariantKind::Lights, ready(), &[0.0, 1.0]);
        s.poll_capture();
        let mut r = DebugTextRenderer::new();
        assert!(s.tick(&mut r).is_some());
        s.stop();
        assert_eq!(s.state(), LoopState::Stopped);
        assert!(s.tick(&mut r).is_none());
        assert_eq!(s.frames(), 1);
    }

    #[test]
    fn stop_before_capture_keeps_loop_stopped() {
        let mut s = session(VariantKind::Lights, ready(), &[0.0]);
        s.stop();
        assert!(s.poll_capture().is_some());
        assert_eq!(s.state(), LoopState::Stopped);
    }

    #[test]
    fn idle_controls_keep_camera_radius() {
        let mut s = session(VariantKind::Orbit, ready(), &[]);
        s.poll_capture();
        let radius = s.camera().position.distance(s.camera().target);
        s.handle_pointer(PointerAction::Rotate(Vec2::new(120.0, 30.0)));
        let mut r = DebugTextRenderer::new();
        for _ in 0..400 {
            s.tick(&mut r);
        }
        assert!(!s.controls().is_moving());
        let after = s.camera().position.distance(s.camera().target);
        assert!((after - radius).abs() < 1e-3);
        assert!(s.camera().position != Vec3::new(0.0, 0.0, 1.25));
    }
}
