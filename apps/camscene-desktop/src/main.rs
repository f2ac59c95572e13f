use anyhow::{Context, Result};
use camscene_capture::{CaptureSource, MAX_DIMENSION, PendingCapture, TestPattern, Unavailable};
use camscene_input::{PointerAction, PointerButton, PointerTracker};
use camscene_render_wgpu::{FrameStats, WgpuRenderer};
use camscene_session::{SceneSession, SystemClock, Viewport};
use camscene_tools::SceneInspector;
use camscene_variants::VariantKind;
use clap::{Parser, ValueEnum};
use egui::Context as EguiContext;
use glam::Vec2;
use std::str::FromStr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "camscene-desktop", about = "Live camera image in a lit 3D scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene to show: lights or orbit
    #[arg(long, default_value = "lights")]
    variant: VariantKind,

    /// Where the screen image comes from
    #[arg(long, value_enum, default_value_t = CaptureChoice::TestPattern)]
    capture: CaptureChoice,

    /// Capture resolution, WIDTHxHEIGHT
    #[arg(long, default_value = "640x480")]
    capture_size: CaptureSize,
}

#[derive(Clone, Copy, ValueEnum)]
enum CaptureChoice {
    /// Animated colour bars
    TestPattern,
    /// A device that never opens
    Unavailable,
}

#[derive(Clone, Copy, Debug)]
struct CaptureSize {
    width: u32,
    height: u32,
}

impl FromStr for CaptureSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=MAX_DIMENSION).contains(n))
                .ok_or_else(|| format!("'{v}' is not an integer in 1..={MAX_DIMENSION}"))
        };
        Ok(Self {
            width: parse(w)?,
            height: parse(h)?,
        })
    }
}

impl CaptureChoice {
    fn source(self, size: CaptureSize) -> Box<dyn CaptureSource> {
        match self {
            Self::TestPattern => Box::new(TestPattern::new(size.width, size.height)),
            Self::Unavailable => Box::new(Unavailable),
        }
    }
}

/// Swapchain and scene-target sizes for one window size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Extents {
    /// Physical window size. egui draws at this size.
    surface: (u32, u32),
    /// Capped drawing buffer the scene renders into.
    scene: (u32, u32),
}

impl Extents {
    fn new(size: PhysicalSize<u32>, viewport: &Viewport) -> Self {
        Self {
            surface: (size.width.max(1), size.height.max(1)),
            scene: viewport.drawing_buffer(),
        }
    }
}

/// GPU and UI state, created once the window exists.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct App {
    session: SceneSession,
    pointer: PointerTracker,
    show_panel: bool,
    last_stats: FrameStats,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl App {
    fn new(session: SceneSession) -> Self {
        Self {
            session,
            pointer: PointerTracker::new(),
            show_panel: true,
            last_stats: FrameStats::default(),
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn init_gpu(&self, window: Arc<Window>) -> Result<Gpu> {
        let extents = Extents::new(window.inner_size(), &self.session.viewport());
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("camscene_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or(surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: extents.surface.0,
            height: extents.surface.1,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let (width, height) = extents.scene;
        let renderer = WgpuRenderer::new(&device, &queue, surface_format, width, height);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Gpu {
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    /// Push the window's current size through the session. The surface
    /// follows the window; the scene target follows the capped drawing buffer.
    fn apply_size(&mut self, size: PhysicalSize<u32>, scale_factor: f64) {
        let logical: LogicalSize<f64> = size.to_logical(scale_factor);
        let viewport = self.session.resize(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale_factor as f32,
        );
        let extents = Extents::new(size, &viewport);
        if let Some(gpu) = &mut self.gpu {
            (gpu.config.width, gpu.config.height) = extents.surface;
            gpu.surface.configure(&gpu.device, &gpu.config);
            gpu.renderer
                .resize(&gpu.device, extents.scene.0, extents.scene.1);
        }
    }

    fn handle_key(&mut self, key: KeyCode, event_loop: &ActiveEventLoop) {
        match key {
            KeyCode::F1 => self.show_panel = !self.show_panel,
            KeyCode::Escape => {
                self.session.stop();
                event_loop.exit();
            }
            _ => {}
        }
    }

    fn redraw(&mut self) {
        self.session.poll_capture();

        let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut target = gpu.renderer.target(&gpu.device, &gpu.queue, &view);
        if let Some(report) = self.session.tick(&mut target) {
            self.last_stats = report.output;
        }

        let raw_input = gpu.egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if self.show_panel {
                draw_panel(ctx, &mut self.session, &self.last_stats);
            }
        });

        gpu.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

fn draw_panel(ctx: &EguiContext, session: &mut SceneSession, stats: &FrameStats) {
    let summary = SceneInspector::summary(session.scene());
    let bindings = session.panel().bindings().to_vec();

    egui::Window::new("Debug")
        .default_width(280.0)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label(format!("Variant: {}  State: {}", session.kind(), session.state()));
            ui.label(summary.to_string());
            let video = session
                .video()
                .map(|v| {
                    let (w, h) = v.size();
                    format!("{w}x{h} v{}", v.version())
                })
                .unwrap_or_else(|| "none".into());
            ui.label(format!("Frame: {}  Video: {video}", session.frames()));
            ui.label(format!(
                "Drawn: {} meshes, {} lights",
                stats.meshes, stats.lights
            ));
            let eye = session.camera().position;
            ui.label(format!("Camera: ({:.2}, {:.2}, {:.2})", eye.x, eye.y, eye.z));
            ui.separator();

            for (index, binding) in bindings.iter().enumerate() {
                let Ok(mut value) = session.slider_value(index) else {
                    continue;
                };
                let slider = egui::Slider::new(&mut value, binding.min..=binding.max)
                    .step_by(binding.step as f64)
                    .text(binding.label.as_str());
                if ui.add(slider).changed() {
                    if let Err(e) = session.set_slider(index, value) {
                        tracing::warn!("slider '{}' rejected: {e}", binding.label);
                    }
                }
            }

            ui.separator();
            ui.small("F1: Toggle Panel | LMB: Orbit | RMB: Pan | Wheel: Zoom | Esc: Quit");
        });
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(format!("camscene: {}", self.session.kind()))
            .with_inner_size(LogicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let size = window.inner_size();
        let logical: LogicalSize<f64> = size.to_logical(scale_factor);
        self.session.resize(
            logical.width.round() as u32,
            logical.height.round() as u32,
            scale_factor as f32,
        );

        match self.init_gpu(window.clone()) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("failed to initialize GPU: {e:#}");
                event_loop.exit();
                return;
            }
        }
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(window), Some(gpu)) = (&self.window, &mut self.gpu) {
            let response = gpu.egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                self.session.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                self.apply_size(new_size, scale);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.apply_size(size, scale_factor);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.handle_key(key, event_loop);
            }
            WindowEvent::MouseInput { button, state, .. } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    _ => return,
                };
                self.pointer.button(button, state == ElementState::Pressed);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.window.as_ref().map_or(1.0, |w| w.scale_factor());
                let p = position.to_logical::<f64>(scale);
                let action = self.pointer.moved(Vec2::new(p.x as f32, p.y as f32));
                self.session.handle_pointer(action);
            }
            WindowEvent::CursorLeft { .. } => self.pointer.left(),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / 100.0) as f32,
                };
                // winit reports scrolling away from the user as positive.
                let action = self.pointer.wheel(-lines);
                if action != PointerAction::Noop {
                    self.session.handle_pointer(action);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!(variant = %cli.variant, "camscene-desktop starting");

    let capture = PendingCapture::spawn(cli.capture.source(cli.capture_size));
    let session = SceneSession::new(cli.variant, capture, Box::new(SystemClock::start()));

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(session);
    event_loop.run_app(&mut app)?;

    Ok(())
}
