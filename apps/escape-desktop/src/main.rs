use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use escape_common::GameConfig;
use escape_input::{InputState, Key};
use escape_kernel::Session;
use escape_render::FrameSnapshot;
use escape_render_wgpu::WgpuRenderer;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{
    DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

const WINDOW_TITLE: &str = "Escape Room - Loading...";
const PIXELS_PER_SCROLL_LINE: f64 = 40.0;
/// Longest frame step fed to the simulation, so a stall cannot launch the
/// player through a jump in one step.
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Parser)]
#[command(name = "escape-desktop", about = "First-person escape room")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML file overriding camera and interaction tuning
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Initial window height in pixels
    #[arg(long, default_value = "600")]
    height: u32,
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

/// Application state.
struct AppState {
    session: Session,
    input: InputState,
    cursor_grabbed: bool,
    quit_requested: bool,
    last_frame: Instant,
    last_title: String,
}

impl AppState {
    fn new(config: &GameConfig) -> Self {
        Self {
            session: Session::new(config),
            input: InputState::new(),
            cursor_grabbed: false,
            quit_requested: false,
            last_frame: Instant::now(),
            last_title: String::new(),
        }
    }

    /// Run one simulation step against this frame's input snapshot.
    fn update(&mut self, dt: f32) {
        let snapshot = self.input.snapshot();
        if snapshot.quit {
            self.quit_requested = true;
            return;
        }
        self.session.update(dt, &snapshot);
        self.input.end_frame();
    }
}

fn set_cursor_grab(window: &Window, grab: bool) -> bool {
    if grab {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        if let Err(e) = grabbed {
            tracing::warn!("cursor grab unavailable: {e}");
            return false;
        }
    } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        tracing::warn!("failed to release cursor: {e}");
    }
    window.set_cursor_visible(!grab);
    grab
}

/// Crosshair, interaction prompt and progress overlay.
fn draw_hud(ctx: &EguiContext, frame: &FrameSnapshot) {
    let screen = ctx.screen_rect();
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("hud"),
    ));
    let center = screen.center();
    let stroke = egui::Stroke::new(2.0, egui::Color32::WHITE);
    painter.line_segment(
        [center - egui::vec2(8.0, 0.0), center + egui::vec2(8.0, 0.0)],
        stroke,
    );
    painter.line_segment(
        [center - egui::vec2(0.0, 8.0), center + egui::vec2(0.0, 8.0)],
        stroke,
    );

    painter.text(
        screen.left_top() + egui::vec2(12.0, 12.0),
        egui::Align2::LEFT_TOP,
        format!("Buttons: {}/{}", frame.pressed, frame.total),
        egui::FontId::monospace(16.0),
        egui::Color32::LIGHT_GRAY,
    );

    if frame.game_won {
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "You Escaped",
            egui::FontId::proportional(48.0),
            egui::Color32::from_rgb(255, 128, 0),
        );
    } else if let Some(prompt) = &frame.prompt {
        painter.text(
            center + egui::vec2(0.0, 40.0),
            egui::Align2::CENTER_TOP,
            prompt,
            egui::FontId::proportional(20.0),
            egui::Color32::WHITE,
        );
    }
}

/// GPU and window resources, created once the event loop resumes.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext, size: PhysicalSize<u32>) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("escape_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
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

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
        tracing::debug!(width = self.config.width, height = self.config.height, "resized");
    }

    /// Draw the scene and the HUD on top of it.
    fn draw(&mut self, egui_ctx: &EguiContext, frame: &FrameSnapshot) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
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

        self.renderer.render(&self.device, &self.queue, &view, frame);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| draw_hud(ctx, frame));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("hud_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("hud_pass"),
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    initial_size: PhysicalSize<u32>,
}

impl GpuApp {
    fn new(config: &GameConfig, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            state: AppState::new(config),
            gpu: None,
            egui_ctx: EguiContext::default(),
            initial_size,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame)
            .as_secs_f32()
            .min(MAX_FRAME_DT);
        self.state.last_frame = now;
        self.state.update(dt);
        if self.state.quit_requested {
            tracing::info!("quit requested");
            event_loop.exit();
            return;
        }

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let frame = FrameSnapshot::capture(&self.state.session, gpu.aspect());
        if frame.status != self.state.last_title {
            gpu.window.set_title(&frame.status);
            self.state.last_title.clone_from(&frame.status);
        }

        gpu.draw(&self.egui_ctx, &frame);
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.egui_ctx, self.initial_size) {
            Ok(gpu) => {
                self.state.cursor_grabbed = set_cursor_grab(&gpu.window, true);
                self.state.last_frame = Instant::now();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("failed to initialize graphics: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::Focused(focused) => {
                self.state.input.focus_changed(focused);
                if let Some(gpu) = &self.gpu {
                    self.state.cursor_grabbed = set_cursor_grab(&gpu.window, focused);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                self.state
                    .input
                    .key_event(map_key(code), key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } if !self.state.cursor_grabbed => {
                if let Some(gpu) = &self.gpu {
                    self.state.cursor_grabbed = set_cursor_grab(&gpu.window, true);
                    self.state.input.focus_changed(true);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_SCROLL_LINE) as f32,
                };
                self.state.input.scrolled(lines);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        match event {
            DeviceEvent::MouseMotion { delta } if self.state.cursor_grabbed => {
                self.state
                    .input
                    .mouse_motion(delta.0 as f32, delta.1 as f32);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };

    tracing::info!("escape-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&config, PhysicalSize::new(cli.width, cli.height));
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::KeyW), Key::W);
        assert_eq!(map_key(KeyCode::KeyE), Key::E);
        assert_eq!(map_key(KeyCode::Space), Key::Space);
        assert_eq!(map_key(KeyCode::KeyQ), Key::Other);
    }

    #[test]
    fn escape_requests_quit_without_stepping() {
        let mut state = AppState::new(&GameConfig::default());
        state.input.key_event(Key::Escape, true);
        state.update(0.016);
        assert!(state.quit_requested);
        assert_eq!(state.session.frame(), 0);
    }

    #[test]
    fn update_latches_input() {
        let mut state = AppState::new(&GameConfig::default());
        state.input.key_event(Key::E, true);
        assert!(state.input.snapshot().interact_pressed);
        state.update(0.016);
        assert!(!state.input.snapshot().interact_pressed);
        assert_eq!(state.session.frame(), 1);
    }
}
