use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use roamfield_input::{Direction, InputState, KeyDispatcher, KeyEvent};
use roamfield_kernel::SimConfig;
use roamfield_render_wgpu::{FrameStats, WgpuRenderer};
use roamfield_session::{Frame, Session};
use roamfield_tools::{SceneInspector, SceneSummary};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "roamfield-desktop", about = "Roamfield desktop window")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML scene config; defaults are used for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the config seed
    #[arg(short, long)]
    seed: Option<u64>,
}

/// Application state that outlives GPU setup.
struct AppState {
    config: SimConfig,
    dispatcher: KeyDispatcher,
    session: Option<Session>,
    show_hud: bool,
    last_stats: FrameStats,
}

impl AppState {
    fn new(config: SimConfig) -> Self {
        Self {
            config,
            dispatcher: KeyDispatcher::new(),
            session: None,
            show_hud: true,
            last_stats: FrameStats::default(),
        }
    }

    fn mount(&mut self) -> Result<()> {
        let session = Session::mount(self.config.clone(), &self.dispatcher)
            .context("mounting scene")?;
        self.session = Some(session);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(session) = &mut self.session {
            session.unmount();
        }
    }

    /// Release every bound key, e.g. when the window loses focus and the
    /// matching key-up events will never arrive.
    fn release_bound_keys(&self) {
        for direction in Direction::ALL {
            self.dispatcher
                .dispatch(&KeyEvent::up(self.config.keys.key_for(direction)));
        }
    }

    fn handle_key(&mut self, key: &Key, pressed: bool, repeat: bool) {
        if pressed && *key == Key::Named(NamedKey::F1) {
            if !repeat {
                self.show_hud = !self.show_hud;
            }
            return;
        }
        if repeat {
            return;
        }
        let Some(name) = key_name(key) else {
            return;
        };
        let event = if pressed {
            KeyEvent::down(name)
        } else {
            KeyEvent::up(name)
        };
        self.dispatcher.dispatch(&event);
    }
}

/// Logical key as the identifier key bindings are written in: the produced
/// character ("w") or the named key ("ArrowUp").
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(c) => Some(c.to_string()),
        Key::Named(named) => Some(format!("{named:?}")),
        _ => None,
    }
}

fn held_keys(input: InputState) -> String {
    let held: Vec<String> = input.held().map(|d| format!("{d:?}")).collect();
    if held.is_empty() {
        "-".into()
    } else {
        held.join(" ")
    }
}

fn draw_hud(ctx: &EguiContext, summary: &SceneSummary, input: InputState, stats: FrameStats) {
    egui::SidePanel::left("hud")
        .default_width(260.0)
        .show(ctx, |ui| {
            ui.heading("Roamfield");
            ui.separator();
            ui.label(format!("Tick: {}  Seed: {}", summary.tick, summary.seed));
            let p = summary.player_position;
            ui.label(format!("Player: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
            ui.label(format!("Speed: {:.4}", summary.player_speed));
            ui.label(format!("Held: {}", held_keys(input)));
            ui.separator();
            ui.label(format!(
                "Tile: ({}, {})  {} tiles",
                summary.tile.0, summary.tile.1, summary.tile_count
            ));
            ui.label(format!(
                "Item: {}",
                if summary.item_visible { "visible" } else { "collected" }
            ));
            ui.label(format!(
                "Obstacle: {}  hits: {}",
                summary.obstacle_color, summary.obstacle_hits
            ));
            ui.separator();
            ui.label(format!(
                "GPU: {} meshes, {} line verts",
                stats.mesh_instances, stats.line_vertices
            ));
            ui.small(format!("State hash: {:#018x}", summary.state_hash));
            ui.separator();
            ui.small("WASD: Move | F1: Toggle HUD | Esc: Quit");
        });
}

struct GpuApp {
    state: AppState,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(config: SimConfig) -> Self {
        Self {
            state: AppState::new(config),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Roamfield")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("creating window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("roamfield_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("creating device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, size.width, size.height);

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

        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.state.unmount();
        event_loop.exit();
    }

    /// Advance and draw one frame. Returns whether another frame should be
    /// scheduled.
    fn redraw(&mut self) -> bool {
        let (
            Some(window),
            Some(surface),
            Some(device),
            Some(queue),
            Some(config),
            Some(renderer),
            Some(egui_winit),
            Some(egui_renderer),
            Some(session),
        ) = (
            &self.window,
            &self.surface,
            &self.device,
            &self.queue,
            &self.config,
            &mut self.renderer,
            &mut self.egui_winit,
            &mut self.egui_renderer,
            &mut self.state.session,
        )
        else {
            return false;
        };
        if !session.is_mounted() {
            return false;
        }

        let output = match surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                surface.configure(device, config);
                return true;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return true;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let aspect = config.width as f32 / config.height.max(1) as f32;
        match session.frame(&mut renderer.frame(device, queue, &view, aspect)) {
            Frame::Drawn { output: stats, .. } => self.state.last_stats = stats,
            Frame::Halted => return false,
        }
        let events = session.drain_events();
        tracing::trace!(events = events.len(), "drained world events");

        let summary = SceneInspector::summary(session.world());
        let input = session.input();
        let show_hud = self.state.show_hud;
        let stats = self.state.last_stats;

        let raw_input = egui_winit.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if show_hud {
                draw_hud(ctx, &summary, input, stats);
            }
        });
        egui_winit.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [config.width, config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        egui_renderer.update_buffers(device, queue, &mut encoder, &paint_jobs, &screen_descriptor);
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
            egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            egui_renderer.free_texture(id);
        }

        output.present();
        true
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_gpu(event_loop).and_then(|()| self.state.mount()) {
            tracing::error!("startup failed: {e:#}");
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(egui_winit), Some(window)) = (&mut self.egui_winit, &self.window) {
            let response = egui_winit.on_window_event(window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::Resized(new_size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = new_size.width.max(1);
                    config.height = new_size.height.max(1);
                    surface.configure(device, config);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config.width, config.height);
                    }
                }
            }
            WindowEvent::Focused(false) => self.state.release_bound_keys(),
            WindowEvent::KeyboardInput { event, .. } => {
                let pressed = event.state == ElementState::Pressed;
                if pressed && event.logical_key == Key::Named(NamedKey::Escape) {
                    self.shutdown(event_loop);
                    return;
                }
                self.state
                    .handle_key(&event.logical_key, pressed, event.repeat);
            }
            WindowEvent::RedrawRequested => {
                if self.redraw() {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    tracing::info!("roamfield-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roamfield_input::KeyBindings;
    use winit::keyboard::NativeKey;

    #[test]
    fn character_keys_keep_their_case() {
        assert_eq!(key_name(&Key::Character("w".into())).as_deref(), Some("w"));
        assert_eq!(key_name(&Key::Character("W".into())).as_deref(), Some("W"));
    }

    #[test]
    fn named_keys_use_their_variant_name() {
        assert_eq!(
            key_name(&Key::Named(NamedKey::ArrowUp)).as_deref(),
            Some("ArrowUp")
        );
        assert_eq!(
            key_name(&Key::Named(NamedKey::Escape)).as_deref(),
            Some("Escape")
        );
        assert_eq!(key_name(&Key::Unidentified(NativeKey::Unidentified)), None);
    }

    #[test]
    fn winit_names_resolve_through_bindings() {
        let mut bindings = KeyBindings::default();
        bindings.forward = "ArrowUp".into();
        let resolve = |key: Key| key_name(&key).and_then(|k| bindings.resolve(&k));

        assert_eq!(resolve(Key::Named(NamedKey::ArrowUp)), Some(Direction::Forward));
        assert_eq!(resolve(Key::Character("d".into())), Some(Direction::Right));
        assert_eq!(resolve(Key::Character("D".into())), None);
    }
}
