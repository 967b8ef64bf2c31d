// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer window setup and event loop.

use crate::preview::PreviewScene;
use egui_wgpu::wgpu;
use solitaire_cinematic::{
    AnimatorTable, ConfigError, InputEvent, InputSender, InteractionMode, ModeController, ShowcaseConfig,
    TimelineStrip,
};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Scroll pixels per unit of orbit zoom
const SCROLL_PER_ZOOM_STEP: f32 = 100.0;

/// Viewer errors
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Renderer initialization failed
    #[error("Failed to initialize renderer: {0}")]
    RendererInit(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Config error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| ViewerError::RendererInit(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| ViewerError::RendererInit("no suitable GPU adapter".into()))?;

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Solitaire Viewer Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .map_err(|e| ViewerError::RendererInit(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| ViewerError::RendererInit("surface has no formats".into()))?;
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

        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Viewer Encoder"),
        });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer.update_texture(&self.device, &self.queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        {
            // egui-wgpu wants a 'static render pass
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Viewer Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();

            self.egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Showcase state and panels
struct ViewerInner {
    controller: ModeController,
    input: InputSender,
    preview: PreviewScene,
    timeline_strip: TimelineStrip,
    last_frame: Instant,
}

impl ViewerInner {
    fn new(config: &ShowcaseConfig) -> Self {
        let controller = ModeController::new(config, AnimatorTable::showcase());
        let input = controller.input_sender();

        Self {
            controller,
            input,
            preview: PreviewScene::new(),
            timeline_strip: TimelineStrip::new(),
            last_frame: Instant::now(),
        }
    }

    /// Advance the showcase by one frame. Runs once per redraw, outside egui.
    fn tick(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.controller.tick(delta, &mut self.preview);
    }

    /// Build the UI. egui may call this more than once per frame.
    fn ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("timeline_strip")
            .resizable(false)
            .show(ctx, |ui| {
                self.timeline_strip.ui(ui, &self.controller, &self.input);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.preview_ui(ui));

        if !self.controller.loading().is_ready() {
            self.loading_overlay(ctx);
        }
    }

    /// Queue mode shortcuts from this frame's raw key presses
    fn handle_shortcuts(&self, raw_input: &egui::RawInput) {
        for event in &raw_input.events {
            let egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } = event
            else {
                continue;
            };

            let request = match key {
                egui::Key::Space => InputEvent::ToggleMode,
                egui::Key::C => InputEvent::RequestCinematic,
                egui::Key::I => InputEvent::RequestInteractive,
                _ => continue,
            };
            self.input.send(request);
        }
    }

    fn preview_ui(&self, ui: &mut egui::Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), egui::Sense::drag());

        if response.dragged() {
            let delta = response.drag_delta();
            self.input.send(InputEvent::OrbitDrag {
                dx: delta.x,
                dy: delta.y,
            });
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.input.send(InputEvent::OrbitZoom {
                    delta: scroll / SCROLL_PER_ZOOM_STEP,
                });
            }
        }

        let painter = ui.painter_at(rect);
        if !self.controller.loading().is_ready() {
            painter.rect_filled(rect, 0.0, egui::Color32::BLACK);
            return;
        }

        self.preview.paint(&painter, rect);

        let hint = match self.controller.mode() {
            InteractionMode::Interactive => "Interactive: drag to orbit, scroll to zoom, Space for cinematic",
            InteractionMode::Cinematic => "Cinematic: Space to take control",
        };
        painter.text(
            rect.left_top() + egui::vec2(12.0, 12.0),
            egui::Align2::LEFT_TOP,
            hint,
            egui::FontId::proportional(13.0),
            egui::Color32::from_gray(170),
        );
    }

    fn loading_overlay(&self, ctx: &egui::Context) {
        let loading = self.controller.loading();

        egui::Area::new(egui::Id::new("loading_overlay"))
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("Solitaire");
                        ui.add(
                            egui::ProgressBar::new(loading.progress() / 100.0)
                                .desired_width(240.0)
                                .text(loading.label()),
                        );
                    });
                });
            });
    }
}

/// Running state of the viewer
struct ViewerRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    viewer: ViewerInner,
}

/// Main viewer application
pub struct ViewerApp {
    config: ShowcaseConfig,
    running: Option<ViewerRunning>,
    error: Option<ViewerError>,
}

impl ViewerApp {
    /// Create a viewer for a config
    pub fn new(config: ShowcaseConfig) -> Self {
        Self {
            config,
            running: None,
            error: None,
        }
    }

    /// Open the window and run until it is closed
    pub fn run(config: ShowcaseConfig) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp::new(config);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn start(&self, event_loop: &ActiveEventLoop) -> Result<ViewerRunning> {
        tracing::info!("Creating viewer window...");

        let window_attrs = Window::default_attributes()
            .with_title("Solitaire")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 480));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .map_err(|e| ViewerError::WindowCreation(e.to_string()))?,
        );

        let graphics = GraphicsState::new(window.clone())?;
        let egui_ctx = egui::Context::default();
        egui_ctx.set_visuals(egui::Visuals::dark());

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024),
        );

        tracing::info!("Viewer initialized, window size {:?}", window.inner_size());

        Ok(ViewerRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            viewer: ViewerInner::new(&self.config),
        })
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }

        match self.start(event_loop) {
            Ok(running) => self.running = Some(running),
            Err(e) => {
                tracing::error!("{e}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                let raw_input = running.egui_state.take_egui_input(&running.window);
                running.viewer.handle_shortcuts(&raw_input);
                running.viewer.tick();
                let full_output = running.egui_ctx.run(raw_input, |ctx| running.viewer.ui(ctx));

                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                match running.graphics.render(&running.egui_ctx, full_output, &running.window) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                running.window.request_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(running) = &self.running {
            running.window.request_redraw();
        }
    }
}
