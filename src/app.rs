// src/app.rs
//! Application shell: winit event loop, window and per-frame orchestration.

use std::sync::Arc;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::error::ShowcaseError;
use crate::gfx::renderer::Renderer;
use crate::gfx::texture::TextureLoader;
use crate::scene::{showcase, Scene, SceneContext};
use crate::ui::{material_panel, UiManager};

const INITIAL_WIDTH: u32 = 1200;
const INITIAL_HEIGHT: u32 = 800;

/// The showcase application. Owns the event loop until `run` consumes it.
pub struct ShowcaseApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    ui_manager: Option<UiManager>,
    scene: Scene,
    context: SceneContext,
}

impl ShowcaseApp {
    /// Assembles the showcase scene and kicks off the background texture
    /// loads. The window and GPU come up later, on `resumed`.
    pub fn new() -> Result<Self, ShowcaseError> {
        let event_loop = EventLoop::new()?;

        let loader = TextureLoader::new("assets");
        let scene = showcase::build(&loader);
        let context = SceneContext::new(INITIAL_WIDTH, INITIAL_HEIGHT, 1.0);

        Ok(Self {
            event_loop,
            app_state: AppState {
                window: None,
                renderer: None,
                ui_manager: None,
                scene,
                context,
            },
        })
    }

    /// Runs the event loop until the window closes or Escape is pressed.
    pub fn run(mut self) -> Result<(), ShowcaseError> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;
        Ok(())
    }
}

impl AppState {
    /// Applies a physical-size change to context, surface and UI together.
    fn apply_resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        let logical_w = (width as f64 / scale_factor).round() as u32;
        let logical_h = (height as f64 / scale_factor).round() as u32;
        self.context.on_resize(logical_w, logical_h, scale_factor);

        // The surface size is derived from the host-reported physical size,
        // never round-tripped through rounded logical units.
        let (surface_w, surface_h) = self.context.viewport.surface_size(width, height);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(surface_w, surface_h);
        }
        if let Some(ui_manager) = self.ui_manager.as_mut() {
            ui_manager.update_display_size(surface_w, surface_h);
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("material showcase")
                .with_inner_size(winit::dpi::LogicalSize::new(INITIAL_WIDTH, INITIAL_HEIGHT)),
        ) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("failed to create window: {}", err);
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner: PhysicalSize<u32> = window.inner_size();
        let logical_w = (inner.width as f64 / scale_factor).round() as u32;
        let logical_h = (inner.height as f64 / scale_factor).round() as u32;
        self.context.on_resize(logical_w, logical_h, scale_factor);
        let (physical_w, physical_h) = self.context.viewport.surface_size(inner.width, inner.height);

        let window_clone = window.clone();
        let renderer = match pollster::block_on(async move {
            Renderer::new(window_clone, physical_w, physical_h).await
        }) {
            Ok(renderer) => renderer,
            Err(err) => {
                error!("renderer setup failed: {}", err);
                event_loop.exit();
                return;
            }
        };

        let mut renderer = renderer;
        renderer.prepare_scene(&mut self.scene);

        let mut ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );
        ui_manager.update_display_size(physical_w, physical_h);

        info!(
            "window up: {}x{} logical at ratio {:.2}",
            logical_w,
            logical_h,
            self.context.viewport.pixel_ratio()
        );

        self.window = Some(window);
        self.renderer = Some(renderer);
        self.ui_manager = Some(ui_manager);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        physical_key: winit::keyboard::PhysicalKey::Code(key_code),
                        ..
                    },
                ..
            } => {
                if matches!(key_code, winit::keyboard::KeyCode::Escape) {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.apply_resize(width, height, window.scale_factor());
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let inner = window.inner_size();
                self.apply_resize(inner.width, inner.height, scale_factor);
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let Some(renderer) = self.renderer.as_mut() else {
                    return;
                };

                self.context.tick();
                renderer.poll_textures(&mut self.scene);
                renderer.update_uniforms(&mut self.scene, &self.context.camera.uniform);

                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    let scene = &mut self.scene;
                    ui_manager.update_logic(&window, |ui| material_panel(ui, scene));
                    renderer.render_frame(
                        &self.scene,
                        Some(|device: &wgpu::Device,
                              queue: &wgpu::Queue,
                              encoder: &mut wgpu::CommandEncoder,
                              view: &wgpu::TextureView| {
                            ui_manager.render(device, queue, encoder, view);
                        }),
                    );
                } else {
                    renderer.render_frame(
                        &self.scene,
                        None::<fn(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView)>,
                    );
                }
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            let io = ui_manager.context.io();
            if io.want_capture_mouse || io.want_capture_keyboard {
                return;
            }
        }
        self.context.on_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
