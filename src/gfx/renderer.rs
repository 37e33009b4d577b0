// src/gfx/renderer.rs
//! WGPU renderer for the showcase scene
//!
//! Owns the surface, device and per-frame encoding: one depth-tested pass
//! drawing every visible object with its material's pipeline, followed by
//! the UI overlay. Texture uploads happen lazily as background loads settle.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::{debug, info};
use wgpu::{Device, TextureFormat};

use crate::error::ShowcaseError;
use crate::gfx::material::{Material, MaterialStyle};
use crate::gfx::pipeline::{PipelineConfig, PipelineManager};
use crate::gfx::texture::{TextureHandle, TextureResource};
use crate::scene::Scene;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Camera and light data shared by every pipeline.
///
/// Color vectors carry intensity in the fourth component.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
    pub ambient_color: [f32; 4],
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    pub dir_direction: [f32; 4],
    pub dir_color: [f32; 4],
}

type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Core renderer managing GPU resources and draw calls.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,

    global_ubo: GlobalUBO,
    global_bind_group: wgpu::BindGroup,
    transform_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
    lookup_texture_layout: BindGroupLayoutWithDesc,
    standard_texture_layout: BindGroupLayoutWithDesc,

    map_sampler: wgpu::Sampler,
    white_placeholder: TextureResource,
    normal_placeholder: TextureResource,
    /// GPU textures keyed by texture-handle id.
    uploaded: HashMap<u64, TextureResource>,

    wireframe_supported: bool,
}

impl Renderer {
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Renderer, ShowcaseError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        // Line polygon mode is optional; the wireframe material falls back
        // to filled triangles without it.
        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        let mut required_features = wgpu::Features::default();
        if wireframe_supported {
            required_features |= wgpu::Features::POLYGON_MODE_LINE;
        } else {
            info!("POLYGON_MODE_LINE unavailable, wireframe renders filled");
        }

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features,
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        // Bind group layouts shared by all pipelines:
        // group 0 globals, group 1 model matrix, group 2 material uniform,
        // group 3 style-specific textures.
        let global_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Global Bind Group Layout");
        let transform_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(&device, "Transform Bind Group Layout");
        let material_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(&device, "Material Bind Group Layout");
        let lookup_texture_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Lookup Texture Layout");
        // The height map is sampled in the vertex stage for displacement, so
        // the whole group is vertex-and-fragment visible.
        let standard_texture_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::texture_2d())
            .next_binding_rendering(binding_types::texture_2d())
            .next_binding_rendering(binding_types::texture_2d())
            .next_binding_rendering(binding_types::texture_2d())
            .next_binding_rendering(binding_types::texture_2d())
            .next_binding_rendering(binding_types::texture_2d())
            .next_binding_rendering(binding_types::texture_2d())
            .next_binding_rendering(binding_types::sampler(wgpu::SamplerBindingType::Filtering))
            .create(&device, "Standard Texture Layout");

        let global_ubo = GlobalUBO::new(&device);
        let global_bind_group = BindGroupBuilder::new(&global_layout)
            .resource(global_ubo.binding_resource())
            .create(&device, "Global Bind Group");

        let map_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Map Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white_placeholder =
            TextureResource::placeholder(&device, &queue, [255, 255, 255, 255], "white");
        let normal_placeholder =
            TextureResource::placeholder(&device, &queue, [128, 128, 255, 255], "flat normal");

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("flat", include_str!("shaders/flat.wgsl"));
        pipeline_manager.load_shader("normal", include_str!("shaders/normal.wgsl"));
        pipeline_manager.load_shader("matcap", include_str!("shaders/matcap.wgsl"));
        pipeline_manager.load_shader("toon", include_str!("shaders/toon.wgsl"));
        pipeline_manager.load_shader("phong", include_str!("shaders/phong.wgsl"));
        pipeline_manager.load_shader("standard", include_str!("shaders/standard.wgsl"));

        let untextured_layouts = || {
            vec![
                global_layout.layout.clone(),
                transform_layout.layout.clone(),
                material_layout.layout.clone(),
            ]
        };
        let lookup_layouts = || {
            let mut layouts = untextured_layouts();
            layouts.push(lookup_texture_layout.layout.clone());
            layouts
        };

        pipeline_manager.register_pipeline(
            "flat",
            PipelineConfig::new("flat", format).with_bind_group_layouts(untextured_layouts()),
        );
        pipeline_manager.register_pipeline(
            "flat-transparent",
            PipelineConfig::new("flat", format)
                .with_bind_group_layouts(untextured_layouts())
                .with_cull_mode(None)
                .with_alpha_blending(),
        );
        pipeline_manager.register_pipeline(
            "wireframe",
            PipelineConfig::new("flat", format)
                .with_bind_group_layouts(untextured_layouts())
                .with_cull_mode(None)
                .with_polygon_mode(if wireframe_supported {
                    wgpu::PolygonMode::Line
                } else {
                    wgpu::PolygonMode::Fill
                }),
        );
        pipeline_manager.register_pipeline(
            "normal",
            PipelineConfig::new("normal", format).with_bind_group_layouts(untextured_layouts()),
        );
        pipeline_manager.register_pipeline(
            "matcap",
            PipelineConfig::new("matcap", format).with_bind_group_layouts(lookup_layouts()),
        );
        pipeline_manager.register_pipeline(
            "toon",
            PipelineConfig::new("toon", format).with_bind_group_layouts(lookup_layouts()),
        );
        pipeline_manager.register_pipeline(
            "phong",
            PipelineConfig::new("phong", format).with_bind_group_layouts(untextured_layouts()),
        );
        pipeline_manager.register_pipeline(
            "standard",
            PipelineConfig::new("standard", format)
                .with_bind_group_layouts({
                    let mut layouts = untextured_layouts();
                    layouts.push(standard_texture_layout.layout.clone());
                    layouts
                })
                .with_cull_mode(None)
                .with_alpha_blending(),
        );
        pipeline_manager.create_all_pipelines();

        Ok(Renderer {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bind_group,
            transform_layout,
            material_layout,
            lookup_texture_layout,
            standard_texture_layout,
            map_sampler,
            white_placeholder,
            normal_placeholder,
            uploaded: HashMap::new(),
            wireframe_supported,
        })
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    pub fn wireframe_supported(&self) -> bool {
        self.wireframe_supported
    }

    /// Reconfigures the surface and depth buffer for a new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width == self.config.width && height == self.config.height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Creates buffers and bind groups for everything the scene contains.
    pub fn prepare_scene(&mut self, scene: &mut Scene) {
        for object in scene.objects.iter_mut() {
            object.ensure_gpu(&self.device, &self.transform_layout);
        }
        for material in scene.material_manager.iter_mut() {
            material.ensure_gpu(&self.device, &self.material_layout);
        }
    }

    /// Uploads any texture handles that became `Ready` since the last frame
    /// and rebuilds the texture bind groups of affected materials.
    pub fn poll_textures(&mut self, scene: &mut Scene) {
        let mut newly_uploaded: HashSet<u64> = HashSet::new();

        for material in scene.material_manager.iter() {
            for handle in material.texture_handles() {
                if !handle.is_ready() || self.uploaded.contains_key(&handle.id()) {
                    continue;
                }
                if let Some(resource) =
                    TextureResource::from_handle(&self.device, &self.queue, handle)
                {
                    debug!("uploaded texture '{}'", handle.label());
                    self.uploaded.insert(handle.id(), resource);
                    newly_uploaded.insert(handle.id());
                }
            }
        }

        for material in scene.material_manager.iter_mut() {
            if !material.style.has_texture_bindings() || material.gpu().is_none() {
                continue;
            }
            let missing = material
                .gpu()
                .map(|gpu| gpu.texture_bind_group.is_none())
                .unwrap_or(true);
            let touched = material
                .texture_handles()
                .iter()
                .any(|h| newly_uploaded.contains(&h.id()));
            if missing || touched {
                let bind_group = self.build_texture_bind_group(material);
                material.set_texture_bind_group(bind_group);
            }
        }
    }

    /// The uploaded view for a handle, or the fallback placeholder.
    fn resident_view<'a>(
        &'a self,
        handle: Option<&TextureHandle>,
        fallback: &'a TextureResource,
    ) -> &'a wgpu::TextureView {
        match handle.and_then(|h| self.uploaded.get(&h.id())) {
            Some(resource) => &resource.view,
            None => &fallback.view,
        }
    }

    fn build_texture_bind_group(&self, material: &Material) -> wgpu::BindGroup {
        let label = format!("{} Texture Bind Group", material.name);
        match material.style {
            MaterialStyle::Matcap => BindGroupBuilder::new(&self.lookup_texture_layout)
                .texture(self.resident_view(material.matcap_map.as_ref(), &self.white_placeholder))
                .sampler(&self.map_sampler)
                .create(&self.device, &label),
            MaterialStyle::Toon => BindGroupBuilder::new(&self.lookup_texture_layout)
                .texture(
                    self.resident_view(material.gradient_map.as_ref(), &self.white_placeholder),
                )
                .sampler(&self.map_sampler)
                .create(&self.device, &label),
            MaterialStyle::Standard => BindGroupBuilder::new(&self.standard_texture_layout)
                .texture(self.resident_view(material.color_map.as_ref(), &self.white_placeholder))
                .texture(self.resident_view(material.ao_map.as_ref(), &self.white_placeholder))
                .texture(self.resident_view(material.height_map.as_ref(), &self.white_placeholder))
                .texture(
                    self.resident_view(material.metalness_map.as_ref(), &self.white_placeholder),
                )
                .texture(
                    self.resident_view(material.roughness_map.as_ref(), &self.white_placeholder),
                )
                .texture(self.resident_view(material.normal_map.as_ref(), &self.normal_placeholder))
                .texture(self.resident_view(material.alpha_map.as_ref(), &self.white_placeholder))
                .sampler(&self.map_sampler)
                .create(&self.device, &label),
            _ => unreachable!("style without texture bindings"),
        }
    }

    /// Writes camera, light and material uniforms for this frame.
    pub fn update_uniforms(&mut self, scene: &mut Scene, camera: &crate::gfx::camera::CameraUniform) {
        let lights = &scene.lights;
        let global = GlobalUniform {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient_color: with_intensity(lights.ambient.color, lights.ambient.intensity),
            point_position: [
                lights.point.position[0],
                lights.point.position[1],
                lights.point.position[2],
                1.0,
            ],
            point_color: with_intensity(lights.point.color, lights.point.intensity),
            dir_direction: [
                lights.directional.direction[0],
                lights.directional.direction[1],
                lights.directional.direction[2],
                0.0,
            ],
            dir_color: with_intensity(lights.directional.color, lights.directional.intensity),
        };
        self.global_ubo.update_content(&self.queue, global);

        let uploaded = &self.uploaded;
        for material in scene.material_manager.iter_mut() {
            let channels = material.channel_mask(|h| uploaded.contains_key(&h.id()));
            material.update_uniform(&self.queue, channels);
        }
        for object in scene.objects.iter_mut() {
            object.update_transform(&self.queue);
        }
    }

    /// Encodes and submits one frame: scene pass plus optional UI overlay.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                // Surface will be reconfigured by the next resize.
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                log::error!("failed to acquire surface texture: {}", err);
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.05,
                            g: 0.05,
                            b: 0.07,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.global_bind_group, &[]);

            // Opaque objects first, then blended ones over them.
            let (opaque, transparent): (Vec<_>, Vec<_>) = scene
                .objects
                .iter()
                .filter(|o| o.visible)
                .partition(|o| !self.is_blended(scene.material_for(o)));

            for object in opaque.into_iter().chain(transparent) {
                let material = scene.material_for(object);
                let (Some(material_gpu), Some(object_gpu)) = (material.gpu(), object.gpu()) else {
                    continue;
                };
                let Some(pipeline) = self.pipeline_manager.pipeline(self.pipeline_for(material))
                else {
                    continue;
                };

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &object_gpu.transform_bind_group, &[]);
                render_pass.set_bind_group(2, &material_gpu.uniform_bind_group, &[]);
                if material.style.has_texture_bindings() {
                    let Some(texture_bind_group) = &material_gpu.texture_bind_group else {
                        continue;
                    };
                    render_pass.set_bind_group(3, texture_bind_group, &[]);
                }
                render_pass.set_vertex_buffer(0, object_gpu.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(object_gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..object_gpu.index_count, 0, 0..1);
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    fn is_blended(&self, material: &Material) -> bool {
        material.transparent || material.style == MaterialStyle::Standard
    }

    fn pipeline_for(&self, material: &Material) -> &'static str {
        match material.style {
            MaterialStyle::Flat if material.transparent => "flat-transparent",
            style => style.pipeline_name(),
        }
    }
}

fn with_intensity(color: [f32; 3], intensity: f32) -> [f32; 4] {
    [color[0], color[1], color[2], intensity]
}
