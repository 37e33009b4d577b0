// src/gfx/material.rs
//! Material system for the showcase
//!
//! One material instance exists per shading style in the scene. Materials
//! are stored centrally in [`MaterialManager`] and objects reference them by
//! id. Texture channels hold [`TextureHandle`]s rather than images, so a
//! channel can be pending or failed without blocking scene assembly.

use std::collections::HashMap;

use wgpu::Device;

use crate::gfx::texture::TextureHandle;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc},
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

/// The stock shading styles of the showcase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialStyle {
    /// Unlit flat color (optionally transparent).
    Flat,
    /// Unlit flat color rendered as lines.
    Wireframe,
    /// Normal-visualization shading.
    Normal,
    /// Matcap lighting lookup.
    Matcap,
    /// Toon shading driven by a gradient map.
    Toon,
    /// Physically-based shading with the full door texture set.
    Standard,
    /// Blinn-Phong with a specular highlight.
    Phong,
}

impl MaterialStyle {
    /// Pipeline identifier for this style.
    pub fn pipeline_name(&self) -> &'static str {
        match self {
            MaterialStyle::Flat => "flat",
            MaterialStyle::Wireframe => "wireframe",
            MaterialStyle::Normal => "normal",
            MaterialStyle::Matcap => "matcap",
            MaterialStyle::Toon => "toon",
            MaterialStyle::Standard => "standard",
            MaterialStyle::Phong => "phong",
        }
    }

    /// Whether pipelines for this style bind a texture group.
    pub fn has_texture_bindings(&self) -> bool {
        matches!(
            self,
            MaterialStyle::Matcap | MaterialStyle::Toon | MaterialStyle::Standard
        )
    }
}

// Channel-present bits, mirrored by the shaders.
pub const CHANNEL_COLOR: u32 = 1 << 0;
pub const CHANNEL_AO: u32 = 1 << 1;
pub const CHANNEL_HEIGHT: u32 = 1 << 2;
pub const CHANNEL_METALNESS: u32 = 1 << 3;
pub const CHANNEL_ROUGHNESS: u32 = 1 << 4;
pub const CHANNEL_NORMAL: u32 = 1 << 5;
pub const CHANNEL_ALPHA: u32 = 1 << 6;
pub const CHANNEL_MATCAP: u32 = 1 << 7;
pub const CHANNEL_GRADIENT: u32 = 1 << 8;

/// GPU uniform data for materials.
///
/// `channels` carries the `CHANNEL_*` bits for texture maps that are
/// actually resident on the GPU, so shaders skip absent ones.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    pub specular: [f32; 3],
    pub shininess: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub normal_scale: f32,
    pub ao_intensity: f32,
    pub displacement_scale: f32,
    pub channels: u32,
    _padding: [u32; 2],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// GPU-side state for one material.
pub struct MaterialGpu {
    pub ubo: MaterialUBO,
    pub uniform_bind_group: wgpu::BindGroup,
    /// Present for styles with texture bindings; rebuilt when a channel
    /// texture finishes uploading.
    pub texture_bind_group: Option<wgpu::BindGroup>,
}

/// One shading-style configuration.
///
/// Numeric properties are set once at assembly, except metalness and
/// roughness which stay live-editable through the debug panel.
pub struct Material {
    pub name: String,
    pub style: MaterialStyle,
    pub base_color: [f32; 4],
    metalness: f32,
    roughness: f32,
    pub normal_scale: f32,
    pub ao_intensity: f32,
    pub displacement_scale: f32,
    pub shininess: f32,
    pub specular: [f32; 3],
    pub transparent: bool,

    pub color_map: Option<TextureHandle>,
    pub ao_map: Option<TextureHandle>,
    pub height_map: Option<TextureHandle>,
    pub metalness_map: Option<TextureHandle>,
    pub roughness_map: Option<TextureHandle>,
    pub normal_map: Option<TextureHandle>,
    pub alpha_map: Option<TextureHandle>,
    pub matcap_map: Option<TextureHandle>,
    pub gradient_map: Option<TextureHandle>,

    pub(crate) gpu: Option<MaterialGpu>,
}

impl Material {
    fn base(name: &str, style: MaterialStyle) -> Self {
        Self {
            name: name.to_string(),
            style,
            base_color: [1.0, 1.0, 1.0, 1.0],
            metalness: 0.0,
            roughness: 1.0,
            normal_scale: 1.0,
            ao_intensity: 1.0,
            displacement_scale: 0.0,
            shininess: 30.0,
            specular: [1.0, 1.0, 1.0],
            transparent: false,
            color_map: None,
            ao_map: None,
            height_map: None,
            metalness_map: None,
            roughness_map: None,
            normal_map: None,
            alpha_map: None,
            matcap_map: None,
            gradient_map: None,
            gpu: None,
        }
    }

    pub fn flat(name: &str, base_color: [f32; 4]) -> Self {
        let mut material = Self::base(name, MaterialStyle::Flat);
        material.base_color = base_color;
        material.transparent = base_color[3] < 1.0;
        material
    }

    pub fn wireframe(name: &str, base_color: [f32; 4]) -> Self {
        let mut material = Self::base(name, MaterialStyle::Wireframe);
        material.base_color = base_color;
        material
    }

    pub fn normal(name: &str) -> Self {
        Self::base(name, MaterialStyle::Normal)
    }

    pub fn matcap(name: &str, matcap_map: TextureHandle) -> Self {
        let mut material = Self::base(name, MaterialStyle::Matcap);
        material.matcap_map = Some(matcap_map);
        material
    }

    pub fn toon(name: &str, gradient_map: TextureHandle) -> Self {
        let mut material = Self::base(name, MaterialStyle::Toon);
        material.gradient_map = Some(gradient_map);
        material
    }

    pub fn standard(name: &str, maps: StandardMaps) -> Self {
        let mut material = Self::base(name, MaterialStyle::Standard);
        material.color_map = Some(maps.color);
        material.ao_map = Some(maps.ambient_occlusion);
        material.height_map = Some(maps.height);
        material.metalness_map = Some(maps.metalness);
        material.roughness_map = Some(maps.roughness);
        material.normal_map = Some(maps.normal);
        material.alpha_map = Some(maps.alpha);
        material
    }

    pub fn phong(name: &str, base_color: [f32; 4], shininess: f32, specular: [f32; 3]) -> Self {
        let mut material = Self::base(name, MaterialStyle::Phong);
        material.base_color = base_color;
        material.shininess = shininess;
        material.specular = specular;
        material
    }

    pub fn metalness(&self) -> f32 {
        self.metalness
    }

    pub fn roughness(&self) -> f32 {
        self.roughness
    }

    /// Out-of-range values clamp into [0, 1].
    pub fn set_metalness(&mut self, metalness: f32) {
        self.metalness = metalness.clamp(0.0, 1.0);
    }

    pub fn set_roughness(&mut self, roughness: f32) {
        self.roughness = roughness.clamp(0.0, 1.0);
    }

    /// Whether this material binds an ambient-occlusion map, which requires
    /// meshes to carry the duplicated UV channel.
    pub fn needs_uv2(&self) -> bool {
        self.ao_map.is_some()
    }

    /// All texture handles this material references.
    pub fn texture_handles(&self) -> Vec<&TextureHandle> {
        [
            &self.color_map,
            &self.ao_map,
            &self.height_map,
            &self.metalness_map,
            &self.roughness_map,
            &self.normal_map,
            &self.alpha_map,
            &self.matcap_map,
            &self.gradient_map,
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Computes the channel bits for handles `resident` accepts.
    pub fn channel_mask(&self, resident: impl Fn(&TextureHandle) -> bool) -> u32 {
        let mut mask = 0;
        let mut check = |handle: &Option<TextureHandle>, bit: u32| {
            if let Some(handle) = handle {
                if resident(handle) {
                    mask |= bit;
                }
            }
        };
        check(&self.color_map, CHANNEL_COLOR);
        check(&self.ao_map, CHANNEL_AO);
        check(&self.height_map, CHANNEL_HEIGHT);
        check(&self.metalness_map, CHANNEL_METALNESS);
        check(&self.roughness_map, CHANNEL_ROUGHNESS);
        check(&self.normal_map, CHANNEL_NORMAL);
        check(&self.alpha_map, CHANNEL_ALPHA);
        check(&self.matcap_map, CHANNEL_MATCAP);
        check(&self.gradient_map, CHANNEL_GRADIENT);
        mask
    }

    fn uniform(&self, channels: u32) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            specular: self.specular,
            shininess: self.shininess,
            metalness: self.metalness,
            roughness: self.roughness,
            normal_scale: self.normal_scale,
            ao_intensity: self.ao_intensity,
            displacement_scale: self.displacement_scale,
            channels,
            _padding: [0; 2],
        }
    }

    /// Creates the uniform buffer and its bind group on first use.
    pub fn ensure_gpu(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        if self.gpu.is_some() {
            return;
        }
        let ubo = MaterialUBO::new(device);
        let uniform_bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .create(device, &format!("{} Material Bind Group", self.name));
        self.gpu = Some(MaterialGpu {
            ubo,
            uniform_bind_group,
            texture_bind_group: None,
        });
    }

    /// Syncs uniform content to the GPU with the given channel mask.
    pub fn update_uniform(&mut self, queue: &wgpu::Queue, channels: u32) {
        let uniform = self.uniform(channels);
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
        }
    }

    pub fn gpu(&self) -> Option<&MaterialGpu> {
        self.gpu.as_ref()
    }

    pub fn set_texture_bind_group(&mut self, bind_group: wgpu::BindGroup) {
        if let Some(gpu) = &mut self.gpu {
            gpu.texture_bind_group = Some(bind_group);
        }
    }
}

/// The full texture set of the standard (door) material.
pub struct StandardMaps {
    pub color: TextureHandle,
    pub ambient_occlusion: TextureHandle,
    pub height: TextureHandle,
    pub metalness: TextureHandle,
    pub roughness: TextureHandle,
    pub normal: TextureHandle,
    pub alpha: TextureHandle,
}

/// Centralized storage for all materials.
///
/// Objects reference materials by id; lookups fall back to a default flat
/// gray material when the id is missing.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl MaterialManager {
    pub fn new() -> Self {
        let mut manager = Self {
            materials: HashMap::new(),
            default_material_id: "default".to_string(),
        };
        manager.add_material(Material::flat("default", [0.8, 0.8, 0.8, 1.0]));
        manager
    }

    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.materials[&self.default_material_id]
    }

    /// Material lookup with fallback to the default, used during rendering.
    pub fn get_material_for_object(&self, material_id: Option<&MaterialId>) -> &Material {
        match material_id {
            Some(id) => self
                .get_material(id)
                .unwrap_or_else(|| self.get_default_material()),
            None => self.get_default_material(),
        }
    }

    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.values_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metalness_and_roughness_clamp() {
        let mut material = Material::normal("test");

        material.set_metalness(1.5);
        assert_eq!(material.metalness(), 1.0);
        material.set_metalness(-0.5);
        assert_eq!(material.metalness(), 0.0);

        material.set_roughness(2.0);
        assert_eq!(material.roughness(), 1.0);
        material.set_roughness(-1.0);
        assert_eq!(material.roughness(), 0.0);

        material.set_metalness(0.7);
        assert_eq!(material.metalness(), 0.7);
    }

    #[test]
    fn test_duplicate_bindings_edit_one_value() {
        // Both debug-panel rows bind the same material property; writing
        // through either must be visible to the other.
        let mut material = Material::normal("door");
        material.set_metalness(0.25);
        let seen_by_second_binding = material.metalness();
        assert_eq!(seen_by_second_binding, 0.25);

        material.set_metalness(0.9);
        assert_eq!(material.metalness(), 0.9);
    }

    #[test]
    fn test_manager_falls_back_to_default() {
        let manager = MaterialManager::new();
        let missing = "no-such-material".to_string();
        let material = manager.get_material_for_object(Some(&missing));
        assert_eq!(material.name, "default");
        assert_eq!(
            manager.get_material_for_object(None).name,
            manager.get_default_material().name
        );
    }

    #[test]
    fn test_channel_mask_skips_unresident_handles() {
        let dir = tempfile::tempdir().unwrap();
        let loader = crate::gfx::texture::TextureLoader::new(dir.path());

        let maps = StandardMaps {
            color: loader.load("color.jpg"),
            ambient_occlusion: loader.load("ao.jpg"),
            height: loader.load("height.jpg"),
            metalness: loader.load("metalness.jpg"),
            roughness: loader.load("roughness.jpg"),
            normal: loader.load("normal.jpg"),
            alpha: loader.load("alpha.jpg"),
        };
        let material = Material::standard("door", maps);

        assert_eq!(material.channel_mask(|_| false), 0);
        let all = material.channel_mask(|_| true);
        assert_eq!(
            all,
            CHANNEL_COLOR
                | CHANNEL_AO
                | CHANNEL_HEIGHT
                | CHANNEL_METALNESS
                | CHANNEL_ROUGHNESS
                | CHANNEL_NORMAL
                | CHANNEL_ALPHA
        );

        // Only the color handle resident.
        let color_id = material.color_map.as_ref().unwrap().id();
        let mask = material.channel_mask(|h| h.id() == color_id);
        assert_eq!(mask, CHANNEL_COLOR);
    }

    #[test]
    fn test_needs_uv2_only_with_ao_map() {
        let dir = tempfile::tempdir().unwrap();
        let loader = crate::gfx::texture::TextureLoader::new(dir.path());

        assert!(!Material::flat("green", [0.0, 1.0, 0.0, 1.0]).needs_uv2());
        assert!(!Material::matcap("matcap", loader.load("m.png")).needs_uv2());

        let maps = StandardMaps {
            color: loader.load("c.jpg"),
            ambient_occlusion: loader.load("ao.jpg"),
            height: loader.load("h.jpg"),
            metalness: loader.load("m.jpg"),
            roughness: loader.load("r.jpg"),
            normal: loader.load("n.jpg"),
            alpha: loader.load("a.jpg"),
        };
        assert!(Material::standard("door", maps).needs_uv2());
    }
}
