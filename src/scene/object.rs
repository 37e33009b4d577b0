// src/scene/object.rs
//! Scene objects: a geometry, a material reference and a position.

use cgmath::{Matrix4, Vector3};
use wgpu::util::DeviceExt;

use crate::gfx::geometry::GeometryData;
use crate::gfx::material::MaterialId;
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutWithDesc},
    uniform_buffer::UniformBuffer,
};

/// Per-object model matrix uniform.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub model: [[f32; 4]; 4],
}

type TransformUBO = UniformBuffer<TransformUniform>;

/// GPU buffers for one object, created lazily on first render.
pub struct ObjectGpu {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub transform_ubo: TransformUBO,
    pub transform_bind_group: wgpu::BindGroup,
}

/// One mesh in the showcase: geometry plus a material id and a fixed
/// position on the X axis.
pub struct SceneObject {
    pub name: String,
    pub geometry: GeometryData,
    pub material_id: Option<MaterialId>,
    pub position: Vector3<f32>,
    pub visible: bool,
    gpu: Option<ObjectGpu>,
}

impl SceneObject {
    pub fn new(name: &str, geometry: GeometryData, material_id: &str, position: Vector3<f32>) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material_id: Some(material_id.to_string()),
            position,
            visible: true,
            gpu: None,
        }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
    }

    fn transform_uniform(&self) -> TransformUniform {
        TransformUniform {
            model: self.model_matrix().into(),
        }
    }

    /// Creates vertex/index/transform buffers on first use.
    pub fn ensure_gpu(&mut self, device: &wgpu::Device, transform_layout: &BindGroupLayoutWithDesc) {
        if self.gpu.is_some() {
            return;
        }

        let vertices = self.geometry.to_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", self.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", self.name)),
            contents: bytemuck::cast_slice(&self.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let transform_ubo = TransformUBO::new_with_data(device, &self.transform_uniform());
        let transform_bind_group = BindGroupBuilder::new(transform_layout)
            .resource(transform_ubo.binding_resource())
            .create(device, &format!("{} Transform Bind Group", self.name));

        self.gpu = Some(ObjectGpu {
            vertex_buffer,
            index_buffer,
            index_count: self.geometry.indices.len() as u32,
            transform_ubo,
            transform_bind_group,
        });
    }

    /// Syncs the model matrix to the GPU. Positions are static in the
    /// showcase, so this only writes when the matrix actually changed.
    pub fn update_transform(&mut self, queue: &wgpu::Queue) {
        let uniform = self.transform_uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.transform_ubo.update_content(queue, uniform);
        }
    }

    pub fn gpu(&self) -> Option<&ObjectGpu> {
        self.gpu.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::primitives::generate_box;

    #[test]
    fn test_model_matrix_translates_position() {
        let object = SceneObject::new(
            "cube",
            generate_box(1.0, 1.0, 1.0),
            "standard",
            Vector3::new(4.0, 0.0, 0.0),
        );
        let m = object.model_matrix();
        assert_eq!(m.w.x, 4.0);
        assert_eq!(m.w.y, 0.0);
        assert_eq!(m.w.z, 0.0);
    }
}
