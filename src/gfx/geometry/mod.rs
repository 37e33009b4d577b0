// src/gfx/geometry/mod.rs
//! # Procedural Geometry Generation
//!
//! Generates the primitive shapes used by the showcase scene procedurally,
//! with normals and texture coordinates, so no model files are needed.

pub mod primitives;

pub use primitives::*;

use crate::gfx::vertex::Vertex3D;

/// Generated geometry data ready for GPU upload.
#[derive(Debug, Clone)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Primary texture coordinates (u, v)
    pub uv: Vec<[f32; 2]>,
    /// Secondary texture coordinates used by the ambient-occlusion channel;
    /// empty until [`duplicate_uv_channel`](Self::duplicate_uv_channel) runs.
    pub uv2: Vec<[f32; 2]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uv: Vec::new(),
            uv2: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Copies the primary UV set into the secondary slot, byte for byte.
    ///
    /// Ambient-occlusion sampling reads the second coordinate set, which for
    /// this scene is always identical data under a second semantic name.
    pub fn duplicate_uv_channel(&mut self) {
        self.uv2 = self.uv.clone();
    }

    pub fn has_uv2(&self) -> bool {
        !self.uv2.is_empty()
    }

    /// Interleaves the attribute arrays into the GPU vertex format.
    ///
    /// Meshes without a duplicated UV channel get zeroed `uv2` values.
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.positions.len())
            .map(|i| Vertex3D {
                position: self.positions[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.uv.get(i).copied().unwrap_or([0.0, 0.0]),
                uv2: self.uv2.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv2_duplication_is_byte_identical() {
        let mut sphere = generate_sphere(0.5, 64, 64);
        sphere.duplicate_uv_channel();

        assert!(sphere.has_uv2());
        let uv_bytes: &[u8] = bytemuck::cast_slice(&sphere.uv);
        let uv2_bytes: &[u8] = bytemuck::cast_slice(&sphere.uv2);
        assert_eq!(uv_bytes, uv2_bytes);
    }

    #[test]
    fn test_vertices_carry_duplicated_uv2() {
        let mut plane = generate_plane(1.0, 1.0, 2, 2);
        plane.duplicate_uv_channel();

        for vertex in plane.to_vertices() {
            assert_eq!(vertex.uv, vertex.uv2);
        }
    }

    #[test]
    fn test_vertices_without_uv2_are_zeroed() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert!(!cube.has_uv2());
        for vertex in cube.to_vertices() {
            assert_eq!(vertex.uv2, [0.0, 0.0]);
        }
    }
}
