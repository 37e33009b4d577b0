// src/gfx/mod.rs
//! Graphics: camera, geometry, materials, textures and the wgpu renderer.

pub mod camera;
pub mod geometry;
pub mod material;
pub mod pipeline;
pub mod renderer;
pub mod texture;
pub mod vertex;
pub mod viewport;
