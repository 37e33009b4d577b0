// src/lib.rs
//! Material Showcase
//!
//! A fixed 3D scene demonstrating seven shading styles on seven primitive
//! meshes, rendered with wgpu and driven by a damped orbit camera.

pub mod app;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod scene;
pub mod ui;
pub mod wgpu_utils;

pub use app::ShowcaseApp;
pub use error::ShowcaseError;
