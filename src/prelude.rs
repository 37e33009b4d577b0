// src/prelude.rs
//! Common imports for working with the showcase crate.

pub use crate::app::ShowcaseApp;
pub use crate::error::ShowcaseError;

pub use crate::gfx::camera::{OrbitCamera, OrbitController};
pub use crate::gfx::geometry::{
    generate_box, generate_cone, generate_cylinder, generate_plane, generate_sphere,
    generate_torus, GeometryData,
};
pub use crate::gfx::material::{Material, MaterialManager, MaterialStyle};
pub use crate::gfx::texture::{TextureHandle, TextureLoader, TextureStatus};
pub use crate::gfx::viewport::Viewport;
pub use crate::scene::{Scene, SceneContext, SceneObject};

pub use cgmath::{InnerSpace, Vector3, Zero};
