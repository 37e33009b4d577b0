// src/gfx/camera/mod.rs
//! Orbit camera and its input controller.

pub mod controller;
pub mod orbit_camera;

pub use controller::OrbitController;
pub use orbit_camera::{CameraUniform, OrbitCamera, OrbitCameraBounds};
