// src/ui/mod.rs
//! ImGui debug overlay.

pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::material_panel;
