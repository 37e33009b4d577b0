// src/ui/panel.rs
//! The materials debug panel.

use crate::gfx::material::Material;
use crate::scene::Scene;

/// Floating panel exposing the standard material's metalness and roughness.
///
/// The reference scene registers each slider twice, so this panel does too;
/// all four rows stay live and edit the same two underlying properties.
pub fn material_panel(ui: &imgui::Ui, scene: &mut Scene) {
    let Some(material) = scene.material_manager.get_material_mut("standard") else {
        return;
    };

    ui.window("Materials")
        .size([300.0, 140.0], imgui::Condition::FirstUseEver)
        .position([20.0, 20.0], imgui::Condition::FirstUseEver)
        .build(|| {
            metalness_row(ui, "metalness", material);
            roughness_row(ui, "roughness", material);
            metalness_row(ui, "metalness##2", material);
            roughness_row(ui, "roughness##2", material);
        });
}

fn metalness_row(ui: &imgui::Ui, label: &str, material: &mut Material) {
    let mut value = material.metalness();
    if ui
        .slider_config(label, 0.0f32, 1.0f32)
        .display_format("%.4f")
        .build(&mut value)
    {
        material.set_metalness(value);
    }
}

fn roughness_row(ui: &imgui::Ui, label: &str, material: &mut Material) {
    let mut value = material.roughness();
    if ui
        .slider_config(label, 0.0f32, 1.0f32)
        .display_format("%.4f")
        .build(&mut value)
    {
        material.set_roughness(value);
    }
}
