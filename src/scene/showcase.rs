// src/scene/showcase.rs
//! Assembly of the reference showcase scene.

use cgmath::Vector3;
use log::info;

use crate::gfx::geometry::primitives::{
    generate_box, generate_cone, generate_cylinder, generate_plane, generate_sphere,
    generate_torus,
};
use crate::gfx::material::{Material, StandardMaps};
use crate::gfx::texture::TextureLoader;
use crate::scene::{LightRig, Scene, SceneObject};

const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
// 0x1188ff
const PHONG_BLUE: [f32; 3] = [0x11 as f32 / 255.0, 0x88 as f32 / 255.0, 1.0];

/// Builds the fixed showcase: eight materials, seven meshes spread along the
/// X axis, and the three-light rig. Texture loads are kicked off here and
/// settle on their own; assembly never waits for them.
pub fn build(loader: &TextureLoader) -> Scene {
    let mut scene = Scene::new(LightRig::showcase());

    scene
        .material_manager
        .add_material(Material::flat("green", GREEN));
    scene
        .material_manager
        .add_material(Material::wireframe("wireframe", RED));
    scene
        .material_manager
        .add_material(Material::normal("normal"));
    scene.material_manager.add_material(Material::matcap(
        "matcap",
        loader.load("textures/matcaps/2.png"),
    ));
    scene.material_manager.add_material(Material::toon(
        "toon",
        loader.load("textures/gradients/5.jpg"),
    ));
    scene
        .material_manager
        .add_material(standard_door_material(loader));
    scene.material_manager.add_material(Material::phong(
        "phong",
        [PHONG_BLUE[0], PHONG_BLUE[1], PHONG_BLUE[2], 1.0],
        100.0,
        PHONG_BLUE,
    ));
    scene.material_manager.add_material(Material::flat(
        "transparent-green",
        [GREEN[0], GREEN[1], GREEN[2], 0.5],
    ));

    let mut sphere = generate_sphere(0.5, 64, 64);
    let mut plane = generate_plane(1.0, 1.0, 100, 100);
    let mut torus = generate_torus(0.3, 0.2, 64, 128);
    let mut door_cube = generate_box(1.0, 1.0, 1.0);

    // Second UV set for ambient-occlusion sampling, duplicated from the
    // primary one at assembly time.
    sphere.duplicate_uv_channel();
    plane.duplicate_uv_channel();
    torus.duplicate_uv_channel();
    door_cube.duplicate_uv_channel();

    scene.add_object(SceneObject::new(
        "sphere",
        sphere,
        "green",
        Vector3::new(-2.0, 0.0, 0.0),
    ));
    scene.add_object(SceneObject::new(
        "plane",
        plane,
        "wireframe",
        Vector3::new(0.0, 0.0, 0.0),
    ));
    scene.add_object(SceneObject::new(
        "torus",
        torus,
        "matcap",
        Vector3::new(2.0, 0.0, 0.0),
    ));
    scene.add_object(SceneObject::new(
        "door-cube",
        door_cube,
        "standard",
        Vector3::new(4.0, 0.0, 0.0),
    ));
    scene.add_object(SceneObject::new(
        "cylinder",
        generate_cylinder(0.3, 1.0, 32),
        "normal",
        Vector3::new(6.0, 0.0, 0.0),
    ));
    scene.add_object(SceneObject::new(
        "phong-cube",
        generate_box(1.0, 1.0, 1.0),
        "phong",
        Vector3::new(-4.0, 0.0, 0.0),
    ));
    scene.add_object(SceneObject::new(
        "pyramid",
        generate_cone(0.5, 1.0, 4),
        "transparent-green",
        Vector3::new(-6.0, 0.0, 0.0),
    ));

    info!(
        "showcase assembled: {} objects, {} materials",
        scene.objects.len(),
        scene.material_manager.list_materials().len()
    );

    scene
}

fn standard_door_material(loader: &TextureLoader) -> Material {
    let maps = StandardMaps {
        color: loader.load("textures/door/color.jpg"),
        ambient_occlusion: loader.load("textures/door/ambientOcclusion.jpg"),
        height: loader.load("textures/door/height.jpg"),
        metalness: loader.load("textures/door/metalness.jpg"),
        roughness: loader.load("textures/door/roughness.jpg"),
        normal: loader.load("textures/door/normal.jpg"),
        alpha: loader.load("textures/door/alpha.jpg"),
    };
    let mut material = Material::standard("standard", maps);
    material.set_metalness(0.7);
    material.set_roughness(0.2);
    material.ao_intensity = 1.0;
    material.displacement_scale = 0.05;
    material.normal_scale = 0.5;
    material.transparent = true;
    material
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::material::{
        CHANNEL_ALPHA, CHANNEL_AO, CHANNEL_COLOR, CHANNEL_HEIGHT, CHANNEL_METALNESS,
        CHANNEL_NORMAL, CHANNEL_ROUGHNESS,
    };
    use crate::gfx::texture::TextureStatus;

    fn test_loader() -> (tempfile::TempDir, TextureLoader) {
        let dir = tempfile::tempdir().unwrap();
        let loader = TextureLoader::new(dir.path());
        (dir, loader)
    }

    #[test]
    fn test_assembly_produces_seven_objects() {
        let (_dir, loader) = test_loader();
        let scene = build(&loader);
        assert_eq!(scene.objects.len(), 7);
        // 8 showcase materials plus the default fallback.
        assert_eq!(scene.material_manager.list_materials().len(), 9);
    }

    #[test]
    fn test_objects_occupy_distinct_positions() {
        let (_dir, loader) = test_loader();
        let scene = build(&loader);
        let mut xs: Vec<i32> = scene
            .objects
            .iter()
            .map(|o| o.position.x.round() as i32)
            .collect();
        xs.sort();
        xs.dedup();
        assert_eq!(xs, vec![-6, -4, -2, 0, 2, 4, 6]);
    }

    #[test]
    fn test_ao_bearing_meshes_carry_uv2() {
        let (_dir, loader) = test_loader();
        let scene = build(&loader);
        for name in ["sphere", "plane", "torus", "door-cube"] {
            let object = scene.objects.iter().find(|o| o.name == name).unwrap();
            assert!(object.geometry.has_uv2(), "{} missing uv2", name);
            assert_eq!(
                bytemuck::cast_slice::<[f32; 2], u8>(&object.geometry.uv),
                bytemuck::cast_slice::<[f32; 2], u8>(&object.geometry.uv2),
                "{} uv2 not byte-identical",
                name
            );
        }
    }

    #[test]
    fn test_standard_material_reference_values() {
        let (_dir, loader) = test_loader();
        let scene = build(&loader);
        let material = scene.material_manager.get_material("standard").unwrap();
        assert_eq!(material.metalness(), 0.7);
        assert_eq!(material.roughness(), 0.2);
        assert_eq!(material.displacement_scale, 0.05);
        assert_eq!(material.normal_scale, 0.5);
        assert!(material.transparent);
        assert!(material.needs_uv2());
    }

    #[test]
    fn test_assembly_survives_failed_texture_loads() {
        // Empty asset directory: every one of the 9 loads fails.
        let (_dir, loader) = test_loader();
        let scene = build(&loader);

        let material = scene.material_manager.get_material("standard").unwrap();
        for handle in material.texture_handles() {
            assert_eq!(handle.wait(), TextureStatus::Failed);
        }
        // Handles stay attached and every channel reports absent.
        assert_eq!(material.texture_handles().len(), 7);
        assert_eq!(material.channel_mask(|h| h.is_ready()), 0);

        let matcap = scene.material_manager.get_material("matcap").unwrap();
        assert_eq!(matcap.texture_handles().len(), 1);
    }

    #[test]
    fn test_partial_load_disables_only_missing_channel() {
        let (dir, loader) = test_loader();
        let root = dir.path();
        std::fs::create_dir_all(root.join("textures/matcaps")).unwrap();
        std::fs::create_dir_all(root.join("textures/gradients")).unwrap();
        std::fs::create_dir_all(root.join("textures/door")).unwrap();

        // Eight of the nine assets exist; ambientOcclusion.jpg does not.
        let pixel = image::RgbImage::from_pixel(1, 1, image::Rgb([128, 128, 128]));
        pixel.save(root.join("textures/matcaps/2.png")).unwrap();
        pixel.save(root.join("textures/gradients/5.jpg")).unwrap();
        for name in ["color", "height", "metalness", "roughness", "normal", "alpha"] {
            pixel
                .save(root.join(format!("textures/door/{}.jpg", name)))
                .unwrap();
        }

        let scene = build(&loader);
        assert_eq!(scene.objects.len(), 7);

        let material = scene.material_manager.get_material("standard").unwrap();
        for handle in material.texture_handles() {
            handle.wait();
        }
        assert!(material.ao_map.as_ref().unwrap().is_failed());
        for handle in [
            &material.color_map,
            &material.height_map,
            &material.metalness_map,
            &material.roughness_map,
            &material.normal_map,
            &material.alpha_map,
        ] {
            assert!(handle.as_ref().unwrap().is_ready());
        }

        // Exactly the ambient-occlusion channel reports absent.
        let mask = material.channel_mask(|h| h.is_ready());
        assert_eq!(
            mask,
            CHANNEL_COLOR
                | CHANNEL_HEIGHT
                | CHANNEL_METALNESS
                | CHANNEL_ROUGHNESS
                | CHANNEL_NORMAL
                | CHANNEL_ALPHA
        );
        assert_eq!(mask & CHANNEL_AO, 0);

        let matcap = scene.material_manager.get_material("matcap").unwrap();
        assert_eq!(matcap.matcap_map.as_ref().unwrap().wait(), TextureStatus::Ready);
        let toon = scene.material_manager.get_material("toon").unwrap();
        assert_eq!(toon.gradient_map.as_ref().unwrap().wait(), TextureStatus::Ready);
    }

    #[test]
    fn test_toon_material_assembled_but_unassigned() {
        let (_dir, loader) = test_loader();
        let scene = build(&loader);
        assert!(scene.material_manager.get_material("toon").is_some());
        assert!(scene
            .objects
            .iter()
            .all(|o| o.material_id.as_deref() != Some("toon")));
    }
}
