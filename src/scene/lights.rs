// src/scene/lights.rs
//! Fixed lighting rig for the showcase scene.

use cgmath::{InnerSpace, Vector3};

/// Uniform soft fill with no direction.
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Omnidirectional light at a world position.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

/// Parallel light; `direction` is the direction the light travels.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub direction: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

/// The scene's three lights. Set once at assembly and never changed.
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub point: PointLight,
    pub directional: DirectionalLight,
}

impl LightRig {
    /// The showcase rig: soft white ambient, a white point light above and in
    /// front of the meshes, and a white directional light shining toward the
    /// origin from (5, 5, 5).
    pub fn showcase() -> Self {
        let from = Vector3::new(5.0f32, 5.0, 5.0);
        let direction = (-from).normalize();
        Self {
            ambient: AmbientLight {
                color: [1.0, 1.0, 1.0],
                intensity: 0.5,
            },
            point: PointLight {
                position: [2.0, 3.0, 4.0],
                color: [1.0, 1.0, 1.0],
                intensity: 0.5,
            },
            directional: DirectionalLight {
                direction: direction.into(),
                color: [1.0, 1.0, 1.0],
                intensity: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_showcase_rig_constants() {
        let rig = LightRig::showcase();
        assert_eq!(rig.ambient.intensity, 0.5);
        assert_eq!(rig.point.intensity, 0.5);
        assert_eq!(rig.point.position, [2.0, 3.0, 4.0]);
        assert_eq!(rig.directional.intensity, 1.0);
    }

    #[test]
    fn test_directional_direction_is_unit_toward_origin() {
        let rig = LightRig::showcase();
        let d = Vector3::from(rig.directional.direction);
        assert!((d.magnitude() - 1.0).abs() < 1e-6);
        // Travels from (5, 5, 5) toward the origin.
        assert!(d.x < 0.0 && d.y < 0.0 && d.z < 0.0);
    }
}
