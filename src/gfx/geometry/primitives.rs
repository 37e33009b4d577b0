// src/gfx/geometry/primitives.rs
//! # Primitive Shape Generation
//!
//! Generators for the showcase primitives. All shapes are Y-up, centered at
//! the origin, and carry outward normals plus 0..1 texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box centered at the origin.
///
/// Each face gets its own four vertices so normals and UVs stay per-face.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();

    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);

    let positions = [
        // Front face (+Z)
        [-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd],
        // Back face (-Z)
        [hw, -hh, -hd], [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd],
        // Left face (-X)
        [-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd],
        // Right face (+X)
        [hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd],
        // Top face (+Y)
        [-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd],
        // Bottom face (-Y)
        [-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd],
    ];

    let normals = [
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    ];

    data.positions = positions.to_vec();
    data.normals = normals.to_vec();

    // Same UV quad on every face.
    for _ in 0..6 {
        data.uv.extend_from_slice(&[[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
    }

    for face in 0..6u32 {
        let base = face * 4;
        data.indices.extend_from_slice(&[
            base, base + 1, base + 2,
            base + 2, base + 3, base,
        ]);
    }

    data
}

/// Generate a UV sphere of the given radius.
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let x = sin_theta * phi.cos();
            let y = cos_theta;
            let z = sin_theta * phi.sin();

            data.positions.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
            data.uv.push([
                long as f32 / long_segs as f32,
                lat as f32 / lat_segs as f32,
            ]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, first + 1, second]);
            data.indices.extend_from_slice(&[second, first + 1, second + 1]);
        }
    }

    data
}

/// Generate a subdivided plane in the XY plane facing +Z.
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.positions.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.uv.push([u, v]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices.extend_from_slice(&[next_row, i + 1, next_row + 1]);
        }
    }

    data
}

/// Generate a torus around the Y axis.
///
/// `radius` is the distance from the center to the tube center, `tube` the
/// tube radius.
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;

            let ring_x = (radius + tube * v.cos()) * u.cos();
            let ring_y = tube * v.sin();
            let ring_z = (radius + tube * v.cos()) * u.sin();
            data.positions.push([ring_x, ring_y, ring_z]);

            // Normal points from the tube center to the surface.
            let center = [radius * u.cos(), 0.0, radius * u.sin()];
            let n = [ring_x - center[0], ring_y, ring_z - center[2]];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            data.normals.push([n[0] / len, n[1] / len, n[2] / len]);

            data.uv.push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    for j in 0..radial {
        for i in 0..tubular {
            let a = j * (tubular + 1) + i;
            let b = a + tubular + 1;

            data.indices.extend_from_slice(&[a, b, a + 1]);
            data.indices.extend_from_slice(&[b, b + 1, a + 1]);
        }
    }

    data
}

/// Generate a capped cylinder along the Y axis.
pub fn generate_cylinder(radius: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side vertices
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let x = radius * cos_a;
        let z = radius * sin_a;
        let u = i as f32 / segs as f32;

        data.positions.push([x, -half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.uv.push([u, 1.0]);

        data.positions.push([x, half_height, z]);
        data.normals.push([cos_a, 0.0, sin_a]);
        data.uv.push([u, 0.0]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices
            .extend_from_slice(&[bottom_current, top_current, bottom_next]);
        data.indices
            .extend_from_slice(&[top_current, top_next, bottom_next]);
    }

    // Cap centers
    let center_bottom = data.positions.len() as u32;
    data.positions.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);
    data.uv.push([0.5, 0.5]);

    let center_top = data.positions.len() as u32;
    data.positions.push([0.0, half_height, 0.0]);
    data.normals.push([0.0, 1.0, 0.0]);
    data.uv.push([0.5, 0.5]);

    for i in 0..segs {
        let current = i * 2;
        let next = (i + 1) * 2;

        data.indices.extend_from_slice(&[center_bottom, current, next]);
        data.indices
            .extend_from_slice(&[center_top, next + 1, current + 1]);
    }

    data
}

/// Generate a capped cone along the Y axis.
///
/// With few radial segments this doubles as a pyramid (the showcase uses 4).
pub fn generate_cone(radius: f32, height: f32, radial_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let half_height = height * 0.5;

    // The slope normal tilts up by atan(radius / height).
    let slope = (radius / height).atan();
    let (slope_sin, slope_cos) = slope.sin_cos();

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let u = i as f32 / segs as f32;

        // Rim vertex
        data.positions
            .push([radius * cos_a, -half_height, radius * sin_a]);
        data.normals
            .push([cos_a * slope_cos, slope_sin, sin_a * slope_cos]);
        data.uv.push([u, 1.0]);

        // Apex vertex, duplicated per segment for distinct normals.
        data.positions.push([0.0, half_height, 0.0]);
        data.normals
            .push([cos_a * slope_cos, slope_sin, sin_a * slope_cos]);
        data.uv.push([u, 0.0]);
    }

    for i in 0..segs {
        let rim_current = i * 2;
        let apex_current = rim_current + 1;
        let rim_next = (i + 1) * 2;

        data.indices
            .extend_from_slice(&[rim_current, apex_current, rim_next]);
    }

    // Base cap
    let center = data.positions.len() as u32;
    data.positions.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);
    data.uv.push([0.5, 0.5]);

    for i in 0..segs {
        let current = i * 2;
        let next = (i + 1) * 2;
        data.indices.extend_from_slice(&[center, current, next]);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.positions.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.positions.len(), cube.uv.len());
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.5, 8, 6);
        assert!(sphere.vertex_count() > 0);
        assert!(!sphere.indices.is_empty());
        assert_eq!(sphere.positions.len(), sphere.normals.len());
        assert_eq!(sphere.positions.len(), sphere.uv.len());

        // Every position sits on the radius.
        for p in &sphere.positions {
            let r = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((r - 0.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.positions.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_torus_generation() {
        let torus = generate_torus(0.3, 0.2, 8, 16);
        assert_eq!(torus.positions.len(), 9 * 17);
        assert_eq!(torus.triangle_count(), 8 * 16 * 2);

        // Normals are unit length.
        for n in &torus.normals {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cylinder_generation() {
        let cylinder = generate_cylinder(0.3, 1.0, 32);
        assert_eq!(cylinder.positions.len(), cylinder.normals.len());
        assert_eq!(cylinder.positions.len(), cylinder.uv.len());
        // 32 side quads + two caps of 32 triangles each.
        assert_eq!(cylinder.triangle_count(), 32 * 2 + 64);
    }

    #[test]
    fn test_cone_with_four_segments_is_pyramid() {
        let pyramid = generate_cone(0.5, 1.0, 4);
        // 4 side triangles + 4 base triangles.
        assert_eq!(pyramid.triangle_count(), 8);
        assert_eq!(pyramid.positions.len(), pyramid.normals.len());
    }

    #[test]
    fn test_indices_stay_in_bounds() {
        for data in [
            generate_box(1.0, 1.0, 1.0),
            generate_sphere(0.5, 64, 64),
            generate_plane(1.0, 1.0, 100, 100),
            generate_torus(0.3, 0.2, 64, 128),
            generate_cylinder(0.3, 1.0, 32),
            generate_cone(0.5, 1.0, 4),
        ] {
            let count = data.vertex_count() as u32;
            assert!(data.indices.iter().all(|&i| i < count));
        }
    }
}
