// src/gfx/camera/orbit_camera.rs
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective camera orbiting a target point.
///
/// Intrinsics are fixed for the showcase: 75 degree vertical field of view,
/// clip planes at 0.1 and 100. Only the aspect ratio changes at runtime,
/// driven by viewport resizes.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // recalculated in update()
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Deg(75.0).into(),
            znear: 0.1,
            zfar: 100.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    /// Builds an orbit camera whose initial eye position is `eye`, the way
    /// the showcase places it at (1, 1, 3) looking at the origin.
    pub fn from_eye(eye: Vector3<f32>, target: Vector3<f32>, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.magnitude();
        let pitch = (offset.y / distance).asin();
        let yaw = offset.x.atan2(offset.z);
        Self::new(distance, pitch, yaw, target, aspect)
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        self.set_distance(self.distance + delta);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Updates the eye position after changing `distance`, `pitch` or `yaw`.
    fn update(&mut self) {
        self.eye = calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance)
            + self.target;
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = self.build_view_projection_matrix().into();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        Self {
            min_distance: Some(0.5),
            max_distance: Some(50.0),
            min_pitch: -std::f32::consts::FRAC_PI_2 + f32::EPSILON,
            max_pitch: std::f32::consts::FRAC_PI_2 - f32::EPSILON,
        }
    }
}

fn calculate_cartesian_eye_position(pitch: f32, yaw: f32, distance: f32) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    )
}

/// Per-frame camera data uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// Eye position in homogeneous coordinates (16 byte alignment).
    pub view_position: [f32; 4],
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_eye_reproduces_position() {
        let camera = OrbitCamera::from_eye(Vector3::new(1.0, 1.0, 3.0), Vector3::zero(), 1.0);
        assert!((camera.eye.x - 1.0).abs() < 1e-4);
        assert!((camera.eye.y - 1.0).abs() < 1e-4);
        assert!((camera.eye.z - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_fixed_intrinsics() {
        let camera = OrbitCamera::from_eye(Vector3::new(1.0, 1.0, 3.0), Vector3::zero(), 1.5);
        assert_eq!(camera.znear, 0.1);
        assert_eq!(camera.zfar, 100.0);
        let fovy: Rad<f32> = Deg(75.0).into();
        assert!((camera.fovy.0 - fovy.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resize_projection_updates_aspect() {
        let mut camera = OrbitCamera::from_eye(Vector3::new(1.0, 1.0, 3.0), Vector3::zero(), 1.0);
        camera.resize_projection(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_pitch_clamped_short_of_poles() {
        let mut camera = OrbitCamera::from_eye(Vector3::new(1.0, 1.0, 3.0), Vector3::zero(), 1.0);
        camera.set_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.set_pitch(-10.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_distance_clamped_to_bounds() {
        let mut camera = OrbitCamera::from_eye(Vector3::new(1.0, 1.0, 3.0), Vector3::zero(), 1.0);
        camera.set_distance(1000.0);
        assert_eq!(camera.distance, camera.bounds.max_distance.unwrap());
        camera.set_distance(0.0);
        assert_eq!(camera.distance, camera.bounds.min_distance.unwrap());
    }
}
