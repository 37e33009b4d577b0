// src/gfx/camera/controller.rs
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseScrollDelta},
};

use super::orbit_camera::OrbitCamera;

/// Orbit input controller with inertial damping.
///
/// Pointer drags and wheel scrolls accumulate into pending deltas rather
/// than moving the camera directly. Each frame, [`update`](Self::update)
/// applies a damped portion of the pending motion and decays the rest, so
/// a released drag keeps rotating the view and dies out smoothly.
pub struct OrbitController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub damping_factor: f32,
    is_mouse_pressed: bool,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

/// Pending motion below this magnitude is snapped to zero.
const REST_EPSILON: f32 = 1e-5;

/// Damping is expressed per frame at this rate; `update` rescales it to the
/// actual frame interval so the feel is frame-rate independent.
const REFERENCE_FRAME_RATE: f32 = 60.0;

impl OrbitController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            damping_factor: 0.05,
            is_mouse_pressed: false,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        }
    }

    pub fn process_event(&mut self, event: &DeviceEvent) {
        match event {
            DeviceEvent::Button {
                button: 0, // left mouse button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.pending_zoom += scroll_amount * self.zoom_speed;
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.pending_yaw -= delta.0 as f32 * self.rotate_speed;
                    self.pending_pitch += delta.1 as f32 * self.rotate_speed;
                }
            }
            _ => (),
        }
    }

    /// Applies the elapsed interval's worth of damped motion to the camera.
    ///
    /// The consumed slice of the pending deltas scales with `dt`, so a given
    /// drag sweeps the camera through the same arc whether the frames come
    /// at 30 Hz or 120 Hz; the remainder decays toward rest, mirroring the
    /// inertial feel of damped orbit controls.
    pub fn update(&mut self, camera: &mut OrbitCamera, dt: f32) {
        let decay = (1.0 - self.damping_factor).powf(dt * REFERENCE_FRAME_RATE);
        let consumed = 1.0 - decay;

        if self.pending_yaw != 0.0 || self.pending_pitch != 0.0 {
            camera.add_yaw(self.pending_yaw * consumed);
            camera.add_pitch(self.pending_pitch * consumed);
        }
        if self.pending_zoom != 0.0 {
            camera.add_distance(self.pending_zoom * consumed);
        }

        self.pending_yaw *= decay;
        self.pending_pitch *= decay;
        self.pending_zoom *= decay;

        if self.pending_yaw.abs() < REST_EPSILON {
            self.pending_yaw = 0.0;
        }
        if self.pending_pitch.abs() < REST_EPSILON {
            self.pending_pitch = 0.0;
        }
        if self.pending_zoom.abs() < REST_EPSILON {
            self.pending_zoom = 0.0;
        }
    }

    /// True while pending motion remains to be applied.
    pub fn is_moving(&self) -> bool {
        self.pending_yaw != 0.0 || self.pending_pitch != 0.0 || self.pending_zoom != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    const DT: f32 = 1.0 / 60.0;

    fn camera() -> OrbitCamera {
        OrbitCamera::from_eye(Vector3::new(1.0, 1.0, 3.0), Vector3::zero(), 1.0)
    }

    fn drag(controller: &mut OrbitController, dx: f64, dy: f64) {
        controller.process_event(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Pressed,
        });
        controller.process_event(&DeviceEvent::MouseMotion { delta: (dx, dy) });
        controller.process_event(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Released,
        });
    }

    #[test]
    fn test_drag_keeps_rotating_after_release() {
        let mut controller = OrbitController::new(0.005, 0.1);
        let mut camera = camera();
        let yaw_before = camera.yaw;

        drag(&mut controller, 100.0, 0.0);
        controller.update(&mut camera, DT);
        let yaw_after_first = camera.yaw;
        assert_ne!(yaw_after_first, yaw_before);

        // No further input, yet the view keeps moving.
        controller.update(&mut camera, DT);
        assert_ne!(camera.yaw, yaw_after_first);
        assert!(controller.is_moving());
    }

    #[test]
    fn test_motion_decays_to_rest() {
        let mut controller = OrbitController::new(0.005, 0.1);
        let mut camera = camera();

        drag(&mut controller, 50.0, 20.0);
        for _ in 0..1000 {
            controller.update(&mut camera, DT);
        }
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_decay_is_frame_rate_independent() {
        let mut coarse = OrbitController::new(0.005, 0.1);
        let mut fine = OrbitController::new(0.005, 0.1);
        let mut camera_coarse = camera();
        let mut camera_fine = camera();

        drag(&mut coarse, 100.0, 40.0);
        drag(&mut fine, 100.0, 40.0);

        // One second of wall time stepped at 30 Hz versus 120 Hz.
        for _ in 0..30 {
            coarse.update(&mut camera_coarse, 1.0 / 30.0);
        }
        for _ in 0..120 {
            fine.update(&mut camera_fine, 1.0 / 120.0);
        }

        assert!((camera_coarse.yaw - camera_fine.yaw).abs() < 1e-4);
        assert!((camera_coarse.pitch - camera_fine.pitch).abs() < 1e-4);
    }

    #[test]
    fn test_motion_while_released_is_ignored() {
        let mut controller = OrbitController::new(0.005, 0.1);
        let mut camera = camera();
        let yaw_before = camera.yaw;

        controller.process_event(&DeviceEvent::MouseMotion { delta: (100.0, 0.0) });
        controller.update(&mut camera, DT);
        assert_eq!(camera.yaw, yaw_before);
    }

    #[test]
    fn test_wheel_zooms_with_damping() {
        let mut controller = OrbitController::new(0.005, 0.1);
        let mut camera = camera();
        let distance_before = camera.distance;

        controller.process_event(&DeviceEvent::MouseWheel {
            delta: MouseScrollDelta::LineDelta(0.0, -1.0),
        });
        controller.update(&mut camera, DT);
        assert!(camera.distance > distance_before);
    }
}
