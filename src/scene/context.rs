// src/scene/context.rs
//! Per-window state: viewport, orbit camera and the frame clock.

use std::time::Instant;

use cgmath::Vector3;
use winit::event::DeviceEvent;

use crate::gfx::camera::{OrbitCamera, OrbitController};
use crate::gfx::viewport::Viewport;

/// Elapsed-time clock, advanced once per frame.
pub struct Clock {
    started: Instant,
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
        }
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        delta
    }

    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Viewport, camera, controller and clock for one window.
///
/// Camera aspect and viewport aspect are updated together, so they always
/// agree after construction and after every resize.
pub struct SceneContext {
    pub viewport: Viewport,
    pub camera: OrbitCamera,
    pub controller: OrbitController,
    clock: Clock,
}

impl SceneContext {
    /// Camera starts at the reference eye position (1, 1, 3) looking at the
    /// origin.
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        let viewport = Viewport::new(width, height, device_pixel_ratio);
        let camera = OrbitCamera::from_eye(
            Vector3::new(1.0, 1.0, 3.0),
            Vector3::new(0.0, 0.0, 0.0),
            viewport.aspect(),
        );
        Self {
            viewport,
            camera,
            controller: OrbitController::new(0.005, 0.1),
            clock: Clock::new(),
        }
    }

    /// Applies a window resize to viewport and camera together.
    ///
    /// Returns whether anything changed; repeated identical calls are no-ops.
    pub fn on_resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> bool {
        if !self.viewport.resize(width, height, device_pixel_ratio) {
            return false;
        }
        self.camera
            .resize_projection(self.viewport.width(), self.viewport.height());
        true
    }

    pub fn on_device_event(&mut self, event: &DeviceEvent) {
        self.controller.process_event(event);
    }

    /// Advances the clock and applies the damped orbit update for the
    /// elapsed interval. Returns the frame delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let delta = self.clock.tick();
        self.controller.update(&mut self.camera, delta);
        self.camera.update_view_proj();
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_consistent_after_init_and_resize() {
        let mut context = SceneContext::new(800, 600, 1.0);
        assert_eq!(context.camera.aspect, context.viewport.aspect());

        context.on_resize(1920, 1080, 1.0);
        assert_eq!(context.camera.aspect, context.viewport.aspect());
        assert!((context.viewport.aspect() - 1920.0 / 1080.0).abs() < 1e-6);

        context.on_resize(333, 777, 2.0);
        assert_eq!(context.camera.aspect, context.viewport.aspect());
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut context = SceneContext::new(800, 600, 1.0);
        assert!(context.on_resize(1024, 768, 1.5));
        assert!(!context.on_resize(1024, 768, 1.5));
        assert!(!context.on_resize(1024, 768, 1.5));
    }

    #[test]
    fn test_tick_returns_nonnegative_delta() {
        let mut context = SceneContext::new(640, 480, 1.0);
        let delta = context.tick();
        assert!(delta >= 0.0);
        assert!(context.clock.elapsed() >= delta);
    }
}
