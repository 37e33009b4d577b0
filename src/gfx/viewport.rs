// src/gfx/viewport.rs
//! Logical window size and device pixel ratio tracking
//!
//! The viewport is the single source of truth for the output resolution:
//! the camera aspect ratio and the surface configuration are both derived
//! from it, so they can never drift apart across resizes.

/// Device pixel ratios above this are clamped to bound GPU cost on
/// high-density displays.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical viewport dimensions plus the host-reported scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            device_pixel_ratio,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// The host scale factor with the cap applied.
    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(MAX_PIXEL_RATIO)
    }

    /// Physical render-target size: logical size times the capped ratio.
    pub fn physical_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let w = (self.width as f64 * ratio).round() as u32;
        let h = (self.height as f64 * ratio).round() as u32;
        (w.max(1), h.max(1))
    }

    /// Render-target size for a host-reported physical size.
    ///
    /// While the host ratio is within the cap the physical size passes
    /// through unchanged, so the surface always matches the window exactly
    /// instead of round-tripping through rounded logical units. Above the
    /// cap it is rescaled onto the capped ratio.
    pub fn surface_size(&self, physical_width: u32, physical_height: u32) -> (u32, u32) {
        if self.device_pixel_ratio <= MAX_PIXEL_RATIO {
            return (physical_width.max(1), physical_height.max(1));
        }
        let scale = self.pixel_ratio() / self.device_pixel_ratio;
        let w = (physical_width as f64 * scale).round() as u32;
        let h = (physical_height as f64 * scale).round() as u32;
        (w.max(1), h.max(1))
    }

    /// Applies a resize, returning whether anything actually changed.
    ///
    /// Repeated resizes to the same dimensions are no-ops, so callers can
    /// skip surface reconfiguration when nothing moved.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> bool {
        let next = Viewport::new(width, height, device_pixel_ratio);
        if next == *self {
            return false;
        }
        *self = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_ratio_is_capped() {
        let viewport = Viewport::new(800, 600, 3.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);

        let viewport = Viewport::new(800, 600, 1.5);
        assert_eq!(viewport.pixel_ratio(), 1.5);

        let viewport = Viewport::new(800, 600, 1.0);
        assert_eq!(viewport.pixel_ratio(), 1.0);
    }

    #[test]
    fn test_physical_size_uses_capped_ratio() {
        let viewport = Viewport::new(800, 600, 3.0);
        assert_eq!(viewport.physical_size(), (1600, 1200));

        let viewport = Viewport::new(800, 600, 1.5);
        assert_eq!(viewport.physical_size(), (1200, 900));
    }

    #[test]
    fn test_surface_size_matches_host_within_cap() {
        // Physical 1001 at scale 2.0 rounds to logical 501; the surface must
        // still be exactly 1001, not 501 scaled back up to 1002.
        let viewport = Viewport::new(501, 400, 2.0);
        assert_eq!(viewport.surface_size(1001, 800), (1001, 800));

        let viewport = Viewport::new(800, 600, 1.5);
        assert_eq!(viewport.surface_size(1200, 900), (1200, 900));
    }

    #[test]
    fn test_surface_size_rescales_above_cap() {
        let viewport = Viewport::new(1000, 500, 3.0);
        assert_eq!(viewport.surface_size(3000, 1500), (2000, 1000));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let mut viewport = Viewport::new(800, 600, 1.0);
        assert!(viewport.resize(1024, 768, 1.0));

        let before = viewport;
        assert!(!viewport.resize(1024, 768, 1.0));
        assert_eq!(viewport, before);
    }

    #[test]
    fn test_aspect_tracks_dimensions() {
        let mut viewport = Viewport::new(1600, 900, 1.0);
        assert!((viewport.aspect() - 1600.0 / 900.0).abs() < f32::EPSILON);

        viewport.resize(1024, 1024, 1.0);
        assert_eq!(viewport.aspect(), 1.0);
    }

    #[test]
    fn test_zero_dimensions_clamp_to_one() {
        let viewport = Viewport::new(0, 0, 1.0);
        assert_eq!((viewport.width(), viewport.height()), (1, 1));
    }
}
