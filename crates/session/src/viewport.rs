use serde::Serialize;

/// Upper bound on the device pixel ratio used for the drawing buffer.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Logical viewport size plus the pixel ratio the drawing buffer uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
}

impl Viewport {
    /// Zero sizes become 1. A non-finite or non-positive ratio counts as 1.
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio: ratio.min(MAX_PIXEL_RATIO),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Physical size of the drawing buffer.
    pub fn drawing_buffer(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f32 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}
