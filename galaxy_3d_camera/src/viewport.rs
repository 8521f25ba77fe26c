/// Viewport: pixel rectangle that normalized device coordinates map onto.
///
/// Origin is the top-left corner of the render target, y grows downward.
/// Only used as an input to `Camera::project`, `unproject` and `pick_ray`.

use glam::Vec2;

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport at the origin covering `width` x `height` pixels.
    pub fn from_extent(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Width divided by height, or 1.0 for a zero-height viewport.
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pixel at the center of the rectangle.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// True if the pixel lies inside the rectangle (right/bottom edges excluded).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    /// Map normalized device x/y in [-1, 1] to pixels (y flipped).
    pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.x + (ndc.x + 1.0) * 0.5 * self.width,
            self.y + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }

    /// Inverse of `ndc_to_pixel`.
    ///
    /// An axis with no positive extent maps to its center (0).
    pub fn pixel_to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let ndc_x = if self.width > 0.0 {
            (x - self.x) / self.width * 2.0 - 1.0
        } else {
            0.0
        };
        let ndc_y = if self.height > 0.0 {
            1.0 - (y - self.y) / self.height * 2.0
        } else {
            0.0
        };
        Vec2::new(ndc_x, ndc_y)
    }
}

#[cfg(test)]
#[path = "viewport_tests.rs"]
mod tests;
