use glam::Vec2;

/// Output surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Size in bytes of an RGBA8 buffer covering the viewport
    pub fn buffer_size(&self) -> usize {
        self.pixel_count() * 4
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }

    /// Normalized device coordinates to pixels, y pointing down
    pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x * 0.5 + 0.5) * self.width as f32,
            (-(ndc.y * 0.5) + 0.5) * self.height as f32,
        )
    }

    pub fn pixel_to_ndc(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            pixel.x / self.width.max(1) as f32 * 2.0 - 1.0,
            -(pixel.y / self.height.max(1) as f32 * 2.0 - 1.0),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_rgba() {
        let viewport = Viewport::new(100, 100);
        assert_eq!(viewport.buffer_size(), 40000);
    }

    #[test]
    fn test_aspect_guards_zero_height() {
        assert_eq!(Viewport::new(800, 0).aspect(), 1.0);
        assert!((Viewport::new(1920, 1080).aspect() - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn test_ndc_origin_is_center() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(viewport.ndc_to_pixel(Vec2::ZERO), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_ndc_top_left_corner() {
        let viewport = Viewport::new(800, 600);
        assert_eq!(viewport.ndc_to_pixel(Vec2::new(-1.0, 1.0)), Vec2::ZERO);
    }

    #[test]
    fn test_pixel_ndc_inverse() {
        let viewport = Viewport::new(640, 480);
        let pixel = Vec2::new(123.0, 456.0);
        let back = viewport.ndc_to_pixel(viewport.pixel_to_ndc(pixel));
        assert!(back.abs_diff_eq(pixel, 1e-3));
    }
}
