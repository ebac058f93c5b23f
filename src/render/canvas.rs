/// RGBA colour with straight alpha
pub type Rgba = [u8; 4];

/// 2D drawing operations for the preview canvas.
/// Coordinates are signed so shapes may hang off the edges; they are clipped.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Fill the entire canvas, ignoring alpha blending
    Clear(Rgba),

    Pixel { x: i32, y: i32, color: Rgba },

    /// Filled rectangle
    Rect { x: i32, y: i32, width: i32, height: i32, color: Rgba },

    /// Rectangle outline, one pixel wide
    Frame { x: i32, y: i32, width: i32, height: i32, color: Rgba },

    /// Circle outline using the midpoint algorithm
    Circle { cx: i32, cy: i32, radius: i32, color: Rgba },

    FilledCircle { cx: i32, cy: i32, radius: i32, color: Rgba },

    /// Bresenham line
    Line { x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba },
}

/// Pixel buffer with queued draw operations
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<u8>,
    operations: Vec<DrawOp>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            operations: Vec::new(),
            width,
            height,
        }
    }

    /// Queue an operation for the next [`Canvas::flush`]
    pub fn draw(&mut self, op: DrawOp) {
        self.operations.push(op);
    }

    /// Execute pending operations in submission order
    pub fn flush(&mut self) {
        let operations = std::mem::take(&mut self.operations);
        for op in &operations {
            self.execute_op(op);
        }
    }

    pub fn pending(&self) -> usize {
        self.operations.len()
    }

    /// Drops queued operations and reallocates when the size changed
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
        self.operations.clear();
    }

    fn execute_op(&mut self, op: &DrawOp) {
        match *op {
            DrawOp::Clear(color) => self.clear(color),
            DrawOp::Pixel { x, y, color } => self.blend(x, y, color),
            DrawOp::Rect { x, y, width, height, color } => self.fill_rect(x, y, width, height, color),
            DrawOp::Frame { x, y, width, height, color } => {
                self.draw_line(x, y, x + width - 1, y, color);
                self.draw_line(x, y + height - 1, x + width - 1, y + height - 1, color);
                self.draw_line(x, y, x, y + height - 1, color);
                self.draw_line(x + width - 1, y, x + width - 1, y + height - 1, color);
            }
            DrawOp::Circle { cx, cy, radius, color } => self.draw_circle(cx, cy, radius, color),
            DrawOp::FilledCircle { cx, cy, radius, color } => {
                self.draw_filled_circle(cx, cy, radius, color)
            }
            DrawOp::Line { x1, y1, x2, y2, color } => self.draw_line(x1, y1, x2, y2, color),
        }
    }

    fn clear(&mut self, color: Rgba) {
        for texel in self.pixels.chunks_exact_mut(4) {
            texel.copy_from_slice(&color);
        }
    }

    /// Source-over blend of one pixel; out-of-bounds writes are dropped
    pub fn blend(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        let alpha = color[3] as u32;
        if alpha == 255 {
            self.pixels[idx..idx + 4].copy_from_slice(&color);
            return;
        }
        for channel in 0..3 {
            let dst = self.pixels[idx + channel] as u32;
            let src = color[channel] as u32;
            self.pixels[idx + channel] = ((src * alpha + dst * (255 - alpha)) / 255) as u8;
        }
        let dst_alpha = self.pixels[idx + 3] as u32;
        self.pixels[idx + 3] = (alpha + dst_alpha * (255 - alpha) / 255) as u8;
    }

    /// Visible span of `[start, start + length)` along an axis of `extent`
    fn clip_span(start: i32, length: i32, extent: u32) -> Option<(i32, i32)> {
        let lo = start.max(0);
        let hi = start.saturating_add(length).min(extent as i32);
        (lo < hi).then_some((lo, hi))
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Rgba) {
        let (Some((x0, x1)), Some((y0, y1))) = (
            Self::clip_span(x, width, self.width),
            Self::clip_span(y, height, self.height),
        ) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba) {
        let (mut x, mut y) = (radius, 0i32);
        let mut p = 1 - radius;

        while x >= y {
            let points = [
                (cx + x, cy + y), (cx - x, cy + y),
                (cx + x, cy - y), (cx - x, cy - y),
                (cx + y, cy + x), (cx - y, cy + x),
                (cx + y, cy - x), (cx - y, cy - x),
            ];
            for (px, py) in points {
                self.blend(px, py, color);
            }

            y += 1;
            if p <= 0 {
                p += 2 * y + 1;
            } else {
                x -= 1;
                p += 2 * (y - x) + 1;
            }
        }
    }

    fn draw_filled_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Rgba) {
        let r_sq = radius * radius;
        let Some((y0, y1)) = Self::clip_span(cy - radius, 2 * radius + 1, self.height) else {
            return;
        };
        for py in y0..y1 {
            let dy = py - cy;
            let half = ((r_sq - dy * dy).max(0) as f32).sqrt() as i32;
            if let Some((x0, x1)) = Self::clip_span(cx - half, 2 * half + 1, self.width) {
                for px in x0..x1 {
                    self.blend(px, py, color);
                }
            }
        }
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) {
        let (mut x, mut y) = (x1, y1);

        let dx = (x2 - x).abs();
        let dy = -(y2 - y).abs();
        let sx = if x < x2 { 1 } else { -1 };
        let sy = if y < y2 { 1 } else { -1 };
        let mut err = dx + dy;

        // Bail out of absurd spans produced by near-plane projections
        let mut budget = (dx - dy) as i64 + 1;
        let limit = 4 * (self.width as i64 + self.height as i64);
        if budget > limit * 4 {
            return;
        }

        loop {
            self.blend(x, y, color);

            if (x == x2 && y == y2) || budget <= 0 {
                break;
            }
            budget -= 1;

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let mut texel = [0; 4];
        texel.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(texel)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];

    #[test]
    fn test_queue_and_flush() {
        let mut canvas = Canvas::new(8, 8);
        canvas.draw(DrawOp::Clear([0, 0, 0, 255]));
        canvas.draw(DrawOp::Pixel { x: 3, y: 4, color: RED });
        assert_eq!(canvas.pending(), 2);
        assert_eq!(canvas.pixel(3, 4), Some([0, 0, 0, 0]));

        canvas.flush();
        assert_eq!(canvas.pending(), 0);
        assert_eq!(canvas.pixel(3, 4), Some(RED));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_rect_is_clipped() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw(DrawOp::Rect { x: -10, y: 2, width: 100, height: 100, color: RED });
        canvas.flush();
        assert_eq!(canvas.pixel(0, 2), Some(RED));
        assert_eq!(canvas.pixel(3, 3), Some(RED));
        assert_eq!(canvas.pixel(3, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_half_alpha_blends() {
        let mut canvas = Canvas::new(1, 1);
        canvas.draw(DrawOp::Clear([0, 0, 255, 255]));
        canvas.draw(DrawOp::Pixel { x: 0, y: 0, color: [255, 0, 0, 128] });
        canvas.flush();
        let texel = canvas.pixel(0, 0).unwrap();
        assert!((texel[0] as i32 - 128).abs() <= 1);
        assert!((texel[2] as i32 - 127).abs() <= 1);
        assert_eq!(texel[3], 255);
    }

    #[test]
    fn test_line_endpoints() {
        let mut canvas = Canvas::new(10, 10);
        canvas.draw(DrawOp::Line { x1: 1, y1: 1, x2: 8, y2: 5, color: RED });
        canvas.flush();
        assert_eq!(canvas.pixel(1, 1), Some(RED));
        assert_eq!(canvas.pixel(8, 5), Some(RED));
    }

    #[test]
    fn test_filled_circle_covers_center_only() {
        let mut canvas = Canvas::new(20, 20);
        canvas.draw(DrawOp::FilledCircle { cx: 10, cy: 10, radius: 3, color: RED });
        canvas.flush();
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(13, 10), Some(RED));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(13, 13), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut canvas = Canvas::new(2, 2);
        canvas.resize(3, 5);
        assert_eq!(canvas.dimensions(), (3, 5));
        assert_eq!(canvas.pixels().len(), 3 * 5 * 4);
    }
}
