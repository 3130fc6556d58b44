use glam::Vec2;

/// One RGBA8 pixel
pub type Rgba = [u8; 4];

/// 2D drawing operations for canvas.
/// Coordinates are in pixels, origin top-left; everything but `Clear` blends
/// source-over using the colour's alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawOp {
    /// Overwrite the whole canvas
    Clear(Rgba),

    /// Single pixel
    Pixel { x: i32, y: i32, color: Rgba },

    /// Line segment of the given width
    Line { from: Vec2, to: Vec2, width: f32, color: Rgba },

    /// Filled disc
    Disc { center: Vec2, radius: f32, color: Rgba },

    /// Filled triangle, either winding
    Triangle { a: Vec2, b: Vec2, c: Vec2, color: Rgba },
}

/// Canvas state - pixel buffer with pending draw operations
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: Vec<Rgba>,
    operations: Vec<DrawOp>,
    width: u32,
    height: u32,
}

impl Canvas {
    /// Create new, fully transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![[0; 4]; width as usize * height as usize],
            operations: Vec::new(),
            width,
            height,
        }
    }

    /// Queue a draw operation
    pub fn push(&mut self, op: DrawOp) {
        self.operations.push(op);
    }

    /// Execute and drain all pending operations
    pub fn flush(&mut self) {
        let ops = std::mem::take(&mut self.operations);
        for op in &ops {
            self.execute_op(op);
        }
        // Keep the allocation for the next frame
        self.operations = ops;
        self.operations.clear();
    }

    /// Change dimensions; contents and pending ops are discarded
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![[0; 4]; width as usize * height as usize];
        self.operations.clear();
    }

    fn execute_op(&mut self, op: &DrawOp) {
        match *op {
            DrawOp::Clear(color) => self.pixels.fill(color),
            DrawOp::Pixel { x, y, color } => self.blend(x, y, color),
            DrawOp::Line { from, to, width, color } => self.draw_line(from, to, width, color),
            DrawOp::Disc { center, radius, color } => self.draw_disc(center, radius, color),
            DrawOp::Triangle { a, b, c, color } => self.draw_triangle(a, b, c, color),
        }
    }

    /// Source-over blend one pixel, silently clipping
    fn blend(&mut self, x: i32, y: i32, src: Rgba) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;

        if src[3] == 255 {
            self.pixels[idx] = src;
            return;
        }
        if src[3] == 0 {
            return;
        }

        let dst = self.pixels[idx];
        let a = src[3] as f32 / 255.0;
        let inv = 1.0 - a;
        let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * inv + 0.5) as u8;

        self.pixels[idx] = [
            mix(src[0], dst[0]),
            mix(src[1], dst[1]),
            mix(src[2], dst[2]),
            (src[3] as f32 + dst[3] as f32 * inv + 0.5).min(255.0) as u8,
        ];
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if !(from.is_finite() && to.is_finite()) {
            return;
        }

        if width > 1.5 {
            let dir = (to - from).normalize_or_zero();
            if dir == Vec2::ZERO {
                self.draw_disc(from, width * 0.5, color);
                return;
            }
            let side = dir.perp() * (width * 0.5);
            self.draw_triangle(from - side, from + side, to + side, color);
            self.draw_triangle(from - side, to + side, to - side, color);
            return;
        }

        // DDA, one pixel per step along the major axis
        let Some((from, to)) = self.clip_segment(from, to) else {
            return;
        };
        let delta = to - from;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as i32;
        let step = delta / steps as f32;
        let mut p = from;
        for _ in 0..=steps {
            self.blend(p.x.round() as i32, p.y.round() as i32, color);
            p += step;
        }
    }

    fn draw_disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !center.is_finite() || !radius.is_finite() {
            return;
        }
        if radius < 0.75 {
            self.blend(center.x.round() as i32, center.y.round() as i32, color);
            return;
        }

        let r_sq = radius * radius;
        let (x0, x1) = self.clip_x(center.x - radius, center.x + radius);
        let (y0, y1) = self.clip_y(center.y - radius, center.y + radius);

        for y in y0..=y1 {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                if dx * dx + dy * dy <= r_sq {
                    self.blend(x, y, color);
                }
            }
        }
    }

    fn draw_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Rgba) {
        if !(a.is_finite() && b.is_finite() && c.is_finite()) {
            return;
        }

        let area = edge(a, b, c);
        if area.abs() < 1e-6 {
            return;
        }
        // Normalise to counter-clockwise so inside means all edges >= 0
        let (b, c) = if area < 0.0 { (c, b) } else { (b, c) };

        let (x0, x1) = self.clip_x(a.x.min(b.x).min(c.x), a.x.max(b.x).max(c.x));
        let (y0, y1) = self.clip_y(a.y.min(b.y).min(c.y), a.y.max(b.y).max(c.y));

        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if edge(a, b, p) >= 0.0 && edge(b, c, p) >= 0.0 && edge(c, a, p) >= 0.0 {
                    self.blend(x, y, color);
                }
            }
        }
    }

    /// Liang-Barsky clip against the canvas plus a one pixel margin, in f64
    /// since off-screen endpoints can sit near 1e8
    fn clip_segment(&self, a: Vec2, b: Vec2) -> Option<(Vec2, Vec2)> {
        let (a, b) = (a.as_dvec2(), b.as_dvec2());
        let (w, h) = (self.width as f64, self.height as f64);
        let d = b - a;
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in [(-d.x, a.x + 1.0), (d.x, w - a.x), (-d.y, a.y + 1.0), (d.y, h - a.y)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t0 = t0.max(q / p);
            } else {
                t1 = t1.min(q / p);
            }
        }
        (t0 <= t1).then(|| ((a + d * t0).as_vec2(), (a + d * t1).as_vec2()))
    }

    fn clip_x(&self, lo: f32, hi: f32) -> (i32, i32) {
        let max = self.width as i32 - 1;
        ((lo.floor() as i32).max(0), (hi.ceil() as i32).min(max))
    }

    fn clip_y(&self, lo: f32, hi: f32) -> (i32, i32) {
        let max = self.height as i32 - 1;
        ((lo.floor() as i32).max(0), (hi.ceil() as i32).min(max))
    }

    /// Get pixel buffer
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

}

/// Twice the signed area of (a, b, p); positive when p is left of a→b
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const CLEAR: Rgba = [0, 0, 0, 0];

    fn painted(width: u32, height: u32, ops: &[DrawOp]) -> Canvas {
        let mut canvas = Canvas::new(width, height);
        for op in ops {
            canvas.push(*op);
        }
        canvas.flush();
        canvas
    }

    impl Canvas {
        fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
            (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
        }
    }

    #[test]
    fn canvas_creation() {
        let canvas = Canvas::new(100, 50);
        assert_eq!(canvas.pixels().len(), 100 * 50);
        assert_eq!(canvas.pixel(0, 0), Some(CLEAR));
        assert_eq!(canvas.pixel(100, 0), None);
    }

    #[test]
    fn canvas_clear() {
        let mut canvas = painted(10, 10, &[DrawOp::Clear(RED)]);
        assert_eq!(canvas.pixel(0, 0), Some(RED));
        assert_eq!(canvas.pixel(9, 9), Some(RED));

        // Flushed ops are not replayed
        canvas.pixels.fill(CLEAR);
        canvas.flush();
        assert_eq!(canvas.pixel(0, 0), Some(CLEAR));
    }

    #[test]
    fn canvas_half_alpha_blends() {
        let canvas = painted(
            1,
            1,
            &[
                DrawOp::Clear([0, 0, 0, 255]),
                DrawOp::Pixel { x: 0, y: 0, color: [255, 255, 255, 128] },
            ],
        );
        let px = canvas.pixel(0, 0).unwrap();
        assert!((px[0] as i32 - 128).abs() <= 1);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn canvas_bounds_checking() {
        let canvas = painted(
            10,
            10,
            &[
                DrawOp::Pixel { x: 100, y: -3, color: RED },
                DrawOp::Disc { center: Vec2::new(-50.0, -50.0), radius: 10.0, color: RED },
            ],
        );
        assert!(canvas.pixels().iter().all(|p| *p == CLEAR));
    }

    #[test]
    fn canvas_disc() {
        let canvas = painted(50, 50, &[DrawOp::Disc { center: Vec2::new(25.0, 25.0), radius: 5.0, color: RED }]);
        assert_eq!(canvas.pixel(25, 25), Some(RED));
        assert_eq!(canvas.pixel(25, 22), Some(RED));
        assert_eq!(canvas.pixel(25, 35), Some(CLEAR));
    }

    #[test]
    fn canvas_triangle_either_winding() {
        for (b, c) in [
            (Vec2::new(20.0, 0.0), Vec2::new(0.0, 20.0)),
            (Vec2::new(0.0, 20.0), Vec2::new(20.0, 0.0)),
        ] {
            let canvas = painted(20, 20, &[DrawOp::Triangle { a: Vec2::ZERO, b, c, color: RED }]);
            assert_eq!(canvas.pixel(3, 3), Some(RED));
            assert_eq!(canvas.pixel(18, 18), Some(CLEAR));
        }
    }

    #[test]
    fn canvas_thin_line_endpoints() {
        let canvas = painted(
            50,
            50,
            &[DrawOp::Line {
                from: Vec2::new(10.0, 10.0),
                to: Vec2::new(20.0, 20.0),
                width: 1.0,
                color: RED,
            }],
        );
        assert_eq!(canvas.pixel(10, 10), Some(RED));
        assert_eq!(canvas.pixel(20, 20), Some(RED));
        assert_eq!(canvas.pixel(15, 15), Some(RED));
    }

    #[test]
    fn canvas_thin_line_far_off_screen_is_clipped() {
        // Endpoints like these come from points just past the near plane
        let canvas = painted(
            10,
            10,
            &[
                DrawOp::Line {
                    from: Vec2::new(-1e8, 5.0),
                    to: Vec2::new(1e8, 5.0),
                    width: 1.0,
                    color: RED,
                },
                DrawOp::Line {
                    from: Vec2::new(-1e8, -1e8),
                    to: Vec2::new(-2e8, 3e7),
                    width: 1.0,
                    color: RED,
                },
            ],
        );
        for x in 0..10 {
            assert_eq!(canvas.pixel(x, 5), Some(RED));
            assert_eq!(canvas.pixel(x, 4), Some(CLEAR));
            assert_eq!(canvas.pixel(x, 6), Some(CLEAR));
        }
    }

    #[test]
    fn canvas_thick_line_covers_width() {
        let canvas = painted(
            50,
            50,
            &[DrawOp::Line {
                from: Vec2::new(5.0, 25.0),
                to: Vec2::new(45.0, 25.0),
                width: 6.0,
                color: RED,
            }],
        );
        assert_eq!(canvas.pixel(25, 23), Some(RED));
        assert_eq!(canvas.pixel(25, 26), Some(RED));
        assert_eq!(canvas.pixel(25, 30), Some(CLEAR));
    }

    #[test]
    fn canvas_non_finite_ignored() {
        let canvas = painted(
            10,
            10,
            &[DrawOp::Line {
                from: Vec2::new(f32::NAN, 0.0),
                to: Vec2::new(5.0, 5.0),
                width: 3.0,
                color: RED,
            }],
        );
        assert!(canvas.pixels().iter().all(|p| p[3] == 0));
    }

    #[test]
    fn canvas_resize_discards() {
        let mut canvas = painted(4, 4, &[DrawOp::Clear(RED)]);
        canvas.resize(8, 2);
        assert_eq!(canvas.pixels().len(), 16);
        assert_eq!(canvas.pixel(0, 0), Some(CLEAR));
    }
}
