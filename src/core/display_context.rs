/// Display context - output buffer dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplayContext {
    /// Create new display context; zero dimensions are bumped to one
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Pixels per world unit at distance 1 for a vertical field of view
    pub fn focal_length(&self, fov_y_radians: f32) -> f32 {
        self.height as f32 / (2.0 * (fov_y_radians * 0.5).tan())
    }
}

impl Default for DisplayContext {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_context_with_dimensions() {
        let ctx = DisplayContext::new(1920, 1080);
        assert_eq!(ctx.width, 1920);
        assert_eq!(ctx.height, 1080);
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let ctx = DisplayContext::new(0, 0);
        assert_eq!(ctx.pixel_count(), 1);
        assert_eq!(ctx.aspect(), 1.0);
    }

    #[test]
    fn test_aspect() {
        let ctx = DisplayContext::new(1600, 800);
        assert_eq!(ctx.aspect(), 2.0);
    }

    #[test]
    fn test_focal_length_ninety_degrees() {
        let ctx = DisplayContext::new(100, 100);
        let focal = ctx.focal_length(std::f32::consts::FRAC_PI_2);
        assert!((focal - 50.0).abs() < 1e-3);
    }
}
