use super::canvas::Rgba;
use super::display_context::DisplayContext;
use super::input::InputState;

/// Output from a layer's render call - straight-alpha RGBA pixels
#[derive(Debug, Clone)]
pub struct LayerOutput {
    pub pixels: Vec<Rgba>,
}

impl LayerOutput {
    pub fn new(pixels: Vec<Rgba>) -> Self {
        Self { pixels }
    }

    /// Fully transparent output covering the context
    pub fn transparent(context: &DisplayContext) -> Self {
        Self {
            pixels: vec![[0; 4]; context.pixel_count()],
        }
    }

    /// Source-over composite onto `base`.
    /// Mismatched sizes composite the overlapping prefix only.
    pub fn composite_onto(&self, base: &mut [Rgba]) {
        for (dst, src) in base.iter_mut().zip(&self.pixels) {
            match src[3] {
                0 => {}
                255 => *dst = *src,
                alpha => {
                    let a = alpha as f32 / 255.0;
                    let inv = 1.0 - a;
                    for c in 0..3 {
                        dst[c] = (src[c] as f32 * a + dst[c] as f32 * inv + 0.5) as u8;
                    }
                    dst[3] = (alpha as f32 + dst[3] as f32 * inv + 0.5).min(255.0) as u8;
                }
            }
        }
    }
}

/// Layer drawn over the scene, updated once per frame
pub trait Layer {
    /// Advance layer state by delta time
    fn update(&mut self, delta: f32, input: &InputState);

    /// Render layer pixels for the current output size
    fn render(&self, context: &DisplayContext) -> LayerOutput;

    /// Layer priority for composition (lower = background, higher = foreground)
    fn priority(&self) -> i32 {
        0
    }
}

/// Composite layers onto a base buffer in priority order
pub fn composite_layers(base: &mut [Rgba], layers: &mut [&mut dyn Layer], context: &DisplayContext) {
    layers.sort_by_key(|layer| layer.priority());
    for layer in layers.iter() {
        layer.render(context).composite_onto(base);
    }
}
