use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{HeroConfig, Palette, StationColor};
use crate::core::{Canvas, DisplayContext, DrawOp, InputState, Layer, LayerOutput};
use crate::math::Color;

const PEAK_ALPHA: f32 = 0.8;

#[derive(Debug, Clone, Copy)]
struct HeroDot {
    /// Horizontal position as a share of the width
    x: f32,
    /// Diameter in pixels
    size: f32,
    duration: f32,
    delay: f32,
    color: Color,
}

impl HeroDot {
    /// Height share (1 = bottom edge) and alpha at `time`, `None` before the delay
    fn state(&self, time: f32) -> Option<(f32, f32)> {
        let local = time - self.delay;
        if local < 0.0 || self.duration <= 0.0 {
            return None;
        }
        let phase = local.rem_euclid(self.duration) / self.duration;
        let alpha = (phase * std::f32::consts::PI).sin() * PEAK_ALPHA;
        Some((1.0 - phase, alpha))
    }
}

/// Rising coloured dots drawn over the 3D scene
#[derive(Debug, Clone)]
pub struct HeroParticleLayer {
    dots: Vec<HeroDot>,
    time: f32,
}

impl HeroParticleLayer {
    pub fn new(config: &HeroConfig, palette: &Palette) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let span = |rng: &mut StdRng, lo: f32, hi: f32| {
            if hi > lo {
                rng.gen_range(lo..hi)
            } else {
                lo
            }
        };

        let dots = (0..config.count)
            .map(|_| HeroDot {
                x: rng.gen::<f32>(),
                size: span(&mut rng, config.min_size, config.max_size),
                duration: span(&mut rng, config.min_duration, config.max_duration),
                delay: span(&mut rng, 0.0, config.max_delay),
                color: palette.color(StationColor::ALL[rng.gen_range(0..StationColor::ALL.len())]),
            })
            .collect();

        Self { dots, time: 0.0 }
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    /// Dots past their start delay
    pub fn visible(&self) -> usize {
        self.dots.iter().filter(|d| d.state(self.time).is_some()).count()
    }
}

impl Layer for HeroParticleLayer {
    fn update(&mut self, delta: f32, _input: &InputState) {
        if delta.is_finite() && delta > 0.0 {
            self.time += delta;
        }
    }

    fn render(&self, context: &DisplayContext) -> LayerOutput {
        let (w, h) = (context.width as f32, context.height as f32);
        let mut canvas = Canvas::new(context.width, context.height);
        for dot in &self.dots {
            let Some((rise, alpha)) = dot.state(self.time) else {
                continue;
            };
            let radius = dot.size * 0.5;
            // Travel from just below the bottom edge to just above the top
            let y = -radius + rise * (h + dot.size);
            canvas.push(DrawOp::Disc {
                center: Vec2::new(dot.x * w, y),
                radius,
                color: dot.color.to_rgba8(alpha),
            });
        }
        canvas.flush();
        LayerOutput::new(canvas.pixels().to_vec())
    }

    fn priority(&self) -> i32 {
        10
    }
}
