use std::collections::VecDeque;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::Rng;

use super::texture::TextureData;
use crate::config::StationColor;
use crate::math::{Aabb, Color};

/// Downward acceleration applied to arrival sparks, world units / s²
pub const SPARK_GRAVITY: f32 = 30.0;

/// A stop along the track with its marker, pillar, glow and light
#[derive(Debug, Clone)]
pub struct StationEntity {
    pub index: usize,
    pub name: String,
    pub color_id: StationColor,
    pub color: Color,
    /// Arc-length position on the track
    pub t: f32,
    /// Curve sample at `t`
    pub track_point: Vec3,
    /// Marker sphere centre, above the track
    pub marker: Vec3,
    pub marker_radius: f32,
    pub marker_scale: f32,
    /// Foot of the pillar, also the glow disc centre
    pub pillar_base: Vec3,
    pub pillar_height: f32,
    pub glow_radius: f32,
    /// Rest position of the station light
    pub light_base: Vec3,
    pub light_position: Vec3,
    pub light_intensity: f32,
    /// Arrival pulse in [0, 1]
    pub pulse: f32,
    pub(crate) inside: bool,
}

impl StationEntity {
    /// Whether the train was within arrival range on the last tick
    pub fn train_inside(&self) -> bool {
        self.inside
    }
}

/// The train: progress along the loop plus its oriented frame
#[derive(Debug, Clone)]
pub struct TrainEntity {
    /// Arc-length progress in [0, 1)
    pub progress: f32,
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub headlights: [f32; 2],
    pub body_color: Color,
    pub window_color: Color,
    pub headlight_color: Color,
}

impl TrainEntity {
    pub fn new(position: Vec3, facing: Vec3, body: Color, window: Color, headlight: Color) -> Self {
        let mut train = Self {
            progress: 0.0,
            position,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            headlights: [1.6, 1.6],
            body_color: body,
            window_color: window,
            headlight_color: headlight,
        };
        train.orient(facing);
        train
    }

    /// Rebuild the basis from a travel direction: right = tangent x world-up,
    /// up = right x tangent. Keeps the car from rolling on steep sections.
    pub fn orient(&mut self, tangent: Vec3) {
        let forward = tangent.normalize_or(self.forward);
        let right = forward.cross(Vec3::Y).normalize_or(self.right);
        self.forward = forward;
        self.right = right;
        self.up = right.cross(forward).normalize_or(Vec3::Y);
    }

    /// Train-local offset (x right, y up, z forward) to world space
    pub fn local_to_world(&self, local: Vec3) -> Vec3 {
        self.position + self.right * local.x + self.up * local.y + self.forward * local.z
    }
}

/// Map imagery reduced to a grid of averaged colours
#[derive(Debug, Clone)]
pub struct ImagePlane {
    pub cols: u32,
    pub rows: u32,
    /// Row-major from the far-left corner
    pub cells: Vec<Color>,
}

/// The floating map: base, shadow, halo, frame, grid and optional imagery
#[derive(Debug, Clone)]
pub struct MapGroup {
    pub base_y: f32,
    /// Current group height
    pub y: f32,
    /// Current roll around the z axis, radians
    pub tilt: f32,
    pub width: f32,
    pub depth: f32,
    pub base_color: Color,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub texture_cells: [u32; 2],
    pub image: Option<ImagePlane>,
    /// Track emissive intensity, animated with the map
    pub track_emissive: f32,
    pub rail_glow_opacity: f32,
}

impl MapGroup {
    pub const SHADOW_HEIGHT: f32 = 0.2;
    pub const GRID_HEIGHT: f32 = 1.2;
    pub const HALO_HEIGHT: f32 = 1.4;
    pub const BASE_HEIGHT: f32 = 2.5;
    pub const FRAME_HEIGHT: f32 = 3.3;
    pub const IMAGE_HEIGHT: f32 = 4.1;
    pub const HALO_RADIUS: f32 = 225.0;

    /// Group-local point to world space (roll, then lift)
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        let (sin, cos) = self.tilt.sin_cos();
        Vec3::new(
            local.x * cos - local.y * sin,
            local.x * sin + local.y * cos + self.y,
            local.z,
        )
    }

    /// Plane normal after the current tilt
    pub fn normal(&self) -> Vec3 {
        let (sin, cos) = self.tilt.sin_cos();
        Vec3::new(-sin, cos, 0.0)
    }

    pub fn attach_image(&mut self, texture: &TextureData) {
        let [cols, rows] = self.texture_cells;
        let cells = texture.downsample(cols, rows);
        if cells.is_empty() {
            log::warn!("map texture is empty, image plane skipped");
            return;
        }
        let cols = cols.clamp(1, texture.width.max(1));
        let rows = rows.clamp(1, texture.height.max(1));
        self.image = Some(ImagePlane { cols, rows, cells });
    }
}

/// Ambient particle cloud moving with constant velocities inside a box
#[derive(Debug, Clone)]
pub struct ParticleField {
    pub positions: Vec<Vec3>,
    pub velocities: Vec<Vec3>,
    pub bounds: Aabb,
    pub color: Color,
    pub size: f32,
}

impl ParticleField {
    pub fn scatter(count: usize, bounds: Aabb, max_speed: f32, color: Color, size: f32, rng: &mut StdRng) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(bounds.lerp(Vec3::new(rng.gen(), rng.gen(), rng.gen())));
            let dir = Vec3::new(
                rng.gen_range(-1.0..=1.0),
                rng.gen_range(-0.5..=0.5),
                rng.gen_range(-1.0..=1.0),
            );
            velocities.push(dir * max_speed);
        }
        Self {
            positions,
            velocities,
            bounds,
            color,
            size,
        }
    }

    /// Integrate velocities and bounce off the box walls
    pub fn step(&mut self, delta: f32) {
        for (position, velocity) in self.positions.iter_mut().zip(self.velocities.iter_mut()) {
            *position += *velocity * delta;
            self.bounds.reflect(position, velocity);
        }
    }
}

/// Fixed-capacity ring of recent train positions, newest first
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<Vec3>,
    capacity: usize,
    spacing: f32,
}

impl Trail {
    pub fn new(start: Vec3, capacity: usize, spacing: f32) -> Self {
        let mut points = VecDeque::with_capacity(capacity.max(1));
        if capacity > 0 {
            points.push_front(start);
        }
        Self {
            points,
            capacity,
            spacing,
        }
    }

    /// Record `position` if it is at least `spacing` from the newest point
    pub fn record(&mut self, position: Vec3) -> bool {
        if self.capacity == 0 {
            return false;
        }
        if let Some(newest) = self.points.front() {
            if newest.distance(position) < self.spacing {
                return false;
            }
        }
        self.points.push_front(position);
        self.points.truncate(self.capacity);
        true
    }

    pub fn points(&self) -> impl Iterator<Item = &Vec3> {
        self.points.iter()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Remaining life in [0, 1]; 0 is dead
    pub life: f32,
}

/// Pool of sparks re-seeded at a station whenever the train arrives
#[derive(Debug, Clone)]
pub struct SparkBurst {
    sparks: Vec<Spark>,
    pub color: Color,
    speed: f32,
    lifetime: f32,
    rng: StdRng,
}

impl SparkBurst {
    pub fn new(count: usize, speed: f32, lifetime: f32, rng: StdRng) -> Self {
        let dead = Spark {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            life: 0.0,
        };
        Self {
            sparks: vec![dead; count],
            color: Color::WHITE,
            speed,
            lifetime,
            rng,
        }
    }

    /// Relaunch every spark from `origin` into the upper hemisphere
    pub fn emit(&mut self, origin: Vec3, color: Color) {
        self.color = color;
        for spark in &mut self.sparks {
            let theta = self.rng.gen_range(0.0..std::f32::consts::TAU);
            let rise: f32 = self.rng.gen_range(0.35..1.0);
            let spread = (1.0 - rise * rise).sqrt();
            let dir = Vec3::new(theta.cos() * spread, rise, theta.sin() * spread);
            spark.position = origin;
            spark.velocity = dir * self.speed * self.rng.gen_range(0.5..1.0);
            spark.life = 1.0;
        }
    }

    pub fn step(&mut self, delta: f32) {
        let fade = if self.lifetime > 0.0 { delta / self.lifetime } else { 1.0 };
        for spark in self.sparks.iter_mut().filter(|s| s.life > 0.0) {
            spark.velocity.y -= SPARK_GRAVITY * delta;
            spark.position += spark.velocity * delta;
            spark.life = (spark.life - fade).max(0.0);
        }
    }

    pub fn alive(&self) -> impl Iterator<Item = &Spark> {
        self.sparks.iter().filter(|s| s.life > 0.0)
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }
}

/// Swept geometry of the track: tube centreline, rail glow loop and supports
#[derive(Debug, Clone)]
pub struct TrackTube {
    pub samples: Vec<Vec3>,
    pub glow_samples: Vec<Vec3>,
    pub radius: f32,
    pub color: Color,
    pub emissive: Color,
    pub glow_color: Color,
    pub supports: Vec<Support>,
}

/// Vertical column under the track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Support {
    pub base: Vec3,
    pub top: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    #[test]
    fn orient_builds_orthonormal_basis() {
        let mut train = TrainEntity::new(Vec3::ZERO, Vec3::Z, Color::WHITE, Color::BLACK, Color::WHITE);
        train.orient(Vec3::new(1.0, 0.3, 1.0));
        assert_relative_eq!(train.forward.length(), 1.0, epsilon = 1e-5);
        assert_relative_eq!(train.right.dot(train.forward), 0.0, epsilon = 1e-5);
        assert_relative_eq!(train.up.dot(train.forward), 0.0, epsilon = 1e-5);
        assert!(train.up.y > 0.0);
    }

    #[test]
    fn vertical_tangent_keeps_previous_right() {
        let mut train = TrainEntity::new(Vec3::ZERO, Vec3::Z, Color::WHITE, Color::BLACK, Color::WHITE);
        let right = train.right;
        train.orient(Vec3::Y);
        assert_eq!(train.right, right);
        assert!(train.up.is_finite());
    }

    #[test]
    fn map_tilt_rolls_around_z() {
        let map = MapGroup {
            base_y: -24.0,
            y: -24.0,
            tilt: std::f32::consts::FRAC_PI_2,
            width: 420.0,
            depth: 260.0,
            base_color: Color::BLACK,
            grid_size: 520.0,
            grid_divisions: 24,
            texture_cells: [4, 4],
            image: None,
            track_emissive: 0.6,
            rail_glow_opacity: 0.35,
        };
        let p = map.to_world(Vec3::new(1.0, 0.0, 5.0));
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, -23.0, epsilon = 1e-5);
        assert_eq!(p.z, 5.0);
    }

    #[test]
    fn particles_stay_in_bounds() {
        let bounds = Aabb::new(Vec3::splat(-5.0), Vec3::splat(5.0));
        let mut rng = StdRng::seed_from_u64(7);
        let mut field = ParticleField::scatter(50, bounds, 20.0, Color::WHITE, 2.0, &mut rng);
        for _ in 0..500 {
            field.step(0.05);
        }
        assert!(field.positions.iter().all(|p| bounds.contains(*p)));
    }

    #[test]
    fn trail_respects_spacing_and_capacity() {
        let mut trail = Trail::new(Vec3::ZERO, 3, 1.0);
        assert!(!trail.record(Vec3::new(0.5, 0.0, 0.0)));
        assert!(trail.record(Vec3::new(1.0, 0.0, 0.0)));
        assert!(trail.record(Vec3::new(2.0, 0.0, 0.0)));
        assert!(trail.record(Vec3::new(3.0, 0.0, 0.0)));
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.points().next(), Some(&Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn sparks_fall_and_die() {
        let mut burst = SparkBurst::new(8, 20.0, 1.0, StdRng::seed_from_u64(1));
        assert_eq!(burst.alive().count(), 0);

        burst.emit(Vec3::ZERO, Color::WHITE);
        assert_eq!(burst.alive().count(), 8);
        assert!(burst.alive().all(|s| s.velocity.y > 0.0));

        for _ in 0..11 {
            burst.step(0.1);
        }
        assert_eq!(burst.alive().count(), 0);
    }
}
