//! Declarative scene description.
//!
//! Every section has a `Default` matching the landing-page scene, so a JSON
//! config only needs to list what it overrides.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::math::{Aabb, Color, CurveKind};

/// Line colour identifiers used by stations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationColor {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Yellow,
}

impl StationColor {
    pub const ALL: [StationColor; 6] = [
        StationColor::Red,
        StationColor::Blue,
        StationColor::Green,
        StationColor::Orange,
        StationColor::Purple,
        StationColor::Yellow,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub red: u32,
    pub blue: u32,
    pub green: u32,
    pub orange: u32,
    pub purple: u32,
    pub yellow: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            red: 0xEE352E,
            blue: 0x0039A6,
            green: 0x00933C,
            orange: 0xFF6319,
            purple: 0xB933AD,
            yellow: 0xFCCC0A,
        }
    }
}

impl Palette {
    pub fn color(&self, id: StationColor) -> Color {
        let hex = match id {
            StationColor::Red => self.red,
            StationColor::Blue => self.blue,
            StationColor::Green => self.green,
            StationColor::Orange => self.orange,
            StationColor::Purple => self.purple,
            StationColor::Yellow => self.yellow,
        };
        Color::from_hex(hex)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Background raster drawn on the floating map plane
    pub image: PathBuf,
    pub width: f32,
    pub depth: f32,
    /// Resting height of the map group
    pub base_y: f32,
    pub float_amplitude: f32,
    pub float_frequency: f32,
    pub tilt_amplitude: f32,
    pub tilt_frequency: f32,
    pub base_color: u32,
    pub grid_size: f32,
    pub grid_divisions: u32,
    /// Cells per axis used when rasterising the image plane
    pub texture_cells: [u32; 2],
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            image: PathBuf::from("nyc_subway_map_optimized.jpg"),
            width: 420.0,
            depth: 260.0,
            base_y: -24.0,
            float_amplitude: 1.6,
            float_frequency: 0.45,
            tilt_amplitude: 0.05,
            tilt_frequency: 0.35,
            base_color: 0x0A1428,
            grid_size: 520.0,
            grid_divisions: 24,
            texture_cells: [84, 52],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackConfig {
    pub points: Vec<[f32; 3]>,
    pub curve: CurveKind,
    pub tube_radius: f32,
    pub tubular_segments: usize,
    pub color: u32,
    pub emissive: u32,
    pub emissive_intensity: f32,
    pub glow_color: u32,
    /// Spacing in `t` between support columns
    pub support_spacing: f32,
    pub support_min_height: f32,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            points: vec![
                [-190.0, 46.0, 110.0],
                [-130.0, 42.0, 30.0],
                [-60.0, 36.0, -40.0],
                [30.0, 42.0, -120.0],
                [170.0, 40.0, -40.0],
                [150.0, 38.0, 80.0],
                [60.0, 36.0, 130.0],
                [-120.0, 44.0, 100.0],
            ],
            curve: CurveKind::default(),
            tube_radius: 2.6,
            tubular_segments: 800,
            color: 0x3B82F6,
            emissive: 0x1D4ED8,
            emissive_intensity: 0.6,
            glow_color: 0x22D3EE,
            support_spacing: 0.08,
            support_min_height: 8.0,
        }
    }
}

impl TrackConfig {
    pub fn control_points(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| Vec3::from_array(*p)).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub name: String,
    pub color: StationColor,
    pub t: f32,
}

impl StationConfig {
    pub fn new(name: impl Into<String>, color: StationColor, t: f32) -> Self {
        Self {
            name: name.into(),
            color,
            t,
        }
    }
}

fn default_stations() -> Vec<StationConfig> {
    vec![
        StationConfig::new("BUG FIXING", StationColor::Red, 0.03),
        StationConfig::new("VERSION BUMPS", StationColor::Blue, 0.2),
        StationConfig::new("AUTOMATED TESTS", StationColor::Green, 0.36),
        StationConfig::new("FEATURE BUILDING", StationColor::Orange, 0.52),
        StationConfig::new("GITHUB INTEGRATION", StationColor::Purple, 0.68),
        StationConfig::new("GEMINI 2.5 POWERED", StationColor::Yellow, 0.84),
    ]
}

/// Geometry shared by every station
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StationStyle {
    pub marker_radius: f32,
    /// Marker height above the track point
    pub marker_elevation: f32,
    /// Light height above the track point
    pub light_elevation: f32,
    /// Pillar/glow baseline, relative to `map.base_y`
    pub baseline_offset: f32,
    pub pillar_min_height: f32,
    pub glow_radius: f32,
    pub light_base_intensity: f32,
    pub light_wave: f32,
    pub light_bob: f32,
}

impl Default for StationStyle {
    fn default() -> Self {
        Self {
            marker_radius: 3.6,
            marker_elevation: 5.8,
            light_elevation: 14.0,
            baseline_offset: 4.2,
            pillar_min_height: 10.0,
            glow_radius: 9.0,
            light_base_intensity: 0.9,
            light_wave: 0.4,
            light_bob: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Track fraction per second
    pub speed: f32,
    /// Lookahead used to build the heading each tick
    pub heading_epsilon: f32,
    /// Lookahead used for the initial facing
    pub initial_facing: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub body_color: u32,
    pub window_color: u32,
    pub headlight_color: u32,
    pub trail_length: usize,
    pub trail_spacing: f32,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            speed: 0.025,
            heading_epsilon: 0.002,
            initial_facing: 0.01,
            bob_amplitude: 0.8,
            bob_frequency: 2.6,
            body_color: 0xE2E8F0,
            window_color: 0x0F172A,
            headlight_color: 0xFFF3B0,
            trail_length: 48,
            trail_spacing: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// Horizontal distance that counts as "at the station"
    pub threshold: f32,
    /// Seconds before the last-arrived marker clears
    pub clear_delay: f32,
    /// Pulse units lost per second
    pub pulse_decay: f32,
    pub marker_scale_gain: f32,
    pub light_gain: f32,
    pub burst_sparks: usize,
    pub burst_speed: f32,
    pub burst_lifetime: f32,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            threshold: 18.0,
            clear_delay: 1.5,
            pulse_decay: 1.2,
            marker_scale_gain: 0.6,
            light_gain: 2.5,
            burst_sparks: 24,
            burst_speed: 22.0,
            burst_lifetime: 1.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub base_position: [f32; 3],
    pub look_at: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Pointer x → x, pointer y → y, pointer x → z
    pub pointer_gain: [f32; 3],
    /// Exponential smoothing rate (1/s)
    pub smoothing: f32,
    /// Upper bound on the fraction of remaining distance covered per tick
    pub max_step_fraction: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            base_position: [-40.0, 170.0, 320.0],
            look_at: [0.0, -12.0, 0.0],
            fov_degrees: 42.0,
            near: 0.1,
            far: 2000.0,
            pointer_gain: [55.0, 28.0, 25.0],
            // ~3.5% of the gap per 60 Hz frame
            smoothing: 2.14,
            max_step_fraction: 0.06,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    pub color: u32,
    pub size: f32,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub max_speed: f32,
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 180,
            color: 0xFFFFFF,
            size: 5.0,
            bounds_min: [-320.0, -10.0, -240.0],
            bounds_max: [320.0, 180.0, 240.0],
            max_speed: 6.0,
            seed: 0x5EED,
        }
    }
}

impl ParticleConfig {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            Vec3::from_array(self.bounds_min),
            Vec3::from_array(self.bounds_max),
        )
    }
}

/// The page-level particle overlay drawn above the 3D scene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub enabled: bool,
    pub count: usize,
    pub min_size: f32,
    pub max_size: f32,
    pub min_duration: f32,
    pub max_duration: f32,
    pub max_delay: f32,
    pub seed: u64,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 70,
            min_size: 2.0,
            max_size: 6.0,
            min_duration: 14.0,
            max_duration: 32.0,
            max_delay: 18.0,
            seed: 0x4E_7E_70,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub reduced_speed_scale: f32,
    pub reduced_float_scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            reduced_speed_scale: 0.35,
            reduced_float_scale: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub color: u32,
    pub density: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self {
            color: 0x030712,
            density: 0.0025,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub map: MapConfig,
    pub track: TrackConfig,
    pub stations: StationList,
    pub station_style: StationStyle,
    pub train: TrainConfig,
    pub arrival: ArrivalConfig,
    pub camera: CameraConfig,
    pub particles: ParticleConfig,
    pub hero: HeroConfig,
    pub motion: MotionConfig,
    pub fog: FogConfig,
    pub colors: Palette,
}

/// Station list wrapper so the default can carry the six landing-page stops
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationList(pub Vec<StationConfig>);

impl Default for StationList {
    fn default() -> Self {
        Self(default_stations())
    }
}

impl std::ops::Deref for StationList {
    type Target = [StationConfig];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl SceneConfig {
    /// Load a JSON override file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let mut config: SceneConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the builder cannot use and fold station `t`
    /// values into `[0, 1)`.
    pub fn validate(&mut self) -> Result<()> {
        if self.track.points.len() < 3 {
            return Err(SceneError::config(format!(
                "track needs at least 3 control points, got {}",
                self.track.points.len()
            )));
        }
        if self.track.points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(SceneError::config("track control points must be finite"));
        }
        if !(self.train.speed.is_finite() && self.train.speed >= 0.0) {
            return Err(SceneError::config("train speed must be a non-negative number"));
        }
        if !(self.track.support_spacing.is_finite() && self.track.support_spacing > 0.0) {
            return Err(SceneError::config("support spacing must be a positive number"));
        }

        for station in self.stations.0.iter_mut() {
            let folded = station.t.rem_euclid(1.0);
            if folded != station.t {
                log::warn!(
                    "station {:?} t={} folded into [0,1) as {}",
                    station.name,
                    station.t,
                    folded
                );
                station.t = folded;
            }
        }

        Ok(())
    }

    pub fn camera_base(&self) -> Vec3 {
        Vec3::from_array(self.camera.base_position)
    }

    pub fn camera_look_at(&self) -> Vec3 {
        Vec3::from_array(self.camera.look_at)
    }

    /// Baseline height shared by station pillars and glow discs
    pub fn station_baseline(&self) -> f32 {
        self.map.base_y + self.station_style.baseline_offset
    }
}
