use std::sync::Arc;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::entities::{
    MapGroup, ParticleField, SparkBurst, StationEntity, Support, Trail, TrackTube, TrainEntity,
};
use super::lighting::{Fog, LightRig};
use super::texture::{ImageFileSource, TextureRequest, TextureSource};
use super::{Animatable, SceneGraph};
use crate::camera::SmoothCamera;
use crate::config::SceneConfig;
use crate::math::{Color, TrackCurve};

/// Samples in the rail glow line loop
const RAIL_GLOW_SAMPLES: usize = 400;

/// Until the first tick reports the real viewport
const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Builds a [`SceneGraph`] once from an immutable configuration.
///
/// `build` never fails and never blocks: the map image is requested on a
/// background thread and attached later by [`SceneGraph::poll_texture`].
pub struct SceneGraphBuilder<'a> {
    config: &'a SceneConfig,
    textures: Arc<dyn TextureSource>,
}

impl<'a> SceneGraphBuilder<'a> {
    pub fn new(config: &'a SceneConfig) -> Self {
        Self {
            config,
            textures: Arc::new(ImageFileSource),
        }
    }

    pub fn with_texture_source(mut self, textures: Arc<dyn TextureSource>) -> Self {
        self.textures = textures;
        self
    }

    pub fn build(self) -> SceneGraph {
        let config = self.config;

        let track = TrackCurve::new(config.track.control_points(), config.track.curve);
        if track.is_none() {
            log::warn!("track curve unavailable, train and stations stay parked");
        }

        let mut entities = Vec::with_capacity(config.stations.len() + 5);
        entities.push(Animatable::MapGroup(self.build_map()));

        for (index, station) in config.stations.iter().enumerate() {
            entities.push(Animatable::Station(self.build_station(index, track.as_ref(), station)));
        }

        let train = self.build_train(track.as_ref());
        entities.push(Animatable::Trail(Trail::new(
            train.position,
            config.train.trail_length,
            config.train.trail_spacing,
        )));
        entities.push(Animatable::Train(train));

        let particles = &config.particles;
        let mut rng = StdRng::seed_from_u64(particles.seed);
        entities.push(Animatable::Particles(ParticleField::scatter(
            particles.count,
            particles.bounds(),
            particles.max_speed,
            Color::from_hex(particles.color),
            particles.size,
            &mut rng,
        )));

        let arrival = &config.arrival;
        entities.push(Animatable::Sparks(SparkBurst::new(
            arrival.burst_sparks,
            arrival.burst_speed,
            arrival.burst_lifetime,
            StdRng::seed_from_u64(particles.seed.wrapping_add(1)),
        )));

        let tube = track.as_ref().map(|curve| self.build_tube(curve));
        let texture = self.request_texture();

        log::info!(
            "Scene built: {} stations, {} particles, track length {:.0}",
            config.stations.len(),
            particles.count,
            track.as_ref().map_or(0.0, TrackCurve::length)
        );

        SceneGraph {
            track,
            tube,
            camera: SmoothCamera::new(&config.camera, DEFAULT_ASPECT),
            lights: LightRig::default(),
            fog: Fog::from_config(&config.fog),
            entities,
            texture,
        }
    }

    fn build_map(&self) -> MapGroup {
        let map = &self.config.map;
        MapGroup {
            base_y: map.base_y,
            y: map.base_y,
            tilt: 0.0,
            width: map.width,
            depth: map.depth,
            base_color: Color::from_hex(map.base_color),
            grid_size: map.grid_size,
            grid_divisions: map.grid_divisions,
            texture_cells: map.texture_cells,
            image: None,
            track_emissive: self.config.track.emissive_intensity,
            rail_glow_opacity: 0.35,
        }
    }

    fn build_station(
        &self,
        index: usize,
        track: Option<&TrackCurve>,
        station: &crate::config::StationConfig,
    ) -> StationEntity {
        let style = &self.config.station_style;
        let baseline = self.config.station_baseline();

        let point = track.map_or(Vec3::ZERO, |curve| curve.point_at(station.t));
        let pillar_height = (point.y - baseline).max(style.pillar_min_height);
        let light_base = point + Vec3::Y * style.light_elevation;

        StationEntity {
            index,
            name: station.name.clone(),
            color_id: station.color,
            color: self.config.colors.color(station.color),
            t: station.t,
            track_point: point,
            marker: point + Vec3::Y * style.marker_elevation,
            marker_radius: style.marker_radius,
            marker_scale: 1.0,
            pillar_base: Vec3::new(point.x, baseline, point.z),
            pillar_height,
            glow_radius: style.glow_radius,
            light_base,
            light_position: light_base,
            light_intensity: style.light_base_intensity,
            pulse: 0.0,
            inside: false,
        }
    }

    fn build_train(&self, track: Option<&TrackCurve>) -> TrainEntity {
        let train = &self.config.train;
        let (position, facing) = match track {
            Some(curve) => {
                let start = curve.point_at(0.0);
                (start, curve.point_at(train.initial_facing) - start)
            }
            None => (Vec3::ZERO, Vec3::Z),
        };
        TrainEntity::new(
            position,
            facing,
            Color::from_hex(train.body_color),
            Color::from_hex(train.window_color),
            Color::from_hex(train.headlight_color),
        )
    }

    fn build_tube(&self, curve: &TrackCurve) -> TrackTube {
        let track = &self.config.track;
        let baseline = self.config.map.base_y + 4.0;

        let segments = track.tubular_segments.max(3);
        let spacing = track.support_spacing;
        // Never more supports than tube segments
        let count = if spacing > 0.0 {
            ((1.0 / spacing).ceil() as usize).clamp(1, segments)
        } else {
            0
        };
        let supports = (0..count)
            .map(|i| {
                let p = curve.point_at(i as f32 * spacing);
                let height = (p.y - baseline).max(track.support_min_height);
                Support {
                    base: Vec3::new(p.x, baseline, p.z),
                    top: Vec3::new(p.x, baseline + height, p.z),
                }
            })
            .collect();

        TrackTube {
            samples: curve.spaced_points(segments),
            glow_samples: curve.spaced_points(RAIL_GLOW_SAMPLES),
            radius: track.tube_radius,
            color: Color::from_hex(track.color),
            emissive: Color::from_hex(track.emissive),
            glow_color: Color::from_hex(track.glow_color),
            supports,
        }
    }

    fn request_texture(&self) -> Option<TextureRequest> {
        let path = &self.config.map.image;
        if path.as_os_str().is_empty() {
            log::debug!("no map image configured");
            return None;
        }
        Some(TextureRequest::spawn(Arc::clone(&self.textures), path.clone()))
    }
}
