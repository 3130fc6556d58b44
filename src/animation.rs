use glam::Vec3;

use crate::config::{ArrivalConfig, MapConfig, MotionConfig, SceneConfig, StationStyle, TrainConfig};
use crate::core::{Countdown, InputState};
use crate::scene::{Animatable, SceneGraph};

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Station indices the train entered this tick
    pub arrivals: Vec<usize>,
    /// Train progress after the tick, if there is a train on a track
    pub progress: Option<f32>,
}

/// Per-frame animation: train travel, arrivals, station pulses, map float,
/// particles, trail, sparks and camera easing.
///
/// Pure state mutation; the only side effect is `log::debug!` on arrivals.
#[derive(Debug, Clone)]
pub struct AnimationDriver {
    train: TrainConfig,
    arrival: ArrivalConfig,
    style: StationStyle,
    map: MapConfig,
    motion: MotionConfig,
    last_arrived: Option<usize>,
    clear_last: Countdown,
}

impl AnimationDriver {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            train: config.train.clone(),
            arrival: config.arrival.clone(),
            style: config.station_style.clone(),
            map: config.map.clone(),
            motion: config.motion.clone(),
            last_arrived: None,
            clear_last: Countdown::new(config.arrival.clear_delay),
        }
    }

    /// Train speed in loops per second under the current preference
    pub fn effective_speed(&self, input: &InputState) -> f32 {
        if input.reduced_motion {
            self.train.speed * self.motion.reduced_speed_scale
        } else {
            self.train.speed
        }
    }

    /// Multiplier on float and bob amplitudes
    pub fn float_scale(&self, input: &InputState) -> f32 {
        if input.reduced_motion {
            self.motion.reduced_float_scale
        } else {
            1.0
        }
    }

    /// Most recent arrival, cleared a short while after it happened
    pub fn last_arrived(&self) -> Option<usize> {
        self.last_arrived
    }

    pub fn tick(&mut self, graph: &mut SceneGraph, input: &InputState, delta: f32, elapsed: f32) -> TickReport {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let speed = self.effective_speed(input);
        let float_scale = self.float_scale(input);

        let SceneGraph {
            track,
            camera,
            entities,
            ..
        } = graph;

        let mut report = TickReport::default();

        // Train first so everything else sees this tick's position
        let mut train_position = None;
        if let Some(curve) = track.as_ref() {
            for entity in entities.iter_mut() {
                if let Animatable::Train(train) = entity {
                    train.progress = wrap_unit(train.progress + speed * delta);
                    let on_track = curve.point_at(train.progress);
                    let ahead = curve.point_at(train.progress + self.train.heading_epsilon);
                    train.orient(ahead - on_track);

                    let bob = (elapsed * self.train.bob_frequency).sin() * self.train.bob_amplitude * float_scale;
                    train.position = on_track + Vec3::Y * bob;
                    for (i, light) in train.headlights.iter_mut().enumerate() {
                        *light = 1.6 + (elapsed * 12.0 + i as f32).sin() * 0.2;
                    }

                    train_position = Some(train.position);
                    report.progress = Some(train.progress);
                }
            }
        }

        for entity in entities.iter_mut() {
            match entity {
                Animatable::Train(_) => {}
                Animatable::Station(station) => {
                    let Some(train_at) = train_position else {
                        continue;
                    };
                    let i = station.index as f32;

                    let level = Vec3::new(station.track_point.x, train_at.y, station.track_point.z);
                    let inside = train_at.distance(level) < self.arrival.threshold;
                    let entered = inside && !station.inside;
                    station.inside = inside;

                    station.pulse = (station.pulse - self.arrival.pulse_decay * delta).max(0.0);
                    if entered {
                        station.pulse = 1.0;
                        report.arrivals.push(station.index);
                    }

                    station.marker_scale = 1.0 + station.pulse * self.arrival.marker_scale_gain;
                    station.light_intensity = self.style.light_base_intensity
                        + (elapsed * 1.8 + i).sin() * self.style.light_wave
                        + station.pulse * self.arrival.light_gain;
                    station.light_position =
                        station.light_base + Vec3::Y * ((elapsed * 2.0 + i).sin() * self.style.light_bob);
                }
                Animatable::MapGroup(map) => {
                    map.y = self.map.base_y
                        + (elapsed * self.map.float_frequency).sin() * self.map.float_amplitude * float_scale;
                    map.tilt =
                        (elapsed * self.map.tilt_frequency).sin() * self.map.tilt_amplitude * float_scale;
                    map.track_emissive = 0.55 + (elapsed * 1.5).sin() * 0.12;
                    map.rail_glow_opacity = 0.25 + (elapsed * 2.0).sin() * 0.08;
                }
                Animatable::Particles(field) => field.step(delta),
                Animatable::Trail(trail) => {
                    if let Some(train_at) = train_position {
                        trail.record(train_at);
                    }
                }
                Animatable::Sparks(sparks) => sparks.step(delta),
            }
        }

        if self.clear_last.tick(delta) {
            self.last_arrived = None;
        }
        if let Some(&index) = report.arrivals.last() {
            self.arrive(entities, index);
        }

        camera.set_aspect(input.viewport.aspect());
        camera.set_pointer(input.pointer);
        camera.ease(delta);

        report
    }

    fn arrive(&mut self, entities: &mut [Animatable], index: usize) {
        let station = entities.iter().find_map(|e| match e {
            Animatable::Station(s) if s.index == index => Some((s.marker, s.color, s.name.clone())),
            _ => None,
        });
        let Some((origin, color, name)) = station else {
            return;
        };

        log::debug!("Train arrived at {name}");
        for entity in entities.iter_mut() {
            if let Animatable::Sparks(sparks) = entity {
                sparks.emit(origin, color);
            }
        }
        self.last_arrived = Some(index);
        self.clear_last.start();
    }
}

/// `x mod 1` folded into [0, 1). `rem_euclid` can round up to exactly 1.0
/// for tiny negative inputs.
fn wrap_unit(x: f32) -> f32 {
    let wrapped = x.rem_euclid(1.0);
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_unit_stays_half_open() {
        assert_eq!(wrap_unit(1.0), 0.0);
        assert_eq!(wrap_unit(2.25), 0.25);
        assert!(wrap_unit(-1e-9) < 1.0);
        assert_eq!(wrap_unit(-0.25), 0.75);
    }

    #[test]
    fn reduced_motion_scales() {
        let driver = AnimationDriver::new(&SceneConfig::default());
        let mut input = InputState::default();
        assert_eq!(driver.effective_speed(&input), 0.025);
        assert_eq!(driver.float_scale(&input), 1.0);

        input.reduced_motion = true;
        assert!((driver.effective_speed(&input) - 0.025 * 0.35).abs() < 1e-7);
        assert_eq!(driver.float_scale(&input), 0.4);
    }
}
