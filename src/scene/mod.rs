//! The renderable world: track, map, stations, train, particles and lights.
//!
//! Per-frame state lives in a flat list of [`Animatable`] entities that the
//! animation driver matches on explicitly.

mod builder;
mod entities;
mod lighting;
mod texture;

pub use builder::SceneGraphBuilder;
pub use entities::{
    ImagePlane, MapGroup, ParticleField, Spark, SparkBurst, StationEntity, Support, Trail, TrackTube,
    TrainEntity, SPARK_GRAVITY,
};
pub use lighting::{DirectionalLight, Fog, LightRig, PointLight};
pub use texture::{ImageFileSource, TextureData, TexturePoll, TextureRequest, TextureSource};

use crate::camera::SmoothCamera;
use crate::math::TrackCurve;

/// Everything the driver animates, tagged by role
#[derive(Debug, Clone)]
pub enum Animatable {
    Station(StationEntity),
    Train(TrainEntity),
    MapGroup(MapGroup),
    Particles(ParticleField),
    Trail(Trail),
    Sparks(SparkBurst),
}

/// Where the background map image stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureStatus {
    /// No load was started
    Idle,
    Pending,
    /// Image plane added to the map this poll
    Attached,
    /// Load failed; the map stays without imagery
    Failed,
}

#[derive(Debug)]
pub struct SceneGraph {
    /// `None` when the track could not be built; dependent updates are skipped
    pub track: Option<TrackCurve>,
    pub tube: Option<TrackTube>,
    pub camera: SmoothCamera,
    pub lights: LightRig,
    pub fog: Fog,
    pub entities: Vec<Animatable>,
    texture: Option<TextureRequest>,
}

impl SceneGraph {
    pub fn train(&self) -> Option<&TrainEntity> {
        self.entities.iter().find_map(|e| match e {
            Animatable::Train(train) => Some(train),
            _ => None,
        })
    }

    pub fn train_mut(&mut self) -> Option<&mut TrainEntity> {
        self.entities.iter_mut().find_map(|e| match e {
            Animatable::Train(train) => Some(train),
            _ => None,
        })
    }

    pub fn stations(&self) -> impl Iterator<Item = &StationEntity> {
        self.entities.iter().filter_map(|e| match e {
            Animatable::Station(station) => Some(station),
            _ => None,
        })
    }

    pub fn station(&self, index: usize) -> Option<&StationEntity> {
        self.stations().find(|s| s.index == index)
    }

    pub fn map(&self) -> Option<&MapGroup> {
        self.entities.iter().find_map(|e| match e {
            Animatable::MapGroup(map) => Some(map),
            _ => None,
        })
    }

    pub fn map_mut(&mut self) -> Option<&mut MapGroup> {
        self.entities.iter_mut().find_map(|e| match e {
            Animatable::MapGroup(map) => Some(map),
            _ => None,
        })
    }

    pub fn particles(&self) -> Option<&ParticleField> {
        self.entities.iter().find_map(|e| match e {
            Animatable::Particles(field) => Some(field),
            _ => None,
        })
    }

    pub fn trail(&self) -> Option<&Trail> {
        self.entities.iter().find_map(|e| match e {
            Animatable::Trail(trail) => Some(trail),
            _ => None,
        })
    }

    pub fn sparks(&self) -> Option<&SparkBurst> {
        self.entities.iter().find_map(|e| match e {
            Animatable::Sparks(sparks) => Some(sparks),
            _ => None,
        })
    }

    pub fn sparks_mut(&mut self) -> Option<&mut SparkBurst> {
        self.entities.iter_mut().find_map(|e| match e {
            Animatable::Sparks(sparks) => Some(sparks),
            _ => None,
        })
    }

    pub fn texture_pending(&self) -> bool {
        self.texture.is_some()
    }

    /// Check the background image load; attaches the image plane once it lands.
    /// A failure is logged here and never surfaces as an error.
    pub fn poll_texture(&mut self) -> TextureStatus {
        let Some(request) = self.texture.as_mut() else {
            return TextureStatus::Idle;
        };

        match request.poll() {
            TexturePoll::Pending => TextureStatus::Pending,
            TexturePoll::Ready(texture) => {
                let path = request.path().to_path_buf();
                self.texture = None;
                match self.map_mut() {
                    Some(map) => {
                        map.attach_image(&texture);
                        log::info!(
                            "Map texture attached: {} ({}x{})",
                            path.display(),
                            texture.width,
                            texture.height
                        );
                        TextureStatus::Attached
                    }
                    None => TextureStatus::Failed,
                }
            }
            TexturePoll::Failed(e) => {
                self.texture = None;
                log::error!("{e}");
                TextureStatus::Failed
            }
        }
    }
}
