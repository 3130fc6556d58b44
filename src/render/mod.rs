//! CPU rendering of the scene graph and the overlay layers

mod hero;
mod scene_renderer;

pub use hero::HeroParticleLayer;
pub use scene_renderer::{station_labels, SceneRenderer};
