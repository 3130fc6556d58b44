pub mod animation;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod math;
pub mod render;
pub mod render_loop;
pub mod scene;

pub use animation::{AnimationDriver, TickReport};
pub use config::SceneConfig;
pub use error::{Result, SceneError};
pub use render_loop::RenderLoop;
pub use scene::{SceneGraph, SceneGraphBuilder};
