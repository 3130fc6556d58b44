use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the scene component.
///
/// None of these are fatal to the host application: mount failures leave the
/// scene unmounted, texture failures leave the map without imagery.
#[derive(Debug, Error)]
pub enum SceneError {
    /// No window/canvas to draw into
    #[error("scene host not found")]
    MissingHost,

    /// GPU surface, adapter or device could not be created
    #[error("3D rendering unavailable: {0}")]
    RendererUnavailable(String),

    /// Background map image could not be loaded or decoded
    #[error("failed to load map texture {path:?}: {reason}")]
    TextureLoad { path: PathBuf, reason: String },

    /// Scene configuration is unusable
    #[error("invalid scene configuration: {0}")]
    Config(String),

    /// Presenting a frame failed
    #[error("present failed: {0}")]
    Present(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SceneError {
    pub fn texture(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::TextureLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;
