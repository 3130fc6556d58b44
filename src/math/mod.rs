mod aabb;
mod color;
mod curve;

pub use aabb::Aabb;
pub use color::Color;
pub use curve::{CurveKind, TrackCurve};
