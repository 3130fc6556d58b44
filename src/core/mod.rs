mod canvas;
mod clock;
mod display_context;
mod frame;
mod input;
mod layer;
mod presenter;
mod surface_presenter;
mod timer;

pub use canvas::{Canvas, DrawOp, Rgba};
pub use clock::{Clock, MAX_FRAME_DELTA};
pub use display_context::DisplayContext;
pub use frame::{FrameInfo, RenderedFrame, ScreenLabel};
pub use input::{reduced_motion_from_env, InputBridge, InputState, StageBounds, REDUCED_MOTION_ENV};
pub use layer::{composite_layers, Layer, LayerOutput};
pub use presenter::{FramePresenter, HeadlessHandle, HeadlessPresenter};
pub use surface_presenter::SurfacePresenter;
pub use timer::{Countdown, FpsMeter, Throttled};
