use glam::Vec2;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::display_context::DisplayContext;

/// Environment variable consulted for the initial reduced-motion preference
pub const REDUCED_MOTION_ENV: &str = "PREFERS_REDUCED_MOTION";

/// Snapshot of everything the animation reads from the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputState {
    /// Normalised pointer target in [-1, 1]², y up
    pub pointer: Vec2,
    pub viewport: DisplayContext,
    pub reduced_motion: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            pointer: Vec2::ZERO,
            viewport: DisplayContext::default(),
            reduced_motion: false,
        }
    }
}

/// Rectangle of the window that pointer coordinates are normalised against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl StageBounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Stage covering the whole viewport
    pub fn full(viewport: &DisplayContext) -> Self {
        Self::new(0.0, 0.0, viewport.width as f32, viewport.height as f32)
    }

    /// Map window coordinates into [-1, 1]², y up; `None` for a degenerate stage
    pub fn normalize(&self, x: f32, y: f32) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 || !x.is_finite() || !y.is_finite() {
            return None;
        }
        let nx = (x - self.x) / self.width * 2.0 - 1.0;
        let ny = -((y - self.y) / self.height * 2.0 - 1.0);
        Some(Vec2::new(nx, ny).clamp(Vec2::NEG_ONE, Vec2::ONE))
    }
}

/// Translates window events and the reduced-motion preference into [`InputState`].
///
/// Writes are plain overwrites read by the next tick. Once detached every
/// call is ignored, so a disposed scene stops reacting even if the window
/// keeps forwarding events.
#[derive(Debug, Clone)]
pub struct InputBridge {
    state: InputState,
    stage: StageBounds,
    stage_pinned: bool,
    attached: bool,
}

impl InputBridge {
    pub fn new(width: u32, height: u32, reduced_motion: bool) -> Self {
        let viewport = DisplayContext::new(width, height);
        Self {
            state: InputState {
                pointer: Vec2::ZERO,
                viewport,
                reduced_motion,
            },
            stage: StageBounds::full(&viewport),
            stage_pinned: false,
            attached: true,
        }
    }

    /// Pin pointer normalisation to a sub-rectangle of the window
    pub fn with_stage(mut self, stage: StageBounds) -> Self {
        self.stage = stage;
        self.stage_pinned = true;
        self
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    pub fn stage(&self) -> StageBounds {
        self.stage
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Pointer moved to window coordinates (x, y)
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if !self.attached {
            return;
        }
        if let Some(pointer) = self.stage.normalize(x, y) {
            self.state.pointer = pointer;
        }
    }

    /// Pointer left the stage; the camera drifts back to centre
    pub fn pointer_left(&mut self) {
        if self.attached {
            self.state.pointer = Vec2::ZERO;
        }
    }

    /// Returns whether the viewport changed. Safe to call redundantly.
    pub fn resized(&mut self, width: u32, height: u32) -> bool {
        if !self.attached {
            return false;
        }
        let viewport = DisplayContext::new(width, height);
        if viewport == self.state.viewport {
            return false;
        }
        self.state.viewport = viewport;
        if !self.stage_pinned {
            self.stage = StageBounds::full(&viewport);
        }
        true
    }

    /// Returns whether the preference changed
    pub fn set_reduced_motion(&mut self, enabled: bool) -> bool {
        if !self.attached || self.state.reduced_motion == enabled {
            return false;
        }
        self.state.reduced_motion = enabled;
        log::info!("Reduced motion {}", if enabled { "on" } else { "off" });
        true
    }

    pub fn toggle_reduced_motion(&mut self) -> bool {
        let next = !self.state.reduced_motion;
        self.set_reduced_motion(next);
        self.state.reduced_motion
    }

    /// Feed a winit window event; returns true if it was consumed
    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        if !self.attached {
            return false;
        }
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer_moved(position.x as f32, position.y as f32);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_left();
                true
            }
            WindowEvent::Resized(size) => {
                self.resized(size.width, size.height);
                true
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyM) =>
            {
                self.toggle_reduced_motion();
                true
            }
            _ => false,
        }
    }

    /// Stop reacting to input; the pointer target is reset
    pub fn detach(&mut self) {
        self.state.pointer = Vec2::ZERO;
        self.attached = false;
    }
}

/// Reads [`REDUCED_MOTION_ENV`]: "1", "true", "yes" and "reduce" enable it
pub fn reduced_motion_from_env() -> bool {
    std::env::var(REDUCED_MOTION_ENV)
        .map(|value| parse_preference(&value))
        .unwrap_or(false)
}

fn parse_preference(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "reduce"
    )
}
