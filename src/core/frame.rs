/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub number: u64,
    /// Seconds since the loop started
    pub time: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Text pinned to a screen position, drawn by the presenter's overlay
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: [u8; 3],
    /// 0 hides the label, 1 is fully opaque
    pub emphasis: f32,
}

/// Composited frame handed to a presenter
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub info: FrameInfo,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
    pub labels: Vec<ScreenLabel>,
    /// Latest frame rate reading, 0 until the first interval closes
    pub fps: f32,
}

impl RenderedFrame {
    /// Pixel buffer as tightly packed RGBA bytes
    pub fn bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
