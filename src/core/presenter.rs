use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use winit::event::WindowEvent;

use super::frame::RenderedFrame;
use crate::error::{Result, SceneError};

/// Takes composited frames to their destination (window surface, memory)
pub trait FramePresenter {
    /// Output size changed
    fn resize(&mut self, width: u32, height: u32);

    /// Show one frame
    fn present(&mut self, frame: &RenderedFrame) -> Result<()>;

    /// Offer a window event to the presenter's own UI; true if consumed
    fn on_window_event(&mut self, _event: &WindowEvent) -> bool {
        false
    }
}

#[derive(Debug, Default)]
struct Recording {
    presented: u64,
    resizes: u32,
    size: (u32, u32),
    last: Option<RenderedFrame>,
}

/// Presenter without a window: keeps the last frame in memory
#[derive(Debug, Clone)]
pub struct HeadlessPresenter {
    recording: Arc<Mutex<Recording>>,
}

/// Read side of a [`HeadlessPresenter`], still usable after the presenter was dropped
#[derive(Debug, Clone)]
pub struct HeadlessHandle {
    recording: Arc<Mutex<Recording>>,
}

impl HeadlessPresenter {
    pub fn new(width: u32, height: u32) -> Self {
        let recording = Recording {
            size: (width, height),
            ..Default::default()
        };
        Self {
            recording: Arc::new(Mutex::new(recording)),
        }
    }

    pub fn handle(&self) -> HeadlessHandle {
        HeadlessHandle {
            recording: Arc::clone(&self.recording),
        }
    }
}

fn lock(recording: &Mutex<Recording>) -> MutexGuard<'_, Recording> {
    // A panic while holding the lock cannot leave the counters half-written
    recording.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl FramePresenter for HeadlessPresenter {
    fn resize(&mut self, width: u32, height: u32) {
        let mut recording = lock(&self.recording);
        recording.size = (width, height);
        recording.resizes += 1;
    }

    fn present(&mut self, frame: &RenderedFrame) -> Result<()> {
        let expected = frame.width as usize * frame.height as usize;
        if frame.pixels.len() != expected {
            return Err(SceneError::Present(format!(
                "pixel buffer holds {} pixels, {}x{} needs {}",
                frame.pixels.len(),
                frame.width,
                frame.height,
                expected
            )));
        }

        let mut recording = lock(&self.recording);
        recording.presented += 1;
        recording.last = Some(frame.clone());
        Ok(())
    }
}

impl HeadlessHandle {
    pub fn frames_presented(&self) -> u64 {
        lock(&self.recording).presented
    }

    pub fn resizes(&self) -> u32 {
        lock(&self.recording).resizes
    }

    pub fn size(&self) -> (u32, u32) {
        lock(&self.recording).size
    }

    pub fn last_frame(&self) -> Option<RenderedFrame> {
        lock(&self.recording).last.clone()
    }

    /// Write the last presented frame as an image; format follows the extension
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        let recording = lock(&self.recording);
        let frame = recording
            .last
            .as_ref()
            .ok_or_else(|| SceneError::Present("no frame presented yet".into()))?;

        let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.bytes().to_vec())
            .ok_or_else(|| SceneError::Present("frame buffer does not match its size".into()))?;
        image
            .save(path)
            .map_err(|e| SceneError::Present(format!("{}: {e}", path.display())))?;

        log::info!("Snapshot written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::frame::FrameInfo;

    fn frame(width: u32, height: u32, pixels: usize) -> RenderedFrame {
        RenderedFrame {
            info: FrameInfo::new(0, 0.0, 0.016),
            width,
            height,
            pixels: vec![[9, 9, 9, 255]; pixels],
            labels: Vec::new(),
            fps: 0.0,
        }
    }

    #[test]
    fn records_presented_frames() {
        let mut presenter = HeadlessPresenter::new(2, 2);
        let handle = presenter.handle();

        presenter.present(&frame(2, 2, 4)).unwrap();
        presenter.present(&frame(2, 2, 4)).unwrap();

        assert_eq!(handle.frames_presented(), 2);
        assert_eq!(handle.last_frame().unwrap().pixels[0], [9, 9, 9, 255]);
    }

    #[test]
    fn rejects_short_buffer() {
        let mut presenter = HeadlessPresenter::new(2, 2);
        let err = presenter.present(&frame(2, 2, 3)).unwrap_err();
        assert!(matches!(err, SceneError::Present(_)));
        assert_eq!(presenter.handle().frames_presented(), 0);
    }

    #[test]
    fn handle_outlives_presenter() {
        let presenter = HeadlessPresenter::new(4, 3);
        let handle = presenter.handle();
        drop(presenter);
        assert_eq!(handle.size(), (4, 3));
    }

    #[test]
    fn snapshot_without_frames_fails() {
        let handle = HeadlessPresenter::new(1, 1).handle();
        assert!(handle.save_snapshot(Path::new("unused.png")).is_err());
    }
}
