use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use futures::channel::oneshot;

use crate::error::{Result, SceneError};
use crate::math::Color;

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl TextureData {
    /// Average colour of each cell in a `cols` x `rows` grid, row-major from
    /// the top-left of the image
    pub fn downsample(&self, cols: u32, rows: u32) -> Vec<Color> {
        if self.width == 0 || self.height == 0 || self.pixels.len() < (self.width * self.height) as usize {
            return Vec::new();
        }
        let cols = cols.clamp(1, self.width.max(1));
        let rows = rows.clamp(1, self.height.max(1));
        let mut cells = Vec::with_capacity((cols * rows) as usize);

        for row in 0..rows {
            let y0 = row * self.height / rows;
            let y1 = ((row + 1) * self.height / rows).max(y0 + 1).min(self.height);
            for col in 0..cols {
                let x0 = col * self.width / cols;
                let x1 = ((col + 1) * self.width / cols).max(x0 + 1).min(self.width);

                let mut sum = [0u64; 3];
                let mut count = 0u64;
                for y in y0..y1 {
                    for x in x0..x1 {
                        let px = self.pixels[(y * self.width + x) as usize];
                        sum[0] += px[0] as u64;
                        sum[1] += px[1] as u64;
                        sum[2] += px[2] as u64;
                        count += 1;
                    }
                }
                let count = count.max(1);
                cells.push(Color::from_rgba8([
                    (sum[0] / count) as u8,
                    (sum[1] / count) as u8,
                    (sum[2] / count) as u8,
                    255,
                ]));
            }
        }
        cells
    }
}

/// Where map imagery comes from. Called on a background thread.
pub trait TextureSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<TextureData>;
}

/// Decodes image files from disk with the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileSource;

impl TextureSource for ImageFileSource {
    fn load(&self, path: &Path) -> Result<TextureData> {
        let image = image::open(path)
            .map_err(|e| SceneError::texture(path, e))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| p.0).collect();
        Ok(TextureData { width, height, pixels })
    }
}

/// Outcome of polling a [`TextureRequest`]
#[derive(Debug)]
pub enum TexturePoll {
    Pending,
    Ready(TextureData),
    Failed(SceneError),
}

/// One in-flight background image load.
/// The result arrives over a oneshot channel polled once per tick.
#[derive(Debug)]
pub struct TextureRequest {
    path: PathBuf,
    receiver: oneshot::Receiver<Result<TextureData>>,
}

impl TextureRequest {
    /// Start loading `path` on a new thread. Never blocks.
    pub fn spawn(source: Arc<dyn TextureSource>, path: PathBuf) -> Self {
        let (sender, receiver) = oneshot::channel();
        let thread_path = path.clone();

        let spawned = thread::Builder::new()
            .name("map-texture".into())
            .spawn(move || {
                let result = source.load(&thread_path);
                // Receiver gone means the scene was dropped first
                let _ = sender.send(result);
            });
        if let Err(e) = spawned {
            // The closure and its sender are dropped, so polling reports cancellation
            log::debug!("texture thread not started: {e}");
        }

        Self { path, receiver }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn poll(&mut self) -> TexturePoll {
        match self.receiver.try_recv() {
            Ok(None) => TexturePoll::Pending,
            Ok(Some(Ok(texture))) => TexturePoll::Ready(texture),
            Ok(Some(Err(e))) => TexturePoll::Failed(e),
            Err(oneshot::Canceled) => {
                TexturePoll::Failed(SceneError::texture(&self.path, "loader stopped before finishing"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    struct Solid;

    impl TextureSource for Solid {
        fn load(&self, _path: &Path) -> Result<TextureData> {
            Ok(TextureData {
                width: 2,
                height: 2,
                pixels: vec![[200, 100, 0, 255]; 4],
            })
        }
    }

    struct Panicking;

    impl TextureSource for Panicking {
        fn load(&self, _path: &Path) -> Result<TextureData> {
            panic!("decoder blew up")
        }
    }

    fn wait(request: &mut TextureRequest) -> TexturePoll {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match request.poll() {
                TexturePoll::Pending if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(2))
                }
                other => return other,
            }
        }
    }

    #[test]
    fn delivers_loaded_texture() {
        let mut request = TextureRequest::spawn(Arc::new(Solid), "solid.png".into());
        match wait(&mut request) {
            TexturePoll::Ready(texture) => assert_eq!(texture.width, 2),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_file_fails() {
        let mut request = TextureRequest::spawn(
            Arc::new(ImageFileSource),
            "definitely/not/here.jpg".into(),
        );
        assert!(matches!(
            wait(&mut request),
            TexturePoll::Failed(SceneError::TextureLoad { .. })
        ));
    }

    #[test]
    fn loader_panic_reports_failure() {
        let mut request = TextureRequest::spawn(Arc::new(Panicking), "x.png".into());
        assert!(matches!(wait(&mut request), TexturePoll::Failed(_)));
    }

    #[test]
    fn downsample_averages_cells() {
        let texture = TextureData {
            width: 4,
            height: 2,
            pixels: vec![
                [0, 0, 0, 255], [255, 255, 255, 255], [10, 10, 10, 255], [10, 10, 10, 255],
                [0, 0, 0, 255], [255, 255, 255, 255], [10, 10, 10, 255], [10, 10, 10, 255],
            ],
        };
        let cells = texture.downsample(2, 1);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].to_rgba8(1.0)[0], 127);
        assert_eq!(cells[1].to_rgba8(1.0)[0], 10);
    }
}
