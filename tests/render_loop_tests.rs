use std::sync::Arc;

use subway_scene::core::{FramePresenter, HeadlessPresenter, InputBridge, RenderedFrame};
use subway_scene::error::{Result, SceneError};
use subway_scene::scene::ImageFileSource;
use subway_scene::{RenderLoop, SceneConfig};

fn offline_config() -> SceneConfig {
    let mut config = SceneConfig::default();
    config.map.image = Default::default();
    config
}

fn mount(presenter: Option<Box<dyn FramePresenter>>) -> Result<RenderLoop> {
    RenderLoop::mount(
        &offline_config(),
        presenter,
        Arc::new(ImageFileSource),
        InputBridge::new(80, 45, false),
    )
}

struct BrokenPresenter;

impl FramePresenter for BrokenPresenter {
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn present(&mut self, _frame: &RenderedFrame) -> Result<()> {
        Err(SceneError::Present("surface lost".into()))
    }
}

#[test]
fn missing_host_is_not_mounted() {
    let err = mount(None).err().unwrap();
    assert!(matches!(err, SceneError::MissingHost));
}

#[test]
fn frames_after_dispose_do_nothing() {
    let presenter = HeadlessPresenter::new(80, 45);
    let handle = presenter.handle();
    let mut scene = mount(Some(Box::new(presenter))).unwrap();

    for _ in 0..5 {
        assert!(scene.advance(0.05).unwrap());
    }
    let progress = scene.graph().train().unwrap().progress;
    let elapsed = scene.elapsed();

    scene.dispose();
    assert!(scene.is_disposed());
    assert!(!scene.advance(0.05).unwrap());
    assert!(!scene.frame().unwrap());

    assert_eq!(scene.graph().train().unwrap().progress, progress);
    assert_eq!(scene.elapsed(), elapsed);
    assert_eq!(scene.frames(), 5);
    assert_eq!(handle.frames_presented(), 5);

    // Second dispose is a no-op
    scene.dispose();
    assert!(scene.is_disposed());
}

#[test]
fn dispose_detaches_input() {
    let mut scene = mount(Some(Box::new(HeadlessPresenter::new(80, 45)))).unwrap();
    scene.input_mut().pointer_moved(80.0, 0.0);
    assert_ne!(scene.input().state().pointer, glam::Vec2::ZERO);

    scene.dispose();
    assert!(!scene.input().is_attached());
    assert_eq!(scene.input().state().pointer, glam::Vec2::ZERO);
    scene.input_mut().pointer_moved(0.0, 0.0);
    assert_eq!(scene.input().state().pointer, glam::Vec2::ZERO);
}

#[test]
fn dropping_releases_the_presenter() {
    let presenter = HeadlessPresenter::new(80, 45);
    let handle = presenter.handle();
    {
        let mut scene = mount(Some(Box::new(presenter))).unwrap();
        scene.advance(0.016).unwrap();
    }
    // The handle outlives the loop and still sees what was presented
    assert_eq!(handle.frames_presented(), 1);
    assert!(handle.last_frame().is_some());
}

#[test]
fn present_failure_is_reported_but_state_advances() {
    let mut scene = mount(Some(Box::new(BrokenPresenter))).unwrap();
    let err = scene.advance(0.05).unwrap_err();
    assert!(matches!(err, SceneError::Present(_)));
    assert!(scene.graph().train().unwrap().progress > 0.0);

    // The loop keeps going on the next frame
    assert!(scene.advance(0.05).is_err());
    assert_eq!(scene.frames(), 2);
}

#[test]
fn frame_carries_station_labels() {
    let presenter = HeadlessPresenter::new(320, 180);
    let handle = presenter.handle();
    let mut scene = RenderLoop::mount(
        &offline_config(),
        Some(Box::new(presenter)),
        Arc::new(ImageFileSource),
        InputBridge::new(320, 180, false),
    )
    .unwrap();
    scene.advance(0.016).unwrap();

    let frame = handle.last_frame().unwrap();
    assert!(!frame.labels.is_empty());
    assert!(frame.labels.len() <= 6);
    assert_eq!(frame.pixels.len(), 320 * 180);
}
