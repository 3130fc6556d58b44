use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use subway_scene::cli::Cli;
use subway_scene::core::{
    reduced_motion_from_env, FramePresenter, HeadlessPresenter, InputBridge, SurfacePresenter,
};
use subway_scene::scene::ImageFileSource;
use subway_scene::{RenderLoop, SceneConfig};

const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;
const HEADLESS_DELTA: f32 = 1.0 / 60.0;

struct App {
    config: SceneConfig,
    show_overlay: bool,
    reduced_motion: bool,
    window: Option<Arc<Window>>,
    scene: Option<RenderLoop>,
}

impl App {
    fn new(config: SceneConfig, show_overlay: bool, reduced_motion: bool) -> Self {
        Self {
            config,
            show_overlay,
            reduced_motion,
            window: None,
            scene: None,
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(scene) = self.scene.as_mut() {
            scene.dispose();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Subway Scene")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    INITIAL_WINDOW_WIDTH,
                    INITIAL_WINDOW_HEIGHT,
                )),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        // A missing GPU leaves the window up without a scene
        let presenter = match pollster::block_on(SurfacePresenter::new(window.clone(), self.show_overlay)) {
            Ok(presenter) => Some(Box::new(presenter) as Box<dyn FramePresenter>),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        };

        let size = window.inner_size();
        let input = InputBridge::new(size.width, size.height, self.reduced_motion);
        match RenderLoop::mount(&self.config, presenter, Arc::new(ImageFileSource), input) {
            Ok(scene) => self.scene = Some(scene),
            Err(e) => log::warn!("Scene not mounted: {e}"),
        }
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.shutdown(event_loop),
            WindowEvent::RedrawRequested => {
                if let Some(scene) = self.scene.as_mut() {
                    if let Err(e) = scene.frame() {
                        log::error!("Frame failed: {e}");
                    }
                }
            }
            other => {
                if let Some(scene) = self.scene.as_mut() {
                    scene.handle_event(&other);
                }
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn load_config(cli: &Cli) -> Result<SceneConfig> {
    let mut config = match &cli.config {
        Some(path) => SceneConfig::from_json_file(path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(image) = &cli.map_image {
        config.map.image = image.clone();
    }
    Ok(config)
}

fn run_headless(cli: &Cli, config: &SceneConfig, reduced_motion: bool) -> Result<()> {
    let presenter = HeadlessPresenter::new(cli.width, cli.height);
    let handle = presenter.handle();
    let mut scene = RenderLoop::mount(
        config,
        Some(Box::new(presenter)),
        Arc::new(ImageFileSource),
        InputBridge::new(cli.width, cli.height, reduced_motion),
    )?;

    for _ in 0..cli.frames {
        scene.advance(HEADLESS_DELTA)?;
    }
    let progress = scene.graph().train().map_or(0.0, |train| train.progress);
    scene.dispose();

    log::info!(
        "Rendered {} headless frames, train at {:.3} of the loop",
        handle.frames_presented(),
        progress
    );
    if let Some(path) = &cli.snapshot {
        handle.save_snapshot(path)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let reduced_motion = cli.reduced_motion || reduced_motion_from_env();
    if cli.headless {
        return run_headless(&cli, &config, reduced_motion);
    }

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, !cli.no_ui, reduced_motion);

    log::info!("Subway Scene - move the pointer to steer the camera, M toggles reduced motion, Escape quits");
    event_loop.run_app(&mut app)?;

    Ok(())
}
