use std::sync::Arc;

use winit::event::WindowEvent;

use crate::animation::{AnimationDriver, TickReport};
use crate::config::{HeroConfig, Palette, SceneConfig};
use crate::core::{
    composite_layers, Clock, FpsMeter, FrameInfo, FramePresenter, InputBridge, InputState, Layer,
    RenderedFrame, MAX_FRAME_DELTA,
};
use crate::error::{Result, SceneError};
use crate::render::{station_labels, HeroParticleLayer, SceneRenderer};
use crate::scene::{SceneGraph, SceneGraphBuilder, TextureSource};

const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Owns the mounted scene and drives it one frame at a time.
///
/// Lifecycle: [`RenderLoop::mount`] builds everything, [`RenderLoop::frame`]
/// is called per redraw, [`RenderLoop::dispose`] (or drop) tears down. After
/// disposal frames are no-ops and input is ignored.
pub struct RenderLoop {
    graph: SceneGraph,
    driver: AnimationDriver,
    renderer: SceneRenderer,
    hero: Option<HeroParticleLayer>,
    hero_config: HeroConfig,
    palette: Palette,
    input: InputBridge,
    presenter: Option<Box<dyn FramePresenter>>,
    presented_size: (u32, u32),
    clock: Clock,
    fps: FpsMeter,
    elapsed: f32,
    frames: u64,
    last_report: TickReport,
    disposed: bool,
}

impl RenderLoop {
    /// Build the scene and attach it to `presenter`.
    ///
    /// Without a presenter there is nothing to draw into and the scene is not
    /// mounted.
    pub fn mount(
        config: &SceneConfig,
        presenter: Option<Box<dyn FramePresenter>>,
        textures: Arc<dyn TextureSource>,
        input: InputBridge,
    ) -> Result<Self> {
        let presenter = presenter.ok_or(SceneError::MissingHost)?;

        let graph = SceneGraphBuilder::new(config)
            .with_texture_source(textures)
            .build();
        let reduced = input.state().reduced_motion;
        let hero = (config.hero.enabled && !reduced)
            .then(|| HeroParticleLayer::new(&config.hero, &config.colors));
        let viewport = input.state().viewport;

        log::info!(
            "Scene mounted at {}x{} (reduced motion: {reduced})",
            viewport.width,
            viewport.height
        );

        Ok(Self {
            graph,
            driver: AnimationDriver::new(config),
            renderer: SceneRenderer::new(),
            hero,
            hero_config: config.hero.clone(),
            palette: config.colors.clone(),
            input,
            presenter: Some(presenter),
            presented_size: (viewport.width, viewport.height),
            clock: Clock::new(),
            fps: FpsMeter::new(FPS_UPDATE_INTERVAL),
            elapsed: 0.0,
            frames: 0,
            last_report: TickReport::default(),
            disposed: false,
        })
    }

    /// Offer a window event: the presenter's UI first, then the input bridge
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        if self.disposed {
            return false;
        }
        if let Some(presenter) = self.presenter.as_mut() {
            if presenter.on_window_event(event) {
                return true;
            }
        }
        self.input.process_event(event)
    }

    /// Advance by wall-clock time since the previous frame
    pub fn frame(&mut self) -> Result<bool> {
        if self.disposed {
            return Ok(false);
        }
        let info = self.clock.tick();
        self.advance(info.delta)
    }

    /// Run one frame with an explicit delta in seconds.
    ///
    /// Returns `Ok(false)` once disposed. Present failures are returned after
    /// the scene state has advanced.
    pub fn advance(&mut self, delta: f32) -> Result<bool> {
        if self.disposed {
            return Ok(false);
        }
        let delta = if delta.is_finite() {
            delta.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };
        self.elapsed += delta;

        self.graph.poll_texture();

        let input = *self.input.state();
        self.sync_hero(&input);
        self.last_report = self.driver.tick(&mut self.graph, &input, delta, self.elapsed);

        let viewport = input.viewport;
        let size = (viewport.width, viewport.height);
        if size != self.presented_size {
            if let Some(presenter) = self.presenter.as_mut() {
                presenter.resize(size.0, size.1);
            }
            self.presented_size = size;
        }

        let mut pixels = self.renderer.render(&self.graph, &viewport).pixels;
        if let Some(hero) = self.hero.as_mut() {
            hero.update(delta, &input);
            let mut layers: [&mut dyn Layer; 1] = [hero];
            composite_layers(&mut pixels, &mut layers, &viewport);
        }

        if let Some(fps) = self.fps.frame(delta) {
            log::debug!("{fps:.0} fps");
        }
        let frame = RenderedFrame {
            info: FrameInfo::new(self.frames, self.elapsed, delta),
            width: viewport.width,
            height: viewport.height,
            pixels,
            labels: station_labels(&self.graph, &viewport, self.driver.last_arrived()),
            fps: self.fps.fps(),
        };
        self.frames += 1;

        if let Some(presenter) = self.presenter.as_mut() {
            presenter.present(&frame)?;
        }
        Ok(true)
    }

    /// Drop the hero layer while motion is reduced, rebuild it when it returns
    fn sync_hero(&mut self, input: &InputState) {
        match (self.hero.is_some(), input.reduced_motion) {
            (true, true) => {
                log::debug!("hero particles disabled");
                self.hero = None;
            }
            (false, false) if self.hero_config.enabled => {
                log::debug!("hero particles re-created");
                self.hero = Some(HeroParticleLayer::new(&self.hero_config, &self.palette));
            }
            _ => {}
        }
    }

    /// Stop the loop, release the presenter and detach input. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.presenter = None;
        self.hero = None;
        self.input.detach();
        log::info!("Scene disposed after {} frames", self.frames);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn input(&self) -> &InputBridge {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputBridge {
        &mut self.input
    }

    pub fn hero(&self) -> Option<&HeroParticleLayer> {
        self.hero.as_ref()
    }

    /// Report from the most recent tick
    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    /// Animation time in seconds, the sum of all clamped deltas
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.dispose();
    }
}
