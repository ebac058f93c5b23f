use std::rc::Rc;

use crate::assets::{AssetLoader, AssetSource, DataTable};
use crate::camera::OrbitControls;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::frame::{FrameClock, FrameInfo};
use crate::input::SceneEvent;
use crate::scene::{ActiveScene, Gallery, Stage};
use crate::viewport::Viewport;

/// Runs one scene at a time: activation, asset delivery, frames and input
pub struct Host {
    stage: Stage,
    loader: AssetLoader,
    data: DataTable,
    gallery: Gallery,
    active: Option<Box<dyn ActiveScene>>,
    clock: FrameClock,
    orbit: OrbitControls,
    data_override: Option<String>,
}

impl Host {
    pub fn new(source: Rc<dyn AssetSource>, viewport: Viewport) -> Self {
        Self {
            stage: Stage::new(viewport),
            loader: AssetLoader::new(source),
            data: DataTable::default(),
            gallery: Gallery::default(),
            active: None,
            clock: FrameClock::new(),
            orbit: OrbitControls::new(),
            data_override: None,
        }
    }

    pub fn with_gallery(mut self, gallery: Gallery) -> Self {
        self.gallery = gallery;
        self
    }

    pub fn with_data_table(mut self, data: DataTable) -> Self {
        self.data = data;
        self
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn data_table_mut(&mut self) -> &mut DataTable {
        &mut self.data
    }

    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref().map(|scene| scene.name())
    }

    pub fn active_config(&self) -> Option<&SceneConfig> {
        self.active.as_deref().map(|scene| scene.config())
    }

    /// Whether the active scene asked for a frame-rate readout
    pub fn stats_enabled(&self) -> bool {
        self.active_config().is_some_and(|config| config.stats_enabled)
    }

    pub fn pending_loads(&self) -> usize {
        self.active.as_deref().map_or(0, |scene| scene.pending_loads())
    }

    /// Data source id used in place of every draw function's own id
    pub fn set_data_override(&mut self, id: Option<String>) {
        self.data_override = id;
    }

    /// Tears down the current scene and draws `name` from scratch.
    /// The current scene survives an unknown name, config or data source; a
    /// draw failure leaves the host with no active scene.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let mut scene = self.gallery.create(name)?;
        scene.config().validate()?;
        scene.check_data_sources(&self.data, self.data_override.as_deref())?;
        self.teardown();

        log::info!("activating scene '{}'", name);
        self.stage.reset(scene.config())?;
        if let Err(e) = scene.draw(
            &mut self.stage,
            &mut self.loader,
            &self.data,
            self.data_override.as_deref(),
        ) {
            log::error!("scene '{}' failed to draw: {}", name, e);
            self.teardown();
            return Err(e);
        }
        self.clock.reset();
        self.active = Some(scene);
        Ok(())
    }

    /// Re-runs the active scene's draw functions on a clean stage
    pub fn redraw(&mut self) -> Result<()> {
        let Some(scene) = self.active.as_mut() else {
            log::warn!("redraw requested with no active scene");
            return Ok(());
        };
        self.loader.invalidate();
        self.stage.reset(scene.config())?;
        scene.reset();
        let drawn = scene.draw(
            &mut self.stage,
            &mut self.loader,
            &self.data,
            self.data_override.as_deref(),
        );
        if let Err(e) = drawn {
            log::error!("redraw failed: {}", e);
            self.teardown();
            return Err(e);
        }
        self.clock.reset();
        Ok(())
    }

    /// Drops the active scene; its outstanding loads become stale
    pub fn teardown(&mut self) {
        if let Some(scene) = self.active.take() {
            log::info!("tearing down scene '{}'", scene.name());
        }
        self.loader.invalidate();
        if let Err(e) = self.stage.reset(&SceneConfig::default()) {
            log::error!("failed to reset stage: {}", e);
        }
        self.orbit = OrbitControls::new();
    }

    /// Delivers finished loads, then runs the animation callback
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameInfo {
        let generation = self.loader.generation();
        for completion in self.loader.poll() {
            if completion.ticket.generation != generation {
                log::debug!("discarding stale load of '{}'", completion.path);
                continue;
            }
            match self.active.as_mut() {
                Some(scene) => {
                    if !scene.deliver(completion, &mut self.stage) {
                        log::debug!("load finished with no waiting callback");
                    }
                }
                None => log::debug!("load of '{}' finished with no scene", completion.path),
            }
        }

        let frame = self.clock.tick(timestamp_ms);
        if let Some(scene) = self.active.as_mut() {
            scene.animate(&frame, &mut self.stage);
        }
        frame
    }

    /// Routes input: resize and camera controls first, then the scene's handler.
    /// Returns whether the scene handled the event.
    pub fn dispatch(&mut self, event: SceneEvent) -> bool {
        let event = match event {
            SceneEvent::Resize { width, height } => {
                self.stage.resize(width, height);
                event
            }
            SceneEvent::Click { x, y, .. } => SceneEvent::Click {
                x,
                y,
                target: self.stage.overlay.hit_test(x, y),
            },
            other => other,
        };

        let Some(scene) = self.active.as_mut() else {
            return false;
        };

        let on_button = matches!(event, SceneEvent::Click { target: Some(_), .. });
        if scene.config().controller.orbits() && !on_button {
            self.orbit.handle(&event, &mut self.stage.camera);
        }
        scene.dispatch(&event, &mut self.stage)
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("active", &self.active_name())
            .field("nodes", &self.stage.graph.len())
            .field("loader", &self.loader)
            .finish()
    }
}
