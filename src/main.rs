use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use scene_gallery::assets::{DataTable, FsSource};
use scene_gallery::cli::Cli;
use scene_gallery::config::GalleryConfig;
use scene_gallery::frame::Stopwatch;
use scene_gallery::input::{Key, SceneEvent, WinitInput};
use scene_gallery::render::{Presenter, Preview};
use scene_gallery::scene::Gallery;
use scene_gallery::{logging, Host, Viewport};

// === Constants ===

/// Fixed step used for headless frames
const HEADLESS_STEP_MS: f64 = 1000.0 / 60.0;
const FPS_UPDATE_INTERVAL: f64 = 1000.0;

fn build_host(config: &GalleryConfig, data_override: Option<String>) -> Host {
    let mut table = DataTable::default();
    table.extend(config.data_sources.clone());

    let mut host = Host::new(
        Rc::new(FsSource::new(config.asset_root.clone())),
        Viewport::new(config.width, config.height),
    )
    .with_data_table(table);
    host.set_data_override(data_override);
    host
}

fn run_headless(mut host: Host, scene: &str, frames: u32) -> Result<()> {
    host.activate(scene)
        .with_context(|| format!("failed to activate scene '{}'", scene))?;

    let stopwatch = Stopwatch::new();
    let mut preview = Preview::new(host.stage().viewport);
    for i in 0..frames {
        host.frame(i as f64 * HEADLESS_STEP_MS);
        preview.render(host.stage());
    }

    let elapsed_ms = stopwatch.elapsed_ms();
    if host.stats_enabled() && elapsed_ms > 0.0 {
        log::info!("scene '{}': {:.1} fps", scene, frames as f64 * 1000.0 / elapsed_ms);
    }
    let stage = host.stage();
    log::info!(
        "scene '{}': {} frames, {} nodes, {} overlay elements, {} loads pending, {:.1} ms",
        scene,
        frames,
        stage.graph.len(),
        stage.overlay.len(),
        host.pending_loads(),
        elapsed_ms
    );
    Ok(())
}

struct App {
    host: Host,
    input: WinitInput,
    preview: Preview,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    stopwatch: Stopwatch,
    frame_count: u32,
    fps_window_start: f64,
}

impl App {
    fn new(host: Host) -> Self {
        let preview = Preview::new(host.stage().viewport);
        Self {
            host,
            input: WinitInput::new(),
            preview,
            window: None,
            presenter: None,
            stopwatch: Stopwatch::new(),
            frame_count: 0,
            fps_window_start: 0.0,
        }
    }

    fn title(&self, fps: Option<f64>) -> String {
        let name = self.host.active_name().unwrap_or("none");
        match fps {
            Some(fps) => format!("Scene Gallery - {} - {:.1} fps", name, fps),
            None => format!("Scene Gallery - {}", name),
        }
    }

    fn update_fps(&mut self, now: f64) {
        self.frame_count += 1;
        let elapsed = now - self.fps_window_start;
        if elapsed >= FPS_UPDATE_INTERVAL {
            let fps = self.frame_count as f64 * 1000.0 / elapsed;
            log::debug!("fps: {:.1}", fps);
            if self.host.stats_enabled() {
                if let Some(window) = &self.window {
                    window.set_title(&self.title(Some(fps)));
                }
            }
            self.frame_count = 0;
            self.fps_window_start = now;
        }
    }

    fn next_scene(&mut self) {
        let Some(next) = self
            .host
            .active_name()
            .and_then(|name| self.host.gallery().next_after(name))
        else {
            return;
        };
        if let Err(e) = self.host.activate(next) {
            log::error!("failed to activate scene '{}': {}", next, e);
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&self.title(None));
        }
    }

    fn redraw(&mut self) {
        let now = self.stopwatch.elapsed_ms();
        self.host.frame(now);
        self.update_fps(now);

        let viewport = self.host.stage().viewport;
        let pixels = self.preview.render(self.host.stage());
        if let Some(presenter) = &mut self.presenter {
            if let Err(e) = presenter.present(pixels, viewport.width, viewport.height) {
                log::error!("present failed: {:#}", e);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let viewport = self.host.stage().viewport;
        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title(self.title(None))
                .with_inner_size(winit::dpi::PhysicalSize::new(viewport.width, viewport.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let presenter = match pollster::block_on(Presenter::new(window.clone())) {
            Ok(p) => p,
            Err(e) => {
                log::error!("failed to initialise presenter: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        if size.width > 0 && size.height > 0 {
            self.host.dispatch(SceneEvent::Resize {
                width: size.width,
                height: size.height,
            });
        }
        self.window = Some(window);
        self.presenter = Some(presenter);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(),
            other => {
                for scene_event in self.input.translate(&other) {
                    match scene_event {
                        SceneEvent::KeyDown { key: Key::Escape, .. } => event_loop.exit(),
                        SceneEvent::KeyDown { key: Key::Tab, .. } => self.next_scene(),
                        SceneEvent::Resize { width: 0, .. } | SceneEvent::Resize { height: 0, .. } => {}
                        scene_event => {
                            self.host.dispatch(scene_event);
                        }
                    }
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

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GalleryConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => GalleryConfig::default(),
    };
    cli.apply(&mut config);
    config.validate().context("invalid gallery configuration")?;

    logging::init(logging::parse_level(&config.log_level)?);

    if cli.list {
        for name in Gallery::default().names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut host = build_host(&config, cli.data.clone());
    let scene = config.default_scene.clone();

    if cli.headless {
        return run_headless(host, &scene, cli.frames);
    }

    host.activate(&scene)
        .with_context(|| format!("failed to activate scene '{}'", scene))?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(host);

    log::info!("Controls: mouse to orbit or look, Tab for the next scene, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
