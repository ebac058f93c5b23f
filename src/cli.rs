// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::GalleryConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-gallery")]
#[command(about = "Gallery of interactive 3D demo scenes", long_about = None)]
pub struct Cli {
    /// Scene to open; defaults to the configured default scene
    pub scene: Option<String>,

    /// Print the registered scene names and exit
    #[arg(long)]
    pub list: bool,

    /// Run without a window for a fixed number of frames
    #[arg(long)]
    pub headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 120)]
    pub frames: u32,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Data table entry to hand to draw functions instead of their default
    #[arg(long)]
    pub data: Option<String>,

    /// Directory asset paths are resolved against
    #[arg(long)]
    pub assets: Option<PathBuf>,

    /// trace, debug, info, warn, error or off
    #[arg(long = "log-level")]
    pub log_level: Option<String>,

    /// JSON gallery configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Command-line values win over the configuration file
    pub fn apply(&self, config: &mut GalleryConfig) {
        if let Some(scene) = &self.scene {
            config.default_scene = scene.clone();
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(assets) = &self.assets {
            config.asset_root = assets.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}
