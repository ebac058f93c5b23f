pub mod animation;
pub mod assets;
pub mod camera;
pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod graph;
pub mod host;
pub mod input;
pub mod logging;
pub mod math;
pub mod overlay;
pub mod picking;
pub mod render;
pub mod scene;
pub mod scenes;
pub mod texture;
pub mod viewport;
pub mod walk;

pub use error::{GalleryError, Result};
pub use frame::FrameInfo;
pub use host::Host;
pub use input::{EventKind, SceneEvent};
pub use scene::{ActiveScene, DrawContext, Gallery, SceneDescriptor, Stage};
pub use viewport::Viewport;
