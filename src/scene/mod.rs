mod context;
mod descriptor;
mod instance;
mod registry;

pub use context::{DrawContext, LoadCallback, Stage};
pub use descriptor::{AnimationCallback, DrawFn, DrawFunc, EventHandler, SceneDescriptor};
pub use instance::{ActiveScene, SceneInstance};
pub use registry::{Gallery, SceneFactory};
