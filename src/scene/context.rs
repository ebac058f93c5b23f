use std::collections::HashMap;

use crate::assets::{Asset, AssetLoader, AssetRequest, LoadTicket};
use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::graph::{Node, NodeId, SceneGraph};
use crate::math::hex_to_rgb;
use crate::overlay::Overlay;
use crate::viewport::Viewport;

/// Everything a scene callback may touch besides its own state
#[derive(Debug, Clone)]
pub struct Stage {
    pub graph: SceneGraph,
    pub camera: PerspectiveCamera,
    pub overlay: Overlay,
    pub viewport: Viewport,
    pub background: [f32; 3],
    root: NodeId,
}

impl Stage {
    pub fn new(viewport: Viewport) -> Self {
        let config = SceneConfig::default();
        let mut graph = SceneGraph::new();
        let scene_root = graph.root();
        let root = graph
            .add(scene_root, Node::group("activation"))
            .unwrap_or(scene_root);
        Self {
            graph,
            camera: PerspectiveCamera::from_config(&config, viewport.aspect()),
            overlay: Overlay::new(),
            viewport,
            background: hex_to_rgb(config.background),
            root,
        }
    }

    /// Group owning every node of the current activation
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Adds a node under the activation root
    pub fn add(&mut self, node: Node) -> Result<NodeId> {
        self.graph.add(self.root, node)
    }

    pub fn add_to(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.graph.add(parent, node)
    }

    /// Drops the previous activation and prepares a fresh one
    pub fn reset(&mut self, config: &SceneConfig) -> Result<()> {
        self.graph.clear();
        self.root = self.graph.add(self.graph.root(), Node::group("activation"))?;
        self.overlay.clear();
        self.camera = PerspectiveCamera::from_config(config, self.viewport.aspect());
        self.background = hex_to_rgb(config.background);
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(self.viewport.aspect());
    }
}

/// Completion callback stored until its load finishes
pub type LoadCallback<S> = Box<dyn FnOnce(&mut Stage, &mut S, Asset)>;

/// Handed to draw functions: the stage plus the ability to start loads
pub struct DrawContext<'a, S> {
    pub stage: &'a mut Stage,
    loader: &'a mut AssetLoader,
    callbacks: &'a mut HashMap<u64, LoadCallback<S>>,
}

impl<'a, S> DrawContext<'a, S> {
    pub(crate) fn new(
        stage: &'a mut Stage,
        loader: &'a mut AssetLoader,
        callbacks: &'a mut HashMap<u64, LoadCallback<S>>,
    ) -> Self {
        Self {
            stage,
            loader,
            callbacks,
        }
    }

    /// Starts an asynchronous load; `on_load` runs on the frame it completes
    pub fn load(
        &mut self,
        request: AssetRequest,
        on_load: impl FnOnce(&mut Stage, &mut S, Asset) + 'static,
    ) -> LoadTicket {
        log::debug!("loading {:?} '{}'", request.kind, request.path);
        let ticket = self.loader.load(request);
        self.callbacks.insert(ticket.id, Box::new(on_load));
        ticket
    }

    pub fn add(&mut self, node: Node) -> Result<NodeId> {
        self.stage.add(node)
    }
}
