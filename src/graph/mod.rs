mod node;
mod scene_graph;
mod transform;

pub use node::{Geometry, Light, LightKind, Material, Node, NodeKind, Side};
pub use scene_graph::SceneGraph;
pub use transform::Transform;

slotmap::new_key_type! {
    /// Handle to a node in a [`SceneGraph`]
    pub struct NodeId;
}
