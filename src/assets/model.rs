use glam::{Mat4, Vec3};

use crate::error::{GalleryError, Result};
use crate::graph::{Geometry, Material, Node, NodeId, SceneGraph, Transform};
use crate::math::AABB;

/// One node of an imported model, in parent-before-child order
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub parent: Option<usize>,
    pub transform: Transform,
    /// Mesh bounds in the node's own space
    pub bounds: Option<AABB>,
    pub color: [f32; 3],
}

/// Node hierarchy and mesh bounds of a glTF model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelAsset {
    pub nodes: Vec<ModelNode>,
}

impl ModelAsset {
    pub fn decode(path: &str, bytes: &[u8]) -> Result<Self> {
        let (document, buffers, _images) =
            gltf::import_slice(bytes).map_err(|e| GalleryError::decode(path, e))?;

        let mut model = ModelAsset::default();
        let scene = document
            .default_scene()
            .or_else(|| document.scenes().next());
        match scene {
            Some(scene) => {
                for node in scene.nodes() {
                    process_node(&node, &buffers, None, &mut model)?;
                }
            }
            None => log::warn!("model '{}' has no scenes", path),
        }

        log::debug!("decoded model '{}' with {} nodes", path, model.nodes.len());
        Ok(model)
    }

    pub fn find(&self, name: &str) -> Option<&ModelNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Local-space bounds of the whole model
    pub fn bounds(&self) -> Option<AABB> {
        let mut worlds: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        let mut total = AABB::EMPTY;
        for node in &self.nodes {
            let parent = node.parent.map_or(Mat4::IDENTITY, |p| worlds[p]);
            let world = parent * node.transform.to_matrix();
            if let Some(bounds) = node.bounds {
                total = total.union(&bounds.transformed(&world));
            }
            worlds.push(world);
        }
        (!total.is_empty()).then_some(total)
    }

    /// Adds the model under `parent` as a group named `name`, returning the group
    pub fn instantiate(&self, graph: &mut SceneGraph, parent: NodeId, name: &str) -> Result<NodeId> {
        let group = graph.add(parent, Node::group(name))?;
        let mut ids: Vec<NodeId> = Vec::with_capacity(self.nodes.len());
        for model_node in &self.nodes {
            let node = match model_node.bounds {
                Some(bounds) => Node::mesh(
                    model_node.name.clone(),
                    Geometry::Hull { bounds },
                    Material::rgb(model_node.color),
                ),
                None => Node::group(model_node.name.clone()),
            }
            .with_transform(model_node.transform);
            let owner = model_node.parent.map_or(group, |p| ids[p]);
            ids.push(graph.add(owner, node)?);
        }
        Ok(group)
    }
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent: Option<usize>,
    model: &mut ModelAsset,
) -> Result<()> {
    let matrix = Mat4::from_cols_array_2d(&node.transform().matrix());
    let mut bounds: Option<AABB> = None;
    let mut color = [0.8, 0.8, 0.8];

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let primitive_bounds = AABB::from_points(positions.map(Vec3::from_array));
            if primitive_bounds.is_empty() {
                continue;
            }
            bounds = Some(bounds.map_or(primitive_bounds, |b| b.union(&primitive_bounds)));
            let base = primitive.material().pbr_metallic_roughness().base_color_factor();
            color = [base[0], base[1], base[2]];
        }
    }

    let index = model.nodes.len();
    model.nodes.push(ModelNode {
        name: node
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("node{}", node.index())),
        parent,
        transform: Transform::from_matrix(&matrix),
        bounds,
        color,
    });

    for child in node.children() {
        process_node(&child, buffers, Some(index), model)?;
    }
    Ok(())
}
