use glam::{Mat4, Vec3};
use slotmap::SlotMap;

use super::{Node, NodeId, Transform};
use crate::error::{GalleryError, Result};
use crate::math::AABB;

/// Arena-backed node hierarchy with a permanent root
#[derive(Debug, Clone)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::group("scene"));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, the root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(GalleryError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(GalleryError::NodeNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn add(&mut self, parent: NodeId, mut node: Node) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(GalleryError::NodeNotFound(parent));
        }
        node.parent = Some(parent);
        node.children.clear();
        let id = self.nodes.insert(node);
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    /// Removes a node and its whole subtree, returning how many nodes went.
    /// Removing the root only clears its children.
    pub fn remove(&mut self, id: NodeId) -> Result<usize> {
        if !self.nodes.contains_key(id) {
            return Err(GalleryError::NodeNotFound(id));
        }

        let doomed = if id == self.root {
            self.descendants(id)
        } else {
            let mut doomed = vec![id];
            doomed.extend(self.descendants(id));
            doomed
        };

        if let Some(parent) = self.nodes[id].parent {
            if let Some(parent_node) = self.nodes.get_mut(parent) {
                parent_node.children.retain(|&child| child != id);
            }
        }
        if id == self.root {
            self.nodes[id].children.clear();
        }

        for node in &doomed {
            self.nodes.remove(*node);
        }
        Ok(doomed.len())
    }

    /// Drops everything but the root
    pub fn clear(&mut self) {
        let root = self.nodes.remove(self.root);
        self.nodes.clear();
        let mut root = root.unwrap_or_else(|| Node::group("scene"));
        root.children.clear();
        self.root = self.nodes.insert(root);
    }

    /// Moves `id` under `new_parent` keeping its world transform
    pub fn attach(&mut self, id: NodeId, new_parent: NodeId) -> Result<()> {
        self.node(id)?;
        self.node(new_parent)?;
        if id == new_parent || id == self.root || self.is_ancestor(id, new_parent) {
            return Err(GalleryError::Config(format!(
                "cannot attach {:?} beneath {:?}",
                id, new_parent
            )));
        }

        let world = self.world_matrix(id)?;
        let parent_world = self.world_matrix(new_parent)?;
        let local = parent_world.inverse() * world;

        if let Some(old_parent) = self.nodes[id].parent {
            if let Some(parent_node) = self.nodes.get_mut(old_parent) {
                parent_node.children.retain(|&child| child != id);
            }
        }
        self.nodes[new_parent].children.push(id);

        let node = &mut self.nodes[id];
        node.parent = Some(new_parent);
        node.transform = Transform::from_matrix(&local);
        Ok(())
    }

    /// True when `ancestor` appears on the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.nodes.get(id).and_then(|n| n.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(parent).and_then(|n| n.parent);
        }
        false
    }

    /// Nearest node on the chain from `id` upward that satisfies `predicate`
    pub fn find_ancestor(&self, id: NodeId, predicate: impl Fn(&Node) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(candidate) = current {
            let node = self.nodes.get(candidate)?;
            if predicate(node) {
                return Some(candidate);
            }
            current = node.parent;
        }
        None
    }

    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4> {
        let mut matrix = self.node(id)?.transform.to_matrix();
        let mut current = self.nodes[id].parent;
        while let Some(parent) = current {
            let node = self.node(parent)?;
            matrix = node.transform.to_matrix() * matrix;
            current = node.parent;
        }
        Ok(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vec3> {
        Ok(self.world_matrix(id)?.transform_point3(Vec3::ZERO))
    }

    /// World bounds of this node's own geometry
    pub fn node_world_bounds(&self, id: NodeId) -> Result<Option<AABB>> {
        let local = self.node(id)?.local_bounds();
        match local {
            Some(bounds) => Ok(Some(bounds.transformed(&self.world_matrix(id)?))),
            None => Ok(None),
        }
    }

    /// Union of the world bounds of every mesh in the subtree
    pub fn world_bounds(&self, id: NodeId) -> Result<Option<AABB>> {
        let mut bounds = AABB::EMPTY;
        self.accumulate_bounds(id, self.parent_world(id)?, &mut bounds)?;
        Ok((!bounds.is_empty()).then_some(bounds))
    }

    fn parent_world(&self, id: NodeId) -> Result<Mat4> {
        match self.node(id)?.parent {
            Some(parent) => self.world_matrix(parent),
            None => Ok(Mat4::IDENTITY),
        }
    }

    fn accumulate_bounds(&self, id: NodeId, parent_world: Mat4, bounds: &mut AABB) -> Result<()> {
        let node = self.node(id)?;
        let world = parent_world * node.transform.to_matrix();
        if let Some(local) = node.local_bounds() {
            *bounds = bounds.union(&local.transformed(&world));
        }
        for &child in &node.children {
            self.accumulate_bounds(child, world, bounds)?;
        }
        Ok(())
    }

    /// First node with this name in depth-first order from the root
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&id| self.nodes[id].name == name)
    }

    /// Depth-first preorder of everything below `id`, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(id) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(node) = self.nodes.get(next) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Visible when the node and every ancestor are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(candidate) = current {
            match self.nodes.get(candidate) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
