use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;
use crate::graph::{Node, NodeId, SceneGraph};
use crate::math::Ray;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
    pub point: Vec3,
}

/// World ray through a window pixel
pub fn pixel_ray(camera: &PerspectiveCamera, viewport: Viewport, x: f32, y: f32) -> Ray {
    camera.ndc_ray(viewport.pixel_to_ndc(Vec2::new(x, y)))
}

/// Nearest visible mesh whose world bounds the ray crosses
pub fn raycast(graph: &SceneGraph, ray: &Ray, filter: impl Fn(NodeId, &Node) -> bool) -> Option<Hit> {
    graph
        .iter()
        .filter(|(id, node)| node.geometry().is_some() && filter(*id, node) && graph.is_visible(*id))
        .filter_map(|(id, _)| {
            let bounds = graph.node_world_bounds(id).ok().flatten()?;
            let distance = ray.hit_aabb(&bounds)?;
            Some(Hit {
                node: id,
                distance,
                point: ray.at(distance),
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Pick from a window pixel
pub fn pick(
    graph: &SceneGraph,
    camera: &PerspectiveCamera,
    viewport: Viewport,
    x: f32,
    y: f32,
    filter: impl Fn(NodeId, &Node) -> bool,
) -> Option<Hit> {
    raycast(graph, &pixel_ray(camera, viewport, x, y), filter)
}
