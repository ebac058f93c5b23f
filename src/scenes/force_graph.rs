//! Force-directed 3D graph of labelled nodes and relation links

use std::collections::HashMap;

use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;

use crate::animation::{DagMode, ForceLink, ForceSimulation, CHARGE_STRENGTH};
use crate::assets::{DataKind, DataPayload};
use crate::config::{ControllerKind, SceneConfig};
use crate::error::{GalleryError, Result};
use crate::frame::FrameInfo;
use crate::graph::{Geometry, Material, Node, NodeId};
use crate::math::{hsv_to_rgb, parse_color};
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};

pub const NAME: &str = "force3d";
pub const NODE_TEXT_HEIGHT: f32 = 8.0;
pub const LINK_TEXT_HEIGHT: f32 = 1.5;
pub const DEFAULT_LEVEL_DISTANCE: f32 = 40.0;

const LOG: &str = "gallery::force3d";
const GOLDEN_RATIO_CONJUGATE: f32 = 0.618_034;
const LINK_COLOR: u32 = 0xd3d3d3;

#[derive(Debug, Clone, Deserialize)]
pub struct GraphNode {
    pub id: Value,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub group: Option<Value>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphLink {
    pub source: Value,
    pub target: Value,
    #[serde(default)]
    pub relation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

/// Ids may be strings or numbers in the source data
fn key_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl GraphData {
    pub fn parse(path: &str, value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(|e| GalleryError::decode(path, e))
    }

    /// Links resolved to node indices; self links and links naming unknown ids are skipped
    pub fn resolved_links(&self) -> Vec<(ForceLink, &GraphLink)> {
        let index: HashMap<String, usize> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (key_of(&n.id), i))
            .collect();
        self.links
            .iter()
            .filter_map(|link| {
                let source = *index.get(&key_of(&link.source))?;
                let target = *index.get(&key_of(&link.target))?;
                Some((ForceLink { source, target }, link))
            })
            .filter(|(link, _)| link.source != link.target)
            .collect()
    }
}

/// Colours nodes by group, in order of first appearance
#[derive(Debug, Default)]
struct GroupPalette {
    groups: HashMap<String, usize>,
}

impl GroupPalette {
    fn color(&mut self, node: &GraphNode) -> [f32; 3] {
        if let Some(color) = node.color.as_deref().and_then(parse_color) {
            return color;
        }
        let key = node.group.as_ref().map(key_of).unwrap_or_default();
        let next = self.groups.len();
        let slot = *self.groups.entry(key).or_insert(next);
        hsv_to_rgb((slot as f32 * GOLDEN_RATIO_CONJUGATE) % 1.0, 0.7, 0.9)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LinkVisual {
    pub link: ForceLink,
    pub line: NodeId,
    pub label: NodeId,
}

#[derive(Debug, Default)]
pub struct ForceGraphState {
    pub simulation: Option<ForceSimulation>,
    pub nodes: Vec<NodeId>,
    pub links: Vec<LinkVisual>,
}

pub fn descriptor() -> SceneDescriptor<ForceGraphState> {
    SceneDescriptor::new(NAME, ForceGraphState::default)
        .draw_with_data(draw_force_graph, "force3d", DataKind::Json)
        .animate(animate)
        .config(SceneConfig {
            start_position: glam::vec3(0.0, 0.0, 250.0).into(),
            clipping_plane: 5000.0,
            controller: ControllerKind::None,
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

fn draw_force_graph(
    ctx: &mut DrawContext<'_, ForceGraphState>,
    state: &mut ForceGraphState,
    data: Option<&DataPayload>,
) -> Result<()> {
    if state.simulation.is_some() {
        log::warn!(target: LOG, "force simulation already initialized");
        return Ok(());
    }
    let Some(payload) = data else {
        log::warn!(target: LOG, "no graph data");
        return Ok(());
    };
    let value = payload
        .json()
        .ok_or_else(|| GalleryError::decode(&payload.path, "expected JSON"))?;
    let graph = GraphData::parse(&payload.path, value)?;
    let resolved = graph.resolved_links();

    let mut simulation = ForceSimulation::new(
        graph.nodes.len(),
        resolved.iter().map(|(link, _)| *link).collect(),
    )
    .with_charge(CHARGE_STRENGTH);
    if let Some(mode) = payload.entry.dag_mode.as_deref() {
        match DagMode::parse(mode) {
            Some(mode) => {
                let distance = payload.entry.dag_level_distance.unwrap_or(DEFAULT_LEVEL_DISTANCE);
                log::info!(target: LOG, "dag mode {:?}, level distance {}", mode, distance);
                simulation = simulation.with_dag(mode, distance);
            }
            None => log::warn!(target: LOG, "unknown dag mode '{}'", mode),
        }
    }

    let mut palette = GroupPalette::default();
    for (i, node) in graph.nodes.iter().enumerate() {
        let text = node.name.clone().unwrap_or_else(|| key_of(&node.id));
        let position = simulation.position(i).unwrap_or(Vec3::ZERO);
        let id = ctx.add(
            Node::mesh(
                text.clone(),
                Geometry::Text {
                    content: text,
                    size: NODE_TEXT_HEIGHT,
                },
                Material::rgb(palette.color(node)).unlit(),
            )
            .at(position),
        )?;
        state.nodes.push(id);
    }

    for (link, source) in simulation.links().iter().zip(resolved.iter().map(|(_, l)| *l)) {
        let start = simulation.position(link.source).unwrap_or(Vec3::ZERO);
        let end = simulation.position(link.target).unwrap_or(Vec3::ZERO);
        let line = ctx.add(Node::line("link", vec![start, end], LINK_COLOR))?;
        let caption = format!(
            "{} --{}--> {}",
            key_of(&source.source),
            source.relation.as_deref().unwrap_or(""),
            key_of(&source.target)
        );
        let label = ctx.add(
            Node::mesh(
                "link-label",
                Geometry::Text {
                    content: caption,
                    size: LINK_TEXT_HEIGHT,
                },
                Material::color(LINK_COLOR).unlit(),
            )
            .at((start + end) * 0.5),
        )?;
        state.links.push(LinkVisual {
            link: *link,
            line,
            label,
        });
    }

    log::info!(
        target: LOG,
        "{} nodes, {} links",
        state.nodes.len(),
        state.links.len()
    );
    state.simulation = Some(simulation);
    Ok(())
}

fn animate(_frame: &FrameInfo, stage: &mut Stage, state: &mut ForceGraphState) {
    let Some(simulation) = state.simulation.as_mut() else {
        log::warn!(target: LOG, "no force simulation");
        return;
    };
    if !simulation.tick() {
        return;
    }

    let positions = simulation.positions();
    for (id, position) in state.nodes.iter().zip(positions) {
        if let Some(node) = stage.graph.get_mut(*id) {
            node.transform.translation = *position;
        }
    }
    for visual in &state.links {
        let start = positions[visual.link.source];
        let end = positions[visual.link.target];
        if let Some(Geometry::Line { points }) = stage
            .graph
            .get_mut(visual.line)
            .and_then(|node| node.geometry_mut())
        {
            *points = vec![start, end];
        }
        if let Some(label) = stage.graph.get_mut(visual.label) {
            label.transform.translation = (start + end) * 0.5;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "nodes": [
                {"id": "a", "name": "Alpha", "group": 1},
                {"id": "b", "group": 1},
                {"id": 3, "color": "#ff0000"}
            ],
            "links": [
                {"source": "a", "target": "b", "relation": "knows"},
                {"source": "b", "target": 3},
                {"source": "a", "target": "missing"}
            ]
        })
    }

    #[test]
    fn test_links_resolve_mixed_ids() {
        let graph = GraphData::parse("data/force3d.json", &sample()).unwrap();
        let links = graph.resolved_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].0, ForceLink { source: 0, target: 1 });
        assert_eq!(links[1].0, ForceLink { source: 1, target: 2 });
    }

    #[test]
    fn test_palette_groups_and_explicit_colors() {
        let graph = GraphData::parse("g", &sample()).unwrap();
        let mut palette = GroupPalette::default();
        let a = palette.color(&graph.nodes[0]);
        let b = palette.color(&graph.nodes[1]);
        assert_eq!(a, b);
        assert_eq!(palette.color(&graph.nodes[2]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_parse_rejects_missing_nodes() {
        assert!(GraphData::parse("g", &json!({"links": []})).is_err());
    }

    #[test]
    fn test_animate_before_draw_is_safe() {
        let mut stage = Stage::new(crate::viewport::Viewport::new(320, 240));
        let mut state = ForceGraphState::default();
        animate(&FrameInfo::new(1, 0.0, 0.0), &mut stage, &mut state);
        assert!(state.simulation.is_none());
    }
}
