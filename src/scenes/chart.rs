//! Three-axis scatter chart with ticks, labels and icon or sphere marks

use std::sync::Arc;

use glam::Vec3;
use serde::Deserialize;
use serde_json::Value;

use crate::assets::{Asset, AssetRequest, DataKind, DataPayload, FontAsset};
use crate::config::SceneConfig;
use crate::error::{GalleryError, Result};
use crate::graph::{Geometry, Material, Node, NodeId, Side};
use crate::math::hex_to_rgb;
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};

use super::common::{as_f32, json_color};

pub const NAME: &str = "chart";
pub const FONT_PATH: &str = "fonts/helvetiker_regular.typeface.json";

const LOG: &str = "gallery::chart";
const CHART_COLOR: u32 = 0x00ff00;
const TICK_COLOR: u32 = 0x00ffff;
const ICON_BACKGROUND: u32 = 0x0d204d;
const BOX_OPACITY: f32 = 0.1;
const AXIS_THICKNESS: f32 = 0.1;
const TICK_SIZE: f32 = 0.1;
const AXIS_LABEL_SIZE: f32 = 1.0;
const ICON_THICKNESS: f32 = 0.01;
const DEFAULT_POINT_SIZE: f32 = 0.1;
const DEFAULT_LABEL_SIZE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartAxis {
    pub label: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ChartAxis {
    /// Unit direction from the axis label; unknown labels fall back to z
    pub fn direction(&self) -> Vec3 {
        match self.label.as_str() {
            "x" => Vec3::X,
            "y" => Vec3::Y,
            _ => Vec3::Z,
        }
    }

    /// Tick coordinates from `min` to `max` inclusive
    pub fn ticks(&self) -> Vec<f32> {
        if !(self.step > 0.0) || self.max < self.min {
            return Vec::new();
        }
        let count = ((self.max - self.min) / self.step + 1e-4).floor() as usize + 1;
        (0..count).map(|k| self.min + k as f32 * self.step).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub position: Vec3,
    pub color: [f32; 3],
    pub size: Option<f32>,
    pub label: Option<String>,
    pub icon: Option<String>,
}

/// Visual pieces a chart point turns into
#[derive(Debug, Clone, PartialEq)]
pub enum ChartMark {
    /// Flat textured card
    Icon { size: f32, path: String },
    Sphere { radius: f32 },
    /// Text beside the point; needs the font
    Label { text: String, size: f32 },
}

impl ChartPoint {
    fn parse(path: &str, index: usize, value: &Value) -> Result<Self> {
        let bad = |what: &str| GalleryError::decode(path, format!("point {} {}", index, what));
        let items = value.as_array().ok_or_else(|| bad("is not an array"))?;
        let coord = |i: usize| items.get(i).and_then(as_f32).ok_or_else(|| bad("has a bad coordinate"));
        let position = Vec3::new(coord(0)?, coord(1)?, coord(2)?);
        let color = items
            .get(3)
            .and_then(json_color)
            .unwrap_or_else(|| hex_to_rgb(CHART_COLOR));
        let extra = items.get(4);
        let field = |name: &str| extra.and_then(|e| e.get(name));
        Ok(Self {
            position,
            color,
            size: field("size").and_then(as_f32),
            label: field("label").and_then(Value::as_str).map(str::to_string),
            icon: field("icon").and_then(Value::as_str).map(str::to_string),
        })
    }

    pub fn marks(&self) -> Vec<ChartMark> {
        let mut marks = Vec::with_capacity(2);
        match &self.icon {
            Some(path) => marks.push(ChartMark::Icon {
                size: self.size.unwrap_or(1.0),
                path: path.clone(),
            }),
            None => marks.push(ChartMark::Sphere {
                radius: self.size.unwrap_or(DEFAULT_POINT_SIZE),
            }),
        }
        if let Some(text) = &self.label {
            marks.push(ChartMark::Label {
                text: text.clone(),
                size: self.size.unwrap_or(DEFAULT_LABEL_SIZE),
            });
        }
        marks
    }

    /// Labels sit two radii to the right of their point
    pub fn label_position(&self) -> Vec3 {
        self.position + Vec3::X * self.size.unwrap_or(DEFAULT_POINT_SIZE) * 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub axes: Vec<ChartAxis>,
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn parse(path: &str, value: &Value) -> Result<Self> {
        let axes: Vec<ChartAxis> = value
            .get("axes")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| GalleryError::decode(path, e))?
            .ok_or_else(|| GalleryError::decode(path, "missing axes"))?;
        if axes.len() < 3 {
            return Err(GalleryError::decode(path, "a chart needs three axes"));
        }
        let points = value
            .get("points")
            .and_then(Value::as_array)
            .map(|points| {
                points
                    .iter()
                    .enumerate()
                    .map(|(i, p)| ChartPoint::parse(path, i, p))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();
        Ok(Self { axes, points })
    }

    /// Extent of the surrounding box: each axis' max
    pub fn extent(&self) -> Vec3 {
        Vec3::new(self.axes[0].max, self.axes[1].max, self.axes[2].max)
    }
}

#[derive(Debug, Default)]
pub struct ChartState {
    pub chart: Option<ChartData>,
    pub font: Option<FontAsset>,
    pub marks: Vec<NodeId>,
    pub labels: Vec<NodeId>,
}

pub fn descriptor() -> SceneDescriptor<ChartState> {
    SceneDescriptor::new(NAME, ChartState::default)
        .draw_with_data(draw_chart, "chart", DataKind::Json)
        .config(SceneConfig {
            start_position: glam::vec3(15.0, 12.0, 20.0).into(),
            look_at: glam::vec3(5.0, 5.0, 5.0).into(),
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

impl ChartMark {
    fn node(&self, at: Vec3, color: [f32; 3]) -> Node {
        let node = match self {
            ChartMark::Icon { size, path } => Node::mesh(
                format!("icon:{path}"),
                Geometry::Box {
                    width: *size,
                    height: *size,
                    depth: ICON_THICKNESS,
                },
                Material::color(ICON_BACKGROUND)
                    .with_opacity(0.75)
                    .with_side(Side::Double),
            ),
            ChartMark::Sphere { radius } => {
                Node::mesh("point", Geometry::Sphere { radius: *radius }, Material::rgb(color).unlit())
            }
            ChartMark::Label { text, size } => Node::mesh(
                format!("label:{text}"),
                Geometry::Text {
                    content: text.clone(),
                    size: *size,
                },
                Material::rgb(color).unlit(),
            ),
        };
        node.at(at)
    }
}

fn draw_chart(
    ctx: &mut DrawContext<'_, ChartState>,
    state: &mut ChartState,
    data: Option<&DataPayload>,
) -> Result<()> {
    let Some(payload) = data else {
        log::warn!(target: LOG, "no chart data");
        return Ok(());
    };
    let value = payload
        .json()
        .ok_or_else(|| GalleryError::decode(&payload.path, "expected JSON"))?;
    let chart = ChartData::parse(&payload.path, value)?;

    let extent = chart.extent();
    ctx.add(
        Node::mesh(
            "surrounding-box",
            Geometry::Box {
                width: extent.x,
                height: extent.y,
                depth: extent.z,
            },
            Material::color(CHART_COLOR).with_opacity(BOX_OPACITY).unlit(),
        )
        .at(extent * 0.5),
    )?;

    for axis in &chart.axes {
        let direction = axis.direction();
        let size = direction * axis.max + (Vec3::ONE - direction) * AXIS_THICKNESS;
        ctx.add(
            Node::mesh(
                format!("axis-{}", axis.label),
                Geometry::Box {
                    width: size.x,
                    height: size.y,
                    depth: size.z,
                },
                Material::color(CHART_COLOR).unlit(),
            )
            .at(direction * axis.max * 0.5),
        )?;
        for tick in axis.ticks() {
            ctx.add(
                Node::mesh("tick", Geometry::cube(TICK_SIZE), Material::color(TICK_COLOR).unlit())
                    .at(direction * tick),
            )?;
        }
    }

    for point in &chart.points {
        for mark in point.marks() {
            match &mark {
                ChartMark::Label { .. } => continue,
                ChartMark::Icon { path, .. } => {
                    let id = ctx.add(mark.node(point.position, point.color))?;
                    state.marks.push(id);
                    ctx.load(AssetRequest::texture(path.clone()), move |stage, _state, asset| {
                        apply_icon(stage, id, asset)
                    });
                }
                ChartMark::Sphere { .. } => {
                    state.marks.push(ctx.add(mark.node(point.position, point.color))?);
                }
            }
        }
    }

    ctx.load(AssetRequest::font(FONT_PATH), on_font_loaded);
    log::info!(
        target: LOG,
        "{} axes, {} points",
        chart.axes.len(),
        chart.points.len()
    );
    state.chart = Some(chart);
    Ok(())
}

fn apply_icon(stage: &mut Stage, id: NodeId, asset: Asset) {
    let Some(texture) = asset.into_texture() else {
        log::warn!(target: LOG, "icon did not decode as a texture");
        return;
    };
    match stage.graph.get_mut(id).and_then(|node| node.material_mut()) {
        Some(material) => material.texture = Some(Arc::new(texture)),
        None => log::debug!(target: LOG, "icon node is gone"),
    }
}

fn on_font_loaded(stage: &mut Stage, state: &mut ChartState, asset: Asset) {
    let Some(font) = asset.into_font() else {
        log::warn!(target: LOG, "'{}' did not decode as a font", FONT_PATH);
        return;
    };
    let Some(chart) = state.chart.as_ref() else {
        log::warn!(target: LOG, "font arrived before chart data");
        return;
    };

    let mut labels = Vec::new();
    for axis in &chart.axes {
        labels.push((
            axis.label.clone(),
            AXIS_LABEL_SIZE,
            axis.direction() * axis.max,
            hex_to_rgb(CHART_COLOR),
        ));
    }
    for point in &chart.points {
        for mark in point.marks() {
            if let ChartMark::Label { text, size } = mark {
                labels.push((text, size, point.label_position(), point.color));
            }
        }
    }

    for (text, size, at, color) in labels {
        if !font.covers(&text) {
            log::warn!(target: LOG, "font '{}' lacks glyphs for '{}'", font.family, text);
        }
        let node = ChartMark::Label { text, size }.node(at, color);
        match stage.add(node) {
            Ok(id) => state.labels.push(id),
            Err(e) => log::warn!(target: LOG, "failed to add label: {}", e),
        }
    }
    state.font = Some(font);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "axes": [
                {"label": "x", "min": 0, "max": 10, "step": 2},
                {"label": "y", "min": 0, "max": 5, "step": 1},
                {"label": "z", "min": 0, "max": 1, "step": 0.25}
            ],
            "points": [
                [1, 2, 3, "#ff0000", {"size": 0.5, "label": "A"}],
                [4, 5, 0.5, "blue"],
                [2, 2, 2, "#00ff00", {"icon": "icons/star.png", "size": 2}]
            ]
        })
    }

    #[test]
    fn test_parse_chart() {
        let chart = ChartData::parse("data/chart.json", &sample()).unwrap();
        assert_eq!(chart.extent(), Vec3::new(10.0, 5.0, 1.0));
        assert_eq!(chart.points[0].label.as_deref(), Some("A"));
        assert_eq!(chart.points[1].color, [0.0, 0.0, 1.0]);
        assert_eq!(chart.points[1].size, None);
    }

    #[test]
    fn test_ticks_include_both_ends() {
        let chart = ChartData::parse("c", &sample()).unwrap();
        assert_eq!(chart.axes[0].ticks(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(chart.axes[2].ticks().len(), 5);
        let flat = ChartAxis {
            label: "x".into(),
            min: 0.0,
            max: 1.0,
            step: 0.0,
        };
        assert!(flat.ticks().is_empty());
    }

    #[test]
    fn test_marks_per_point() {
        let chart = ChartData::parse("c", &sample()).unwrap();
        assert_eq!(
            chart.points[0].marks(),
            vec![
                ChartMark::Sphere { radius: 0.5 },
                ChartMark::Label {
                    text: "A".into(),
                    size: 0.5
                }
            ]
        );
        assert_eq!(chart.points[1].marks(), vec![ChartMark::Sphere { radius: 0.1 }]);
        assert!(matches!(chart.points[2].marks()[0], ChartMark::Icon { size, .. } if size == 2.0));
        assert_eq!(chart.points[0].label_position(), Vec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn test_two_axes_rejected() {
        let value = json!({"axes": [
            {"label": "x", "min": 0, "max": 1, "step": 1},
            {"label": "y", "min": 0, "max": 1, "step": 1}
        ]});
        assert!(ChartData::parse("c", &value).is_err());
    }
}
