//! Periodic table cards that fly between table, sphere, helix and grid layouts

use std::f32::consts::PI;

use glam::{Quat, Vec2, Vec3};
use rand::Rng;
use serde_json::Value;

use crate::animation::Tween;
use crate::assets::{DataKind, DataPayload};
use crate::config::{ControllerKind, OverlayMode, SceneConfig};
use crate::error::{GalleryError, Result};
use crate::frame::FrameInfo;
use crate::graph::{Geometry, Material, Node, NodeId, Side, Transform};
use crate::input::{EventKind, Key, SceneEvent};
use crate::math::Easing;
use crate::overlay::{OverlayElement, OverlayId};
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};

pub const NAME: &str = "periodic";
/// Base tween duration; each card takes between one and two of these
pub const TRANSITION_SECONDS: f32 = 2.0;

const LOG: &str = "gallery::periodic";
const CARD_WIDTH: f32 = 120.0;
const CARD_HEIGHT: f32 = 160.0;
const SCATTER: f32 = 2000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub symbol: String,
    pub name: String,
    pub mass: String,
    pub column: u32,
    pub row: u32,
}

/// Reads the flat `[symbol, name, mass, column, row, ...]` table
pub fn parse_table(path: &str, value: &Value) -> Result<Vec<Element>> {
    let items = value
        .as_array()
        .ok_or_else(|| GalleryError::decode(path, "periodic table is not an array"))?;
    if items.len() % 5 != 0 {
        return Err(GalleryError::decode(
            path,
            format!("{} entries is not a multiple of 5", items.len()),
        ));
    }
    items
        .chunks_exact(5)
        .enumerate()
        .map(|(i, chunk)| {
            let text = |v: &Value| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let cell = |v: &Value| {
                v.as_u64()
                    .map(|n| n as u32)
                    .ok_or_else(|| GalleryError::decode(path, format!("element {} has a bad cell", i + 1)))
            };
            Ok(Element {
                symbol: text(&chunk[0]),
                name: text(&chunk[1]),
                mass: text(&chunk[2]),
                column: cell(&chunk[3])?,
                row: cell(&chunk[4])?,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Table,
    Sphere,
    Helix,
    Grid,
}

impl Layout {
    pub const ALL: [Layout; 4] = [Layout::Table, Layout::Sphere, Layout::Helix, Layout::Grid];

    pub fn label(self) -> &'static str {
        match self {
            Layout::Table => "TABLE",
            Layout::Sphere => "SPHERE",
            Layout::Helix => "HELIX",
            Layout::Grid => "GRID",
        }
    }

    fn from_digit(digit: u8) -> Option<Layout> {
        Layout::ALL.get(usize::from(digit).checked_sub(1)?).copied()
    }

    /// Target pose of card `index` among `count` cards
    pub fn target(self, index: usize, count: usize, element: &Element) -> Transform {
        let i = index as f32;
        match self {
            Layout::Table => Transform::from_xyz(
                element.column as f32 * 140.0 - 1330.0,
                -(element.row as f32 * 180.0) + 990.0,
                0.0,
            ),
            Layout::Sphere => {
                let l = count.max(1) as f32;
                let phi = (-1.0 + 2.0 * i / l).clamp(-1.0, 1.0).acos();
                let theta = (l * PI).sqrt() * phi;
                let mut t = Transform::from_translation(spherical(800.0, phi, theta));
                t.look_at(t.translation * 2.0, Vec3::Y);
                t
            }
            Layout::Helix => {
                let theta = i * 0.175 + PI;
                let y = -(i * 8.0) + 450.0;
                let position = Vec3::new(900.0 * theta.sin(), y, 900.0 * theta.cos());
                let mut t = Transform::from_translation(position);
                t.look_at(Vec3::new(position.x * 2.0, position.y, position.z * 2.0), Vec3::Y);
                t
            }
            Layout::Grid => Transform::from_xyz(
                ((index % 5) as f32 * 400.0) - 800.0,
                -(((index / 5) % 5) as f32 * 400.0) + 800.0,
                (index / 25) as f32 * 1000.0 - 2000.0,
            ),
        }
    }
}

/// Polar angle `phi` from +y, azimuth `theta` from +z toward +x
fn spherical(radius: f32, phi: f32, theta: f32) -> Vec3 {
    Vec3::new(
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
        radius * phi.sin() * theta.cos(),
    )
}

#[derive(Debug, Clone, Copy)]
struct CardTween {
    node: NodeId,
    position: Tween<Vec3>,
    rotation: Tween<Quat>,
}

#[derive(Debug, Default)]
pub struct PeriodicState {
    pub elements: Vec<Element>,
    pub cards: Vec<NodeId>,
    pub layout: Option<Layout>,
    buttons: Vec<(OverlayId, Layout)>,
    tweens: Vec<CardTween>,
}

impl PeriodicState {
    pub fn is_transitioning(&self) -> bool {
        !self.tweens.is_empty()
    }
}

pub fn descriptor() -> SceneDescriptor<PeriodicState> {
    SceneDescriptor::new(NAME, PeriodicState::default)
        .draw_with_data(draw_periodic, "periodic", DataKind::Json)
        .on(EventKind::Click, on_click)
        .on(EventKind::KeyDown, on_key_down)
        .animate(animate)
        .config(SceneConfig {
            start_position: glam::vec3(0.0, 0.0, 3000.0).into(),
            clipping_plane: 10000.0,
            controller: ControllerKind::Trackball,
            overlay: OverlayMode::Spatial,
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

fn draw_periodic(
    ctx: &mut DrawContext<'_, PeriodicState>,
    state: &mut PeriodicState,
    data: Option<&DataPayload>,
) -> Result<()> {
    let Some(payload) = data else {
        log::warn!(target: LOG, "no periodic table data");
        return Ok(());
    };
    let value = payload
        .json()
        .ok_or_else(|| GalleryError::decode(&payload.path, "expected JSON"))?;
    state.elements = parse_table(&payload.path, value)?;

    let mut rng = rand::thread_rng();
    for (i, element) in state.elements.iter().enumerate() {
        let scattered = Vec3::new(
            rng.gen_range(-SCATTER..SCATTER),
            rng.gen_range(-SCATTER..SCATTER),
            rng.gen_range(-SCATTER..SCATTER),
        );
        let card = Node::mesh(
            format!("{}-{}", i + 1, element.symbol),
            Geometry::Plane {
                width: CARD_WIDTH,
                height: CARD_HEIGHT,
            },
            Material::rgb([0.0, 0.5, 0.5])
                .with_opacity(rng.gen_range(0.25..0.75))
                .with_side(Side::Double)
                .unlit(),
        )
        .at(scattered);
        let card = ctx.add(card)?;
        ctx.stage.add_to(
            card,
            Node::mesh(
                "symbol",
                Geometry::Text {
                    content: element.symbol.clone(),
                    size: 60.0,
                },
                Material::color(0xffffff).unlit(),
            )
            .at(Vec3::new(0.0, 10.0, 1.0)),
        )?;
        ctx.stage.add_to(
            card,
            Node::mesh(
                "details",
                Geometry::Text {
                    content: format!("{}\n{}", element.name, element.mass),
                    size: 12.0,
                },
                Material::color(0xaaffff).unlit(),
            )
            .at(Vec3::new(0.0, -50.0, 1.0)),
        )?;
        state.cards.push(card);
    }

    for (i, layout) in Layout::ALL.into_iter().enumerate() {
        let button = OverlayElement::button(layout.label(), Vec2::new(20.0 + i as f32 * 110.0, 20.0));
        state.buttons.push((ctx.stage.overlay.add(button), layout));
    }

    transform_to(ctx.stage, state, Layout::Table);
    log::info!(target: LOG, "laid out {} elements", state.elements.len());
    Ok(())
}

/// Starts tweens from each card's current pose to `layout`, replacing any running ones
pub fn transform_to(stage: &Stage, state: &mut PeriodicState, layout: Layout) {
    let mut rng = rand::thread_rng();
    let count = state.cards.len();
    state.tweens.clear();
    for (i, (&node, element)) in state.cards.iter().zip(&state.elements).enumerate() {
        let Some(current) = stage.graph.get(node).map(|n| n.transform) else {
            continue;
        };
        let target = layout.target(i, count, element);
        let duration = rng.gen_range(TRANSITION_SECONDS..TRANSITION_SECONDS * 2.0);
        let rotation_duration = rng.gen_range(TRANSITION_SECONDS..TRANSITION_SECONDS * 2.0);
        state.tweens.push(CardTween {
            node,
            position: Tween::new(current.translation, target.translation, duration, Easing::ExponentialInOut),
            rotation: Tween::new(current.rotation, target.rotation, rotation_duration, Easing::ExponentialInOut),
        });
    }
    state.layout = Some(layout);
    log::debug!(target: LOG, "transforming to {:?}", layout);
}

fn on_click(event: &SceneEvent, stage: &mut Stage, state: &mut PeriodicState) {
    let SceneEvent::Click { target: Some(target), .. } = *event else {
        return;
    };
    let layout = state
        .buttons
        .iter()
        .find(|(id, _)| *id == target)
        .map(|(_, layout)| *layout);
    if let Some(layout) = layout {
        transform_to(stage, state, layout);
    }
}

fn on_key_down(event: &SceneEvent, stage: &mut Stage, state: &mut PeriodicState) {
    if let SceneEvent::KeyDown { key: Key::Digit(d), .. } = *event {
        if let Some(layout) = Layout::from_digit(d) {
            transform_to(stage, state, layout);
        }
    }
}

fn animate(frame: &FrameInfo, stage: &mut Stage, state: &mut PeriodicState) {
    if state.tweens.is_empty() {
        return;
    }
    for tween in state.tweens.iter_mut() {
        let position = tween.position.step(frame.delta);
        let rotation = tween.rotation.step(frame.delta);
        if let Some(node) = stage.graph.get_mut(tween.node) {
            node.transform.translation = position;
            node.transform.rotation = rotation;
        }
    }
    state
        .tweens
        .retain(|t| !(t.position.is_finished() && t.rotation.is_finished()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hydrogen() -> Element {
        Element {
            symbol: "H".into(),
            name: "Hydrogen".into(),
            mass: "1.00794".into(),
            column: 1,
            row: 1,
        }
    }

    #[test]
    fn test_parse_flat_table() {
        let value = json!(["H", "Hydrogen", "1.00794", 1, 1, "He", "Helium", "4.002602", 18, 1]);
        let table = parse_table("data/periodic.json", &value).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0], hydrogen());
        assert_eq!(table[1].column, 18);
    }

    #[test]
    fn test_parse_rejects_ragged_table() {
        let value = json!(["H", "Hydrogen", "1.00794", 1]);
        assert!(parse_table("p", &value).is_err());
    }

    #[test]
    fn test_table_target() {
        let t = Layout::Table.target(0, 1, &hydrogen());
        assert_eq!(t.translation, Vec3::new(-1190.0, 810.0, 0.0));
    }

    #[test]
    fn test_sphere_targets_face_outward() {
        let count = 10;
        for i in 0..count {
            let t = Layout::Sphere.target(i, count, &hydrogen());
            assert!((t.translation.length() - 800.0).abs() < 1e-2);
            let facing = t.rotation * Vec3::Z;
            assert!(facing.dot(t.translation.normalize()) > 0.999);
        }
    }

    #[test]
    fn test_helix_and_grid_targets() {
        let helix = Layout::Helix.target(0, 10, &hydrogen());
        assert!((helix.translation.y - 450.0).abs() < 1e-4);
        assert!((Vec2::new(helix.translation.x, helix.translation.z).length() - 900.0).abs() < 1e-2);

        let grid = Layout::Grid.target(26, 30, &hydrogen());
        assert_eq!(grid.translation, Vec3::new(-400.0, 800.0, -1000.0));
    }

    #[test]
    fn test_digit_keys_map_to_layouts() {
        assert_eq!(Layout::from_digit(1), Some(Layout::Table));
        assert_eq!(Layout::from_digit(4), Some(Layout::Grid));
        assert_eq!(Layout::from_digit(0), None);
        assert_eq!(Layout::from_digit(5), None);
    }
}
