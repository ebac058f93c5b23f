//! A 3x3x3 puzzle cube with animated, queued face turns

use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Quat, Vec3};

use crate::animation::Tween;
use crate::assets::DataPayload;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::graph::{Geometry, Material, Node, NodeId, Transform};
use crate::input::{EventKind, Key, SceneEvent};
use crate::math::{hex_to_rgb, Easing};
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};

pub const NAME: &str = "rubiks";
pub const SPACING: f32 = 1.05;
pub const TURN_SECONDS: f32 = 0.3;
/// Tolerance when selecting the cubelets of a layer
pub const LAYER_EPSILON: f32 = 0.01;

const LOG: &str = "gallery::rubiks";

const WHITE: u32 = 0xffffff;
const YELLOW: u32 = 0xffff00;
const RED: u32 = 0xff0000;
const ORANGE: u32 = 0xffa500;
const GREEN: u32 = 0x00ff00;
const BLUE: u32 = 0x0000ff;
const BLACK: u32 = 0x000000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Up,
    Down,
    Front,
    Back,
    Right,
    Left,
}

impl Face {
    pub fn from_key(key: Key) -> Option<Face> {
        match key {
            Key::KeyU => Some(Face::Up),
            Key::KeyD => Some(Face::Down),
            Key::KeyF => Some(Face::Front),
            Key::KeyB => Some(Face::Back),
            Key::KeyR => Some(Face::Right),
            Key::KeyL => Some(Face::Left),
            _ => None,
        }
    }

    pub fn axis(self) -> Vec3 {
        match self {
            Face::Up | Face::Down => Vec3::Y,
            Face::Front | Face::Back => Vec3::Z,
            Face::Right | Face::Left => Vec3::X,
        }
    }

    /// Coordinate of the layer along [`Face::axis`]
    pub fn layer(self) -> f32 {
        match self {
            Face::Up | Face::Front | Face::Right => SPACING,
            Face::Down | Face::Back | Face::Left => -SPACING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceTurn {
    pub face: Face,
    /// +1 turns by +π/2 about the face axis, -1 by -π/2
    pub direction: f32,
}

#[derive(Debug, Clone)]
struct ActiveTurn {
    turn: FaceTurn,
    members: Vec<(NodeId, Transform)>,
    angle: Tween<f32>,
}

#[derive(Debug, Default)]
pub struct RubiksState {
    pub cubelets: Vec<NodeId>,
    queue: VecDeque<FaceTurn>,
    active: Option<ActiveTurn>,
}

impl RubiksState {
    pub fn is_turning(&self) -> bool {
        self.active.is_some()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

pub fn descriptor() -> SceneDescriptor<RubiksState> {
    SceneDescriptor::new(NAME, RubiksState::default)
        .draw(draw_rubiks_cube)
        .on(EventKind::KeyDown, on_key_down)
        .animate(animate)
        .config(SceneConfig {
            start_position: glam::vec3(4.0, 4.0, 6.0).into(),
            background: 0x202020,
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

/// Sticker colours in +x, -x, +y, -y, +z, -z order; inner faces are black
fn face_colors(x: i32, y: i32, z: i32) -> [[f32; 3]; 6] {
    let pick = |on: bool, hex: u32| hex_to_rgb(if on { hex } else { BLACK });
    [
        pick(x == 1, RED),
        pick(x == -1, ORANGE),
        pick(y == 1, WHITE),
        pick(y == -1, YELLOW),
        pick(z == 1, BLUE),
        pick(z == -1, GREEN),
    ]
}

fn draw_rubiks_cube(
    ctx: &mut DrawContext<'_, RubiksState>,
    state: &mut RubiksState,
    _data: Option<&DataPayload>,
) -> Result<()> {
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                let cubelet = Node::mesh(
                    format!("cubelet({x},{y},{z})"),
                    Geometry::cube(1.0),
                    Material::color(BLACK)
                        .with_faces(face_colors(x, y, z))
                        .unlit(),
                )
                .at(Vec3::new(x as f32, y as f32, z as f32) * SPACING);
                state.cubelets.push(ctx.add(cubelet)?);
            }
        }
    }
    log::info!(target: LOG, "built {} cubelets", state.cubelets.len());
    Ok(())
}

/// Queues a turn; it starts on the next frame once any running turn completes
pub fn request_turn(state: &mut RubiksState, turn: FaceTurn) {
    state.queue.push_back(turn);
}

fn start_turn(stage: &Stage, state: &RubiksState, turn: FaceTurn) -> ActiveTurn {
    let axis = turn.face.axis();
    let members = state
        .cubelets
        .iter()
        .filter_map(|id| stage.graph.get(*id).map(|node| (*id, node.transform)))
        .filter(|(_, t)| (t.translation.dot(axis) - turn.face.layer()).abs() < LAYER_EPSILON)
        .collect();
    ActiveTurn {
        turn,
        members,
        angle: Tween::new(0.0, turn.direction * FRAC_PI_2, TURN_SECONDS, Easing::QuadraticInOut),
    }
}

/// Snaps a transform back onto the cube lattice and the 24 axis-aligned orientations
fn snap(transform: Transform) -> Transform {
    let translation = (transform.translation / SPACING).round() * SPACING;
    let m = Mat3::from_quat(transform.rotation);
    let round = |v: Vec3| v.round();
    let rotation = Quat::from_mat3(&Mat3::from_cols(round(m.x_axis), round(m.y_axis), round(m.z_axis)));
    Transform {
        translation,
        rotation: rotation.normalize(),
        scale: transform.scale,
    }
}

fn on_key_down(event: &SceneEvent, _stage: &mut Stage, state: &mut RubiksState) {
    let SceneEvent::KeyDown { key, shift } = *event else {
        return;
    };
    if let Some(face) = Face::from_key(key) {
        let direction = if shift { -1.0 } else { 1.0 };
        request_turn(state, FaceTurn { face, direction });
    }
}

fn animate(frame: &FrameInfo, stage: &mut Stage, state: &mut RubiksState) {
    if state.active.is_none() {
        let Some(turn) = state.queue.pop_front() else {
            return;
        };
        log::debug!(target: LOG, "turning {:?} by {}", turn.face, turn.direction);
        state.active = Some(start_turn(stage, state, turn));
    }
    let Some(active) = state.active.as_mut() else {
        return;
    };

    let angle = active.angle.step(frame.delta);
    let rotation = Quat::from_axis_angle(active.turn.face.axis(), angle);
    let finished = active.angle.is_finished();
    for (id, base) in &active.members {
        let Some(node) = stage.graph.get_mut(*id) else {
            continue;
        };
        let turned = base.rotated_about(Vec3::ZERO, rotation);
        node.transform = if finished { snap(turned) } else { turned };
    }
    if finished {
        state.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetLoader, MemorySource};
    use crate::viewport::Viewport;

    fn drawn() -> (Stage, RubiksState) {
        let mut stage = Stage::new(Viewport::new(640, 480));
        let mut state = RubiksState::default();
        let mut loader = AssetLoader::new(std::rc::Rc::new(MemorySource::new()));
        let mut callbacks = std::collections::HashMap::new();
        let mut ctx = DrawContext::new(&mut stage, &mut loader, &mut callbacks);
        draw_rubiks_cube(&mut ctx, &mut state, None).unwrap();
        (stage, state)
    }

    fn run(stage: &mut Stage, state: &mut RubiksState, seconds: f32) {
        let steps = (seconds / 0.05).ceil() as u64 + 1;
        for n in 0..steps {
            animate(&FrameInfo::new(n, n as f32 * 0.05, 0.05), stage, state);
        }
    }

    fn positions(stage: &Stage, state: &RubiksState) -> Vec<Vec3> {
        state
            .cubelets
            .iter()
            .map(|id| stage.graph.get(*id).unwrap().transform.translation)
            .collect()
    }

    #[test]
    fn test_corner_colors() {
        let colors = face_colors(1, 1, 1);
        assert_eq!(colors[0], hex_to_rgb(RED));
        assert_eq!(colors[1], hex_to_rgb(BLACK));
        assert_eq!(colors[2], hex_to_rgb(WHITE));
        assert_eq!(colors[4], hex_to_rgb(BLUE));
    }

    #[test]
    fn test_up_turn_moves_only_the_top_layer() {
        let (mut stage, mut state) = drawn();
        let before = positions(&stage, &state);
        request_turn(
            &mut state,
            FaceTurn {
                face: Face::Up,
                direction: 1.0,
            },
        );
        run(&mut stage, &mut state, TURN_SECONDS);
        assert!(!state.is_turning());

        let after = positions(&stage, &state);
        let mut moved = 0;
        for (a, b) in before.iter().zip(&after) {
            if (a.y - SPACING).abs() < LAYER_EPSILON {
                assert!((b.y - SPACING).abs() < 1e-4);
                if (*a - *b).length() > 1e-3 {
                    moved += 1;
                }
            } else {
                assert!((*a - *b).length() < 1e-6);
            }
        }
        assert_eq!(moved, 8);
    }

    #[test]
    fn test_four_quarter_turns_restore_the_cube() {
        let (mut stage, mut state) = drawn();
        let before = positions(&stage, &state);
        for _ in 0..4 {
            request_turn(
                &mut state,
                FaceTurn {
                    face: Face::Right,
                    direction: -1.0,
                },
            );
        }
        assert_eq!(state.queued(), 4);
        run(&mut stage, &mut state, TURN_SECONDS * 4.0 + 0.5);
        assert_eq!(state.queued(), 0);
        for (a, b) in before.iter().zip(positions(&stage, &state)) {
            assert!((*a - b).length() < 1e-4);
        }
    }

    #[test]
    fn test_shift_reverses_direction() {
        let (mut stage, mut state) = drawn();
        on_key_down(
            &SceneEvent::KeyDown {
                key: Key::KeyF,
                shift: true,
            },
            &mut stage,
            &mut state,
        );
        assert_eq!(state.queue.front().map(|t| t.direction), Some(-1.0));
    }

    #[test]
    fn test_snap_cleans_rotation_drift() {
        let drifted = Transform::from_xyz(1.0499, 0.0001, -1.0502)
            .with_rotation(Quat::from_rotation_y(FRAC_PI_2 + 1e-3));
        let snapped = snap(drifted);
        assert_eq!(snapped.translation, Vec3::new(SPACING, 0.0, -SPACING));
        let x = snapped.rotation * Vec3::X;
        assert!((x - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
