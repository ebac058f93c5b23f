//! Walkable farmyard with glTF buildings and clickable swinging doors

use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::sync::Arc;

use glam::{EulerRot, Quat, Vec2, Vec3};

use crate::animation::DoorAnimator;
use crate::assets::{Asset, AssetRequest, DataPayload};
use crate::config::{ControllerKind, SceneConfig};
use crate::error::Result;
use crate::frame::{FrameInfo, MAX_FRAME_DELTA};
use crate::graph::{Geometry, Material, Node, NodeId, Transform};
use crate::input::{EventKind, Key, PointerButton, SceneEvent};
use crate::picking::pick;
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};
use crate::texture::grass_texture;
use crate::walk::{CollisionWorld, KeyManager, Walker, EYE_HEIGHT, GROUND_Y};

use super::common::draw_sun;

pub const NAME: &str = "farm";
pub const DOOR_TAG: &str = "door";
pub const GROUND_SIZE: f32 = 200.0;

const LOG: &str = "gallery::farm";
const GRASS_TEXTURE_SIZE: u32 = 256;

/// Placement of one building: position, euler rotation (XYZ) and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelLayout {
    pub name: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl ModelLayout {
    pub fn path(&self) -> String {
        format!("farm/{}.glb", self.name)
    }

    pub fn transform(&self) -> Transform {
        let [rx, ry, rz] = self.rotation;
        Transform::from_translation(Vec3::from_array(self.position))
            .with_rotation(Quat::from_euler(EulerRot::XYZ, rx, ry, rz))
            .with_scale(Vec3::from_array(self.scale))
    }
}

const fn layout(name: &'static str, position: [f32; 3], yaw: f32, scale: f32) -> ModelLayout {
    ModelLayout {
        name,
        position,
        rotation: [0.0, yaw, 0.0],
        scale: [scale, scale, scale],
    }
}

pub const FARM_MODELS: [ModelLayout; 9] = [
    ModelLayout {
        name: "Barn",
        position: [0.0, 0.0, 0.0],
        rotation: [0.0, 0.0, 0.0],
        scale: [1.0, 5.0, 1.0],
    },
    layout("Big Barn", [20.0, 0.0, 10.0], FRAC_PI_2, 1.0),
    layout("ChickenCoop", [-10.0, 0.0, 5.0], 0.0, 1.2),
    layout("Fence", [5.0, 0.0, -15.0], FRAC_PI_4, 1.0),
    layout("Open Barn", [25.0, 0.0, -5.0], 0.0, 1.0),
    layout("Silo House", [-20.0, 0.0, -10.0], 0.0, 1.0),
    layout("Silo", [-20.0, 0.0, -20.0], 0.0, 1.0),
    layout("Small Barn", [10.0, 0.0, 15.0], 0.0, 0.8),
    layout("Tower Windmill", [-30.0, 0.0, 20.0], 0.0, 1.0),
];

#[derive(Debug)]
pub struct FarmState {
    pub models: HashMap<&'static str, NodeId>,
    pub doors: DoorAnimator,
    pub collision: CollisionWorld,
    pub keys: KeyManager,
    pub walker: Option<Walker>,
    pub ground: Option<NodeId>,
    turning: f32,
    drag: Option<Vec2>,
}

impl FarmState {
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
            doors: DoorAnimator::new(),
            collision: CollisionWorld::new(),
            keys: KeyManager::new(),
            walker: None,
            ground: None,
            turning: 0.0,
            drag: None,
        }
    }
}

impl Default for FarmState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn descriptor() -> SceneDescriptor<FarmState> {
    SceneDescriptor::new(NAME, FarmState::new)
        .draw(draw_farm)
        .on(EventKind::Click, on_click)
        .on(EventKind::KeyDown, on_key_down)
        .on(EventKind::KeyUp, on_key_up)
        .on(EventKind::PointerDown, on_pointer_down)
        .on(EventKind::PointerUp, on_pointer_up)
        .on(EventKind::PointerMove, on_pointer_move)
        .animate(animate)
        .config(SceneConfig {
            start_position: glam::vec3(0.0, GROUND_Y + EYE_HEIGHT, 35.0).into(),
            look_at: glam::vec3(0.0, GROUND_Y + EYE_HEIGHT, 0.0).into(),
            background: 0x87ceeb,
            controller: ControllerKind::Walking,
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

fn draw_farm(
    ctx: &mut DrawContext<'_, FarmState>,
    state: &mut FarmState,
    _data: Option<&DataPayload>,
) -> Result<()> {
    let grass = grass_texture(GRASS_TEXTURE_SIZE, &mut rand::thread_rng());
    let ground = Node::mesh(
        "ground",
        Geometry::Plane {
            width: GROUND_SIZE,
            height: GROUND_SIZE,
        },
        Material::textured(Arc::new(grass)),
    )
    .with_transform(Transform::IDENTITY.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)));
    state.ground = Some(ctx.add(ground)?);
    draw_sun(ctx.stage)?;

    for model in FARM_MODELS {
        ctx.load(AssetRequest::model(model.path()), move |stage, state, asset| {
            on_model_loaded(stage, state, &model, asset)
        });
    }
    state.walker = Some(Walker::from_camera(&ctx.stage.camera));
    log::info!(target: LOG, "requested {} models", FARM_MODELS.len());
    Ok(())
}

fn on_model_loaded(stage: &mut Stage, state: &mut FarmState, layout: &ModelLayout, asset: Asset) {
    let Some(model) = asset.into_model() else {
        log::warn!(target: LOG, "'{}' did not decode as a model", layout.path());
        return;
    };
    let root = stage.root();
    let group = match model.instantiate(&mut stage.graph, root, layout.name) {
        Ok(group) => group,
        Err(e) => {
            log::warn!(target: LOG, "failed to place '{}': {}", layout.name, e);
            return;
        }
    };
    if let Some(node) = stage.graph.get_mut(group) {
        node.transform = layout.transform();
    }
    state.models.insert(layout.name, group);

    let meshes: Vec<NodeId> = stage
        .graph
        .descendants(group)
        .into_iter()
        .filter(|id| stage.graph.get(*id).is_some_and(|n| n.geometry().is_some()))
        .collect();
    for id in meshes {
        let is_door = stage.graph.get(id).is_some_and(|n| n.name.contains("Door"));
        if is_door {
            if let Some(node) = stage.graph.get_mut(id) {
                node.tags.push(DOOR_TAG.to_string());
            }
            if let Err(e) = state.doors.register(&stage.graph, id) {
                log::warn!(target: LOG, "door registration failed: {}", e);
            }
            continue;
        }
        if let Ok(Some(bounds)) = stage.graph.node_world_bounds(id) {
            state.collision.add_box(bounds);
        }
    }
    log::info!(
        target: LOG,
        "placed '{}': {} doors, {} obstacles so far",
        layout.name,
        state.doors.len(),
        state.collision.len()
    );
}

fn on_click(event: &SceneEvent, stage: &mut Stage, state: &mut FarmState) {
    let SceneEvent::Click { x, y, .. } = *event else {
        return;
    };
    let hit = pick(&stage.graph, &stage.camera, stage.viewport, x, y, |_, node| {
        node.has_tag(DOOR_TAG)
    });
    let Some(hit) = hit else {
        return;
    };
    if !state.doors.toggle(hit.node) {
        log::debug!(target: LOG, "door still swinging");
    }
}

fn on_key_down(event: &SceneEvent, _stage: &mut Stage, state: &mut FarmState) {
    if let SceneEvent::KeyDown { key, .. } = *event {
        match key {
            Key::KeyQ => state.turning = 1.0,
            Key::KeyE => state.turning = -1.0,
            other => {
                state.keys.key_down(other);
            }
        }
    }
}

fn on_key_up(event: &SceneEvent, _stage: &mut Stage, state: &mut FarmState) {
    if let SceneEvent::KeyUp { key } = *event {
        match key {
            Key::KeyQ | Key::KeyE => state.turning = 0.0,
            other => {
                state.keys.key_up(other);
            }
        }
    }
}

fn on_pointer_down(event: &SceneEvent, _stage: &mut Stage, state: &mut FarmState) {
    if let SceneEvent::PointerDown {
        x,
        y,
        button: PointerButton::Left,
    } = *event
    {
        state.drag = Some(Vec2::new(x, y));
    }
}

fn on_pointer_up(_event: &SceneEvent, _stage: &mut Stage, state: &mut FarmState) {
    state.drag = None;
}

fn on_pointer_move(event: &SceneEvent, _stage: &mut Stage, state: &mut FarmState) {
    let SceneEvent::PointerMove { x, y } = *event else {
        return;
    };
    let (Some(last), Some(walker)) = (state.drag, state.walker.as_mut()) else {
        return;
    };
    walker.look(x - last.x, y - last.y);
    state.drag = Some(Vec2::new(x, y));
}

fn animate(frame: &FrameInfo, stage: &mut Stage, state: &mut FarmState) {
    let delta = frame.delta.min(MAX_FRAME_DELTA);
    state.doors.update(delta, &mut stage.graph);

    let Some(walker) = state.walker.as_mut() else {
        log::warn!(target: LOG, "walking controls missing");
        return;
    };
    if state.turning != 0.0 {
        walker.turn(state.turning, delta);
    }
    walker.step(&mut state.keys, &state.collision, &mut stage.camera, delta);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths_and_transforms() {
        assert_eq!(FARM_MODELS[1].path(), "farm/Big Barn.glb");
        let barn = FARM_MODELS[0].transform();
        assert_eq!(barn.scale, Vec3::new(1.0, 5.0, 1.0));
        let big = FARM_MODELS[1].transform();
        let turned = big.rotation * Vec3::X;
        assert!((turned - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_animate_without_walker_only_warns() {
        let mut stage = Stage::new(crate::viewport::Viewport::new(640, 480));
        let mut state = FarmState::new();
        let before = stage.camera;
        animate(&FrameInfo::new(1, 0.1, 0.1), &mut stage, &mut state);
        assert_eq!(stage.camera, before);
    }

    #[test]
    fn test_turn_keys_set_and_clear() {
        let mut stage = Stage::new(crate::viewport::Viewport::new(640, 480));
        let mut state = FarmState::new();
        on_key_down(
            &SceneEvent::KeyDown {
                key: Key::KeyQ,
                shift: false,
            },
            &mut stage,
            &mut state,
        );
        assert_eq!(state.turning, 1.0);
        on_key_up(&SceneEvent::KeyUp { key: Key::KeyQ }, &mut stage, &mut state);
        assert_eq!(state.turning, 0.0);
    }
}
