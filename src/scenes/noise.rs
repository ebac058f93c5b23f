//! Inward-facing noise skybox over a scrolling smooth-noise floor

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec2};

use crate::assets::DataPayload;
use crate::config::SceneConfig;
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::graph::{Geometry, Material, Node, NodeId, Side, Transform};
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};
use crate::texture::{noise_texture, smooth_noise_texture};

use super::common::draw_basic_lights;

pub const NAME: &str = "noise";
pub const SKYBOX_SIZE: f32 = 500.0;
pub const FLOOR_SIZE: f32 = 200.0;
/// Skybox yaw rate in radians per second
pub const SKYBOX_SPIN: f32 = 0.02;
/// Floor texture scroll in UV units per second
pub const SCROLL_SPEED: f32 = 0.05;

const LOG: &str = "gallery::noise";
const TEXTURE_SIZE: u32 = 256;
/// Lattice cells per texel; below 1 so neighbouring texels interpolate
const FLOOR_NOISE_SCALE: f32 = 1.0 / 16.0;

#[derive(Debug, Default)]
pub struct NoiseState {
    pub skybox: Option<NodeId>,
    pub floor: Option<NodeId>,
}

pub fn descriptor() -> SceneDescriptor<NoiseState> {
    SceneDescriptor::new(NAME, NoiseState::default)
        .draw(draw_skybox)
        .draw(draw_floor)
        .animate(animate)
        .config(SceneConfig {
            start_position: glam::vec3(0.0, 5.0, 20.0).into(),
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

fn draw_skybox(
    ctx: &mut DrawContext<'_, NoiseState>,
    state: &mut NoiseState,
    _data: Option<&DataPayload>,
) -> Result<()> {
    let texture = Arc::new(noise_texture(TEXTURE_SIZE));
    let skybox = Node::mesh(
        "skybox",
        Geometry::cube(SKYBOX_SIZE),
        Material::textured(texture).with_side(Side::Back).unlit(),
    );
    state.skybox = Some(ctx.add(skybox)?);
    log::debug!(target: LOG, "skybox ready");
    Ok(())
}

fn draw_floor(
    ctx: &mut DrawContext<'_, NoiseState>,
    state: &mut NoiseState,
    _data: Option<&DataPayload>,
) -> Result<()> {
    let texture = smooth_noise_texture(TEXTURE_SIZE, FLOOR_NOISE_SCALE).with_repeat(4.0, 4.0);
    let floor = Node::mesh(
        "floor",
        Geometry::Plane {
            width: FLOOR_SIZE,
            height: FLOOR_SIZE,
        },
        Material::textured(Arc::new(texture)),
    )
    .with_transform(Transform::IDENTITY.with_rotation(Quat::from_rotation_x(-FRAC_PI_2)));
    state.floor = Some(ctx.add(floor)?);
    draw_basic_lights(ctx.stage)?;
    Ok(())
}

fn animate(frame: &FrameInfo, stage: &mut Stage, state: &mut NoiseState) {
    if let Some(skybox) = state.skybox.and_then(|id| stage.graph.get_mut(id)) {
        skybox.transform.rotation = Quat::from_rotation_y(frame.time * SKYBOX_SPIN);
    }
    match state
        .floor
        .and_then(|id| stage.graph.get_mut(id))
        .and_then(|node| node.material_mut())
    {
        Some(material) => {
            material.uv_offset = Vec2::new((frame.time * SCROLL_SPEED).fract(), 0.0);
        }
        None => log::debug!(target: LOG, "floor not drawn yet"),
    }
}
