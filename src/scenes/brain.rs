//! Labelled cortical regions of both hemispheres, DKT atlas naming

use glam::Vec3;
use rand::Rng;

use crate::assets::DataPayload;
use crate::config::{OverlayMode, SceneConfig};
use crate::error::Result;
use crate::frame::FrameInfo;
use crate::graph::{Geometry, Light, Material, Node, NodeId};
use crate::overlay::{update_labels, LabelAnchor, OverlayElement};
use crate::scene::{ActiveScene, DrawContext, SceneDescriptor, Stage};

pub const NAME: &str = "brain";
pub const LH_PREFIX: &str = "lh.pial.DKT.";
pub const RH_PREFIX: &str = "rh.pial.DKT.";
/// Offset from a region's center to its label
pub const LABEL_OFFSET: Vec3 = Vec3::new(0.0, 10.0, 0.0);

const LOG: &str = "gallery::brain";
const REGION_RADIUS: f32 = 6.0;
/// Semi-axes of the ellipsoid the regions sit on, per hemisphere
const HEMISPHERE_AXES: Vec3 = Vec3::new(30.0, 45.0, 65.0);
const HEMISPHERE_GAP: f32 = 8.0;

pub const REGION_NAMES: [&str; 32] = [
    "caudalanteriorcingulate",
    "caudalmiddlefrontal",
    "cuneus",
    "entorhinal",
    "fusiform",
    "inferiorparietal",
    "inferiortemporal",
    "insula",
    "isthmuscingulate",
    "lateraloccipital",
    "lateralorbitofrontal",
    "lingual",
    "medialorbitofrontal",
    "middletemporal",
    "paracentral",
    "parahippocampal",
    "parsopercularis",
    "parsorbitalis",
    "parstriangularis",
    "pericalcarine",
    "postcentral",
    "posteriorcingulate",
    "precentral",
    "precuneus",
    "rostralanteriorcingulate",
    "rostralmiddlefrontal",
    "superiorfrontal",
    "superiorparietal",
    "superiortemporal",
    "supramarginal",
    "transversetemporal",
    "unknown",
];

/// Left hemisphere names first, then right
pub fn region_names() -> impl Iterator<Item = String> {
    let left = REGION_NAMES.iter().map(|name| format!("{LH_PREFIX}{name}"));
    let right = REGION_NAMES.iter().map(|name| format!("{RH_PREFIX}{name}"));
    left.chain(right)
}

#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub mesh: NodeId,
    pub leader: NodeId,
    pub label: LabelAnchor,
}

#[derive(Debug, Default)]
pub struct BrainState {
    pub regions: Vec<Region>,
    anchors: Vec<LabelAnchor>,
}

pub fn descriptor() -> SceneDescriptor<BrainState> {
    SceneDescriptor::new(NAME, BrainState::default)
        .draw(draw_brain)
        .animate(animate)
        .config(SceneConfig {
            start_position: glam::vec3(0.0, 60.0, 220.0).into(),
            overlay: OverlayMode::Flat,
            ..SceneConfig::default()
        })
}

pub fn create() -> Box<dyn ActiveScene> {
    Box::new(descriptor().instantiate())
}

/// Position of region `index` of `count` on one hemisphere, `side` is -1 or 1
fn region_position(index: usize, count: usize, side: f32) -> Vec3 {
    let golden = std::f32::consts::PI * (3.0 - 5f32.sqrt());
    let y = 1.0 - 2.0 * (index as f32 + 0.5) / count as f32;
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden * index as f32;
    let unit = Vec3::new(ring * theta.cos(), y, ring * theta.sin());
    let lateral = unit.x.abs() * side;
    Vec3::new(lateral, unit.y, unit.z) * HEMISPHERE_AXES + Vec3::X * side * HEMISPHERE_GAP
}

fn draw_brain(
    ctx: &mut DrawContext<'_, BrainState>,
    state: &mut BrainState,
    _data: Option<&DataPayload>,
) -> Result<()> {
    ctx.add(Node::light("ambient", Light::ambient(0xffffff, 0.6)))?;
    ctx.add(Node::light(
        "key",
        Light::directional(0xffffff, 0.8, Vec3::new(0.0, -1.0, -1.0)),
    ))?;

    let mut rng = rand::thread_rng();
    let per_side = REGION_NAMES.len();
    for (i, name) in region_names().enumerate() {
        let side = if i < per_side { -1.0 } else { 1.0 };
        let center = region_position(i % per_side, per_side, side);
        let color = [rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()];

        let mesh = ctx.add(
            Node::mesh(
                name.clone(),
                Geometry::Sphere {
                    radius: REGION_RADIUS,
                },
                Material::rgb(color),
            )
            .at(center),
        )?;

        let label_world = center + LABEL_OFFSET;
        let leader = ctx.add(Node::line(
            format!("{name}-leader"),
            vec![center, label_world],
            0xffffff,
        ))?;
        let element = ctx.stage.overlay.add(OverlayElement::label(name));
        let label = LabelAnchor {
            element,
            world: label_world,
        };
        state.regions.push(Region {
            mesh,
            leader,
            label,
        });
        state.anchors.push(label);
    }

    update_labels(
        &state.anchors,
        &mut ctx.stage.overlay,
        &ctx.stage.camera,
        ctx.stage.viewport,
    );
    log::info!(target: LOG, "placed {} regions", state.regions.len());
    Ok(())
}

fn animate(_frame: &FrameInfo, stage: &mut Stage, state: &mut BrainState) {
    if state.anchors.is_empty() {
        return;
    }
    update_labels(&state.anchors, &mut stage.overlay, &stage.camera, stage.viewport);
}
