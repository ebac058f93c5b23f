use glam::Vec3;

use crate::error::Result;
use crate::graph::{Light, Node, NodeId};
use crate::scene::Stage;

/// Ambient fill plus one white directional key light
pub fn draw_basic_lights(stage: &mut Stage) -> Result<()> {
    stage.add(Node::light("ambient", Light::ambient(0x404040, 1.0)))?;
    stage.add(Node::light(
        "key",
        Light::directional(0xffffff, 1.0, Vec3::new(-1.0, -1.0, -1.0)),
    ))?;
    Ok(())
}

/// Warm directional light high above the ground plane
pub fn draw_sun(stage: &mut Stage) -> Result<NodeId> {
    stage.add(
        Node::light(
            "sun",
            Light::directional(0xfff2cc, 1.2, Vec3::new(-0.5, -1.0, -0.3)),
        )
        .at(Vec3::new(50.0, 100.0, 30.0)),
    )
}

/// Reads an `f32` from a JSON number, accepting integers
pub fn as_f32(value: &serde_json::Value) -> Option<f32> {
    value.as_f64().map(|v| v as f32)
}

/// Colour from a JSON value: a hex string, a colour name or a 24-bit integer
pub fn json_color(value: &serde_json::Value) -> Option<[f32; 3]> {
    match value {
        serde_json::Value::String(text) => crate::math::parse_color(text),
        serde_json::Value::Number(n) => n
            .as_u64()
            .filter(|hex| *hex <= 0xffffff)
            .map(|hex| crate::math::hex_to_rgb(hex as u32)),
        _ => None,
    }
}
