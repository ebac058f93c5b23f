use glam::{Mat4, Vec2, Vec3};

use super::canvas::{Canvas, DrawOp, Rgba};
use crate::graph::{Geometry, LightKind, Material, Node, NodeKind, SceneGraph};
use crate::math::{rgb_to_bytes, AABB};
use crate::overlay::{OverlayElement, OverlayKind};
use crate::scene::Stage;
use crate::viewport::Viewport;

/// Brightness floor so unlit corners of a lit scene stay readable
const MIN_SHADE: f32 = 0.15;

const FACE_NORMALS: [Vec3; 6] = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];

/// CPU rasterizer that paints a [`Stage`] into an RGBA buffer.
///
/// Meshes are painted back to front as flat screen-space footprints of their
/// bounds, spheres as discs, lines and text as strokes and glyph blocks.
/// The overlay is drawn last.
#[derive(Debug, Clone)]
pub struct Preview {
    canvas: Canvas,
}

struct Drawable<'a> {
    node: &'a Node,
    world: Mat4,
    depth: f32,
}

impl Preview {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            canvas: Canvas::new(viewport.width, viewport.height),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn render(&mut self, stage: &Stage) -> &[u8] {
        self.canvas.resize(stage.viewport.width, stage.viewport.height);
        self.canvas.draw(DrawOp::Clear(rgb_to_bytes(stage.background)));

        let shade = light_level(&stage.graph);
        for drawable in collect_drawables(stage) {
            self.draw_mesh(stage, &drawable, shade);
        }
        self.canvas.flush();

        for (_, element) in stage.overlay.iter() {
            if element.visible {
                self.draw_element(element);
            }
        }
        self.canvas.flush();

        self.canvas.pixels()
    }

    fn draw_mesh(&mut self, stage: &Stage, drawable: &Drawable<'_>, shade: f32) {
        let NodeKind::Mesh { geometry, material } = &drawable.node.kind else {
            return;
        };
        let world = drawable.world;

        match geometry {
            Geometry::Line { points } => {
                let color = tint(material.color, material.opacity, 1.0);
                let projected: Vec<Option<Vec2>> = points
                    .iter()
                    .map(|p| project_pixel(stage, world.transform_point3(*p)))
                    .collect();
                for pair in projected.windows(2) {
                    if let [Some(a), Some(b)] = pair {
                        self.canvas.draw(DrawOp::Line {
                            x1: a.x as i32,
                            y1: a.y as i32,
                            x2: b.x as i32,
                            y2: b.y as i32,
                            color,
                        });
                    }
                }
            }
            Geometry::Text { content, size } => {
                let count = content.chars().count().max(1) as f32;
                let width = geometry.local_bounds().size().x;
                let origin = project_pixel(stage, world.transform_point3(Vec3::ZERO));
                let end = project_pixel(stage, world.transform_point3(Vec3::X * width));
                let top = project_pixel(stage, world.transform_point3(Vec3::Y * *size));
                if let (Some(origin), Some(end), Some(top)) = (origin, end, top) {
                    let cell = Vec2::new(origin.distance(end) / count, origin.distance(top));
                    let color = tint(material.color, material.opacity, 1.0);
                    greek(&mut self.canvas, origin - Vec2::new(0.0, cell.y), cell, content, color);
                }
            }
            Geometry::Sphere { radius } => {
                let center = world.transform_point3(Vec3::ZERO);
                let scale = world.transform_vector3(Vec3::X).length();
                let rim = center + stage.camera.right() * *radius * scale;
                if let (Some(c), Some(r)) = (project_pixel(stage, center), project_pixel(stage, rim)) {
                    self.canvas.draw(DrawOp::FilledCircle {
                        cx: c.x as i32,
                        cy: c.y as i32,
                        radius: clamp_pixel(c.distance(r)).max(1),
                        color: tint(material.color, material.opacity, surface_shade(material, shade)),
                    });
                }
            }
            Geometry::Box { .. } | Geometry::Plane { .. } | Geometry::Hull { .. } => {
                let bounds = geometry.local_bounds().transformed(&world);
                let Some(rect) = footprint(stage, &bounds) else {
                    return;
                };
                let rgb = facing_color(stage, material, &world, bounds.center());
                match &material.texture {
                    Some(_) => {
                        // Textured fills are immediate; flush so ordering holds
                        self.canvas.flush();
                        self.fill_textured(rect, material, surface_shade(material, shade));
                    }
                    None => {
                        let (min, size) = rect;
                        self.canvas.draw(DrawOp::Rect {
                            x: clamp_pixel(min.x),
                            y: clamp_pixel(min.y),
                            width: clamp_pixel(size.x).max(1),
                            height: clamp_pixel(size.y).max(1),
                            color: tint(rgb, material.opacity, surface_shade(material, shade)),
                        });
                    }
                }
            }
        }
    }

    fn fill_textured(&mut self, (min, size): (Vec2, Vec2), material: &Material, shade: f32) {
        let Some(texture) = &material.texture else {
            return;
        };
        let (width, height) = self.canvas.dimensions();
        let x0 = min.x.max(0.0) as i32;
        let y0 = min.y.max(0.0) as i32;
        let x1 = (min.x + size.x).min(width as f32) as i32;
        let y1 = (min.y + size.y).min(height as f32) as i32;
        let span = size.max(Vec2::ONE);

        for py in y0..y1 {
            for px in x0..x1 {
                let uv = (Vec2::new(px as f32, py as f32) - min) / span;
                let texel = texture.sample(uv, material.uv_offset);
                let rgb = [
                    texel[0] as f32 / 255.0 * material.color[0],
                    texel[1] as f32 / 255.0 * material.color[1],
                    texel[2] as f32 / 255.0 * material.color[2],
                ];
                let opacity = material.opacity * texel[3] as f32 / 255.0;
                self.canvas.blend(px, py, tint(rgb, opacity, shade));
            }
        }
    }

    fn draw_element(&mut self, element: &OverlayElement) {
        let corner = element.top_left();
        let (x, y) = (clamp_pixel(corner.x), clamp_pixel(corner.y));
        let (width, height) = (clamp_pixel(element.size.x), clamp_pixel(element.size.y));
        let white = [255, 255, 255, 255];

        match element.kind {
            OverlayKind::Button | OverlayKind::Panel => {
                let alpha = if element.kind == OverlayKind::Button { 0.85 } else { 0.25 };
                self.canvas.draw(DrawOp::Rect {
                    x,
                    y,
                    width,
                    height,
                    color: tint(element.color, alpha, 1.0),
                });
                self.canvas.draw(DrawOp::Frame { x, y, width, height, color: white });
                greek(&mut self.canvas, corner + Vec2::new(8.0, 10.0), Vec2::new(8.0, 8.0), &element.text, white);
            }
            OverlayKind::Label => {
                let color = tint(element.color, 1.0, 1.0);
                greek(&mut self.canvas, corner + Vec2::new(4.0, 5.0), Vec2::new(7.0, 8.0), &element.text, color);
            }
        }
    }
}

fn collect_drawables(stage: &Stage) -> Vec<Drawable<'_>> {
    let view = stage.camera.view_matrix();
    let mut drawables: Vec<Drawable<'_>> = stage
        .graph
        .iter()
        .filter(|(_, node)| matches!(node.kind, NodeKind::Mesh { .. }))
        .filter(|(id, _)| stage.graph.is_visible(*id))
        .filter_map(|(id, node)| {
            let world = stage.graph.world_matrix(id).ok()?;
            let center = node.local_bounds()?.center();
            let depth = -view.transform_point3(world.transform_point3(center)).z;
            Some(Drawable { node, world, depth })
        })
        .collect();
    drawables.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    drawables
}

/// Sum of light contributions, or full brightness when the graph has no lights
fn light_level(graph: &SceneGraph) -> f32 {
    let mut level = 0.0;
    let mut any = false;
    for (id, node) in graph.iter() {
        let NodeKind::Light(light) = &node.kind else {
            continue;
        };
        if !graph.is_visible(id) {
            continue;
        }
        any = true;
        let luma = (light.color[0] + light.color[1] + light.color[2]) / 3.0;
        let weight = match light.kind {
            LightKind::Ambient => 1.0,
            LightKind::Directional { .. } => 0.6,
            LightKind::Point { .. } => 0.4,
        };
        level += luma * light.intensity * weight;
    }
    if any {
        level.clamp(MIN_SHADE, 1.0)
    } else {
        1.0
    }
}

fn surface_shade(material: &Material, shade: f32) -> f32 {
    if material.unlit {
        1.0
    } else {
        shade
    }
}

/// Colour of the box face pointing most toward the camera
fn facing_color(stage: &Stage, material: &Material, world: &Mat4, center: Vec3) -> [f32; 3] {
    let Some(faces) = material.face_colors else {
        return material.color;
    };
    let toward = (stage.camera.position - center).normalize_or_zero();
    let mut best = (f32::NEG_INFINITY, material.color);
    for (normal, color) in FACE_NORMALS.iter().zip(faces) {
        let facing = world.transform_vector3(*normal).normalize_or_zero().dot(toward);
        if facing > best.0 {
            best = (facing, color);
        }
    }
    best.1
}

/// Screen rectangle covered by world bounds as `(min, size)`
fn footprint(stage: &Stage, bounds: &AABB) -> Option<(Vec2, Vec2)> {
    let viewport_size = Vec2::new(stage.viewport.width as f32, stage.viewport.height as f32);
    if bounds.contains_point(stage.camera.position) {
        return Some((Vec2::ZERO, viewport_size));
    }

    let projected: Vec<Vec2> = bounds
        .corners()
        .iter()
        .filter_map(|corner| project_pixel(stage, *corner))
        .collect();
    if projected.is_empty() {
        return None;
    }
    let mut min = projected.iter().fold(Vec2::splat(f32::INFINITY), |m, p| m.min(*p));
    let mut max = projected.iter().fold(Vec2::splat(f32::NEG_INFINITY), |m, p| m.max(*p));

    // Straddles the camera plane: stretch toward the bottom edge like a floor
    if projected.len() < 8 {
        min.x = 0.0;
        max.x = viewport_size.x;
        max.y = viewport_size.y;
    }

    let min = min.clamp(Vec2::splat(-1.0), viewport_size + 1.0);
    let max = max.clamp(Vec2::splat(-1.0), viewport_size + 1.0);
    Some((min, (max - min).max(Vec2::ZERO)))
}

fn project_pixel(stage: &Stage, world: Vec3) -> Option<Vec2> {
    let ndc = stage.camera.project(world)?;
    Some(stage.viewport.ndc_to_pixel(ndc.truncate()))
}

fn clamp_pixel(value: f32) -> i32 {
    value.clamp(-16384.0, 16384.0) as i32
}

fn tint(rgb: [f32; 3], opacity: f32, shade: f32) -> Rgba {
    let mut bytes = rgb_to_bytes([rgb[0] * shade, rgb[1] * shade, rgb[2] * shade]);
    bytes[3] = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    bytes
}

/// Block glyphs standing in for rendered text
fn greek(canvas: &mut Canvas, origin: Vec2, cell: Vec2, text: &str, color: Rgba) {
    let glyph = Vec2::new((cell.x * 0.7).max(1.0), cell.y.max(1.0));
    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let at = origin + Vec2::new(i as f32 * cell.x, 0.0);
        canvas.draw(DrawOp::Rect {
            x: clamp_pixel(at.x),
            y: clamp_pixel(at.y),
            width: clamp_pixel(glyph.x),
            height: clamp_pixel(glyph.y),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Light, Material};
    use crate::overlay::OverlayElement;
    use std::sync::Arc;

    use crate::texture::TextureData;

    fn stage() -> Stage {
        Stage::new(Viewport::new(64, 48))
    }

    fn center_pixel(preview: &Preview) -> [u8; 4] {
        preview.canvas().pixel(32, 24).unwrap()
    }

    #[test]
    fn test_empty_stage_is_background() {
        let mut stage = stage();
        stage.background = [0.0, 0.0, 1.0];
        let mut preview = Preview::new(stage.viewport);
        let pixels = preview.render(&stage);
        assert_eq!(pixels.len(), 64 * 48 * 4);
        assert_eq!(&pixels[0..4], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_box_at_target_covers_center() {
        let mut stage = stage();
        stage
            .add(Node::mesh("box", Geometry::cube(1.0), Material::color(0xff0000).unlit()))
            .unwrap();
        let mut preview = Preview::new(stage.viewport);
        preview.render(&stage);
        assert_eq!(center_pixel(&preview), [255, 0, 0, 255]);
        assert_eq!(preview.canvas().pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_nearer_mesh_wins() {
        let mut stage = stage();
        stage
            .add(Node::mesh("far", Geometry::cube(1.0), Material::color(0xff0000).unlit()))
            .unwrap();
        stage
            .add(
                Node::mesh("near", Geometry::Sphere { radius: 0.3 }, Material::color(0x00ff00).unlit())
                    .at(Vec3::new(0.0, 0.4, 1.0)),
            )
            .unwrap();
        let mut preview = Preview::new(stage.viewport);
        preview.render(&stage);

        let near = stage.camera.project(Vec3::new(0.0, 0.4, 1.0)).unwrap();
        let pixel = stage.viewport.ndc_to_pixel(near.truncate());
        let texel = preview.canvas().pixel(pixel.x as u32, pixel.y as u32).unwrap();
        assert_eq!(texel, [0, 255, 0, 255]);
    }

    #[test]
    fn test_hidden_mesh_is_skipped() {
        let mut stage = stage();
        let id = stage
            .add(Node::mesh("box", Geometry::cube(1.0), Material::color(0xff0000).unlit()))
            .unwrap();
        stage.graph.node_mut(id).unwrap().visible = false;
        let mut preview = Preview::new(stage.viewport);
        preview.render(&stage);
        assert_eq!(center_pixel(&preview), [0, 0, 0, 255]);
    }

    #[test]
    fn test_lighting_darkens_lit_materials() {
        let mut stage = stage();
        stage.add(Node::light("ambient", Light::ambient(0xffffff, 0.5))).unwrap();
        stage
            .add(Node::mesh("box", Geometry::cube(1.0), Material::color(0xffffff)))
            .unwrap();
        let mut preview = Preview::new(stage.viewport);
        preview.render(&stage);
        let texel = center_pixel(&preview);
        assert!((texel[0] as i32 - 128).abs() <= 1, "{:?}", texel);
    }

    #[test]
    fn test_textured_plane_samples_texture() {
        let mut stage = stage();
        let texture = Arc::new(TextureData::solid(2, 2, [10, 200, 30, 255]));
        stage
            .add(Node::mesh(
                "plane",
                Geometry::Plane { width: 2.0, height: 2.0 },
                Material::textured(texture).unlit(),
            ))
            .unwrap();
        let mut preview = Preview::new(stage.viewport);
        preview.render(&stage);
        assert_eq!(center_pixel(&preview), [10, 200, 30, 255]);
    }

    #[test]
    fn test_overlay_button_is_drawn() {
        let mut stage = stage();
        stage.overlay.add(OverlayElement::button("Go", Vec2::new(2.0, 2.0)));
        let mut preview = Preview::new(stage.viewport);
        preview.render(&stage);
        // Frame corner is white
        assert_eq!(preview.canvas().pixel(2, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_resize_follows_viewport() {
        let mut stage = stage();
        let mut preview = Preview::new(stage.viewport);
        stage.resize(20, 10);
        let pixels = preview.render(&stage);
        assert_eq!(pixels.len(), 20 * 10 * 4);
    }
}
