use std::sync::Arc;

use glam::{Vec2, Vec3};

use super::{NodeId, Transform};
use crate::math::{hex_to_rgb, AABB};
use crate::texture::TextureData;

/// Closed set of primitive shapes a mesh node can carry
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    /// Lies in the local XY plane
    Plane { width: f32, height: f32 },
    /// Flat text starting at the local origin
    Text { content: String, size: f32 },
    Line { points: Vec<Vec3> },
    /// Explicit local bounds, used for imported model meshes
    Hull { bounds: AABB },
}

impl Geometry {
    pub fn cube(size: f32) -> Self {
        Geometry::Box {
            width: size,
            height: size,
            depth: size,
        }
    }

    pub fn local_bounds(&self) -> AABB {
        match self {
            Geometry::Box { width, height, depth } => {
                AABB::from_center_size(Vec3::ZERO, Vec3::new(*width, *height, *depth))
            }
            Geometry::Sphere { radius } => AABB::new(Vec3::splat(-radius), Vec3::splat(*radius)),
            Geometry::Plane { width, height } => {
                AABB::from_center_size(Vec3::ZERO, Vec3::new(*width, *height, 0.0))
            }
            Geometry::Text { content, size } => {
                let width = content.chars().count() as f32 * size * 0.6;
                AABB::new(Vec3::ZERO, Vec3::new(width, *size, 0.0))
            }
            Geometry::Line { points } => {
                if points.is_empty() {
                    AABB::new(Vec3::ZERO, Vec3::ZERO)
                } else {
                    AABB::from_points(points.iter().copied())
                }
            }
            Geometry::Hull { bounds } => *bounds,
        }
    }
}

/// Which faces of a mesh are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    /// Per-face colours in +x, -x, +y, -y, +z, -z order
    pub face_colors: Option<[[f32; 3]; 6]>,
    pub texture: Option<Arc<TextureData>>,
    pub uv_offset: Vec2,
    pub side: Side,
    pub unlit: bool,
}

impl Material {
    pub fn color(hex: u32) -> Self {
        Self::rgb(hex_to_rgb(hex))
    }

    pub fn rgb(color: [f32; 3]) -> Self {
        Self {
            color,
            opacity: 1.0,
            face_colors: None,
            texture: None,
            uv_offset: Vec2::ZERO,
            side: Side::Front,
            unlit: false,
        }
    }

    pub fn textured(texture: Arc<TextureData>) -> Self {
        Self {
            texture: Some(texture),
            ..Self::color(0xffffff)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_faces(mut self, faces: [[f32; 3]; 6]) -> Self {
        self.face_colors = Some(faces);
        self
    }

    pub fn unlit(mut self) -> Self {
        self.unlit = true;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::color(0xcccccc)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional { direction: Vec3 },
    Point { range: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Light {
    pub fn ambient(hex: u32, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color: hex_to_rgb(hex),
            intensity,
        }
    }

    pub fn directional(hex: u32, intensity: f32, direction: Vec3) -> Self {
        Self {
            kind: LightKind::Directional {
                direction: direction.normalize_or_zero(),
            },
            color: hex_to_rgb(hex),
            intensity,
        }
    }

    pub fn point(hex: u32, intensity: f32, range: f32) -> Self {
        Self {
            kind: LightKind::Point { range },
            color: hex_to_rgb(hex),
            intensity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group,
    Mesh { geometry: Geometry, material: Material },
    Light(Light),
}

/// A scene graph entry; parent and children links are owned by the graph
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
    pub tags: Vec<String>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            kind,
            visible: true,
            tags: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self::new(name, NodeKind::Mesh { geometry, material })
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    pub fn line(name: impl Into<String>, points: Vec<Vec3>, hex: u32) -> Self {
        Self::mesh(name, Geometry::Line { points }, Material::color(hex).unlit())
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.kind {
            NodeKind::Mesh { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match &mut self.kind {
            NodeKind::Mesh { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    pub fn material(&self) -> Option<&Material> {
        match &self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } => Some(material),
            _ => None,
        }
    }

    /// Geometry bounds in the node's own space, `None` for groups and lights
    pub fn local_bounds(&self) -> Option<AABB> {
        self.geometry().map(Geometry::local_bounds)
    }
}
