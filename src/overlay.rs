use glam::{Vec2, Vec3};
use slotmap::SlotMap;

use crate::camera::PerspectiveCamera;
use crate::viewport::Viewport;

slotmap::new_key_type! {
    /// Handle to an element of the [`Overlay`]
    pub struct OverlayId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Button,
    Label,
    Panel,
}

/// A 2D element drawn over the 3D view
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElement {
    pub kind: OverlayKind,
    pub text: String,
    /// Pixel position of the anchor point
    pub position: Vec2,
    pub size: Vec2,
    /// Anchor at the element center instead of its top-left corner
    pub centered: bool,
    pub visible: bool,
    pub color: [f32; 3],
}

impl OverlayElement {
    pub fn button(text: impl Into<String>, position: Vec2) -> Self {
        let text = text.into();
        let size = Vec2::new(16.0 + text.chars().count() as f32 * 8.0, 28.0);
        Self {
            kind: OverlayKind::Button,
            text,
            position,
            size,
            centered: false,
            visible: true,
            color: [0.0, 0.5, 0.5],
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        let text = text.into();
        let size = Vec2::new(8.0 + text.chars().count() as f32 * 7.0, 18.0);
        Self {
            kind: OverlayKind::Label,
            text,
            position: Vec2::ZERO,
            size,
            centered: true,
            visible: true,
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn panel(text: impl Into<String>, position: Vec2, size: Vec2) -> Self {
        Self {
            kind: OverlayKind::Panel,
            text: text.into(),
            position,
            size,
            centered: false,
            visible: true,
            color: [0.0, 0.75, 0.75],
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn top_left(&self) -> Vec2 {
        if self.centered {
            self.position - self.size * 0.5
        } else {
            self.position
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let min = self.top_left();
        let max = min + self.size;
        point.x >= min.x && point.y >= min.y && point.x <= max.x && point.y <= max.y
    }
}

/// Host-owned stand-in for DOM elements layered over the canvas
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    elements: SlotMap<OverlayId, OverlayElement>,
    order: Vec<OverlayId>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: OverlayElement) -> OverlayId {
        let id = self.elements.insert(element);
        self.order.push(id);
        id
    }

    pub fn get(&self, id: OverlayId) -> Option<&OverlayElement> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: OverlayId) -> Option<&mut OverlayElement> {
        self.elements.get_mut(id)
    }

    pub fn remove(&mut self, id: OverlayId) -> Option<OverlayElement> {
        self.order.retain(|&other| other != id);
        self.elements.remove(id)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in insertion order, which is also paint order
    pub fn iter(&self) -> impl Iterator<Item = (OverlayId, &OverlayElement)> {
        self.order
            .iter()
            .filter_map(move |&id| self.elements.get(id).map(|e| (id, e)))
    }

    /// Topmost visible button under the point
    pub fn hit_test(&self, x: f32, y: f32) -> Option<OverlayId> {
        let point = Vec2::new(x, y);
        self.order.iter().rev().copied().find(|&id| {
            self.elements.get(id).is_some_and(|e| {
                e.visible && e.kind == OverlayKind::Button && e.contains(point)
            })
        })
    }

    pub fn find_text(&self, text: &str) -> Option<OverlayId> {
        self.iter().find(|(_, e)| e.text == text).map(|(id, _)| id)
    }
}

/// Projects a world point to window pixels; `None` behind the camera
pub fn project_to_screen(world: Vec3, camera: &PerspectiveCamera, viewport: Viewport) -> Option<Vec2> {
    let ndc = camera.project(world)?;
    Some(viewport.ndc_to_pixel(ndc.truncate()))
}

/// Label that follows a world-space point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelAnchor {
    pub element: OverlayId,
    pub world: Vec3,
}

/// Re-projects every anchored label, hiding those behind the camera
pub fn update_labels(
    anchors: &[LabelAnchor],
    overlay: &mut Overlay,
    camera: &PerspectiveCamera,
    viewport: Viewport,
) {
    for anchor in anchors {
        let Some(element) = overlay.get_mut(anchor.element) else {
            continue;
        };
        match project_to_screen(anchor.world, camera, viewport) {
            Some(screen) => {
                element.position = screen;
                element.visible = true;
            }
            None => element.visible = false,
        }
    }
}
