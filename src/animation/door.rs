use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use crate::error::Result;
use crate::graph::{NodeId, SceneGraph, Transform};
use crate::math::ease_out_cubic;

pub const DOOR_SWING: f32 = FRAC_PI_2;
pub const DOOR_DURATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorState {
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorTween {
    pub elapsed: f32,
    pub duration: f32,
    pub start: f32,
    pub end: f32,
}

impl DoorTween {
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.duration).min(1.0)
    }

    pub fn angle(&self) -> f32 {
        self.start + (self.end - self.start) * ease_out_cubic(self.progress())
    }
}

/// A door swinging about a vertical hinge on its local -x edge
#[derive(Debug, Clone, PartialEq)]
pub struct HingedDoor {
    base: Transform,
    pivot: Vec3,
    angle: f32,
    state: DoorState,
    tween: Option<DoorTween>,
}

impl HingedDoor {
    /// `width` is the door's local extent along x, before scaling
    pub fn new(base: Transform, width: f32) -> Self {
        let hinge = Vec3::new(-width * 0.5, 0.0, 0.0);
        let pivot = base.translation + base.rotation * (hinge * base.scale);
        Self {
            base,
            pivot,
            angle: 0.0,
            state: DoorState::Closed,
            tween: None,
        }
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Starts opening or closing. Ignored while a swing is running.
    pub fn toggle(&mut self) -> bool {
        if self.tween.is_some() {
            return false;
        }
        let (end, state) = match self.state {
            DoorState::Closed => (self.angle + DOOR_SWING, DoorState::Open),
            DoorState::Open => (self.angle - DOOR_SWING, DoorState::Closed),
        };
        self.tween = Some(DoorTween {
            elapsed: 0.0,
            duration: DOOR_DURATION,
            start: self.angle,
            end,
        });
        self.state = state;
        true
    }

    /// Advances the swing; returns true while the angle changed this step
    pub fn update(&mut self, delta: f32) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        tween.elapsed += delta;
        self.angle = tween.angle();
        if tween.progress() >= 1.0 {
            self.angle = tween.end;
            self.tween = None;
        }
        true
    }

    /// Local transform: the base rotated about the hinge by the current angle
    pub fn transform(&self) -> Transform {
        self.base
            .rotated_about(self.pivot, Quat::from_rotation_y(self.angle))
    }
}

/// Every clickable door of a scene, keyed by its node
#[derive(Debug, Clone, Default)]
pub struct DoorAnimator {
    doors: HashMap<NodeId, HingedDoor>,
}

impl DoorAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the node's current transform and geometry width as its closed pose
    pub fn register(&mut self, graph: &SceneGraph, node: NodeId) -> Result<()> {
        let door = graph.node(node)?;
        let width = door.local_bounds().map_or(1.0, |b| b.size().x);
        self.doors
            .insert(node, HingedDoor::new(door.transform, width));
        Ok(())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.doors.contains_key(&node)
    }

    pub fn get(&self, node: NodeId) -> Option<&HingedDoor> {
        self.doors.get(&node)
    }

    pub fn len(&self) -> usize {
        self.doors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    pub fn toggle(&mut self, node: NodeId) -> bool {
        self.doors.get_mut(&node).is_some_and(HingedDoor::toggle)
    }

    /// Steps every swinging door and writes its transform into the graph
    pub fn update(&mut self, delta: f32, graph: &mut SceneGraph) {
        for (&node, door) in self.doors.iter_mut() {
            if !door.update(delta) {
                continue;
            }
            match graph.get_mut(node) {
                Some(target) => target.transform = door.transform(),
                None => log::debug!("door node {:?} left the graph", node),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Geometry, Material, Node};

    fn run(door: &mut HingedDoor, seconds: f32) {
        let steps = (seconds / 0.05).ceil() as usize + 1;
        for _ in 0..steps {
            door.update(0.05);
        }
    }

    #[test]
    fn test_open_ends_at_quarter_turn() {
        let mut door = HingedDoor::new(Transform::IDENTITY, 2.0);
        assert!(door.toggle());
        run(&mut door, 1.0);
        assert!(!door.is_animating());
        assert!((door.angle() - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(door.state(), DoorState::Open);
    }

    #[test]
    fn test_close_returns_to_zero() {
        let mut door = HingedDoor::new(Transform::IDENTITY, 2.0);
        door.toggle();
        run(&mut door, 1.0);
        door.toggle();
        run(&mut door, 1.0);
        assert!(door.angle().abs() < 1e-6);
        assert_eq!(door.state(), DoorState::Closed);
        assert!(door.transform().translation.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_click_during_swing_is_ignored() {
        let mut door = HingedDoor::new(Transform::IDENTITY, 2.0);
        door.toggle();
        door.update(0.3);
        assert!(!door.toggle());
        assert_eq!(door.state(), DoorState::Open);
    }

    #[test]
    fn test_midway_angle_follows_ease_out() {
        let mut door = HingedDoor::new(Transform::IDENTITY, 2.0);
        door.toggle();
        door.update(0.5);
        assert!((door.angle() - FRAC_PI_2 * 0.875).abs() < 1e-5);
    }

    #[test]
    fn test_hinge_edge_stays_fixed() {
        let base = Transform::from_xyz(5.0, 0.0, 3.0);
        let mut door = HingedDoor::new(base, 2.0);
        let hinge = Vec3::new(4.0, 0.0, 3.0);
        assert!(door.pivot().abs_diff_eq(hinge, 1e-6));

        door.toggle();
        run(&mut door, 1.0);
        let t = door.transform();
        let hinge_after = t.translation + t.rotation * Vec3::new(-1.0, 0.0, 0.0);
        assert!(hinge_after.abs_diff_eq(hinge, 1e-5));
        // the free edge swung a quarter turn about +y
        let free_edge = t.translation + t.rotation * Vec3::new(1.0, 0.0, 0.0);
        assert!(free_edge.abs_diff_eq(Vec3::new(4.0, 0.0, 1.0), 1e-5));
    }

    #[test]
    fn test_animator_writes_graph() {
        let mut graph = SceneGraph::new();
        let node = graph
            .add(
                graph.root(),
                Node::mesh(
                    "Door",
                    Geometry::Box {
                        width: 2.0,
                        height: 3.0,
                        depth: 0.1,
                    },
                    Material::default(),
                )
                .at(Vec3::new(1.0, 1.5, 0.0)),
            )
            .unwrap();

        let mut animator = DoorAnimator::new();
        animator.register(&graph, node).unwrap();
        assert!(animator.toggle(node));
        for _ in 0..20 {
            animator.update(0.1, &mut graph);
        }
        let rotation = graph.node(node).unwrap().transform.rotation;
        assert!(rotation.abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), 1e-5));
        assert!(!animator.get(node).unwrap().is_animating());
    }
}
