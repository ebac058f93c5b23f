use std::collections::HashMap;

use glam::Vec3;

use crate::math::AABB;

/// Edge of a spatial hash cell on the XZ plane, in metres
pub const TILE_SIZE: f32 = 2.0;

/// Static obstacle boxes hashed into XZ tiles
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    boxes: Vec<AABB>,
    cells: HashMap<(i32, i32), Vec<usize>>,
}

fn tile_of(x: f32, z: f32) -> (i32, i32) {
    ((x / TILE_SIZE).floor() as i32, (z / TILE_SIZE).floor() as i32)
}

/// Box occupied by a player of `size` standing at `position`
pub fn player_box(size: f32, position: Vec3) -> AABB {
    AABB::from_center_size(position, Vec3::new(size, size * 2.0, size))
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn boxes(&self) -> &[AABB] {
        &self.boxes
    }

    /// Registers a box in every tile its XZ footprint covers
    pub fn add_box(&mut self, bounds: AABB) {
        let index = self.boxes.len();
        self.boxes.push(bounds);
        let (min_x, min_z) = tile_of(bounds.min.x, bounds.min.z);
        let (max_x, max_z) = tile_of(bounds.max.x, bounds.max.z);
        for tx in min_x..=max_x {
            for tz in min_z..=max_z {
                self.cells.entry((tx, tz)).or_default().push(index);
            }
        }
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
        self.cells.clear();
    }

    /// Boxes registered in the 3x3 tile neighbourhood around a point
    pub fn nearby(&self, x: f32, z: f32) -> Vec<&AABB> {
        let (cx, cz) = tile_of(x, z);
        let mut indices: Vec<usize> = Vec::new();
        for dx in -1..=1 {
            for dz in -1..=1 {
                if let Some(cell) = self.cells.get(&(cx + dx, cz + dz)) {
                    indices.extend(cell);
                }
            }
        }
        indices.sort_unstable();
        indices.dedup();
        indices.into_iter().map(|i| &self.boxes[i]).collect()
    }

    pub fn check_collision(&self, player_size: f32, position: Vec3) -> bool {
        let player = player_box(player_size, position);
        self.nearby(position.x, position.z)
            .into_iter()
            .any(|obstacle| obstacle.intersects(&player))
    }

    /// Brute-force variant over every box, used to cross-check the hash
    pub fn check_collision_linear(&self, player_size: f32, position: Vec3) -> bool {
        let player = player_box(player_size, position);
        self.boxes.iter().any(|obstacle| obstacle.intersects(&player))
    }
}
