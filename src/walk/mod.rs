mod collision;
mod keys;
mod walker;

pub use collision::{player_box, CollisionWorld, TILE_SIZE};
pub use keys::KeyManager;
pub use walker::{
    Walker, EYE_HEIGHT, GRAVITY, GROUND_Y, JUMP_VELOCITY, PLAYER_SIZE, SPEED, TURN_SPEED,
};
