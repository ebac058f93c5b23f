use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use super::{CollisionWorld, KeyManager};
use crate::camera::PerspectiveCamera;

pub const PLAYER_SIZE: f32 = 0.5;
pub const GRAVITY: f32 = 9.81;
pub const SPEED: f32 = 5.0;
pub const RUN_MULTIPLIER: f32 = 2.0;
pub const TURN_SPEED: f32 = PI;
pub const JUMP_VELOCITY: f32 = 5.0;
pub const GROUND_Y: f32 = 0.25;
pub const EYE_HEIGHT: f32 = 1.6;
pub const LOOK_SENSITIVITY: f32 = 0.002;

const MAX_PITCH: f32 = FRAC_PI_2 - 0.01;

/// First-person camera driver with gravity, jumping and per-axis sliding
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Walker {
    pub yaw: f32,
    pub pitch: f32,
    pub vertical_velocity: f32,
    pub on_ground: bool,
}

impl Walker {
    /// Takes its heading from where the camera currently looks
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let forward = camera.forward();
        Self {
            yaw: forward.x.atan2(-forward.z),
            pitch: forward.y.clamp(-1.0, 1.0).asin(),
            vertical_velocity: 0.0,
            on_ground: true,
        }
    }

    pub fn look_direction(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    fn ground_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    fn ground_right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Mouse-look from a pointer delta in pixels
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch - dy * LOOK_SENSITIVITY).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Keyboard turning, radians per second scaled by `direction`
    pub fn turn(&mut self, direction: f32, delta: f32) {
        self.yaw += direction * TURN_SPEED * delta;
    }

    /// One physics step: horizontal moves are tried per axis, then gravity
    pub fn step(
        &mut self,
        keys: &mut KeyManager,
        world: &CollisionWorld,
        camera: &mut PerspectiveCamera,
        delta: f32,
    ) {
        let (strafe, forward) = keys.direction();
        let speed = if keys.shift_down { SPEED * RUN_MULTIPLIER } else { SPEED };
        let motion = (self.ground_forward() * forward + self.ground_right() * strafe)
            .normalize_or_zero()
            * speed
            * delta;

        let mut position = camera.position;
        let body = |p: Vec3| p - Vec3::Y * (EYE_HEIGHT - PLAYER_SIZE);

        let try_x = position + Vec3::new(motion.x, 0.0, 0.0);
        if !world.check_collision(PLAYER_SIZE, body(try_x)) {
            position = try_x;
        }
        let try_z = position + Vec3::new(0.0, 0.0, motion.z);
        if !world.check_collision(PLAYER_SIZE, body(try_z)) {
            position = try_z;
        }

        if keys.take_jump() && self.on_ground {
            self.vertical_velocity = JUMP_VELOCITY;
            self.on_ground = false;
        }
        self.vertical_velocity -= GRAVITY * delta;
        position.y += self.vertical_velocity * delta;

        let floor = GROUND_Y + EYE_HEIGHT;
        if position.y <= floor {
            position.y = floor;
            self.vertical_velocity = 0.0;
            self.on_ground = true;
        }
        keys.can_jump = self.on_ground;

        camera.position = position;
        camera.target = position + self.look_direction();
    }
}
