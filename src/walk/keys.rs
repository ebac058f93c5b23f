use crate::input::Key;

/// Held movement keys and the pending jump request of a walking camera
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct KeyManager {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    pub shift_down: bool,
    pub jump_pressed: bool,
    pub can_jump: bool,
}

impl KeyManager {
    pub fn new() -> Self {
        Self {
            can_jump: true,
            ..Self::default()
        }
    }

    const fn to_direction(positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    /// (strafe, forward) in [-1, 1]
    pub const fn direction(&self) -> (f32, f32) {
        (
            Self::to_direction(self.move_right, self.move_left),
            Self::to_direction(self.move_forward, self.move_backward),
        )
    }

    pub fn is_moving(&self) -> bool {
        self.direction() != (0.0, 0.0)
    }

    /// Returns true when the key belongs to walking controls
    pub fn key_down(&mut self, key: Key) -> bool {
        self.set(key, true)
    }

    pub fn key_up(&mut self, key: Key) -> bool {
        self.set(key, false)
    }

    fn set(&mut self, key: Key, pressed: bool) -> bool {
        match key {
            Key::KeyW | Key::ArrowUp => self.move_forward = pressed,
            Key::KeyS | Key::ArrowDown => self.move_backward = pressed,
            Key::KeyA | Key::ArrowLeft => self.move_left = pressed,
            Key::KeyD | Key::ArrowRight => self.move_right = pressed,
            Key::Shift => self.shift_down = pressed,
            Key::Space => {
                if pressed && self.can_jump {
                    self.jump_pressed = true;
                }
            }
            _ => return false,
        }
        true
    }

    /// Consumes a pending jump request
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_keys_cancel() {
        let mut keys = KeyManager::new();
        keys.key_down(Key::KeyW);
        keys.key_down(Key::KeyS);
        assert_eq!(keys.direction(), (0.0, 0.0));
        keys.key_up(Key::KeyS);
        assert_eq!(keys.direction(), (0.0, 1.0));
    }

    #[test]
    fn test_arrows_alias_wasd() {
        let mut keys = KeyManager::new();
        keys.key_down(Key::ArrowLeft);
        assert_eq!(keys.direction(), (-1.0, 0.0));
        assert!(keys.is_moving());
    }

    #[test]
    fn test_jump_is_consumed_once() {
        let mut keys = KeyManager::new();
        keys.key_down(Key::Space);
        assert!(keys.take_jump());
        assert!(!keys.take_jump());
    }

    #[test]
    fn test_no_jump_while_airborne() {
        let mut keys = KeyManager::new();
        keys.can_jump = false;
        keys.key_down(Key::Space);
        assert!(!keys.take_jump());
    }

    #[test]
    fn test_unrelated_key_is_not_consumed() {
        let mut keys = KeyManager::new();
        assert!(!keys.key_down(Key::KeyU));
    }
}
