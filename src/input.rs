use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::overlay::OverlayId;

/// Keys the gallery scenes react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    KeyW,
    KeyA,
    KeyS,
    KeyD,
    KeyQ,
    KeyE,
    KeyU,
    KeyF,
    KeyB,
    KeyR,
    KeyL,
    KeyP,
    Space,
    Shift,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Digit(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// Input delivered to scene handlers. Pointer coordinates are window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneEvent {
    KeyDown { key: Key, shift: bool },
    KeyUp { key: Key },
    PointerDown { x: f32, y: f32, button: PointerButton },
    PointerUp { x: f32, y: f32, button: PointerButton },
    PointerMove { x: f32, y: f32 },
    /// A press and release without travel; `target` is the overlay button hit, if any
    Click { x: f32, y: f32, target: Option<OverlayId> },
    Wheel { delta: f32 },
    Resize { width: u32, height: u32 },
}

/// Discriminant used to key event handler maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyDown,
    KeyUp,
    PointerDown,
    PointerUp,
    PointerMove,
    Click,
    Wheel,
    Resize,
}

impl SceneEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SceneEvent::KeyDown { .. } => EventKind::KeyDown,
            SceneEvent::KeyUp { .. } => EventKind::KeyUp,
            SceneEvent::PointerDown { .. } => EventKind::PointerDown,
            SceneEvent::PointerUp { .. } => EventKind::PointerUp,
            SceneEvent::PointerMove { .. } => EventKind::PointerMove,
            SceneEvent::Click { .. } => EventKind::Click,
            SceneEvent::Wheel { .. } => EventKind::Wheel,
            SceneEvent::Resize { .. } => EventKind::Resize,
        }
    }
}

/// Pointer travel beyond which a press/release pair is a drag, not a click
pub const CLICK_SLOP: f32 = 4.0;

/// Adapter that turns winit window events into [`SceneEvent`]s
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    cursor: Option<(f32, f32)>,
    pressed_at: Option<(f32, f32)>,
    shift: bool,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Auto-repeated presses are dropped; scenes see one press per physical press
    pub fn key_input(&mut self, key: Key, state: ElementState, repeat: bool) -> Vec<SceneEvent> {
        match state {
            ElementState::Pressed if repeat => Vec::new(),
            ElementState::Pressed => {
                if key == Key::Shift {
                    self.shift = true;
                }
                vec![SceneEvent::KeyDown {
                    key,
                    shift: self.shift,
                }]
            }
            ElementState::Released => {
                if key == Key::Shift {
                    self.shift = false;
                }
                vec![SceneEvent::KeyUp { key }]
            }
        }
    }

    /// Translate a winit event; one window event can yield a press plus a click
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<SceneEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return Vec::new();
                };
                let Some(key) = Self::keycode_to_key(code) else {
                    return Vec::new();
                };
                self.key_input(key, event.state, event.repeat)
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = Self::mouse_button(*button) else {
                    return Vec::new();
                };
                let (x, y) = self.cursor.unwrap_or((0.0, 0.0));
                self.pointer_button(*state, button, x, y)
            }
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.cursor = Some((x, y));
                vec![SceneEvent::PointerMove { x, y }]
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y,
                    MouseScrollDelta::PixelDelta(pos) => -(pos.y as f32) / 40.0,
                };
                vec![SceneEvent::Wheel { delta }]
            }
            WindowEvent::Resized(size) => vec![SceneEvent::Resize {
                width: size.width,
                height: size.height,
            }],
            _ => Vec::new(),
        }
    }

    /// Press/release bookkeeping shared with tests, which cannot build winit events
    pub fn pointer_button(
        &mut self,
        state: ElementState,
        button: PointerButton,
        x: f32,
        y: f32,
    ) -> Vec<SceneEvent> {
        match state {
            ElementState::Pressed => {
                if button == PointerButton::Left {
                    self.pressed_at = Some((x, y));
                }
                vec![SceneEvent::PointerDown { x, y, button }]
            }
            ElementState::Released => {
                let mut events = vec![SceneEvent::PointerUp { x, y, button }];
                if button == PointerButton::Left {
                    if let Some((px, py)) = self.pressed_at.take() {
                        if (x - px).hypot(y - py) <= CLICK_SLOP {
                            events.push(SceneEvent::Click { x, y, target: None });
                        }
                    }
                }
                events
            }
        }
    }

    fn keycode_to_key(keycode: KeyCode) -> Option<Key> {
        match keycode {
            KeyCode::KeyW => Some(Key::KeyW),
            KeyCode::KeyA => Some(Key::KeyA),
            KeyCode::KeyS => Some(Key::KeyS),
            KeyCode::KeyD => Some(Key::KeyD),
            KeyCode::KeyQ => Some(Key::KeyQ),
            KeyCode::KeyE => Some(Key::KeyE),
            KeyCode::KeyU => Some(Key::KeyU),
            KeyCode::KeyF => Some(Key::KeyF),
            KeyCode::KeyB => Some(Key::KeyB),
            KeyCode::KeyR => Some(Key::KeyR),
            KeyCode::KeyL => Some(Key::KeyL),
            KeyCode::KeyP => Some(Key::KeyP),
            KeyCode::Space => Some(Key::Space),
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Key::Shift),
            KeyCode::Escape => Some(Key::Escape),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::ArrowUp => Some(Key::ArrowUp),
            KeyCode::ArrowDown => Some(Key::ArrowDown),
            KeyCode::ArrowLeft => Some(Key::ArrowLeft),
            KeyCode::ArrowRight => Some(Key::ArrowRight),
            KeyCode::Digit0 => Some(Key::Digit(0)),
            KeyCode::Digit1 => Some(Key::Digit(1)),
            KeyCode::Digit2 => Some(Key::Digit(2)),
            KeyCode::Digit3 => Some(Key::Digit(3)),
            KeyCode::Digit4 => Some(Key::Digit(4)),
            KeyCode::Digit5 => Some(Key::Digit(5)),
            KeyCode::Digit6 => Some(Key::Digit(6)),
            KeyCode::Digit7 => Some(Key::Digit(7)),
            KeyCode::Digit8 => Some(Key::Digit(8)),
            KeyCode::Digit9 => Some(Key::Digit(9)),
            _ => None,
        }
    }

    fn mouse_button(button: MouseButton) -> Option<PointerButton> {
        match button {
            MouseButton::Left => Some(PointerButton::Left),
            MouseButton::Right => Some(PointerButton::Right),
            MouseButton::Middle => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Winit events cannot be constructed outside winit, so these drive the
    // pointer bookkeeping directly

    #[test]
    fn test_press_release_in_place_is_click() {
        let mut input = WinitInput::new();
        input.pointer_button(ElementState::Pressed, PointerButton::Left, 100.0, 100.0);
        let events = input.pointer_button(ElementState::Released, PointerButton::Left, 102.0, 101.0);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], SceneEvent::Click { target: None, .. }));
    }

    #[test]
    fn test_drag_is_not_click() {
        let mut input = WinitInput::new();
        input.pointer_button(ElementState::Pressed, PointerButton::Left, 100.0, 100.0);
        let events = input.pointer_button(ElementState::Released, PointerButton::Left, 150.0, 100.0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), EventKind::PointerUp);
    }

    #[test]
    fn test_held_key_presses_once() {
        let mut input = WinitInput::new();
        assert_eq!(input.key_input(Key::KeyU, ElementState::Pressed, false).len(), 1);
        for _ in 0..10 {
            assert!(input.key_input(Key::KeyU, ElementState::Pressed, true).is_empty());
        }
        let released = input.key_input(Key::KeyU, ElementState::Released, false);
        assert!(matches!(released[..], [SceneEvent::KeyUp { key: Key::KeyU }]));
    }

    #[test]
    fn test_shift_tracks_modifier_state() {
        let mut input = WinitInput::new();
        input.key_input(Key::Shift, ElementState::Pressed, false);
        let events = input.key_input(Key::KeyR, ElementState::Pressed, false);
        assert!(matches!(events[..], [SceneEvent::KeyDown { key: Key::KeyR, shift: true }]));
        input.key_input(Key::Shift, ElementState::Released, false);
        let events = input.key_input(Key::KeyR, ElementState::Pressed, false);
        assert!(matches!(events[..], [SceneEvent::KeyDown { key: Key::KeyR, shift: false }]));
    }

    #[test]
    fn test_right_button_never_clicks() {
        let mut input = WinitInput::new();
        input.pointer_button(ElementState::Pressed, PointerButton::Right, 10.0, 10.0);
        let events = input.pointer_button(ElementState::Released, PointerButton::Right, 10.0, 10.0);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_keycode_mapping() {
        assert_eq!(WinitInput::keycode_to_key(KeyCode::KeyU), Some(Key::KeyU));
        assert_eq!(WinitInput::keycode_to_key(KeyCode::ShiftRight), Some(Key::Shift));
        assert_eq!(WinitInput::keycode_to_key(KeyCode::Digit3), Some(Key::Digit(3)));
        assert_eq!(WinitInput::keycode_to_key(KeyCode::F12), None);
    }

    #[test]
    fn test_event_kinds() {
        let event = SceneEvent::Resize {
            width: 10,
            height: 10,
        };
        assert_eq!(event.kind(), EventKind::Resize);
        let event = SceneEvent::KeyDown {
            key: Key::Space,
            shift: false,
        };
        assert_eq!(event.kind(), EventKind::KeyDown);
    }
}
