//! Held-input state folded from the raw event queue, and the key bindings
//! that turn it into per-tick controls.

use glam::Vec2;

use crate::input::queue::{InputEvent, InputQueue};

/// Browser key codes.
pub mod keys {
    pub const SHIFT: u32 = 16;
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const ARROW_LEFT: u32 = 37;
    pub const ARROW_UP: u32 = 38;
    pub const ARROW_RIGHT: u32 = 39;
    pub const A: u32 = 65;
    pub const D: u32 = 68;
    pub const R: u32 = 82;
    pub const S: u32 = 83;
    pub const W: u32 = 87;
}

/// Which keys drive which action. Any listed key triggers its action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: Vec<u32>,
    pub right: Vec<u32>,
    pub jump: Vec<u32>,
    pub sprint: Vec<u32>,
    pub restart: Vec<u32>,
    pub menu: Vec<u32>,
    pub dismiss: Vec<u32>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![keys::ARROW_LEFT, keys::A],
            right: vec![keys::ARROW_RIGHT, keys::D],
            jump: vec![keys::ARROW_UP, keys::W, keys::SPACE],
            sprint: vec![keys::SHIFT],
            restart: vec![keys::R],
            menu: vec![keys::ESCAPE],
            dismiss: vec![keys::S],
        }
    }
}

/// What the simulation reads each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    /// Primary pointer button held.
    pub fire: bool,
    /// Pressed during the last folded batch, even if already released.
    pub restart: bool,
    pub menu: bool,
    pub dismiss: bool,
    /// Pointer position in world space; the aim target.
    pub pointer: Vec2,
}

/// Keys and pointer as currently held, plus the keys that went down in the
/// last folded batch.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: Vec<u32>,
    pressed: Vec<u32>,
    pointer: Vec2,
    pointer_down: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the held state.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key_code } => {
                // Auto-repeat arrives as more KeyDowns for a held key.
                if !self.held.contains(&key_code) {
                    self.held.push(key_code);
                    self.pressed.push(key_code);
                }
            }
            InputEvent::KeyUp { key_code } => self.held.retain(|k| *k != key_code),
            InputEvent::PointerDown { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = true;
            }
            InputEvent::PointerUp { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.pointer_down = false;
            }
            InputEvent::PointerMove { x, y } => self.pointer = Vec2::new(x, y),
            InputEvent::Custom { .. } => {}
        }
    }

    /// Start a new batch and fold every pending event into it, without
    /// draining the queue.
    pub fn apply_queue(&mut self, queue: &InputQueue) {
        self.pressed.clear();
        for event in queue.iter() {
            self.apply(event);
        }
    }

    pub fn is_held(&self, key_code: u32) -> bool {
        self.held.contains(&key_code)
    }

    fn any_held(&self, keys: &[u32]) -> bool {
        keys.iter().any(|k| self.is_held(*k))
    }

    fn any_pressed(&self, keys: &[u32]) -> bool {
        keys.iter().any(|k| self.pressed.contains(k))
    }

    /// Release everything, e.g. after the host loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.pointer_down = false;
    }

    pub fn controls(&self, bindings: &KeyBindings) -> Controls {
        Controls {
            left: self.any_held(&bindings.left),
            right: self.any_held(&bindings.right),
            jump: self.any_held(&bindings.jump),
            sprint: self.any_held(&bindings.sprint),
            fire: self.pointer_down,
            restart: self.any_pressed(&bindings.restart),
            menu: self.any_pressed(&bindings.menu),
            dismiss: self.any_pressed(&bindings.dismiss),
            pointer: self.pointer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_stay_held_until_released() {
        let mut state = InputState::new();
        let bindings = KeyBindings::default();
        state.apply(&InputEvent::KeyDown { key_code: keys::D });
        state.apply(&InputEvent::KeyDown { key_code: keys::SPACE });
        let c = state.controls(&bindings);
        assert!(c.right && c.jump && !c.left);

        state.apply(&InputEvent::KeyUp { key_code: keys::SPACE });
        let c = state.controls(&bindings);
        assert!(c.right && !c.jump);
    }

    #[test]
    fn pointer_tracks_position_and_button() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::PointerMove { x: 10.0, y: 20.0 });
        queue.push(InputEvent::PointerDown { x: 30.0, y: 40.0 });
        let mut state = InputState::new();
        state.apply_queue(&queue);
        let c = state.controls(&KeyBindings::default());
        assert!(c.fire);
        assert_eq!(c.pointer, Vec2::new(30.0, 40.0));

        state.apply(&InputEvent::PointerUp { x: 31.0, y: 41.0 });
        assert!(!state.controls(&KeyBindings::default()).fire);
    }

    #[test]
    fn repeated_key_down_is_one_hold() {
        let mut state = InputState::new();
        state.apply(&InputEvent::KeyDown { key_code: keys::A });
        state.apply(&InputEvent::KeyDown { key_code: keys::A });
        state.apply(&InputEvent::KeyUp { key_code: keys::A });
        assert!(!state.is_held(keys::A));
    }

    #[test]
    fn clear_releases_everything() {
        let mut state = InputState::new();
        state.apply(&InputEvent::KeyDown { key_code: keys::ESCAPE });
        state.apply(&InputEvent::PointerDown { x: 0.0, y: 0.0 });
        state.clear();
        let c = state.controls(&KeyBindings::default());
        assert!(!c.menu && !c.fire);
    }

    #[test]
    fn tap_within_one_batch_still_registers() {
        let bindings = KeyBindings::default();
        let mut state = InputState::new();
        let batch: InputQueue = [
            InputEvent::KeyDown { key_code: keys::R },
            InputEvent::KeyUp { key_code: keys::R },
        ]
        .into_iter()
        .collect();
        state.apply_queue(&batch);
        let c = state.controls(&bindings);
        assert!(c.restart);
        assert!(!state.is_held(keys::R));

        state.apply_queue(&InputQueue::new());
        assert!(!state.controls(&bindings).restart);
    }

    #[test]
    fn held_action_key_fires_once() {
        let bindings = KeyBindings::default();
        let mut state = InputState::new();
        let down: InputQueue = [InputEvent::KeyDown { key_code: keys::ESCAPE }].into_iter().collect();
        state.apply_queue(&down);
        assert!(state.controls(&bindings).menu);

        // Auto-repeat while still held.
        state.apply_queue(&down);
        assert!(!state.controls(&bindings).menu);
        assert!(state.is_held(keys::ESCAPE));
    }
}
