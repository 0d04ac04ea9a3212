//! Keyboard and touch input poller
//!
//! Browser key events feed `key_down`/`key_up`; the simulation only asks
//! "is this action held" and "was it pressed since the last frame".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Thrust,
    Shoot,
    Pause,
    Mute,
}

/// On-screen touch buttons (Space Invaders on touch devices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchButton {
    Left,
    Right,
    Fire,
}

impl TouchButton {
    fn action(self) -> Action {
        match self {
            TouchButton::Left => Action::Left,
            TouchButton::Right => Action::Right,
            TouchButton::Fire => Action::Shoot,
        }
    }
}

/// Keys whose browser default (scrolling) is suppressed
const SUPPRESSED_CODES: [&str; 5] = ["ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown", "Space"];

/// Action → physical key codes (`KeyboardEvent.code`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    bindings: Vec<(Action, Vec<String>)>,
}

impl KeyBindings {
    fn from_table(table: &[(Action, &[&str])]) -> Self {
        Self {
            bindings: table
                .iter()
                .map(|(action, codes)| (*action, codes.iter().map(|c| c.to_string()).collect()))
                .collect(),
        }
    }

    /// Space Invaders layout
    pub fn invaders() -> Self {
        Self::from_table(&[
            (Action::Left, &["ArrowLeft", "KeyA"]),
            (Action::Right, &["ArrowRight", "KeyD"]),
            (Action::Up, &["ArrowUp", "KeyW"]),
            (Action::Down, &["ArrowDown", "KeyS"]),
            (Action::Shoot, &["Space"]),
            (Action::Pause, &["KeyP", "Escape"]),
            (Action::Mute, &["KeyM"]),
        ])
    }

    /// Vector Void tank controls
    pub fn vector_void() -> Self {
        Self::from_table(&[
            (Action::Thrust, &["ArrowUp", "KeyW"]),
            (Action::Left, &["ArrowLeft", "KeyA"]),
            (Action::Right, &["ArrowRight", "KeyD"]),
            (Action::Shoot, &["Space"]),
            (Action::Pause, &["KeyP"]),
            (Action::Mute, &["KeyM"]),
        ])
    }

    /// Codes mapped to `action` (empty when unmapped)
    pub fn codes(&self, action: Action) -> &[String] {
        self.bindings
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, codes)| codes.as_slice())
            .unwrap_or(&[])
    }
}

/// Held keys, per-frame press edges and touch buttons
#[derive(Debug, Clone)]
pub struct InputState {
    bindings: KeyBindings,
    held: HashSet<String>,
    pressed: HashSet<String>,
    touch_held: HashSet<TouchButton>,
    touch_pressed: HashSet<TouchButton>,
}

impl InputState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
            pressed: HashSet::new(),
            touch_held: HashSet::new(),
            touch_pressed: HashSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Record a key press. Returns true when the browser default should be
    /// suppressed.
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        if !repeat && !self.held.contains(code) {
            self.pressed.insert(code.to_string());
        }
        self.held.insert(code.to_string());
        SUPPRESSED_CODES.contains(&code)
    }

    pub fn key_up(&mut self, code: &str) {
        self.held.remove(code);
    }

    /// Update an on-screen button. Pressing Fire also counts as a Shoot press.
    pub fn set_touch(&mut self, button: TouchButton, pressed: bool) {
        if pressed {
            if self.touch_held.insert(button) {
                self.touch_pressed.insert(button);
            }
        } else {
            self.touch_held.remove(&button);
        }
    }

    /// Any mapped key (or the mirrored touch button) is down
    pub fn is_held(&self, action: Action) -> bool {
        self.touch_held.iter().any(|b| b.action() == action)
            || self
                .bindings
                .codes(action)
                .iter()
                .any(|code| self.held.contains(code))
    }

    /// True once per physical press until `end_frame`
    pub fn was_pressed(&self, action: Action) -> bool {
        self.touch_pressed.iter().any(|b| b.action() == action)
            || self
                .bindings
                .codes(action)
                .iter()
                .any(|code| self.pressed.contains(code))
    }

    /// Clear press edges (call after each simulated frame)
    pub fn end_frame(&mut self) {
        self.pressed.clear();
        self.touch_pressed.clear();
    }

    /// Forget everything (focus loss)
    pub fn reset(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.touch_held.clear();
        self.touch_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_fires_once() {
        let mut input = InputState::new(KeyBindings::invaders());
        assert!(input.key_down("Space", false));
        assert!(input.is_held(Action::Shoot));
        assert!(input.was_pressed(Action::Shoot));

        input.end_frame();
        assert!(!input.was_pressed(Action::Shoot));
        assert!(input.is_held(Action::Shoot));

        // Auto-repeat and a second keydown while held do not re-fire
        input.key_down("Space", true);
        input.key_down("Space", false);
        assert!(!input.was_pressed(Action::Shoot));

        input.key_up("Space");
        assert!(!input.is_held(Action::Shoot));
        input.key_down("Space", false);
        assert!(input.was_pressed(Action::Shoot));
    }

    #[test]
    fn test_alternate_keys_and_suppression() {
        let mut input = InputState::new(KeyBindings::invaders());
        assert!(!input.key_down("KeyA", false));
        assert!(input.is_held(Action::Left));
        assert!(input.key_down("ArrowRight", false));
        assert!(input.is_held(Action::Right));
        assert!(!input.key_down("KeyP", false));
        assert!(input.was_pressed(Action::Pause));
    }

    #[test]
    fn test_unmapped_action_is_false() {
        let mut input = InputState::new(KeyBindings::invaders());
        input.key_down("ArrowUp", false);
        assert!(!input.is_held(Action::Thrust));

        let mut void = InputState::new(KeyBindings::vector_void());
        void.key_down("ArrowUp", false);
        assert!(void.is_held(Action::Thrust));
        assert!(!void.is_held(Action::Down));
        // Escape only pauses in Space Invaders
        void.key_down("Escape", false);
        assert!(!void.was_pressed(Action::Pause));
    }

    #[test]
    fn test_touch_fire_mirrors_shoot() {
        let mut input = InputState::new(KeyBindings::invaders());
        input.set_touch(TouchButton::Fire, true);
        assert!(input.is_held(Action::Shoot));
        assert!(input.was_pressed(Action::Shoot));
        input.end_frame();
        assert!(!input.was_pressed(Action::Shoot));
        input.set_touch(TouchButton::Left, true);
        assert!(input.is_held(Action::Left));
        input.set_touch(TouchButton::Fire, false);
        assert!(!input.is_held(Action::Shoot));
    }

    #[test]
    fn test_reset_clears_held() {
        let mut input = InputState::new(KeyBindings::invaders());
        input.key_down("KeyD", false);
        input.set_touch(TouchButton::Right, true);
        input.reset();
        assert!(!input.is_held(Action::Right));
        assert!(!input.was_pressed(Action::Right));
    }
}
