//! Input state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Used for continuous actions like the direction buttons,
//!   which the game samples against its own debounce clock.
//!
//! - **Edge-triggered (just_pressed / just_released):** These are true only during
//!   the frame the transition happened. They are cleared by `end_frame()`, which
//!   the main loop calls only after at least one fixed simulation step has consumed
//!   them. This prevents a press from being silently lost on a frame that has zero
//!   simulation steps (when the accumulator hasn't built up enough time).

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    P,
    F1,
    F2,
    F3,
    F12,
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        assert!(input.is_held(Key::Up));
        assert!(input.is_just_pressed(Key::Up));
    }

    #[test]
    fn test_key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_up(Key::Up);
        assert!(!input.is_held(Key::Up));
        assert!(input.is_just_released(Key::Up));
    }

    #[test]
    fn test_key_down_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Enter);
        assert!(input.is_just_pressed(Key::Enter));
        // Second key_down for the same key should not alter state since
        // the key is already in held (HashSet::insert returns false).
        input.key_down(Key::Enter);
        assert!(input.is_held(Key::Enter));
        assert!(input.is_just_pressed(Key::Enter));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        // key_up without a prior key_down: held.remove returns false,
        // so just_released should NOT be set.
        input.key_up(Key::Up);
        assert!(!input.is_just_released(Key::Up));
        assert!(!input.is_held(Key::Up));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Enter);
        input.end_frame();
        // Transient just_pressed should be cleared.
        assert!(!input.is_just_pressed(Key::Up));
        assert!(!input.is_just_pressed(Key::Enter));
        // Held state should persist across frames.
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Enter));
    }

    #[test]
    fn test_end_frame_clears_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::P);
        input.key_up(Key::P);
        assert!(input.is_just_released(Key::P));
        input.end_frame();
        assert!(!input.is_just_released(Key::P));
    }

    #[test]
    fn test_multiple_keys_independent() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Right);
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Right));

        input.key_up(Key::Up);
        assert!(!input.is_held(Key::Up));
        assert!(input.is_just_released(Key::Up));
        // Right should remain held and unaffected.
        assert!(input.is_held(Key::Right));
        assert!(!input.is_just_released(Key::Right));
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::new();
        assert!(!input.is_held(Key::Up));
        assert!(!input.is_held(Key::Enter));
        assert!(!input.is_just_pressed(Key::Up));
        assert!(!input.is_just_released(Key::Up));
    }
}
