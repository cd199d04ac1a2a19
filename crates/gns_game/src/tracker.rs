//! Player input capture for the reproduction phase.
//!
//! Direction keys are sampled once per fixed step, level-triggered: a held
//! key re-registers at most once per debounce window, and two taps inside
//! one window collapse into a single entry. The input window closes after a
//! quiet second following the latest entry.

use gns_core::input::{InputState, Key};

use crate::sequence::ButtonColor;

/// Minimum game-time between two registered entries.
pub const ENTRY_DEBOUNCE: f64 = 0.2;
/// Quiet time after the latest entry before the window closes.
pub const WINDOW_CLOSE_DELAY: f64 = 1.0;

/// Direction-to-color bindings, checked in this order when several keys are
/// down on the same step.
const DIRECTION_BINDINGS: [(Key, ButtonColor); 4] = [
    (Key::Up, ButtonColor::Yellow),
    (Key::Down, ButtonColor::Red),
    (Key::Right, ButtonColor::Blue),
    (Key::Left, ButtonColor::Green),
];

pub struct InputTracker {
    pub entered: Vec<ButtonColor>,
    last_entry_at: Option<f64>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self {
            entered: Vec::new(),
            last_entry_at: None,
        }
    }

    /// Sample the held direction keys at game-time `now`. Returns the color
    /// registered on this step, if any.
    pub fn sample(&mut self, input: &InputState, now: f64) -> Option<ButtonColor> {
        if let Some(last) = self.last_entry_at {
            if now - last < ENTRY_DEBOUNCE {
                return None;
            }
        }
        for (key, color) in DIRECTION_BINDINGS {
            if input.is_held(key) {
                self.entered.push(color);
                self.last_entry_at = Some(now);
                return Some(color);
            }
        }
        None
    }

    /// True once at least one entry exists and the quiet period has passed.
    /// With no entries the window stays open indefinitely.
    pub fn window_closed(&self, now: f64) -> bool {
        self.last_entry_at
            .is_some_and(|last| now - last >= WINDOW_CLOSE_DELAY)
    }

    /// Light powers while entering: the most recent entry's button stays lit
    /// for the debounce window, everything else dark.
    pub fn light_powers(&self, now: f64) -> [f32; 4] {
        let mut powers = [0.0; 4];
        if let (Some(last), Some(color)) = (self.last_entry_at, self.entered.last()) {
            if now - last < ENTRY_DEBOUNCE {
                powers[color.index()] = 1.0;
            }
        }
        powers
    }

    /// Clear for the next input window.
    pub fn reset(&mut self) {
        self.entered.clear();
        self.last_entry_at = None;
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(tracker: &mut InputTracker, key: Key, now: f64) -> Option<ButtonColor> {
        let mut input = InputState::new();
        input.key_down(key);
        tracker.sample(&input, now)
    }

    #[test]
    fn directions_map_to_colors() {
        let mut tracker = InputTracker::new();
        assert_eq!(press(&mut tracker, Key::Up, 0.0), Some(ButtonColor::Yellow));
        assert_eq!(press(&mut tracker, Key::Down, 1.0), Some(ButtonColor::Red));
        assert_eq!(press(&mut tracker, Key::Right, 2.0), Some(ButtonColor::Blue));
        assert_eq!(press(&mut tracker, Key::Left, 3.0), Some(ButtonColor::Green));
        assert_eq!(
            tracker.entered,
            vec![
                ButtonColor::Yellow,
                ButtonColor::Red,
                ButtonColor::Blue,
                ButtonColor::Green
            ]
        );
    }

    #[test]
    fn presses_inside_debounce_window_register_once() {
        let mut tracker = InputTracker::new();
        assert_eq!(press(&mut tracker, Key::Up, 0.00), Some(ButtonColor::Yellow));
        // A second tap 0.10s later falls inside the 0.2s window.
        assert_eq!(press(&mut tracker, Key::Up, 0.10), None);
        assert_eq!(tracker.entered.len(), 1);
    }

    #[test]
    fn held_key_reregisters_after_debounce() {
        let mut tracker = InputTracker::new();
        let mut input = InputState::new();
        input.key_down(Key::Left);

        assert_eq!(tracker.sample(&input, 0.0), Some(ButtonColor::Green));
        assert_eq!(tracker.sample(&input, 0.1), None);
        assert_eq!(tracker.sample(&input, 0.2), Some(ButtonColor::Green));
        assert_eq!(tracker.entered.len(), 2);
    }

    #[test]
    fn no_keys_registers_nothing() {
        let mut tracker = InputTracker::new();
        let input = InputState::new();
        assert_eq!(tracker.sample(&input, 0.0), None);
        assert!(tracker.entered.is_empty());
    }

    #[test]
    fn window_never_closes_without_entries() {
        let tracker = InputTracker::new();
        assert!(!tracker.window_closed(1000.0));
    }

    #[test]
    fn window_closes_one_second_after_latest_entry() {
        let mut tracker = InputTracker::new();
        press(&mut tracker, Key::Up, 5.0);
        assert!(!tracker.window_closed(5.5));
        assert!(!tracker.window_closed(5.99));
        assert!(tracker.window_closed(6.0));
    }

    #[test]
    fn new_entry_reopens_the_close_timer() {
        let mut tracker = InputTracker::new();
        press(&mut tracker, Key::Up, 0.0);
        press(&mut tracker, Key::Down, 0.9);
        assert!(!tracker.window_closed(1.0));
        assert!(tracker.window_closed(1.9));
    }

    #[test]
    fn light_follows_latest_entry_for_debounce_window() {
        let mut tracker = InputTracker::new();
        press(&mut tracker, Key::Right, 2.0);

        let lit = tracker.light_powers(2.1);
        assert_eq!(lit[ButtonColor::Blue.index()], 1.0);
        assert_eq!(lit.iter().sum::<f32>(), 1.0);

        // Flash over once the debounce window has elapsed.
        assert_eq!(tracker.light_powers(2.25), [0.0; 4]);
    }

    #[test]
    fn reset_clears_entries_and_timer() {
        let mut tracker = InputTracker::new();
        press(&mut tracker, Key::Up, 0.0);
        tracker.reset();
        assert!(tracker.entered.is_empty());
        assert!(!tracker.window_closed(100.0));
        // First entry after reset is accepted immediately.
        assert_eq!(press(&mut tracker, Key::Up, 0.05), Some(ButtonColor::Yellow));
    }
}
