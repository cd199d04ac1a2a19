//! Color sequence generation and order matching.
//!
//! The target sequence only ever grows: one color is appended per round and
//! nothing is removed until the game ends. Generation draws uniformly from
//! the four button colors and redraws while the pick equals the previous
//! tail entry, so the played-back sequence never flashes the same button
//! twice in a row.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The four board buttons in code order. `code()` is the classic Genius
/// numbering (1 = yellow, 2 = blue, 3 = green, 4 = red); `index()` addresses
/// the per-button light channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    Yellow,
    Blue,
    Green,
    Red,
}

impl ButtonColor {
    pub const ALL: [ButtonColor; 4] = [
        ButtonColor::Yellow,
        ButtonColor::Blue,
        ButtonColor::Green,
        ButtonColor::Red,
    ];

    pub fn code(self) -> u8 {
        match self {
            Self::Yellow => 1,
            Self::Blue => 2,
            Self::Green => 3,
            Self::Red => 4,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Yellow => 0,
            Self::Blue => 1,
            Self::Green => 2,
            Self::Red => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Yellow => "Yellow",
            Self::Blue => "Blue",
            Self::Green => "Green",
            Self::Red => "Red",
        }
    }
}

impl std::fmt::Display for ButtonColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Draws the next color for the target sequence. The RNG is seeded exactly
/// once at construction; reseeding per draw would collapse consecutive
/// draws onto the same value under a fast clock.
pub struct SequenceGenerator {
    rng: StdRng,
}

impl SequenceGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Fixed-seed constructor for deterministic tests.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw over the four colors, redrawing while the pick equals
    /// `previous`. Three of four outcomes always exit the loop.
    pub fn next_color(&mut self, previous: Option<ButtonColor>) -> ButtonColor {
        loop {
            let pick = ButtonColor::ALL[self.rng.gen_range(0..ButtonColor::ALL.len())];
            if Some(pick) != previous {
                return pick;
            }
        }
    }
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Element-wise comparison of the target sequence against what the player
/// entered. False as soon as any position differs or the lengths disagree.
/// Neither sequence is consumed or modified.
pub fn sequences_match(target: &[ButtonColor], entered: &[ButtonColor]) -> bool {
    if target.len() != entered.len() {
        return false;
    }
    target.iter().zip(entered.iter()).all(|(t, e)| t == e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_classic_numbering() {
        assert_eq!(ButtonColor::Yellow.code(), 1);
        assert_eq!(ButtonColor::Blue.code(), 2);
        assert_eq!(ButtonColor::Green.code(), 3);
        assert_eq!(ButtonColor::Red.code(), 4);
    }

    #[test]
    fn indices_cover_all_light_channels() {
        let mut seen = [false; 4];
        for color in ButtonColor::ALL {
            seen[color.index()] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn next_color_never_repeats_previous() {
        let mut generator = SequenceGenerator::from_seed(7);
        let mut previous = None;
        for _ in 0..1000 {
            let color = generator.next_color(previous);
            assert_ne!(Some(color), previous);
            previous = Some(color);
        }
    }

    #[test]
    fn next_color_after_blue_is_never_blue() {
        let mut generator = SequenceGenerator::from_seed(42);
        for _ in 0..200 {
            let color = generator.next_color(Some(ButtonColor::Blue));
            assert_ne!(color, ButtonColor::Blue);
        }
    }

    #[test]
    fn next_color_eventually_draws_every_color() {
        let mut generator = SequenceGenerator::from_seed(3);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[generator.next_color(None).index()] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn matching_is_reflexive() {
        let sequence = vec![
            ButtonColor::Yellow,
            ButtonColor::Blue,
            ButtonColor::Green,
            ButtonColor::Red,
        ];
        assert!(sequences_match(&sequence, &sequence));
    }

    #[test]
    fn mismatch_at_any_position_fails() {
        let target = [ButtonColor::Yellow, ButtonColor::Blue, ButtonColor::Green];
        let wrong_middle = [ButtonColor::Yellow, ButtonColor::Yellow, ButtonColor::Green];
        let wrong_last = [ButtonColor::Yellow, ButtonColor::Blue, ButtonColor::Red];
        assert!(!sequences_match(&target, &wrong_middle));
        assert!(!sequences_match(&target, &wrong_last));
    }

    #[test]
    fn length_mismatch_fails() {
        let target = [ButtonColor::Yellow, ButtonColor::Blue];
        let short = [ButtonColor::Yellow];
        let long = [ButtonColor::Yellow, ButtonColor::Blue, ButtonColor::Blue];
        assert!(!sequences_match(&target, &short));
        assert!(!sequences_match(&target, &long));
        assert!(!sequences_match(&target, &[]));
    }

    #[test]
    fn matching_does_not_consume_sequences() {
        let target = vec![ButtonColor::Red, ButtonColor::Green];
        let entered = vec![ButtonColor::Red, ButtonColor::Green];
        assert!(sequences_match(&target, &entered));
        // Both sequences survive the comparison untouched.
        assert_eq!(target.len(), 2);
        assert_eq!(entered.len(), 2);
        assert!(sequences_match(&target, &entered));
    }
}
