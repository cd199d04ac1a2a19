//! Round progression: the phase graph from the title screen through the
//! intro flight, sequence playback, reproduction, and the terminal
//! win/lose outcomes.
//!
//! All gameplay timing is driven by fixed-step game time. Playback uses the
//! accumulate-and-advance pattern so slot boundaries stay exact over long
//! sessions.

use gns_core::input::{InputState, Key};
use gns_render::camera::Projection;

use crate::camera_rig::{CameraPose, CameraRig};
use crate::sequence::{sequences_match, ButtonColor, SequenceGenerator};
use crate::tracker::InputTracker;

pub const POINTS_PER_ROUND: u32 = 10;
pub const WINNING_SCORE: u32 = 1000;
pub const STARTING_LENGTH: usize = 2;
/// Seconds each color stays lit during playback.
pub const SHOW_SLOT_SECONDS: f64 = 1.5;
/// Minimum game-time between projection toggles.
pub const PROJECTION_DEBOUNCE: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Title,
    IntroFlight,
    LookAround,
    ShowSequence,
    AwaitInput,
    Evaluate,
    Won,
    Lost,
}

impl RoundPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::IntroFlight => "Intro Flight",
            Self::LookAround => "Look Around",
            Self::ShowSequence => "Show Sequence",
            Self::AwaitInput => "Await Input",
            Self::Evaluate => "Evaluate",
            Self::Won => "Won",
            Self::Lost => "Lost",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Which full-screen layer the presentation should show over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Board,
    GameOver,
}

/// Presentation side effects produced by one simulation step.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundEvents {
    /// Set when a pose key snapped the camera; the board framing offset
    /// follows the pose.
    pub pose_snapped: Option<CameraPose>,
}

pub struct RoundState {
    pub phase: RoundPhase,
    /// Everything shown so far. Grows by one per round, never shrinks.
    pub target: Vec<ButtonColor>,
    /// How many colors the playback must reach before input opens.
    pub sequence_length: usize,
    pub score: u32,
    pub projection: Projection,
    pub rig: CameraRig,
    pub tracker: InputTracker,
    generator: SequenceGenerator,
    show_cursor: usize,
    slot_elapsed: f64,
    last_projection_toggle_at: Option<f64>,
}

impl RoundState {
    pub fn new(generator: SequenceGenerator) -> Self {
        Self {
            phase: RoundPhase::Title,
            target: Vec::new(),
            sequence_length: STARTING_LENGTH,
            score: 0,
            projection: Projection::Perspective,
            rig: CameraRig::new(),
            tracker: InputTracker::new(),
            generator,
            show_cursor: 0,
            slot_elapsed: 0.0,
            last_projection_toggle_at: None,
        }
    }

    /// Advance the game by one fixed step at game-time `now`.
    pub fn tick(&mut self, input: &InputState, now: f64, dt: f64) -> RoundEvents {
        let mut events = RoundEvents::default();

        self.handle_projection_toggle(input, now);
        self.handle_pose_keys(input, &mut events);
        self.rig.tick(dt as f32);

        match self.phase {
            RoundPhase::Title => {
                if input.is_just_pressed(Key::Enter) {
                    log::info!("Game started");
                    self.rig.start_sweep();
                    self.phase = RoundPhase::IntroFlight;
                }
            }
            RoundPhase::IntroFlight => {
                if self.rig.descending() {
                    self.phase = RoundPhase::LookAround;
                }
            }
            RoundPhase::LookAround => {
                if !self.rig.sweep_active() {
                    self.begin_show_sequence();
                }
            }
            RoundPhase::ShowSequence => self.tick_show_sequence(dt),
            RoundPhase::AwaitInput => {
                self.tracker.sample(input, now);
                if self.tracker.window_closed(now) {
                    self.phase = RoundPhase::Evaluate;
                }
            }
            RoundPhase::Evaluate => self.evaluate(),
            RoundPhase::Won | RoundPhase::Lost => {}
        }

        events
    }

    /// Per-button light powers for the current step.
    pub fn light_powers(&self, now: f64) -> [f32; 4] {
        match self.phase {
            RoundPhase::ShowSequence => {
                let mut powers = [0.0; 4];
                if let Some(color) = self.target.get(self.show_cursor) {
                    powers[color.index()] = 1.0;
                }
                powers
            }
            RoundPhase::AwaitInput => self.tracker.light_powers(now),
            _ => [0.0; 4],
        }
    }

    pub fn screen(&self) -> Screen {
        match self.phase {
            RoundPhase::Title => Screen::Title,
            RoundPhase::Won | RoundPhase::Lost => Screen::GameOver,
            _ => Screen::Board,
        }
    }

    fn handle_projection_toggle(&mut self, input: &InputState, now: f64) {
        if !input.is_just_pressed(Key::P) {
            return;
        }
        let armed = self
            .last_projection_toggle_at
            .map_or(true, |last| now - last >= PROJECTION_DEBOUNCE);
        if armed {
            self.projection = self.projection.next();
            self.last_projection_toggle_at = Some(now);
            log::info!("Projection: {}", self.projection);
        }
    }

    fn handle_pose_keys(&mut self, input: &InputState, events: &mut RoundEvents) {
        const POSE_KEYS: [(Key, CameraPose); 3] = [
            (Key::F1, CameraPose::Front),
            (Key::F2, CameraPose::Top),
            (Key::F3, CameraPose::Back),
        ];
        for (key, pose) in POSE_KEYS {
            if input.is_just_pressed(key) {
                self.rig.snap_to(pose);
                events.pose_snapped = Some(pose);
                if matches!(self.phase, RoundPhase::IntroFlight | RoundPhase::LookAround) {
                    log::info!("Intro flight skipped ({:?} pose)", pose);
                    self.begin_show_sequence();
                }
            }
        }
    }

    fn begin_show_sequence(&mut self) {
        self.phase = RoundPhase::ShowSequence;
        self.show_cursor = 0;
        self.slot_elapsed = 0.0;
        self.ensure_cursor_slot();
    }

    /// The slot under the cursor must exist before it can be shown. A new
    /// color is drawn only when the cursor walks past the stored tail and
    /// the round still owes one; replayed slots come from storage untouched.
    fn ensure_cursor_slot(&mut self) {
        if self.show_cursor == self.target.len() && self.target.len() < self.sequence_length {
            let previous = self.target.last().copied();
            self.target.push(self.generator.next_color(previous));
        }
    }

    fn tick_show_sequence(&mut self, dt: f64) {
        self.slot_elapsed += dt;
        if self.slot_elapsed >= SHOW_SLOT_SECONDS {
            self.slot_elapsed -= SHOW_SLOT_SECONDS;
            self.show_cursor += 1;
            if self.show_cursor >= self.sequence_length {
                self.tracker.reset();
                self.phase = RoundPhase::AwaitInput;
                return;
            }
        }
        self.ensure_cursor_slot();
    }

    fn evaluate(&mut self) {
        if !sequences_match(&self.target, &self.tracker.entered) {
            log::info!(
                "Wrong sequence: expected {}, got {}. Final score: {}",
                format_codes(&self.target),
                format_codes(&self.tracker.entered),
                self.score
            );
            self.phase = RoundPhase::Lost;
            return;
        }

        self.score += POINTS_PER_ROUND;
        if self.score >= WINNING_SCORE {
            log::info!("Winning score reached: {}", self.score);
            self.phase = RoundPhase::Won;
            return;
        }

        self.sequence_length += 1;
        self.tracker.reset();
        log::info!(
            "Round complete. Score: {}, next length: {}",
            self.score,
            self.sequence_length
        );
        self.begin_show_sequence();
    }
}

/// Classic Genius numbering, dash-joined ("1-3-2").
fn format_codes(colors: &[ButtonColor]) -> String {
    colors
        .iter()
        .map(|color| color.code().to_string())
        .collect::<Vec<_>>()
        .join("-")
}
