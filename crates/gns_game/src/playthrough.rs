//! Scripted end-to-end runs of the whole round state machine, GPU-free.
//!
//! These drive `RoundState` exactly the way the main loop does: one tick per
//! fixed step, edge-triggered input cleared after every step. Anything that
//! breaks the title -> flight -> playback -> input -> scoring pipeline shows
//! up here before it needs a window to reproduce.

use crate::camera_rig::CameraPose;
use crate::round::{RoundPhase, RoundState, Screen};
use crate::sequence::{ButtonColor, SequenceGenerator};
use gns_core::input::{InputState, Key};

const DT: f64 = 1.0 / 60.0;

struct Playthrough {
    round: RoundState,
    input: InputState,
    now: f64,
    last_pose: Option<CameraPose>,
}

impl Playthrough {
    fn new(seed: u64) -> Self {
        Self {
            round: RoundState::new(SequenceGenerator::from_seed(seed)),
            input: InputState::new(),
            now: 0.0,
            last_pose: None,
        }
    }

    fn step(&mut self) {
        self.now += DT;
        let events = self.round.tick(&self.input, self.now, DT);
        if let Some(pose) = events.pose_snapped {
            self.last_pose = Some(pose);
        }
        self.input.end_frame();
    }

    fn tap(&mut self, key: Key) {
        self.input.key_down(key);
        self.step();
        self.input.key_up(key);
    }

    fn idle(&mut self, seconds: f64) {
        let steps = (seconds / DT).round() as u32;
        for _ in 0..steps {
            self.step();
        }
    }

    fn run_until(&mut self, wanted: RoundPhase, max_steps: u32) {
        for _ in 0..max_steps {
            if self.round.phase == wanted {
                return;
            }
            self.step();
        }
        panic!(
            "never reached phase '{}' (stuck in '{}' after {} steps)",
            wanted.label(),
            self.round.phase.label(),
            max_steps
        );
    }

    /// Reproduce one color with enough idle time to rearm the debounce.
    fn play_color(&mut self, color: ButtonColor) {
        self.tap(key_for(color));
        self.idle(0.25);
    }

    /// Play back the full current target, then wait out the entry window.
    fn reproduce_target(&mut self) {
        let target = self.round.target.clone();
        for color in target {
            self.play_color(color);
        }
        self.idle(1.1);
    }
}

fn key_for(color: ButtonColor) -> Key {
    match color {
        ButtonColor::Yellow => Key::Up,
        ButtonColor::Red => Key::Down,
        ButtonColor::Blue => Key::Right,
        ButtonColor::Green => Key::Left,
    }
}

/// Steps generous enough for one round: playback slots plus entries plus
/// the close window, with slack for phase handoffs.
fn round_budget(sequence_length: usize) -> u32 {
    (sequence_length as u32) * 120 + 300
}

#[test]
fn intro_flight_skip_snaps_pose_and_board_framing() {
    let mut game = Playthrough::new(7);
    assert_eq!(game.round.screen(), Screen::Title);

    game.tap(Key::Enter);
    assert_eq!(game.round.phase, RoundPhase::IntroFlight);
    assert_eq!(game.round.screen(), Screen::Board);

    game.tap(Key::F2);
    assert_eq!(game.round.phase, RoundPhase::ShowSequence);
    assert_eq!(game.last_pose, Some(CameraPose::Top));
    assert_eq!(game.last_pose.map(CameraPose::board_z), Some(0.0));
    assert_eq!(game.round.rig.position, CameraPose::Top.position());
}

#[test]
fn wrong_color_ends_the_game_but_keeps_earned_points() {
    let mut game = Playthrough::new(11);
    game.tap(Key::Enter);
    game.tap(Key::F1);

    // Round one, played correctly.
    game.run_until(RoundPhase::AwaitInput, round_budget(2));
    game.reproduce_target();
    game.run_until(RoundPhase::AwaitInput, round_budget(3));
    assert_eq!(game.round.score, 10);
    assert_eq!(game.round.sequence_length, 3);

    // Round two, first entry deliberately wrong.
    let correct = game.round.target[0];
    let wrong = ButtonColor::ALL
        .into_iter()
        .find(|&c| c != correct)
        .unwrap();
    game.play_color(wrong);
    game.idle(1.1);
    game.run_until(RoundPhase::Lost, 10);

    assert_eq!(game.round.score, 10);
    assert_eq!(game.round.screen(), Screen::GameOver);
}

#[test]
fn partial_correct_entries_still_lose_on_timeout() {
    let mut game = Playthrough::new(23);
    game.tap(Key::Enter);
    game.tap(Key::F1);
    game.run_until(RoundPhase::AwaitInput, round_budget(2));

    // One correct entry out of two, then silence.
    let first = game.round.target[0];
    game.play_color(first);
    game.idle(1.1);
    game.run_until(RoundPhase::Lost, 10);

    assert_eq!(game.round.score, 0);
}

#[test]
fn enter_mid_flight_does_not_restart_the_intro() {
    let mut game = Playthrough::new(3);
    game.tap(Key::Enter);
    game.idle(1.0);
    let position_before = game.round.rig.position;

    game.tap(Key::Enter);
    assert_eq!(game.round.phase, RoundPhase::IntroFlight);
    assert!(
        game.round.rig.position != position_before,
        "flight should keep moving, not restart"
    );
    assert_ne!(game.round.rig.position, CameraPose::Front.position());
}

#[test]
fn perfect_game_reaches_one_thousand_points() {
    let mut game = Playthrough::new(42);
    game.tap(Key::Enter);

    // Ride the full intro flight once, then clear rounds until the win.
    game.run_until(RoundPhase::AwaitInput, 1200);

    let mut rounds = 0;
    while game.round.phase == RoundPhase::AwaitInput {
        let length = game.round.sequence_length;
        game.reproduce_target();
        rounds += 1;
        assert!(rounds <= 100, "more rounds than the winning score allows");

        // Either the next playback runs, or the game just ended.
        for _ in 0..round_budget(length + 1) {
            match game.round.phase {
                RoundPhase::AwaitInput | RoundPhase::Won => break,
                _ => game.step(),
            }
        }
        if game.round.phase == RoundPhase::Won {
            break;
        }
    }

    assert_eq!(rounds, 100);
    assert_eq!(game.round.score, 1000);
    assert_eq!(game.round.phase, RoundPhase::Won);
    assert_eq!(game.round.screen(), Screen::GameOver);
    // The winning round does not grow the sequence again.
    assert_eq!(game.round.sequence_length, 101);
}
