//! Levels, their derived parameters, and the level transition table
//!
//! Level 1: 2 cups, slow shuffle.
//! Level 2: 3 cups, fast shuffle, and every pick hands off to the modal.

use serde::{Deserialize, Serialize};

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Level {
    #[default]
    One,
    Two,
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
        }
    }

    pub fn cup_count(self) -> usize {
        match self {
            Level::One => 2,
            Level::Two => 3,
        }
    }

    pub fn shuffle_label(self) -> &'static str {
        match self {
            Level::One => "slow shuffle",
            Level::Two => "fast shuffle",
        }
    }

    /// Base animation timings for this level
    pub fn timing(self) -> TimingProfile {
        match self {
            Level::One => TimingProfile {
                land_transition_ms: 260,
                land_wait_ms: 300,
                lift_transition_ms: 220,
                lift_wait_ms: 260,
                ball_dwell_ms: 950,
                cover_wait_ms: 320,
                swaps: 4,
                swap_ms: 520,
                swap_pause_ms: 220,
                outcome_hold_ms: 650,
            },
            Level::Two => TimingProfile {
                land_transition_ms: 160,
                land_wait_ms: 190,
                lift_transition_ms: 150,
                lift_wait_ms: 180,
                ball_dwell_ms: 650,
                cover_wait_ms: 220,
                swaps: 10,
                swap_ms: 180,
                swap_pause_ms: 70,
                outcome_hold_ms: 450,
            },
        }
    }
}

/// Durations (ms) and swap count for one shuffle sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingProfile {
    /// Cup transition while landing
    pub land_transition_ms: u32,
    pub land_wait_ms: u32,
    /// Cup transition while lifting to show the ball
    pub lift_transition_ms: u32,
    pub lift_wait_ms: u32,
    /// How long the ball stays visible in the lifted cup
    pub ball_dwell_ms: u32,
    /// Wait for the cup to come back down over the (hidden) ball
    pub cover_wait_ms: u32,
    pub swaps: u32,
    /// Cup transition per swap
    pub swap_ms: u32,
    pub swap_pause_ms: u32,
    /// How long the revealed outcome stays before the next transition
    pub outcome_hold_ms: u32,
}

impl TimingProfile {
    /// Scale every duration, keeping the swap count
    pub fn scaled(self, factor: f32) -> Self {
        let s = |ms: u32| (ms as f32 * factor).round().max(0.0) as u32;
        Self {
            land_transition_ms: s(self.land_transition_ms),
            land_wait_ms: s(self.land_wait_ms),
            lift_transition_ms: s(self.lift_transition_ms),
            lift_wait_ms: s(self.lift_wait_ms),
            ball_dwell_ms: s(self.ball_dwell_ms),
            cover_wait_ms: s(self.cover_wait_ms),
            swaps: self.swaps,
            swap_ms: s(self.swap_ms),
            swap_pause_ms: s(self.swap_pause_ms),
            outcome_hold_ms: s(self.outcome_hold_ms),
        }
    }

    /// Wait between consecutive swaps
    pub fn swap_interval_ms(&self) -> u32 {
        self.swap_ms + self.swap_pause_ms
    }

    /// Total time from Play to the pick prompt
    pub fn sequence_ms(&self) -> u32 {
        self.land_wait_ms
            + self.lift_wait_ms
            + self.ball_dwell_ms
            + self.cover_wait_ms
            + self.swaps * self.swap_interval_ms()
    }
}

/// Process-wide level data; outlives rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub level: Level,
    pub cup_count: usize,
    pub timing: TimingProfile,
}

impl LevelState {
    pub fn new(level: Level, animation_scale: f32) -> Self {
        Self {
            level,
            cup_count: level.cup_count(),
            timing: level.timing().scaled(animation_scale),
        }
    }
}

/// What follows a resolved pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterPick {
    /// Rebuild the board at this level
    Apply(Level),
    /// Hand off to the modal collaborator
    OpenModal,
}

/// Level 1 advances on a correct pick and retries otherwise; Level 2 always opens the modal
pub fn after_pick(level: Level, correct: bool) -> AfterPick {
    match (level, correct) {
        (Level::One, true) => AfterPick::Apply(Level::Two),
        (Level::One, false) => AfterPick::Apply(Level::One),
        (Level::Two, _) => AfterPick::OpenModal,
    }
}

/// Level after the modal closes. Accepting and dismissing map the same way.
pub fn after_modal(last_pick_correct: Option<bool>) -> Level {
    match last_pick_correct {
        Some(true) => Level::One,
        Some(false) | None => Level::Two,
    }
}

/// Explicit reset always starts over
pub fn after_reset(_current: Level) -> Level {
    Level::One
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_parameters() {
        assert_eq!(Level::One.cup_count(), 2);
        assert_eq!(Level::Two.cup_count(), 3);
        assert_eq!(Level::One.timing().swaps, 4);
        assert_eq!(Level::Two.timing().swaps, 10);
        assert_eq!(Level::One.timing().swap_interval_ms(), 740);
        assert_eq!(Level::Two.timing().swap_interval_ms(), 250);
    }

    #[test]
    fn test_level_two_is_faster() {
        let slow = Level::One.timing();
        let fast = Level::Two.timing();
        assert!(fast.sequence_ms() < slow.sequence_ms());
        assert!(fast.land_transition_ms < slow.land_transition_ms);
        assert!(fast.ball_dwell_ms < slow.ball_dwell_ms);
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(after_pick(Level::One, true), AfterPick::Apply(Level::Two));
        assert_eq!(after_pick(Level::One, false), AfterPick::Apply(Level::One));
        assert_eq!(after_pick(Level::Two, true), AfterPick::OpenModal);
        assert_eq!(after_pick(Level::Two, false), AfterPick::OpenModal);

        assert_eq!(after_modal(Some(true)), Level::One);
        assert_eq!(after_modal(Some(false)), Level::Two);

        assert_eq!(after_reset(Level::One), Level::One);
        assert_eq!(after_reset(Level::Two), Level::One);
    }

    #[test]
    fn test_scaled_timing() {
        let half = Level::One.timing().scaled(0.5);
        assert_eq!(half.swap_ms, 260);
        assert_eq!(half.ball_dwell_ms, 475);
        assert_eq!(half.swaps, 4);

        let state = LevelState::new(Level::Two, 1.0);
        assert_eq!(state.cup_count, 3);
        assert_eq!(state.timing, Level::Two.timing());
    }
}
