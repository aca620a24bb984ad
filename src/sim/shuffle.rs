//! Shuffle sequence: land, show the ball, cover it, swap cups
//!
//! Each step emits its effects and names the step that follows once the
//! returned wait has elapsed. The caller owns the timer.
//!
//! The ball is always hidden *before* its cup comes back down, so it is never
//! seen sliding under a descending cup.

use glam::Vec2;

use super::effect::{BallCue, Effect, Tone};
use super::level::TimingProfile;
use super::random::RandomSource;
use super::table::{CupHandle, RoundPhase, TableState};
use crate::consts::{BALL_DROP_FROM_Y, BALL_IN_CUP_Y, CUP_LIFT_Y, CUP_REST_Y};

/// Steps that end in a timed wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceStep {
    /// Cups settling onto the table
    Landed,
    /// Ball cup rising
    Lifted,
    /// Ball visible inside the lifted cup
    Dwelled,
    /// Cup coming down over the hidden ball
    Covered,
    /// A swap is animating; `remaining` swaps still to go
    Swapped { remaining: u32 },
}

/// A step plus how long to wait before advancing past it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timed {
    pub step: SequenceStep,
    pub ms: u32,
}

/// Enter Landing. The caller checks the entry guard.
pub fn begin(table: &mut TableState, timing: &TimingProfile, out: &mut Vec<Effect>) -> Timed {
    table.phase = RoundPhase::Landing;
    log::debug!("Sequence start ({} cups)", table.cup_count());

    out.push(Effect::SetInputEnabled(false));
    out.push(Effect::SetPlaying(true));
    out.push(Effect::Status("Starting"));
    out.push(Effect::Message {
        html: "Cups landing… ball being placed…".to_string(),
        tone: Tone::Muted,
    });

    // Ball stays hidden through landing
    let hidden = BallCue {
        visible: false,
        drop: false,
        teleport: false,
        ..table.ball
    };
    table.ball = hidden;
    out.push(Effect::Ball(hidden));

    out.push(Effect::SetFloating(false));
    out.push(Effect::SetCupDuration(timing.land_transition_ms));
    for slot in table.slots() {
        out.push(Effect::SetCupY {
            cup: slot.occupant.cup,
            y: CUP_REST_Y,
        });
    }

    Timed {
        step: SequenceStep::Landed,
        ms: timing.land_wait_ms,
    }
}

/// Advance past a finished step. `None` means the sequence is over and the
/// round is awaiting a pick.
pub fn advance(
    step: SequenceStep,
    table: &mut TableState,
    timing: &TimingProfile,
    rng: &mut impl RandomSource,
    out: &mut Vec<Effect>,
) -> Option<Timed> {
    match step {
        SequenceStep::Landed => {
            table.phase = RoundPhase::Placing;
            let (cup, _) = ball_cup(table)?;
            out.push(Effect::SetCupDuration(timing.lift_transition_ms));
            out.push(Effect::SetCupY { cup, y: CUP_LIFT_Y });
            Some(Timed {
                step: SequenceStep::Lifted,
                ms: timing.lift_wait_ms,
            })
        }
        SequenceStep::Lifted => {
            let (_, x) = ball_cup(table)?;
            // Teleport above the cup, then drop straight down
            let above = BallCue {
                pos: Vec2::new(x, BALL_DROP_FROM_Y),
                visible: true,
                drop: false,
                teleport: true,
            };
            let inside = BallCue {
                pos: Vec2::new(x, BALL_IN_CUP_Y),
                visible: true,
                drop: true,
                teleport: false,
            };
            out.push(Effect::Ball(above));
            out.push(Effect::Ball(inside));
            table.ball = inside;
            Some(Timed {
                step: SequenceStep::Dwelled,
                ms: timing.ball_dwell_ms,
            })
        }
        SequenceStep::Dwelled => {
            let (cup, x) = ball_cup(table)?;
            let hidden = BallCue {
                pos: Vec2::new(x, BALL_IN_CUP_Y),
                visible: false,
                drop: false,
                teleport: false,
            };
            out.push(Effect::Ball(hidden));
            table.ball = hidden;
            out.push(Effect::SetCupY { cup, y: CUP_REST_Y });
            Some(Timed {
                step: SequenceStep::Covered,
                ms: timing.cover_wait_ms,
            })
        }
        SequenceStep::Covered => {
            table.phase = RoundPhase::Shuffling;
            out.push(Effect::Status("Shuffling"));
            out.push(Effect::Message {
                html: "Shuffling… don’t blink".to_string(),
                tone: Tone::Muted,
            });
            out.push(Effect::SetCupDuration(timing.swap_ms));
            next_swap(timing.swaps, table, timing, rng, out)
        }
        SequenceStep::Swapped { remaining } => next_swap(remaining, table, timing, rng, out),
    }
}

fn next_swap(
    remaining: u32,
    table: &mut TableState,
    timing: &TimingProfile,
    rng: &mut impl RandomSource,
    out: &mut Vec<Effect>,
) -> Option<Timed> {
    if remaining == 0 {
        finish(table, out);
        return None;
    }
    swap_random(table, rng, out);
    Some(Timed {
        step: SequenceStep::Swapped {
            remaining: remaining - 1,
        },
        ms: timing.swap_interval_ms(),
    })
}

/// One random transposition of two distinct slots
pub fn swap_random(table: &mut TableState, rng: &mut impl RandomSource, out: &mut Vec<Effect>) {
    let n = table.cup_count();
    if n < 2 {
        return;
    }
    let a = rng.next_int(n);
    let mut b = rng.next_int(n);
    while b == a {
        b = rng.next_int(n);
    }
    table.swap(a, b);
    log::debug!("Swap slots {a} <-> {b}, order {:?}", table.order());

    for slot in [a, b] {
        if let (Some(cup), Some(x)) = (table.cup_at(slot), table.offset(slot)) {
            out.push(Effect::SetCupX { cup, x });
        }
    }
}

fn finish(table: &mut TableState, out: &mut Vec<Effect>) {
    table.phase = RoundPhase::AwaitingPick;
    out.push(Effect::SetInputEnabled(true));
    out.push(Effect::Status("Pick a cup"));
    out.push(Effect::SetPlaying(false));
    out.push(Effect::Message {
        html: "Your turn: click a cup to guess where the ball is.".to_string(),
        tone: Tone::Muted,
    });
}

/// Handle and x offset of the cup hiding the ball
fn ball_cup(table: &TableState) -> Option<(CupHandle, f32)> {
    let slot = table.ball_slot()?;
    Some((table.cup_at(slot)?, table.offset(slot)?))
}
