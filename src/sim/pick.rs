//! Pick evaluation and reveal

use glam::Vec2;

use super::effect::{BallCue, Effect, Tone};
use super::table::{CupHandle, RoundPhase, TableState};
use crate::consts::BALL_REVEAL_Y;

/// Result of a single pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickOutcome {
    pub correct: bool,
    pub picked_slot: usize,
    pub picked_cup: CupHandle,
    /// Where the ball really was
    pub ball_slot: usize,
}

/// Resolve a pick. Returns `None` (and changes nothing) unless the round is
/// awaiting a pick and `slot` exists.
pub fn evaluate(table: &mut TableState, slot: usize) -> Option<PickOutcome> {
    if table.phase != RoundPhase::AwaitingPick {
        return None;
    }
    let picked_cup = table.cup_at(slot)?;
    let ball_slot = table.ball_slot()?;
    let correct = table.logical_at(slot) == Some(table.ball_index());

    table.phase = RoundPhase::Resolved;
    Some(PickOutcome {
        correct,
        picked_slot: slot,
        picked_cup,
        ball_slot,
    })
}

/// Lift the picked cup and show the ball where it really is.
///
/// The ball is teleported, never slid, so its reveal carries no motion
/// history.
pub fn reveal(table: &mut TableState, outcome: &PickOutcome, out: &mut Vec<Effect>) {
    out.push(Effect::SetInputEnabled(false));
    out.push(Effect::LiftCup(outcome.picked_cup));

    let x = table.offset(outcome.ball_slot).unwrap_or(0.0);
    let cue = BallCue {
        pos: Vec2::new(x, BALL_REVEAL_Y),
        visible: true,
        drop: false,
        teleport: true,
    };
    table.ball = cue;
    out.push(Effect::Ball(cue));

    if outcome.correct {
        out.push(Effect::Status("Correct"));
        out.push(Effect::Message {
            html: "<b>Correct!</b> You found it".to_string(),
            tone: Tone::Good,
        });
    } else {
        out.push(Effect::Status("Wrong"));
        out.push(Effect::Message {
            html: "<b>Wrong!</b> Try again".to_string(),
            tone: Tone::Bad,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Dice;

    fn awaiting(seed: u64) -> TableState {
        let mut table = TableState::new();
        table.reset(&[-220.0, 0.0, 220.0], &mut Dice::seeded(seed));
        table.swap(0, 2);
        table.swap(1, 2);
        table.phase = RoundPhase::AwaitingPick;
        table
    }

    #[test]
    fn test_ball_slot_is_correct() {
        for seed in 0..10 {
            let mut table = awaiting(seed);
            let ball_slot = table.ball_slot().unwrap();
            let outcome = evaluate(&mut table, ball_slot).unwrap();
            assert!(outcome.correct);
            assert_eq!(outcome.ball_slot, ball_slot);
            assert_eq!(table.phase, RoundPhase::Resolved);
        }
    }

    #[test]
    fn test_other_slots_are_wrong() {
        for seed in 0..10 {
            let probe = awaiting(seed);
            let ball_slot = probe.ball_slot().unwrap();
            for slot in (0..3).filter(|&s| s != ball_slot) {
                let mut table = probe.clone();
                let outcome = evaluate(&mut table, slot).unwrap();
                assert!(!outcome.correct);
                assert_eq!(outcome.picked_slot, slot);
            }
        }
    }

    #[test]
    fn test_outside_awaiting_pick_is_noop() {
        for phase in [
            RoundPhase::Idle,
            RoundPhase::Landing,
            RoundPhase::Placing,
            RoundPhase::Shuffling,
            RoundPhase::Resolved,
        ] {
            let mut table = awaiting(1);
            table.phase = phase;
            assert_eq!(evaluate(&mut table, 0), None);
            assert_eq!(table.phase, phase);
        }
    }

    #[test]
    fn test_invalid_slot_is_noop() {
        let mut table = awaiting(2);
        assert_eq!(evaluate(&mut table, 3), None);
        assert_eq!(table.phase, RoundPhase::AwaitingPick);
    }

    #[test]
    fn test_only_one_pick_per_round() {
        let mut table = awaiting(3);
        assert!(evaluate(&mut table, 0).is_some());
        assert!(evaluate(&mut table, 1).is_none());
    }

    #[test]
    fn test_reveal_teleports_to_true_slot() {
        let mut table = awaiting(4);
        let ball_slot = table.ball_slot().unwrap();
        let wrong = (ball_slot + 1) % 3;
        let outcome = evaluate(&mut table, wrong).unwrap();
        let mut out = Vec::new();
        reveal(&mut table, &outcome, &mut out);

        assert_eq!(out[0], Effect::SetInputEnabled(false));
        assert_eq!(out[1], Effect::LiftCup(outcome.picked_cup));
        let x = table.offset(ball_slot).unwrap();
        assert!(matches!(out[2], Effect::Ball(cue) if cue.teleport && cue.visible && !cue.drop && cue.pos.x == x));
        assert!(out.contains(&Effect::Status("Wrong")));
    }
}
