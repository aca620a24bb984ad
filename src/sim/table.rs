//! Table state: which logical cup sits in which slot, and where the ball is
//!
//! Each slot owns one record holding its fixed offset and its current
//! occupant. A swap exchanges whole occupants, so a cup's logical identity
//! and its presentation handle always travel together.

use serde::{Deserialize, Serialize};

use super::effect::BallCue;
use super::random::RandomSource;

/// Opaque handle the presenter maps to one cup element (and its shadow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CupHandle(pub usize);

/// Phase of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundPhase {
    /// Board built, cups floating, waiting for Play
    #[default]
    Idle,
    /// Cups settling onto the table
    Landing,
    /// Ball being shown and covered
    Placing,
    /// Cups swapping places
    Shuffling,
    /// Input enabled, waiting for exactly one pick
    AwaitingPick,
    /// Pick made, ball revealed
    Resolved,
}

impl RoundPhase {
    /// Whether a shuffle sequence is in flight
    pub fn is_animating(self) -> bool {
        matches!(
            self,
            RoundPhase::Landing | RoundPhase::Placing | RoundPhase::Shuffling
        )
    }
}

/// A cup and its identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub logical: usize,
    pub cup: CupHandle,
}

/// A fixed physical position on the table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Horizontal offset from table center (px)
    pub offset: f32,
    pub occupant: Occupant,
}

/// Live round data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableState {
    ball_index: usize,
    /// Ball of the previous round, for the no-immediate-repeat rule
    last_ball_index: Option<usize>,
    slots: Vec<Slot>,
    pub phase: RoundPhase,
    /// Last ball cue handed to the presenter
    pub ball: BallCue,
}

impl TableState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh round with cups in identity order
    pub fn reset(&mut self, offsets: &[f32], rng: &mut impl RandomSource) {
        let cup_count = offsets.len();
        self.slots = offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| Slot {
                offset,
                occupant: Occupant {
                    logical: i,
                    cup: CupHandle(i),
                },
            })
            .collect();

        let mut ball = rng.next_int(cup_count);
        if cup_count > 1 && Some(ball) == self.last_ball_index {
            ball = (ball + 1 + rng.next_int(cup_count - 1)) % cup_count;
        }
        self.ball_index = ball;
        self.last_ball_index = Some(ball);
        self.phase = RoundPhase::Idle;
        let parked_x = self.ball_slot().and_then(|s| self.offset(s)).unwrap_or(0.0);
        self.ball = BallCue::parked(parked_x);
    }

    pub fn cup_count(&self) -> usize {
        self.slots.len()
    }

    /// Logical cup holding the ball
    pub fn ball_index(&self) -> usize {
        self.ball_index
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Slot -> logical cup, as a plain sequence
    pub fn order(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.occupant.logical).collect()
    }

    pub fn slot_of(&self, logical: usize) -> Option<usize> {
        self.slots.iter().position(|s| s.occupant.logical == logical)
    }

    pub fn logical_at(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).map(|s| s.occupant.logical)
    }

    pub fn cup_at(&self, slot: usize) -> Option<CupHandle> {
        self.slots.get(slot).map(|s| s.occupant.cup)
    }

    /// Slot currently containing the ball's cup
    pub fn ball_slot(&self) -> Option<usize> {
        self.slot_of(self.ball_index)
    }

    pub fn offset(&self, slot: usize) -> Option<f32> {
        self.slots.get(slot).map(|s| s.offset)
    }

    /// Slot currently holding a given cup handle
    pub fn slot_of_cup(&self, cup: CupHandle) -> Option<usize> {
        self.slots.iter().position(|s| s.occupant.cup == cup)
    }

    /// Exchange the occupants of two slots. Invalid or equal slots are ignored.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return false;
        }
        let held = self.slots[a].occupant;
        self.slots[a].occupant = self.slots[b].occupant;
        self.slots[b].occupant = held;
        true
    }

    /// Replace slot offsets after a resize; occupants are untouched
    pub fn relayout(&mut self, offsets: &[f32]) -> bool {
        if offsets.len() != self.slots.len() {
            return false;
        }
        for (slot, &offset) in self.slots.iter_mut().zip(offsets) {
            slot.offset = offset;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Dice;
    use proptest::prelude::*;

    /// Replays a fixed list of draws
    struct Scripted(Vec<usize>);

    impl RandomSource for Scripted {
        fn next_int(&mut self, max_exclusive: usize) -> usize {
            self.0.remove(0) % max_exclusive.max(1)
        }
    }

    fn is_permutation(order: &[usize]) -> bool {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        sorted.iter().enumerate().all(|(i, &v)| i == v)
    }

    #[test]
    fn test_reset_builds_identity_order() {
        let mut table = TableState::new();
        table.reset(&[-220.0, 0.0, 220.0], &mut Dice::seeded(1));
        assert_eq!(table.order(), vec![0, 1, 2]);
        assert_eq!(table.cup_count(), 3);
        assert_eq!(table.phase, RoundPhase::Idle);
        assert!(!table.ball.visible);
        assert!(table.ball_index() < 3);
        for slot in 0..3 {
            assert_eq!(table.cup_at(slot), Some(CupHandle(slot)));
        }
    }

    #[test]
    fn test_reset_redraws_repeated_ball() {
        let mut table = TableState::new();
        table.reset(&[-110.0, 0.0, 110.0], &mut Scripted(vec![1]));
        assert_eq!(table.ball_index(), 1);

        // Same draw again; redraw is (1 + 1 + 1) % 3
        table.reset(&[-110.0, 0.0, 110.0], &mut Scripted(vec![1, 1]));
        assert_eq!(table.ball_index(), 0);
    }

    #[test]
    fn test_two_cups_alternate() {
        let mut table = TableState::new();
        let mut dice = Dice::seeded(3);
        let mut last = None;
        for _ in 0..50 {
            table.reset(&[-110.0, 110.0], &mut dice);
            assert_ne!(Some(table.ball_index()), last);
            last = Some(table.ball_index());
        }
    }

    #[test]
    fn test_swap_moves_handle_with_identity() {
        let mut table = TableState::new();
        table.reset(&[-220.0, 0.0, 220.0], &mut Dice::seeded(9));
        assert!(table.swap(0, 2));
        assert_eq!(table.order(), vec![2, 1, 0]);
        assert_eq!(table.cup_at(0), Some(CupHandle(2)));
        assert_eq!(table.cup_at(2), Some(CupHandle(0)));
        assert_eq!(table.offset(0), Some(-220.0));
        assert_eq!(table.slot_of_cup(CupHandle(0)), Some(2));
    }

    #[test]
    fn test_invalid_swaps_are_ignored() {
        let mut table = TableState::new();
        table.reset(&[-110.0, 110.0], &mut Dice::seeded(9));
        assert!(!table.swap(1, 1));
        assert!(!table.swap(0, 2));
        assert_eq!(table.order(), vec![0, 1]);
    }

    #[test]
    fn test_relayout_keeps_order() {
        let mut table = TableState::new();
        table.reset(&[-110.0, 0.0, 110.0], &mut Dice::seeded(5));
        table.swap(0, 1);
        let ball = table.ball_index();
        assert!(table.relayout(&[-220.0, 0.0, 220.0]));
        assert_eq!(table.order(), vec![1, 0, 2]);
        assert_eq!(table.ball_index(), ball);
        assert_eq!(table.offset(2), Some(220.0));
        assert!(!table.relayout(&[0.0]));
    }

    #[test]
    fn test_queries_out_of_range() {
        let mut table = TableState::new();
        table.reset(&[-110.0, 110.0], &mut Dice::seeded(5));
        assert_eq!(table.logical_at(5), None);
        assert_eq!(table.slot_of(5), None);
        assert_eq!(table.cup_at(2), None);
    }

    proptest! {
        #[test]
        fn prop_swaps_preserve_permutation_and_ball(
            cups in 2usize..=3,
            seed in any::<u64>(),
            swaps in prop::collection::vec((0usize..3, 0usize..3), 0..40),
        ) {
            let offsets = crate::sim::layout::compute_slot_offsets(cups, 800.0);
            let mut table = TableState::new();
            table.reset(&offsets, &mut Dice::seeded(seed));
            let ball = table.ball_index();
            for (a, b) in swaps {
                table.swap(a, b);
                prop_assert!(is_permutation(&table.order()));
                prop_assert_eq!(table.ball_index(), ball);
                let slot = table.ball_slot().unwrap();
                prop_assert_eq!(table.logical_at(slot), Some(ball));
            }
        }

        #[test]
        fn prop_consecutive_rounds_never_repeat(cups in 2usize..=3, seed in any::<u64>()) {
            let offsets = crate::sim::layout::compute_slot_offsets(cups, 800.0);
            let mut table = TableState::new();
            let mut dice = Dice::seeded(seed);
            table.reset(&offsets, &mut dice);
            for _ in 0..20 {
                let previous = table.ball_index();
                table.reset(&offsets, &mut dice);
                prop_assert_ne!(table.ball_index(), previous);
            }
        }
    }
}
