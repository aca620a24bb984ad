//! Event dispatch
//!
//! `GameState` is the single context object. Every input, timer and modal
//! callback goes through `dispatch`, which mutates the state and returns the
//! effects to present. At most one timer is outstanding; each carries a
//! ticket so a superseded timer is rejected instead of acting on a new round.

use thiserror::Error;

use super::effect::{CupPlacement, Effect, Tone};
use super::layout::compute_slot_offsets;
use super::level::{AfterPick, Level, LevelState, after_modal, after_pick, after_reset};
use super::pick;
use super::random::{Dice, RandomSource};
use super::shuffle::{self, SequenceStep, Timed};
use super::table::{RoundPhase, TableState};
use crate::consts::MODAL_CELEBRATE_MS;
use crate::settings::Settings;

/// Something the player, the browser or a timer did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Play button
    Start,
    /// Click on the cup currently in `slot`
    Pick { slot: usize },
    /// The wait with this ticket has elapsed
    TimerElapsed { ticket: u64 },
    /// "Yes" in the modal
    ModalAccepted,
    /// Click on the modal backdrop
    ModalDismissed,
    /// Reset button
    Reset,
    /// Viewport width changed
    Resize { width: f32 },
}

/// Why an event was ignored. Never shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("a shuffle sequence is already running")]
    SequenceRunning,
    #[error("the modal is open")]
    ModalOpen,
    #[error("the modal is not waiting for an answer")]
    ModalNotOpen,
    #[error("the round is not awaiting a pick")]
    NotAwaitingPick,
    #[error("slot {0} does not exist")]
    InvalidSlot(usize),
    #[error("the last pick is still being resolved")]
    PickResolving,
    #[error("timer {0} is not the outstanding one")]
    StaleTimer(u64),
}

/// Modal collaborator state as seen by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    /// Waiting for Yes or a backdrop click
    Open,
    /// "Yes" pressed, celebration showing before close
    Celebrating,
}

/// What the outstanding timer will do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Sequence(SequenceStep),
    /// Outcome on screen, then level change or modal
    OutcomeHold,
    /// Modal celebrating, then close
    Celebration,
}

/// Complete game context
#[derive(Debug, Clone)]
pub struct GameState<R: RandomSource = Dice> {
    pub level: LevelState,
    pub table: TableState,
    /// Carried across the modal to pick the next level
    pub last_pick_correct: Option<bool>,
    pub modal: ModalState,
    pub viewport_width: f32,
    animation_scale: f32,
    rng: R,
    pending: Option<(u64, Pending)>,
    /// Outstanding wait, as handed to the presenter
    timer: Option<(u64, u32)>,
    next_ticket: u64,
}

impl GameState<Dice> {
    /// Build the boot state from settings. Returns the effects that draw it.
    pub fn from_settings(settings: &Settings, viewport_width: f32) -> (Self, Vec<Effect>) {
        Self::new(
            settings.start_level,
            viewport_width,
            settings.animation_scale,
            settings.dice(),
        )
    }
}

impl<R: RandomSource> GameState<R> {
    /// Create a state with `level` applied. Returns the effects that draw it.
    pub fn new(level: Level, viewport_width: f32, animation_scale: f32, rng: R) -> (Self, Vec<Effect>) {
        let mut state = Self {
            level: LevelState::new(level, animation_scale),
            table: TableState::new(),
            last_pick_correct: None,
            modal: ModalState::Closed,
            viewport_width,
            animation_scale,
            rng,
            pending: None,
            timer: None,
            next_ticket: 1,
        };
        let mut out = Vec::new();
        state.apply_level(level, None, &mut out);
        (state, out)
    }

    pub fn phase(&self) -> RoundPhase {
        self.table.phase
    }

    /// The wait the driver must honor next, if any: `(ticket, ms)`
    pub fn outstanding_timer(&self) -> Option<(u64, u32)> {
        self.timer
    }

    /// Apply an event, returning its effects. Rejected events are logged and
    /// produce nothing.
    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        match self.try_dispatch(event) {
            Ok(effects) => effects,
            Err(reason) => {
                log::debug!("Ignored {:?}: {}", event, reason);
                Vec::new()
            }
        }
    }

    /// Apply an event, or say why it was refused. A refused event changes
    /// nothing.
    pub fn try_dispatch(&mut self, event: Event) -> Result<Vec<Effect>, Rejected> {
        let mut out = Vec::new();
        match event {
            Event::Start => self.start(&mut out)?,
            Event::Pick { slot } => self.pick(slot, &mut out)?,
            Event::TimerElapsed { ticket } => self.timer_elapsed(ticket, &mut out)?,
            Event::ModalAccepted => self.modal_accepted(&mut out)?,
            Event::ModalDismissed => self.modal_dismissed(&mut out)?,
            Event::Reset => self.reset(&mut out)?,
            Event::Resize { width } => self.resize(width, &mut out),
        }
        Ok(out)
    }

    fn start(&mut self, out: &mut Vec<Effect>) -> Result<(), Rejected> {
        if self.modal != ModalState::Closed {
            return Err(Rejected::ModalOpen);
        }
        if self.table.phase.is_animating() {
            return Err(Rejected::SequenceRunning);
        }
        if self.table.phase == RoundPhase::Resolved {
            return Err(Rejected::PickResolving);
        }
        let timed = shuffle::begin(&mut self.table, &self.level.timing, out);
        self.schedule_step(timed, out);
        Ok(())
    }

    fn pick(&mut self, slot: usize, out: &mut Vec<Effect>) -> Result<(), Rejected> {
        if self.modal != ModalState::Closed {
            return Err(Rejected::ModalOpen);
        }
        if self.table.phase != RoundPhase::AwaitingPick {
            return Err(Rejected::NotAwaitingPick);
        }
        let outcome = pick::evaluate(&mut self.table, slot).ok_or(Rejected::InvalidSlot(slot))?;
        log::info!(
            "Level {} pick slot {} -> {} (ball in slot {})",
            self.level.level.number(),
            slot,
            if outcome.correct { "correct" } else { "wrong" },
            outcome.ball_slot
        );
        self.last_pick_correct = Some(outcome.correct);
        pick::reveal(&mut self.table, &outcome, out);
        self.schedule(Pending::OutcomeHold, self.level.timing.outcome_hold_ms, out);
        Ok(())
    }

    fn timer_elapsed(&mut self, ticket: u64, out: &mut Vec<Effect>) -> Result<(), Rejected> {
        let pending = match self.pending {
            Some((outstanding, pending)) if outstanding == ticket => pending,
            _ => return Err(Rejected::StaleTimer(ticket)),
        };
        self.pending = None;
        self.timer = None;

        match pending {
            Pending::Sequence(step) => {
                let timing = self.level.timing;
                if let Some(timed) =
                    shuffle::advance(step, &mut self.table, &timing, &mut self.rng, out)
                {
                    self.schedule_step(timed, out);
                }
            }
            Pending::OutcomeHold => {
                let correct = self.last_pick_correct.unwrap_or(false);
                match after_pick(self.level.level, correct) {
                    AfterPick::Apply(level) => {
                        let message = if correct {
                            "Nice. Next stage unlocked. Press <b>Play</b>."
                        } else {
                            "Try again. Press <b>Play</b> to retry Level 1."
                        };
                        self.apply_level(level, Some(message), out);
                    }
                    AfterPick::OpenModal => {
                        log::info!("Opening modal");
                        self.modal = ModalState::Open;
                        out.push(Effect::OpenModal);
                    }
                }
            }
            Pending::Celebration => self.close_modal(out),
        }
        Ok(())
    }

    fn modal_accepted(&mut self, out: &mut Vec<Effect>) -> Result<(), Rejected> {
        if self.modal != ModalState::Open {
            return Err(Rejected::ModalNotOpen);
        }
        log::info!("Modal accepted");
        self.modal = ModalState::Celebrating;
        out.push(Effect::CelebrateModal);
        let ms = scale_ms(MODAL_CELEBRATE_MS, self.animation_scale);
        self.schedule(Pending::Celebration, ms, out);
        Ok(())
    }

    fn modal_dismissed(&mut self, out: &mut Vec<Effect>) -> Result<(), Rejected> {
        if self.modal != ModalState::Open {
            return Err(Rejected::ModalNotOpen);
        }
        // Same outcome as accepting, just without the celebration
        log::info!("Modal dismissed");
        self.close_modal(out);
        Ok(())
    }

    fn close_modal(&mut self, out: &mut Vec<Effect>) {
        self.modal = ModalState::Closed;
        out.push(Effect::CloseModal);
        let level = after_modal(self.last_pick_correct);
        let message = match level {
            Level::One => "Stage cleared. Press <b>Play</b> to restart from Level 1.",
            Level::Two => "Try again. Press <b>Play</b> to retry Level 2.",
        };
        self.apply_level(level, Some(message), out);
    }

    fn reset(&mut self, out: &mut Vec<Effect>) -> Result<(), Rejected> {
        if self.modal != ModalState::Closed {
            return Err(Rejected::ModalOpen);
        }
        if self.table.phase.is_animating() {
            return Err(Rejected::SequenceRunning);
        }
        self.apply_level(after_reset(self.level.level), None, out);
        Ok(())
    }

    fn resize(&mut self, width: f32, out: &mut Vec<Effect>) {
        self.viewport_width = width;
        let offsets = compute_slot_offsets(self.table.cup_count(), width);
        if !self.table.relayout(&offsets) {
            return;
        }
        for slot in self.table.slots() {
            out.push(Effect::SetCupX {
                cup: slot.occupant.cup,
                x: slot.offset,
            });
        }
        if self.table.ball.visible {
            if let Some(x) = self.table.ball_slot().and_then(|s| self.table.offset(s)) {
                let mut cue = self.table.ball;
                cue.pos.x = x;
                cue.teleport = true;
                self.table.ball = cue;
                out.push(Effect::Ball(cue));
            }
        }
    }

    /// Rebuild the board for `level`. Drops any outstanding timer.
    fn apply_level(&mut self, level: Level, message: Option<&str>, out: &mut Vec<Effect>) {
        self.level = LevelState::new(level, self.animation_scale);
        self.pending = None;
        self.timer = None;

        let offsets = compute_slot_offsets(self.level.cup_count, self.viewport_width);
        self.table.reset(&offsets, &mut self.rng);
        log::info!(
            "Level {} ready: {} cups, ball under cup {}",
            level.number(),
            self.level.cup_count,
            self.table.ball_index()
        );

        out.push(Effect::BuildTable {
            level,
            cups: self
                .table
                .slots()
                .iter()
                .map(|s| CupPlacement {
                    cup: s.occupant.cup,
                    x: s.offset,
                })
                .collect(),
        });
        out.push(Effect::SetFloating(true));
        out.push(Effect::Ball(self.table.ball));
        out.push(Effect::Status("Ready"));
        out.push(Effect::SetPlaying(false));
        let html = match message {
            Some(text) => text.to_string(),
            None => format!(
                "Press <b>Play</b>. Level {}: {} cup(s) • {}",
                level.number(),
                self.level.cup_count,
                level.shuffle_label()
            ),
        };
        out.push(Effect::Message {
            html,
            tone: Tone::Muted,
        });
    }

    fn schedule_step(&mut self, timed: Timed, out: &mut Vec<Effect>) {
        self.schedule(Pending::Sequence(timed.step), timed.ms, out);
    }

    fn schedule(&mut self, pending: Pending, ms: u32, out: &mut Vec<Effect>) {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.pending = Some((ticket, pending));
        self.timer = Some((ticket, ms));
        out.push(Effect::Wait { ticket, ms });
    }
}

fn scale_ms(ms: u32, factor: f32) -> u32 {
    (ms as f32 * factor).round().max(0.0) as u32
}
