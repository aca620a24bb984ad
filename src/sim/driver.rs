//! Virtual-time driver
//!
//! Feeds `Wait` effects back into the state as timer events without real
//! sleeping. Used by tests and the headless native binary; the browser build
//! schedules the same waits with `setTimeout` instead.

use super::effect::{Effect, Presenter};
use super::random::{Dice, RandomSource};
use super::tick::{Event, GameState};

/// Game state, a presenter, and a virtual clock
pub struct Driver<P: Presenter, R: RandomSource = Dice> {
    pub state: GameState<R>,
    pub presenter: P,
    /// Virtual milliseconds fast-forwarded so far
    pub elapsed_ms: u64,
}

impl<P: Presenter, R: RandomSource> Driver<P, R> {
    /// Wrap a freshly built state, presenting its boot effects
    pub fn new(state: GameState<R>, boot: Vec<Effect>, mut presenter: P) -> Self {
        presenter.apply_all(&boot);
        Self {
            state,
            presenter,
            elapsed_ms: 0,
        }
    }

    /// Dispatch an event and present its effects. Returns whether it was accepted.
    pub fn send(&mut self, event: Event) -> bool {
        match self.state.try_dispatch(event) {
            Ok(effects) => {
                self.presenter.apply_all(&effects);
                true
            }
            Err(reason) => {
                log::debug!("Ignored {:?}: {}", event, reason);
                false
            }
        }
    }

    /// Fast-forward through the outstanding timer, if any
    pub fn advance(&mut self) -> bool {
        let Some((ticket, ms)) = self.state.outstanding_timer() else {
            return false;
        };
        self.elapsed_ms += u64::from(ms);
        self.send(Event::TimerElapsed { ticket })
    }

    /// Fast-forward until no timer is outstanding. Returns the virtual time spent.
    pub fn settle(&mut self) -> u64 {
        let before = self.elapsed_ms;
        while self.advance() {}
        self.elapsed_ms - before
    }
}
