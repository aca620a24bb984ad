//! Game engine
//!
//! Everything here is DOM-free and single-threaded:
//! - No timers of its own; waits are emitted as effects
//! - Randomness only through `RandomSource`
//! - No rendering or platform dependencies

pub mod driver;
pub mod effect;
pub mod layout;
pub mod level;
pub mod pick;
pub mod random;
pub mod shuffle;
pub mod table;
pub mod tick;

pub use driver::Driver;
pub use effect::{BallCue, CupPlacement, Effect, Presenter, Tone};
pub use layout::{compute_slot_offsets, spread_for_width};
pub use level::{AfterPick, Level, LevelState, TimingProfile, after_modal, after_pick};
pub use pick::{PickOutcome, evaluate};
pub use random::{Dice, RandomSource};
pub use shuffle::SequenceStep;
pub use table::{CupHandle, Occupant, RoundPhase, Slot, TableState};
pub use tick::{Event, GameState, ModalState, Rejected};
