//! Presentation commands emitted by the engine
//!
//! The engine never touches the DOM. Every visible change is described by an
//! `Effect`, and a `Presenter` turns effects into pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::Level;
use super::table::CupHandle;
use crate::consts::BALL_PARK_Y;

/// Message styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Muted,
    Good,
    Bad,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Muted => "muted",
            Tone::Good => "good",
            Tone::Bad => "bad",
        }
    }
}

/// Where and how the single ball is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallCue {
    /// x = slot offset, y = height above the table
    pub pos: Vec2,
    pub visible: bool,
    /// Use the vertical drop animation
    pub drop: bool,
    /// Relocate without any transition
    pub teleport: bool,
}

impl BallCue {
    /// Hidden, parked above the table
    pub fn parked(x: f32) -> Self {
        Self {
            pos: Vec2::new(x, BALL_PARK_Y),
            visible: false,
            drop: false,
            teleport: false,
        }
    }
}

impl Default for BallCue {
    fn default() -> Self {
        Self::parked(0.0)
    }
}

/// Initial placement of one cup when the table is rebuilt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CupPlacement {
    pub cup: CupHandle,
    pub x: f32,
}

/// A single presentation command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    /// Discard all cups and create fresh ones, floating, with no transition
    BuildTable {
        level: Level,
        cups: Vec<CupPlacement>,
    },
    /// Transition duration for every cup and shadow
    SetCupDuration(u32),
    /// Floating idle pose (true) or resting pose (false) on every cup
    SetFloating(bool),
    SetCupX { cup: CupHandle, x: f32 },
    SetCupY { cup: CupHandle, y: f32 },
    /// Reveal pose for the picked cup
    LiftCup(CupHandle),
    SetInputEnabled(bool),
    Ball(BallCue),
    Status(&'static str),
    Message { html: String, tone: Tone },
    /// Play button shows the in-progress label
    SetPlaying(bool),
    OpenModal,
    CelebrateModal,
    CloseModal,
    /// Report `Event::TimerElapsed { ticket }` after `ms`
    Wait { ticket: u64, ms: u32 },
}

/// Consumer of engine effects
pub trait Presenter {
    fn apply(&mut self, effect: &Effect);

    fn apply_all(&mut self, effects: &[Effect]) {
        for effect in effects {
            self.apply(effect);
        }
    }
}

/// Records effects in order (tests, headless runs)
impl Presenter for Vec<Effect> {
    fn apply(&mut self, effect: &Effect) {
        self.push(effect.clone());
    }
}
