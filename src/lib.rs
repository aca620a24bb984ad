//! Shell Game - find the ball under the cup
//!
//! Core modules:
//! - `sim`: DOM-free game engine (layout, table, shuffle sequence, levels)
//! - `settings`: Startup configuration
//! - `web`: Browser presentation and the modal's decline button

pub mod settings;
pub mod sim;
pub mod web;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Layout: widest allowed half-spread between outer cups (px)
    pub const MAX_SPREAD: f32 = 220.0;
    /// Layout: narrowest half-spread, keeps cups from overlapping (px)
    pub const MIN_SPREAD: f32 = 110.0;
    /// Approximate cup width on mobile, reserved as margin (px)
    pub const CUP_MARGIN: f32 = 120.0;

    /// Cup height while floating between rounds
    pub const CUP_FLOAT_Y: f32 = -44.0;
    /// Cup height when resting on the table
    pub const CUP_REST_Y: f32 = 0.0;
    /// Cup height while showing the ball
    pub const CUP_LIFT_Y: f32 = -70.0;

    /// Ball height while parked off-table
    pub const BALL_PARK_Y: f32 = -180.0;
    /// Ball height right before it drops into the cup
    pub const BALL_DROP_FROM_Y: f32 = -210.0;
    /// Ball height inside the lifted cup
    pub const BALL_IN_CUP_Y: f32 = -42.0;
    /// Ball height when revealed after a pick
    pub const BALL_REVEAL_Y: f32 = -6.0;

    /// How long the "Yes" celebration stays up before the modal closes
    pub const MODAL_CELEBRATE_MS: u32 = 850;
}
