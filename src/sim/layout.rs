//! Horizontal slot layout
//!
//! Slots are symmetric about the table center. The spread shrinks with the
//! viewport but never below `MIN_SPREAD`, so cups neither leave the screen
//! nor overlap.

use crate::consts::{CUP_MARGIN, MAX_SPREAD, MIN_SPREAD};

/// Half-distance between the outermost cups for a given width
pub fn spread_for_width(available_width: f32) -> f32 {
    let width = if available_width.is_finite() {
        available_width.max(0.0)
    } else {
        0.0
    };
    let max_spread = MAX_SPREAD.min(((width - CUP_MARGIN) / 2.0).floor());
    MIN_SPREAD.max(max_spread)
}

/// Offsets (px from center) for each slot, ascending
pub fn compute_slot_offsets(cup_count: usize, available_width: f32) -> Vec<f32> {
    let spread = spread_for_width(available_width);
    match cup_count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => {
            let step = 2.0 * spread / (n - 1) as f32;
            (0..n).map(|i| -spread + step * i as f32).collect()
        }
    }
}
