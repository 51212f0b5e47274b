//! Aim timer / auto-fire controller
//!
//! A countdown bound to the aiming phase. Expiry arms auto-fire exactly
//! once; the forced shot dispatches on the following tick boundary using
//! the reticle position at that instant. Manual release cancels the
//! timer before the expiry check can fire, so a shot never dispatches
//! twice.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;
use crate::tuning::Tuning;

/// Countdown state for one aiming phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AimTimer {
    ticks_remaining: u32,
    total_ticks: u32,
    auto_fire_armed: bool,
}

impl AimTimer {
    /// Start a fresh countdown (`fraction() == 1.0`)
    pub fn new(tuning: &Tuning) -> Self {
        let total = (tuning.aim_timer_secs * TICK_RATE).round().max(1.0) as u32;
        Self {
            ticks_remaining: total,
            total_ticks: total,
            auto_fire_armed: false,
        }
    }

    /// Remaining fraction: 1 = just started, 0 = expired. Integer tick
    /// bookkeeping keeps this exact and strictly non-increasing.
    pub fn fraction(&self) -> f32 {
        self.ticks_remaining as f32 / self.total_ticks as f32
    }

    pub fn auto_fire_armed(&self) -> bool {
        self.auto_fire_armed
    }

    /// Advance one tick. Returns true when the forced shot must dispatch
    /// now, i.e. on the tick after the countdown reached zero.
    pub fn step(&mut self) -> bool {
        if self.auto_fire_armed {
            return true;
        }
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        if self.ticks_remaining == 0 {
            self.auto_fire_armed = true;
        }
        false
    }

    /// Manual release: disarm so auto-fire cannot double fire
    pub fn cancel(&mut self) {
        self.auto_fire_armed = false;
        self.ticks_remaining = 0;
    }
}
