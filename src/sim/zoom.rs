//! Zoom controller
//!
//! One scalar zoom level and one focus point for the whole session,
//! exponentially eased toward a phase-dependent target. The level is
//! never assigned directly, so transitions stay smooth even when the
//! phase changes abruptly. A short-lived additive release bump gives a
//! "recoil" cue the instant a shot is sent, independent of the
//! phase-based zoom.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// What the camera should be doing this tick, in descending priority
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZoomCue {
    /// Post-shot hold on the hit point
    Hold { focus: Vec2 },
    /// Late flight: track the incoming arrow toward its hit point.
    /// `progress` is normalized flight progress in [0, 1].
    LateFlight { focus: Vec2, progress: f32 },
    /// Local player is aiming
    Aiming,
    /// Nothing special: 1x on the target center
    Neutral,
}

/// Continuously eased camera state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomState {
    /// Current interpolated scale
    pub level: f32,
    /// World point the zoom centers on
    pub focus: Vec2,
    /// Decaying additive recoil zoom
    pub release_bump: f32,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            level: 1.0,
            focus: Vec2::ZERO,
            release_bump: 0.0,
        }
    }
}

impl ZoomState {
    /// Target (level, focus) for a cue
    fn desired(cue: ZoomCue, tuning: &Tuning) -> (f32, Vec2) {
        match cue {
            ZoomCue::Hold { focus } => (tuning.result_zoom, focus),
            ZoomCue::LateFlight { focus, progress } => {
                // Only the final stretch of the flight pulls the camera in
                let span = (1.0 - tuning.flight_zoom_start).max(f32::EPSILON);
                let ramp = ((progress - tuning.flight_zoom_start) / span).clamp(0.0, 1.0);
                (
                    1.0 + (tuning.result_zoom - 1.0) * ramp,
                    focus * ramp,
                )
            }
            ZoomCue::Aiming => (tuning.aim_zoom, Vec2::ZERO),
            ZoomCue::Neutral => (1.0, Vec2::ZERO),
        }
    }

    /// Ease toward the cue's target and decay the release bump
    pub fn step(&mut self, cue: ZoomCue, tuning: &Tuning) {
        let (want_level, want_focus) = Self::desired(cue, tuning);
        self.level += (want_level - self.level) * tuning.zoom_ease_rate;
        self.focus += (want_focus - self.focus) * tuning.zoom_ease_rate;

        self.release_bump *= tuning.release_bump_decay;
        if self.release_bump < 1e-3 {
            self.release_bump = 0.0;
        }
    }

    /// Kick the recoil bump (shot just released)
    pub fn bump(&mut self, tuning: &Tuning) {
        self.release_bump += tuning.release_bump_strength;
    }

    /// Effective scale for rendering: eased level plus the bump
    pub fn current_level(&self) -> f32 {
        self.level + self.release_bump
    }
}
