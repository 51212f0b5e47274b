//! Data-driven game balance
//!
//! Every numeric knob the simulation reads lives here. The struct is
//! immutable from the simulation's point of view: it is passed into each
//! step function at call time rather than read from ambient state, so a
//! balance edit between ticks applies cleanly on the next tick.
//!
//! All fields have serde defaults, so a partial JSON balance file only
//! overrides what it names.

use serde::{Deserialize, Serialize};

/// Simulation tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Reticle steering ===
    /// Pointer drag to momentum gain
    pub drag_sensitivity: f32,
    /// Per-tick momentum multiplier, (0, 1)
    pub friction: f32,
    /// Momentum magnitude floor while aiming (px/tick), > 0
    pub min_speed: f32,
    /// Momentum magnitude ceiling (px/tick), >= min_speed
    pub max_speed: f32,
    /// Idle drift amplitude so the reticle is never perfectly still
    pub idle_drift_strength: f32,
    /// Maximum reticle distance from target center (px)
    pub max_aim_radius: f32,
    /// Spawn band around the target edge: [inner, outer] fractions of max_aim_radius
    pub spawn_radius_band: [f32; 2],

    // === Aim timer ===
    /// Seconds before auto-fire forces the shot
    pub aim_timer_secs: f32,

    // === Zoom ===
    /// Zoom multiplier while aiming
    pub aim_zoom: f32,
    /// Zoom multiplier for the late-flight / result close-up
    pub result_zoom: f32,
    /// Exponential easing factor per tick, (0, 1]
    pub zoom_ease_rate: f32,
    /// Additive zoom kick when a shot is released
    pub release_bump_strength: f32,
    /// Geometric bump decay per tick, (0, 1)
    pub release_bump_decay: f32,
    /// Normalized flight progress where the zoom starts tracking the hit point
    pub flight_zoom_start: f32,
    /// Post-shot hold on the hit point, solo mode (seconds)
    pub hold_secs_solo: f32,
    /// Post-shot hold on the hit point, multiplayer (seconds)
    pub hold_secs_multiplayer: f32,

    // === Flight ===
    /// Nominal flight time, launch to landing (ms)
    pub flight_duration_ms: f32,
    /// Arc peak as a fraction of the launch-to-hit distance
    pub arc_height_fraction: f32,
    /// Wind displacement gain (applied times t²)
    pub wind_drift_factor: f32,
    /// Normalized progress past which flight time dilates, (0, 1]
    pub slow_mo_threshold: f32,
    /// Time-advance multiplier inside the slow-mo window, (0, 1]
    pub slow_mo_speed: f32,
    /// Launch point offset below the target center (px)
    pub launch_offset: f32,
    /// Board shake impulse on landing
    pub impact_shake: f32,

    // === Impact & retention ===
    /// Overshoot/squash animation length (ticks)
    pub impact_frames: u32,
    /// Pinned-arrow history capacity (oldest evicted first)
    pub max_arrows: usize,

    // === Frame clock ===
    /// Upper bound on one frame's wall-clock delta (seconds)
    pub max_frame_delta: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.12,
            friction: 0.92,
            min_speed: 0.3,
            max_speed: 3.0,
            idle_drift_strength: 0.05,
            max_aim_radius: 140.0,
            spawn_radius_band: [0.75, 0.95],

            aim_timer_secs: 8.0,

            aim_zoom: 1.6,
            result_zoom: 2.2,
            zoom_ease_rate: 0.12,
            release_bump_strength: 0.25,
            release_bump_decay: 0.85,
            flight_zoom_start: 0.7,
            hold_secs_solo: 0.6,
            hold_secs_multiplayer: 1.4,

            flight_duration_ms: 900.0,
            arc_height_fraction: 0.18,
            wind_drift_factor: 1.0,
            slow_mo_threshold: 0.85,
            slow_mo_speed: 0.35,
            launch_offset: 420.0,
            impact_shake: 6.0,

            impact_frames: 12,
            max_arrows: 10,

            max_frame_delta: 0.1,
        }
    }
}

impl Tuning {
    /// Load from a JSON balance file's contents, falling back per-field
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Tuning = serde_json::from_str(json)?;
        tuning.sanitize();
        Ok(tuning)
    }

    /// Clamp every knob into its documented range. Never panics; logs
    /// each correction so a bad balance file is visible.
    pub fn sanitize(&mut self) {
        let defaults = Tuning::default();

        if !(self.friction > 0.0 && self.friction < 1.0) {
            log::warn!("tuning: friction {} out of (0,1), using default", self.friction);
            self.friction = defaults.friction;
        }
        if !(self.min_speed > 0.0) {
            self.min_speed = defaults.min_speed;
        }
        if self.max_speed < self.min_speed {
            log::warn!(
                "tuning: max_speed {} < min_speed {}, raising",
                self.max_speed,
                self.min_speed
            );
            self.max_speed = self.min_speed;
        }
        if !(self.max_aim_radius > 0.0) {
            self.max_aim_radius = defaults.max_aim_radius;
        }
        let [lo, hi] = self.spawn_radius_band;
        if !(lo > 0.0 && hi <= 1.0 && lo <= hi) {
            self.spawn_radius_band = defaults.spawn_radius_band;
        }
        if !(self.aim_timer_secs > 0.0) {
            self.aim_timer_secs = defaults.aim_timer_secs;
        }
        if !(self.zoom_ease_rate > 0.0 && self.zoom_ease_rate <= 1.0) {
            self.zoom_ease_rate = defaults.zoom_ease_rate;
        }
        if !(self.release_bump_decay >= 0.0 && self.release_bump_decay < 1.0) {
            self.release_bump_decay = defaults.release_bump_decay;
        }
        if !(self.flight_zoom_start > 0.0 && self.flight_zoom_start < 1.0) {
            self.flight_zoom_start = defaults.flight_zoom_start;
        }
        if !(self.flight_duration_ms > 0.0) {
            self.flight_duration_ms = defaults.flight_duration_ms;
        }
        if !(self.slow_mo_threshold > 0.0 && self.slow_mo_threshold <= 1.0) {
            log::warn!(
                "tuning: slow_mo_threshold {} out of (0,1], using default",
                self.slow_mo_threshold
            );
            self.slow_mo_threshold = defaults.slow_mo_threshold;
        }
        if !(self.slow_mo_speed > 0.0 && self.slow_mo_speed <= 1.0) {
            self.slow_mo_speed = defaults.slow_mo_speed;
        }
        if self.impact_frames == 0 {
            self.impact_frames = defaults.impact_frames;
        }
        if self.max_arrows == 0 {
            self.max_arrows = defaults.max_arrows;
        }
        if !(self.max_frame_delta > 0.0) {
            self.max_frame_delta = defaults.max_frame_delta;
        }
    }

    /// Post-shot hold duration for the given mode, in ticks
    pub fn hold_ticks(&self, solo: bool) -> u32 {
        let secs = if solo {
            self.hold_secs_solo
        } else {
            self.hold_secs_multiplayer
        };
        (secs * crate::consts::TICK_RATE).round().max(1.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let mut t = Tuning::default();
        let before = format!("{:?}", t);
        t.sanitize();
        assert_eq!(before, format!("{:?}", t));
    }

    #[test]
    fn test_sanitize_speed_order() {
        let mut t = Tuning {
            min_speed: 2.0,
            max_speed: 1.0,
            ..Default::default()
        };
        t.sanitize();
        assert!(t.min_speed <= t.max_speed);
    }

    #[test]
    fn test_sanitize_slow_mo_threshold() {
        let mut t = Tuning {
            slow_mo_threshold: 0.0,
            ..Default::default()
        };
        t.sanitize();
        assert!(t.slow_mo_threshold > 0.0 && t.slow_mo_threshold <= 1.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let t = Tuning::from_json(r#"{"aim_timer_secs": 5.0}"#).unwrap();
        assert_eq!(t.aim_timer_secs, 5.0);
        assert_eq!(t.friction, Tuning::default().friction);
    }

    #[test]
    fn test_hold_ticks_mode_dependent() {
        let t = Tuning::default();
        assert!(t.hold_ticks(true) < t.hold_ticks(false));
    }
}
