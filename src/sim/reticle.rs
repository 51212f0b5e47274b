//! Reticle dynamics
//!
//! Converts buffered pointer drag into a bounded, always-moving aim
//! position: momentum plus friction plus a perpetual idle drift, clamped
//! to a speed envelope and a maximum radius around the target center.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::SPAWN_SECTORS;
use crate::normalize_or_zero;
use crate::tuning::Tuning;

/// Aim marker state, owned exclusively by this simulator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReticleState {
    /// Current aim offset from target center (px)
    pub position: Vec2,
    /// Velocity-like accumulator (px/tick)
    pub momentum: Vec2,
    /// Unconsumed drag delta since the last tick
    pub input_accumulator: Vec2,
}

impl ReticleState {
    /// Buffer a pointer drag delta. Input may arrive more often than
    /// render ticks; it is drained once per `step`. Non-finite deltas
    /// are ignored outright.
    pub fn accumulate_drag(&mut self, delta: Vec2) {
        if delta.x.is_finite() && delta.y.is_finite() {
            self.input_accumulator += delta;
        }
    }

    /// Snap to an edge-of-target spawn slot and seed momentum with a
    /// random-direction impulse at minimum speed, so the very first
    /// frame already exhibits motion.
    pub fn begin_aim(&mut self, rng: &mut Pcg32, tuning: &Tuning) {
        use std::f32::consts::TAU;

        let sector = rng.random_range(0..SPAWN_SECTORS);
        let sector_width = TAU / SPAWN_SECTORS as f32;
        let angle = sector as f32 * sector_width + rng.random_range(0.0..sector_width);

        let [band_lo, band_hi] = tuning.spawn_radius_band;
        let radius = tuning.max_aim_radius * rng.random_range(band_lo..=band_hi);
        self.position = Vec2::new(angle.cos(), angle.sin()) * radius;

        let impulse_angle = rng.random_range(0.0..TAU);
        self.momentum =
            Vec2::new(impulse_angle.cos(), impulse_angle.sin()) * tuning.min_speed;
        self.input_accumulator = Vec2::ZERO;
    }

    /// Advance one tick while aiming. `time_secs` drives the idle drift,
    /// a pure function of elapsed time so replays are deterministic.
    pub fn step(&mut self, tuning: &Tuning, time_secs: f32) {
        let drag = std::mem::take(&mut self.input_accumulator);
        self.momentum += drag * tuning.drag_sensitivity;
        self.momentum *= tuning.friction;
        self.momentum += idle_drift(time_secs, tuning.idle_drift_strength);

        self.position += self.momentum;

        // Radial boundary: project back onto the rim and drop only the
        // outward momentum component, keeping tangential motion alive.
        let dist = self.position.length();
        if dist > tuning.max_aim_radius {
            let radial = self.position / dist;
            self.position = radial * tuning.max_aim_radius;
            let outward = self.momentum.dot(radial);
            if outward > 0.0 {
                self.momentum -= radial * outward;
            }
        }

        self.clamp_speed(tuning);
    }

    /// Reset everything to zero immediately (turn lost, no animation)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Enforce `min_speed <= |momentum| <= max_speed`. A momentum that
    /// collapsed to exactly zero is re-aimed along +X at the floor speed
    /// rather than left dead.
    fn clamp_speed(&mut self, tuning: &Tuning) {
        let speed = self.momentum.length();
        if !speed.is_finite() {
            self.momentum = Vec2::X * tuning.min_speed;
        } else if speed > tuning.max_speed {
            self.momentum = self.momentum * (tuning.max_speed / speed);
        } else if speed < tuning.min_speed {
            let dir = normalize_or_zero(self.momentum);
            self.momentum = if dir == Vec2::ZERO {
                Vec2::X * tuning.min_speed
            } else {
                dir * tuning.min_speed
            };
        }
    }
}

/// Perpetual idle drift so the reticle is never perfectly still.
/// Two incommensurate frequencies per axis avoid a visible repeat.
fn idle_drift(time_secs: f32, strength: f32) -> Vec2 {
    Vec2::new(
        (time_secs * 1.9).sin() + (time_secs * 0.7).cos() * 0.5,
        (time_secs * 2.3).cos() + (time_secs * 1.1).sin() * 0.5,
    ) * strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    #[test]
    fn test_begin_aim_spawns_on_edge_band() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        for seed in 0..50u64 {
            let mut rng = Pcg32::seed_from_u64(seed);
            reticle.begin_aim(&mut rng, &tuning);
            let r = reticle.position.length();
            let [lo, hi] = tuning.spawn_radius_band;
            assert!(r >= tuning.max_aim_radius * lo - 1e-3);
            assert!(r <= tuning.max_aim_radius * hi + 1e-3);
            // First frame already moves at the floor speed
            assert!((reticle.momentum.length() - tuning.min_speed).abs() < 1e-5);
        }
    }

    #[test]
    fn test_speed_envelope_holds() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        reticle.begin_aim(&mut rng(), &tuning);

        for i in 0..500 {
            // Occasional hard drag impulses
            if i % 37 == 0 {
                reticle.accumulate_drag(Vec2::new(80.0, -45.0));
            }
            reticle.step(&tuning, i as f32 / 60.0);
            let speed = reticle.momentum.length();
            assert!(
                speed >= tuning.min_speed - 1e-4 && speed <= tuning.max_speed + 1e-4,
                "tick {}: speed {} outside envelope",
                i,
                speed
            );
        }
    }

    #[test]
    fn test_position_stays_in_radius() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        reticle.begin_aim(&mut rng(), &tuning);

        for i in 0..300 {
            reticle.accumulate_drag(Vec2::new(50.0, 0.0));
            reticle.step(&tuning, i as f32 / 60.0);
            assert!(reticle.position.length() <= tuning.max_aim_radius + 1e-3);
        }
    }

    #[test]
    fn test_boundary_keeps_tangential_motion() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        // Pin against the rim moving mostly outward with a tangential part
        reticle.position = Vec2::new(tuning.max_aim_radius, 0.0);
        reticle.momentum = Vec2::new(2.0, 1.5);
        reticle.step(&tuning, 0.0);
        // Outward (x) component clipped, tangential (y) survives
        assert!(reticle.momentum.y.abs() > 0.5);
        assert!(reticle.position.length() <= tuning.max_aim_radius + 1e-3);
    }

    #[test]
    fn test_idle_drift_moves_reticle_without_input() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        reticle.begin_aim(&mut rng(), &tuning);
        let start = reticle.position;

        for i in 0..200 {
            reticle.step(&tuning, i as f32 / 60.0);
        }
        assert!(reticle.position != start);
        assert!(reticle.momentum.length() >= tuning.min_speed - 1e-4);
    }

    #[test]
    fn test_nan_drag_is_ignored() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        reticle.begin_aim(&mut rng(), &tuning);
        reticle.accumulate_drag(Vec2::new(f32::NAN, 3.0));
        reticle.accumulate_drag(Vec2::new(1.0, f32::INFINITY));
        assert_eq!(reticle.input_accumulator, Vec2::ZERO);
        reticle.step(&tuning, 0.0);
        assert!(reticle.position.x.is_finite() && reticle.position.y.is_finite());
    }

    #[test]
    fn test_accumulator_drained_once() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        reticle.begin_aim(&mut rng(), &tuning);
        reticle.accumulate_drag(Vec2::new(10.0, 0.0));
        reticle.step(&tuning, 0.0);
        assert_eq!(reticle.input_accumulator, Vec2::ZERO);
    }

    #[test]
    fn test_reset_is_immediate_and_total() {
        let tuning = Tuning::default();
        let mut reticle = ReticleState::default();
        reticle.begin_aim(&mut rng(), &tuning);
        reticle.accumulate_drag(Vec2::new(5.0, 5.0));
        reticle.reset();
        assert_eq!(reticle.position, Vec2::ZERO);
        assert_eq!(reticle.momentum, Vec2::ZERO);
        assert_eq!(reticle.input_accumulator, Vec2::ZERO);
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let tuning = Tuning::default();
        let mut a = ReticleState::default();
        let mut b = ReticleState::default();
        a.begin_aim(&mut Pcg32::seed_from_u64(7), &tuning);
        b.begin_aim(&mut Pcg32::seed_from_u64(7), &tuning);
        assert_eq!(a.position, b.position);
        assert_eq!(a.momentum, b.momentum);
    }
}
