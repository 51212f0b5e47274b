//! Bowshot - turn-based archery aiming and shot presentation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (reticle, timer, zoom, flight, impact)
//! - `protocol`: Wire types exchanged with the external session layer
//! - `tuning`: Data-driven game balance
//!
//! The engine is single-threaded and cooperative: one `sim::tick` call per
//! rendering frame advances every component in a fixed order. The network
//! layer that assigns turns, scores shots and broadcasts wind is an
//! external collaborator; it talks to the core through `protocol` types.

pub mod protocol;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::Vec2;

/// Engine constants that are structural rather than tunable
pub mod consts {
    /// Nominal tick rate the aim timer is calibrated against (Hz)
    pub const TICK_RATE: f32 = 60.0;

    /// Flight trail ring capacity (positions + headings, most-recent-last)
    pub const TRAIL_CAPACITY: usize = 24;

    /// Number of edge-of-target spawn sectors for the reticle
    pub const SPAWN_SECTORS: u32 = 8;

    /// Normalized flight progress past which the arrow heading settles
    /// toward the straight line into the hit point
    pub const HEADING_SETTLE_START: f32 = 0.8;

    /// Epsilon used for finite-difference heading sampling
    pub const HEADING_EPSILON: f32 = 0.01;
}

/// Normalize a vector, yielding zero (not NaN) for degenerate input
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq.is_finite() && len_sq > f32::EPSILON {
        v / len_sq.sqrt()
    } else {
        Vec2::ZERO
    }
}

/// Heading (radians) of the displacement from `a` to `b`, 0 for degenerate pairs
#[inline]
pub fn heading_between(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    if d.length_squared() > f32::EPSILON {
        d.y.atan2(d.x)
    } else {
        0.0
    }
}

/// Linear interpolation between two angles along the shortest arc
#[inline]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut delta = (to - from) % TAU;
    if delta > PI {
        delta -= TAU;
    } else if delta < -PI {
        delta += TAU;
    }
    from + delta * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(normalize_or_zero(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(normalize_or_zero(Vec2::new(f32::NAN, 1.0)), Vec2::ZERO);
    }

    #[test]
    fn test_normalize_unit_length() {
        let n = normalize_or_zero(Vec2::new(3.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_heading_between() {
        let h = heading_between(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert!((h - PI / 2.0).abs() < 1e-6);
        assert_eq!(heading_between(Vec2::ONE, Vec2::ONE), 0.0);
    }

    #[test]
    fn test_lerp_angle_shortest_arc() {
        // 170° to -170° should pass through 180°, not 0°
        let mid = lerp_angle(170.0_f32.to_radians(), -170.0_f32.to_radians(), 0.5);
        assert!((mid.abs() - PI).abs() < 0.01);
    }
}
