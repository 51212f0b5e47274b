//! Projectile trajectory engine
//!
//! Built once per shot from the server-confirmed hit point. Position at
//! normalized time t is a linear blend from the launch point to the hit
//! point, plus a gravity parabola that is zero at both ends, plus a wind
//! drift that grows with t². The rendered path therefore drifts with the
//! wind while the landing anchor stays the undrifted server hit point —
//! the arrow visibly snaps back at impact, which is the shipped look.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{HEADING_EPSILON, HEADING_SETTLE_START, TRAIL_CAPACITY};
use crate::tuning::Tuning;
use crate::{heading_between, lerp_angle};

/// One motion-trail sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrailPoint {
    pub position: Vec2,
    pub heading: f32,
}

/// An arrow in flight. Constructed whole before it becomes visible to
/// the tick pipeline, so no tick ever sees a half-initialized flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub elapsed_ms: f32,
    pub duration_ms: f32,
    /// Server-confirmed hit point (target-center relative)
    pub hit_point: Vec2,
    pub start: Vec2,
    pub end: Vec2,
    /// Wind vector captured at launch
    pub wind: Vec2,
    pub arc_height: f32,
    /// Index into the player list, selects fletching color
    pub owner_index: usize,
    /// Authoritative score, revealed at landing
    pub score: u32,
    /// Recent positions/headings, most-recent-last
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Flight {
    pub fn new(
        hit_point: Vec2,
        wind: Vec2,
        owner_index: usize,
        score: u32,
        tuning: &Tuning,
    ) -> Self {
        let start = Vec2::new(0.0, -tuning.launch_offset);
        let end = hit_point;
        let arc_height = start.distance(end) * tuning.arc_height_fraction;
        Self {
            elapsed_ms: 0.0,
            duration_ms: tuning.flight_duration_ms,
            hit_point,
            start,
            end,
            wind,
            arc_height,
            owner_index,
            score,
            trail: Vec::with_capacity(TRAIL_CAPACITY),
        }
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self) -> f32 {
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    /// Gravity parabola: 0 at t=0 and t=1, peak `arc_height` at t=0.5
    fn gravity_arc(&self, t: f32) -> f32 {
        -4.0 * self.arc_height * t * (t - 1.0)
    }

    /// Wind displacement: negligible early, strongest at landing
    fn wind_drift(&self, t: f32, tuning: &Tuning) -> Vec2 {
        self.wind * tuning.wind_drift_factor * t * t
    }

    /// Screen position at normalized time t
    pub fn position_at(&self, t: f32, tuning: &Tuning) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        self.start.lerp(self.end, t)
            + Vec2::new(0.0, self.gravity_arc(t))
            + self.wind_drift(t, tuning)
    }

    /// Arrow heading at normalized time t, blended toward the straight
    /// line into the exact end point over the settle window so the
    /// arrow arrives at a steady angle.
    pub fn heading_at(&self, t: f32, tuning: &Tuning) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let here = self.position_at(t, tuning);
        let ahead = self.position_at(t + HEADING_EPSILON, tuning);
        let tangent = heading_between(here, ahead);

        if t <= HEADING_SETTLE_START {
            return tangent;
        }
        let blend = (t - HEADING_SETTLE_START) / (1.0 - HEADING_SETTLE_START);
        let settle = heading_between(here, self.end);
        lerp_angle(tangent, settle, blend)
    }

    /// Advance by real delta time, dilated once progress passes the
    /// slow-mo threshold. Records a trail sample. Returns true when the
    /// flight has landed (caller deactivates it).
    pub fn advance(&mut self, dt_ms: f32, tuning: &Tuning) -> bool {
        let scale = if self.progress() > tuning.slow_mo_threshold {
            tuning.slow_mo_speed
        } else {
            1.0
        };
        self.elapsed_ms += dt_ms * scale;

        let t = self.progress();
        self.trail.push(TrailPoint {
            position: self.position_at(t, tuning),
            heading: self.heading_at(t, tuning),
        });
        if self.trail.len() > TRAIL_CAPACITY {
            self.trail.remove(0);
        }

        if self.elapsed_ms >= self.duration_ms {
            self.trail.clear();
            return true;
        }
        false
    }
}
