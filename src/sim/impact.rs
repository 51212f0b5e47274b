//! Impact animation and pinned-arrow retention
//!
//! A landed flight plays a fixed-length overshoot animation: a damped
//! cosine drives a uniform bounce scale (>1, settling to 1) and a second
//! damped cosine drives a Y-axis squash (<1, settling to 1), both as a
//! transform centered on the impact point. On completion the arrow is
//! committed into a capacity-bounded history, oldest evicted first.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Bounce overshoot amplitude at frame 0
const BOUNCE_AMPLITUDE: f32 = 0.35;
/// Squash amplitude at frame 0
const SQUASH_AMPLITUDE: f32 = 0.25;
/// Damping exponent across the animation
const DAMPING: f32 = 4.0;
/// Oscillation frequency (radians over the full animation)
const WOBBLE_FREQ: f32 = 3.0 * std::f32::consts::PI;

/// A settled arrow on the target, immutable once created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinnedArrow {
    pub point: Vec2,
    pub owner_index: usize,
}

/// The short overshoot/squash animation between landing and pinning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactAnim {
    pub frame: u32,
    pub total_frames: u32,
    pub hit_point: Vec2,
    pub owner_index: usize,
}

impl ImpactAnim {
    pub fn new(hit_point: Vec2, owner_index: usize, tuning: &Tuning) -> Self {
        Self {
            frame: 0,
            total_frames: tuning.impact_frames.max(1),
            hit_point,
            owner_index,
        }
    }

    fn phase(&self) -> f32 {
        self.frame as f32 / self.total_frames as f32
    }

    /// Uniform bounce scale: starts above 1, settles to 1
    pub fn bounce_scale(&self) -> f32 {
        let p = self.phase();
        1.0 + BOUNCE_AMPLITUDE * (-DAMPING * p).exp() * (WOBBLE_FREQ * p).cos()
    }

    /// Y-axis squash scale: starts below 1, settles to 1
    pub fn squash_scale(&self) -> f32 {
        let p = self.phase();
        1.0 - SQUASH_AMPLITUDE * (-DAMPING * p).exp() * (WOBBLE_FREQ * p).cos()
    }

    /// Advance one tick. Yields the pinned arrow on the final frame.
    pub fn step(&mut self) -> Option<PinnedArrow> {
        self.frame += 1;
        if self.frame >= self.total_frames {
            Some(PinnedArrow {
                point: self.hit_point,
                owner_index: self.owner_index,
            })
        } else {
            None
        }
    }
}

/// Ordered pinned-arrow history, capacity-bounded FIFO
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PinnedArrows {
    entries: Vec<PinnedArrow>,
}

impl PinnedArrows {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append, evicting the oldest entry when over capacity
    pub fn push(&mut self, arrow: PinnedArrow, max_arrows: usize) {
        self.entries.push(arrow);
        while self.entries.len() > max_arrows.max(1) {
            self.entries.remove(0);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinnedArrow> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
