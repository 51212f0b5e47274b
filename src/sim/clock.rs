//! Frame clock
//!
//! Measures real wall-clock time between render callbacks and clamps the
//! delta so a backgrounded tab resuming does not apply minutes of
//! simulated motion in a single tick.

use crate::tuning::Tuning;

/// Monotonic frame-delta source
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta in seconds since the previous call, clamped to
    /// `tuning.max_frame_delta`. The first call, non-finite timestamps
    /// and backwards clocks all yield zero.
    pub fn tick_delta(&mut self, now_ms: f64, tuning: &Tuning) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_ms {
            Some(prev) => ((now_ms - prev) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if !dt.is_finite() || dt < 0.0 {
            return 0.0;
        }
        dt.min(tuning.max_frame_delta)
    }

    /// Forget the previous timestamp (e.g. after an explicit pause) so
    /// the next delta starts fresh instead of spanning the gap.
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
