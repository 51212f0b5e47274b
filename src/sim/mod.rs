//! Deterministic simulation module
//!
//! All gameplay presentation logic lives here. This module must be pure
//! and deterministic:
//! - One tick per rendering frame, wall-clock delta clamped
//! - Seeded RNG only (per-turn Pcg32)
//! - Network events drained at the top of each tick
//! - No rendering or platform dependencies

pub mod clock;
pub mod flight;
pub mod impact;
pub mod reticle;
pub mod state;
pub mod tick;
pub mod timer;
pub mod zoom;

pub use clock::FrameClock;
pub use flight::{Flight, TrailPoint};
pub use impact::{ImpactAnim, PinnedArrow, PinnedArrows};
pub use reticle::ReticleState;
pub use state::{GameEvent, GameState, SessionPhase};
pub use tick::{tick, TickInput};
pub use timer::AimTimer;
pub use zoom::{ZoomCue, ZoomState};
