//! Per-frame tick pipeline
//!
//! One call per rendering frame advances every component in a fixed
//! order: drain network events -> session gating -> reticle -> zoom ->
//! flight -> impact -> timer -> auto-fire dispatch. Nothing blocks and
//! nothing spawns threads; network events only ever land between ticks.

use crate::consts::TICK_RATE;
use crate::protocol::{GameMode, ShootRequest};
use crate::tuning::Tuning;

use super::state::{GameEvent, GameState, SessionPhase};
use super::timer::AimTimer;
use super::zoom::ZoomCue;

/// Input sampled for a single tick. Pointer drag does not travel here:
/// it arrives more often than ticks and is buffered directly on the
/// reticle via `ReticleState::accumulate_drag`.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer-up: release the shot now
    pub release: bool,
}

/// Advance the engine by one frame. `dt` is the clamped wall-clock
/// delta in seconds (see `FrameClock`).
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, tuning.max_frame_delta)
    } else {
        0.0
    };

    // Network events queued since the last tick apply first, so the
    // rest of the tick sees a consistent world.
    state.drain_events(tuning);
    state.detect_game_over();

    // Board shake decay
    state.board_shake *= 0.9;
    if state.board_shake < 0.01 {
        state.board_shake = 0.0;
    }

    // Solo timed mode counts down locally between snapshots
    if state.mode == GameMode::Solo && !state.game_over {
        if let Some(t) = state.time_remaining.as_mut() {
            *t = (*t - dt).max(0.0);
        }
    }

    // Session gating: losing the turn cancels the aim instantly, with
    // no animation; an in-flight arrow is never cancelled.
    match state.phase {
        SessionPhase::Aiming => {
            let turn_lost = state.mode == GameMode::Multiplayer && !state.is_local_turn();
            if turn_lost || state.game_over {
                state.reticle.reset();
                state.aim_timer = None;
                state.phase = SessionPhase::Idle;
                log::info!("aim cancelled (turn change or game over)");
            }
        }
        SessionPhase::Idle => {
            if state.can_start_aim() {
                let mut rng = state.turn_rng();
                state.reticle.begin_aim(&mut rng, tuning);
                state.aim_timer = Some(AimTimer::new(tuning));
                state.phase = SessionPhase::Aiming;
                log::info!("aim started (turn {})", state.turn_nonce);
            }
        }
        _ => {}
    }

    let time_secs = state.time_ticks as f32 / TICK_RATE;

    // Reticle + manual release. Release is handled before the timer so
    // it clears the armed flag before the expiry check can fire.
    if state.phase == SessionPhase::Aiming {
        if input.release {
            if let Some(timer) = state.aim_timer.as_mut() {
                timer.cancel();
            }
            dispatch_shot(state, tuning);
        } else {
            state.reticle.step(tuning, time_secs);
        }
    }

    // Zoom cue selection, highest priority first
    let cue = if state.hold_ticks > 0 {
        ZoomCue::Hold {
            focus: state.hold_point,
        }
    } else if let Some(flight) = state.flight.as_ref() {
        ZoomCue::LateFlight {
            focus: flight.hit_point,
            progress: flight.progress(),
        }
    } else if state.phase == SessionPhase::Aiming {
        ZoomCue::Aiming
    } else {
        ZoomCue::Neutral
    };
    state.zoom.step(cue, tuning);

    // Flight
    if let Some(mut flight) = state.flight.take() {
        if !flight.advance(dt * 1000.0, tuning) {
            state.flight = Some(flight);
        } else {
            let solo = state.mode == GameMode::Solo;
            state.impact = Some(super::impact::ImpactAnim::new(
                flight.hit_point,
                flight.owner_index,
                tuning,
            ));
            state.board_shake = tuning.impact_shake;
            state.shown_score = Some(flight.score);
            state.hold_ticks = tuning.hold_ticks(solo);
            state.hold_point = flight.hit_point;
            state.phase = SessionPhase::Settling;
            log::info!(
                "flight landed at ({:.1},{:.1}) score {}",
                flight.hit_point.x,
                flight.hit_point.y,
                flight.score
            );
            state.events.push(GameEvent::FlightLanded {
                point: flight.hit_point,
                score: flight.score,
                owner_index: flight.owner_index,
            });
        }
    }

    // Impact animation -> pinned history
    if let Some(anim) = state.impact.as_mut() {
        if let Some(arrow) = anim.step() {
            state.pinned.push(arrow, tuning.max_arrows);
            state.impact = None;
            state.events.push(GameEvent::ArrowPinned {
                point: arrow.point,
                owner_index: arrow.owner_index,
            });
        }
    }

    // Post-shot hold countdown; the settled turn ends when both the
    // impact animation and the hold have finished.
    if state.hold_ticks > 0 {
        state.hold_ticks -= 1;
    }
    if state.phase == SessionPhase::Settling && state.impact.is_none() && state.hold_ticks == 0 {
        state.phase = SessionPhase::Idle;
        state.events.push(GameEvent::TurnEnded);
    }

    // Aim timer, then the forced shot it may have armed on an earlier tick
    if state.phase == SessionPhase::Aiming {
        let fire = match state.aim_timer.as_mut() {
            Some(timer) => timer.step(),
            None => false,
        };
        if fire {
            log::info!("auto-fire: aim timer expired");
            dispatch_shot(state, tuning);
        }
    }

    state.time_ticks += 1;
}

/// Emit the shoot request (exactly once per completed aim), kick the
/// zoom recoil bump and leave the aiming phase.
fn dispatch_shot(state: &mut GameState, tuning: &Tuning) {
    let request = ShootRequest {
        aim_position: state.reticle.position.into(),
    };
    log::info!(
        "shoot request at ({:.1},{:.1})",
        state.reticle.position.x,
        state.reticle.position.y
    );
    state.events.push(GameEvent::ShootRequested(request));
    state.zoom.bump(tuning);
    state.reticle.reset();
    state.aim_timer = None;
    state.shot_outstanding = true;
    state.phase = SessionPhase::Idle;
}
