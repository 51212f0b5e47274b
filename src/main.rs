//! Bowshot headless demo
//!
//! Runs a scripted full shot cycle at 60 Hz with a synthetic clock and
//! logs every engine event. Useful for eyeballing the tuning without a
//! renderer attached.

use glam::Vec2;

use bowshot::protocol::{
    GameMode, PlayerInfo, RoomSnapshot, ServerMsg, ShotResult, WirePoint,
};
use bowshot::sim::{tick, FrameClock, GameEvent, GameState, TickInput};
use bowshot::Tuning;

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("bowshot headless demo starting");

    let tuning = Tuning::default();
    let mut state = GameState::new(42, "demo");
    let mut clock = FrameClock::new();

    state.push_event(ServerMsg::Room(RoomSnapshot {
        players: vec![PlayerInfo {
            id: "demo".into(),
            score: 0,
        }],
        current_turn: Some("demo".into()),
        round: 1,
        max_rounds: 1,
        wind: Some(WirePoint { x: 2.0, y: -0.5 }),
        mode: GameMode::Multiplayer,
        time_remaining: None,
    }));

    let mut now_ms = 0.0;
    let mut frame = 0u32;
    loop {
        frame += 1;
        now_ms += FRAME_MS;
        let dt = clock.tick_delta(now_ms, &tuning);

        // Nudge the aim around a bit, then release
        if frame % 7 == 0 {
            state.reticle.accumulate_drag(Vec2::new(3.0, -1.5));
        }
        let input = TickInput {
            release: frame == 180,
        };
        tick(&mut state, &input, &tuning, dt);

        for event in state.take_events() {
            match event {
                GameEvent::ShootRequested(req) => {
                    log::info!(
                        "-> shoot request ({:.1},{:.1}); server replies next frame",
                        req.aim_position.x,
                        req.aim_position.y
                    );
                    // Stand in for the room service: echo back a result
                    state.push_event(ServerMsg::Shot(ShotResult {
                        player: "demo".into(),
                        path: vec![req.aim_position],
                        score: 9,
                    }));
                }
                GameEvent::FlightLanded { point, score, .. } => {
                    log::info!("<- landed at ({:.1},{:.1}), score {}", point.x, point.y, score);
                }
                GameEvent::ArrowPinned { point, .. } => {
                    log::info!("<- arrow pinned at ({:.1},{:.1})", point.x, point.y);
                }
                GameEvent::TurnEnded => {
                    log::info!("turn ended after {} frames", frame);
                    return;
                }
            }
        }

        if frame > 5000 {
            log::warn!("demo did not settle in time");
            return;
        }
    }
}
