//! Shot/turn session state
//!
//! The aggregate per-turn state that gates every other component, plus
//! the intake path for asynchronously delivered network events. Events
//! are queued and drained at the top of each tick, so a tick never
//! observes a half-applied room update or a half-built flight.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::flight::Flight;
use super::impact::{ImpactAnim, PinnedArrows};
use super::reticle::ReticleState;
use super::timer::AimTimer;
use super::zoom::ZoomState;
use crate::protocol::{GameMode, PlayerInfo, RoomSnapshot, ServerMsg, ShootRequest, ShotResult};
use crate::tuning::Tuning;

/// Current phase of the local shot cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SessionPhase {
    /// Waiting: not our turn, or between shots
    #[default]
    Idle,
    /// Local player steering the reticle
    Aiming,
    /// An arrow (ours or an opponent's) is in the air
    InFlight,
    /// Impact animation / post-shot hold playing out
    Settling,
}

/// Events the core emits for the shell/network layer, drained per tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Emitted exactly once per completed aim (release or auto-fire)
    ShootRequested(ShootRequest),
    /// A flight finished; the deferred score is now visible
    FlightLanded {
        point: Vec2,
        score: u32,
        owner_index: usize,
    },
    /// The impact animation finished and the arrow joined the history
    ArrowPinned { point: Vec2, owner_index: usize },
    /// The local shot cycle fully settled
    TurnEnded,
}

/// Complete engine state (deterministic given seed + event/input sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Increments per aim start; combined with the seed for the
    /// per-turn spawn-slot RNG
    pub turn_nonce: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: SessionPhase,

    /// Our own player id, to resolve turn ownership
    pub local_player: String,
    pub players: Vec<PlayerInfo>,
    pub current_turn: Option<String>,
    pub round: u32,
    pub max_rounds: u32,
    pub mode: GameMode,
    /// Solo timed mode countdown; counted down locally between snapshots
    pub time_remaining: Option<f32>,
    /// Externally supplied wind, read-only for the core
    pub wind: Vec2,
    pub game_over: bool,

    pub reticle: ReticleState,
    pub aim_timer: Option<AimTimer>,
    pub zoom: ZoomState,
    pub flight: Option<Flight>,
    pub impact: Option<ImpactAnim>,
    pub pinned: PinnedArrows,

    /// Post-shot zoom hold (ticks remaining) and its focus point
    pub hold_ticks: u32,
    pub hold_point: Vec2,
    /// Board shake impulse, geometric decay per tick
    pub board_shake: f32,
    /// Deferred score, revealed when the flight lands
    pub shown_score: Option<u32>,
    /// A shoot request is outstanding; no new aim until resolved
    pub shot_outstanding: bool,

    /// Network events queued between ticks, drained at the tick top
    #[serde(skip)]
    pub pending: Vec<ServerMsg>,
    /// Outbound events produced by the last tick, drained by the shell
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, local_player: impl Into<String>) -> Self {
        Self {
            seed,
            turn_nonce: 0,
            time_ticks: 0,
            phase: SessionPhase::Idle,
            local_player: local_player.into(),
            players: Vec::new(),
            current_turn: None,
            round: 0,
            max_rounds: 0,
            mode: GameMode::Multiplayer,
            time_remaining: None,
            wind: Vec2::ZERO,
            game_over: false,
            reticle: ReticleState::default(),
            aim_timer: None,
            zoom: ZoomState::default(),
            flight: None,
            impact: None,
            pinned: PinnedArrows::new(),
            hold_ticks: 0,
            hold_point: Vec2::ZERO,
            board_shake: 0.0,
            shown_score: None,
            shot_outstanding: false,
            pending: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a network event; applied at the top of the next tick
    pub fn push_event(&mut self, msg: ServerMsg) {
        self.pending.push(msg);
    }

    /// Drain and apply queued network events
    pub(super) fn drain_events(&mut self, tuning: &Tuning) {
        let pending = std::mem::take(&mut self.pending);
        for msg in pending {
            match msg {
                ServerMsg::Room(room) => self.apply_room(room),
                ServerMsg::Shot(shot) => self.apply_shot(shot, tuning),
            }
        }
    }

    /// Merge a room snapshot. Missing fields mean "no change": an empty
    /// player list marks a partial update that only carries wind/turn.
    fn apply_room(&mut self, room: RoomSnapshot) {
        if let Some(wind) = room.wind {
            self.wind = wind.into();
        }
        if let Some(turn) = room.current_turn {
            if self.current_turn.as_deref() != Some(turn.as_str()) {
                log::debug!("turn -> {}", turn);
            }
            self.current_turn = Some(turn);
        }
        if !room.players.is_empty() {
            self.players = room.players;
            self.mode = room.mode;
            if room.max_rounds > 0 {
                self.round = room.round;
                self.max_rounds = room.max_rounds;
            }
        }
        if room.time_remaining.is_some() {
            self.time_remaining = room.time_remaining;
        }
    }

    /// Accept an authoritative shot result. A result with an empty path
    /// is dropped; a duplicate result simply overwrites the previous
    /// flight. The `Flight` is constructed whole before being stored.
    fn apply_shot(&mut self, shot: ShotResult, tuning: &Tuning) {
        let Some(hit_point) = shot.hit_point() else {
            log::warn!("shot result without a path, dropped");
            return;
        };
        let owner_index = self
            .players
            .iter()
            .position(|p| p.id == shot.player)
            .unwrap_or(0);

        if self.flight.is_some() {
            log::warn!("shot result while a flight is active, replacing");
        }
        log::info!(
            "flight launched: hit=({:.1},{:.1}) score={} owner={}",
            hit_point.x,
            hit_point.y,
            shot.score,
            owner_index
        );
        self.flight = Some(Flight::new(
            hit_point,
            self.wind,
            owner_index,
            shot.score,
            tuning,
        ));
        self.shot_outstanding = false;
        self.shown_score = None;
        self.phase = SessionPhase::InFlight;
    }

    /// Whether the local player currently owns the turn
    pub fn is_local_turn(&self) -> bool {
        self.current_turn.as_deref() == Some(self.local_player.as_str())
    }

    /// Whether a new aim may begin this tick
    pub fn can_start_aim(&self) -> bool {
        if self.game_over
            || self.shot_outstanding
            || self.flight.is_some()
            || self.impact.is_some()
            || self.hold_ticks > 0
        {
            return false;
        }
        match self.mode {
            GameMode::Solo => self.time_remaining.map(|t| t > 0.0).unwrap_or(true),
            GameMode::Multiplayer => self.is_local_turn(),
        }
    }

    /// Per-turn RNG for the reticle spawn slot
    pub(super) fn turn_rng(&mut self) -> Pcg32 {
        self.turn_nonce += 1;
        Pcg32::seed_from_u64(self.seed.wrapping_add(self.turn_nonce.wrapping_mul(0x9E37_79B9)))
    }

    /// Game-over detection: time expired in solo, or rounds exhausted.
    /// In-flight animations still finish; only new aims are suppressed.
    pub(super) fn detect_game_over(&mut self) {
        let over = match self.mode {
            GameMode::Solo => self.time_remaining.map(|t| t <= 0.0).unwrap_or(false),
            GameMode::Multiplayer => self.max_rounds > 0 && self.round > self.max_rounds,
        };
        if over && !self.game_over {
            log::info!("game over detected");
            self.game_over = true;
        }
    }

    /// Drain the outbound events produced by the last tick
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::WirePoint;

    fn room_with_turn(turn: &str) -> RoomSnapshot {
        RoomSnapshot {
            players: vec![
                PlayerInfo {
                    id: "p1".into(),
                    score: 0,
                },
                PlayerInfo {
                    id: "p2".into(),
                    score: 0,
                },
            ],
            current_turn: Some(turn.into()),
            round: 1,
            max_rounds: 5,
            wind: Some(WirePoint { x: 1.0, y: 0.0 }),
            mode: GameMode::Multiplayer,
            time_remaining: None,
        }
    }

    #[test]
    fn test_partial_room_update_retains_state() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, "p1");
        state.push_event(ServerMsg::Room(room_with_turn("p1")));
        state.drain_events(&tuning);
        assert_eq!(state.players.len(), 2);
        assert!(state.is_local_turn());

        // Wind-only partial update must not clobber players/turn/mode
        state.push_event(ServerMsg::Room(RoomSnapshot {
            wind: Some(WirePoint { x: -2.0, y: 0.5 }),
            ..Default::default()
        }));
        state.drain_events(&tuning);
        assert_eq!(state.players.len(), 2);
        assert!(state.is_local_turn());
        assert_eq!(state.wind, Vec2::new(-2.0, 0.5));
    }

    #[test]
    fn test_shot_result_builds_whole_flight() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, "p1");
        state.push_event(ServerMsg::Room(room_with_turn("p2")));
        state.push_event(ServerMsg::Shot(ShotResult {
            player: "p2".into(),
            path: vec![WirePoint { x: 10.0, y: -5.0 }],
            score: 7,
        }));
        state.drain_events(&tuning);

        let flight = state.flight.as_ref().expect("flight created");
        assert_eq!(flight.hit_point, Vec2::new(10.0, -5.0));
        assert_eq!(flight.owner_index, 1);
        assert_eq!(flight.score, 7);
        assert_eq!(state.phase, SessionPhase::InFlight);
    }

    #[test]
    fn test_empty_path_shot_dropped() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, "p1");
        state.push_event(ServerMsg::Shot(ShotResult {
            player: "p1".into(),
            path: vec![],
            score: 0,
        }));
        state.drain_events(&tuning);
        assert!(state.flight.is_none());
    }

    #[test]
    fn test_duplicate_shot_overwrites() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, "p1");
        state.push_event(ServerMsg::Room(room_with_turn("p1")));
        for x in [1.0f32, 2.0] {
            state.push_event(ServerMsg::Shot(ShotResult {
                player: "p1".into(),
                path: vec![WirePoint { x, y: 0.0 }],
                score: 1,
            }));
        }
        state.drain_events(&tuning);
        assert_eq!(state.flight.as_ref().unwrap().hit_point.x, 2.0);
    }

    #[test]
    fn test_unknown_player_resolves_to_index_zero() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, "p1");
        state.push_event(ServerMsg::Room(room_with_turn("p1")));
        state.push_event(ServerMsg::Shot(ShotResult {
            player: "ghost".into(),
            path: vec![WirePoint { x: 0.0, y: 0.0 }],
            score: 0,
        }));
        state.drain_events(&tuning);
        assert_eq!(state.flight.as_ref().unwrap().owner_index, 0);
    }

    #[test]
    fn test_gating_rules() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, "p1");
        assert!(!state.can_start_aim());

        state.push_event(ServerMsg::Room(room_with_turn("p1")));
        state.drain_events(&tuning);
        assert!(state.can_start_aim());

        state.shot_outstanding = true;
        assert!(!state.can_start_aim());
        state.shot_outstanding = false;

        state.hold_ticks = 10;
        assert!(!state.can_start_aim());
        state.hold_ticks = 0;

        state.game_over = true;
        assert!(!state.can_start_aim());
    }

    #[test]
    fn test_solo_gates_on_time_remaining() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, "p1");
        state.push_event(ServerMsg::Room(RoomSnapshot {
            players: vec![PlayerInfo {
                id: "p1".into(),
                score: 0,
            }],
            mode: GameMode::Solo,
            time_remaining: Some(30.0),
            ..Default::default()
        }));
        state.drain_events(&tuning);
        assert!(state.can_start_aim());

        state.time_remaining = Some(0.0);
        state.detect_game_over();
        assert!(state.game_over);
        assert!(!state.can_start_aim());
    }
}
