//! Wire types for the external network/session layer
//!
//! The room service decides whose turn it is, computes the official hit
//! point and score, and broadcasts wind. This module only defines the
//! shapes it sends and the one message the core sends back; transport is
//! the shell's problem.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A point on the wire (pixels relative to target center)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: f32,
    pub y: f32,
}

impl From<WirePoint> for Vec2 {
    fn from(p: WirePoint) -> Self {
        Vec2::new(p.x, p.y)
    }
}

impl From<Vec2> for WirePoint {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

/// Game mode announced by the room service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solo,
    #[default]
    Multiplayer,
}

/// A player entry in the room snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    #[serde(default)]
    pub score: u32,
}

/// Room/turn snapshot, re-sent whenever anything in it changes.
///
/// Every field defaults so a partial snapshot parses; the simulation
/// treats missing fields as "no change" by merging rather than replacing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomSnapshot {
    pub players: Vec<PlayerInfo>,
    pub current_turn: Option<String>,
    pub round: u32,
    pub max_rounds: u32,
    pub wind: Option<WirePoint>,
    pub mode: GameMode,
    pub time_remaining: Option<f32>,
}

/// Authoritative shot result. `path[0]` is the hit point; the rest of
/// the path is advisory and unused by this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotResult {
    pub player: String,
    pub path: Vec<WirePoint>,
    pub score: u32,
}

impl ShotResult {
    /// The server-confirmed hit point, if the path is non-empty
    pub fn hit_point(&self) -> Option<Vec2> {
        self.path.first().copied().map(Vec2::from)
    }
}

/// Outbound shoot request, emitted exactly once per completed aim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootRequest {
    pub aim_position: WirePoint,
}

/// Everything the session layer can push into the core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    Room(RoomSnapshot),
    Shot(ShotResult),
}

/// Parse a server message, surfacing the error so the caller can log
/// and drop it (last-known state is retained on failure).
pub fn parse_server_msg(json: &str) -> Result<ServerMsg, serde_json::Error> {
    serde_json::from_str(json)
}

/// Encode an outbound shoot request
pub fn encode_shoot_request(req: &ShootRequest) -> String {
    // ShootRequest has no non-serializable fields, so this cannot fail
    serde_json::to_string(req).unwrap_or_default()
}
